//! `localStorage`/`matchMedia` backing for [`ThemeController`].

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, MediaQueryList, MediaQueryListEvent, Storage};

use super::{document, js_error_message, log_failure};
use crate::config::SiteConfig;
use crate::theme::{ThemeController, ThemeEnv};

const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

/// Marks a toggle control that already has its click listener.
const TOGGLE_MARKER_KEY: &str = "themeToggleBound";

/// Theme capabilities backed by the live page.
pub struct DomThemeEnv {
    storage_key: String,
    attribute: String,
}

impl DomThemeEnv {
    #[must_use]
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            storage_key: config.theme_storage_key.clone(),
            attribute: config.theme_attribute.clone(),
        }
    }

    fn storage() -> Option<Storage> {
        match web_sys::window()?.local_storage() {
            Ok(storage) => storage,
            Err(err) => {
                log::debug!("localStorage unavailable: {}", js_error_message(&err));
                None
            }
        }
    }
}

impl ThemeEnv for DomThemeEnv {
    fn stored(&self) -> Option<String> {
        match Self::storage()?.get_item(&self.storage_key) {
            Ok(value) => value,
            Err(err) => {
                log::debug!("reading {} failed: {}", self.storage_key, js_error_message(&err));
                None
            }
        }
    }

    fn store(&self, value: &str) {
        if let Some(storage) = Self::storage() {
            log_failure("persisting theme", storage.set_item(&self.storage_key, value));
        }
    }

    fn forget(&self) {
        if let Some(storage) = Self::storage() {
            log_failure("clearing theme", storage.remove_item(&self.storage_key));
        }
    }

    fn system_prefers_dark(&self) -> Option<bool> {
        dark_scheme_query().map(|query| query.matches())
    }

    fn applied(&self) -> Option<String> {
        document()?.document_element()?.get_attribute(&self.attribute)
    }

    fn set_applied(&self, value: &str) {
        if let Some(root) = document().and_then(|doc| doc.document_element()) {
            log_failure("setting theme attribute", root.set_attribute(&self.attribute, value));
        }
    }

    fn clear_applied(&self) {
        if let Some(root) = document().and_then(|doc| doc.document_element()) {
            log_failure("clearing theme attribute", root.remove_attribute(&self.attribute));
        }
    }
}

fn dark_scheme_query() -> Option<MediaQueryList> {
    match web_sys::window()?.match_media(DARK_SCHEME_QUERY) {
        Ok(query) => query,
        Err(err) => {
            log::debug!("matchMedia unavailable: {}", js_error_message(&err));
            None
        }
    }
}

/// The page's theme controller plus its event wiring.
pub struct ThemeBinding {
    controller: ThemeController<DomThemeEnv>,
    toggle_id: String,
    // Held so the change listener lives as long as the page.
    system_query: RefCell<Option<MediaQueryList>>,
}

impl ThemeBinding {
    /// Apply the resolved theme, bind the toggle, and follow the system scheme.
    #[must_use]
    pub fn install(config: &SiteConfig) -> Rc<Self> {
        let binding = Rc::new(Self {
            controller: ThemeController::new(DomThemeEnv::new(config)),
            toggle_id: config.theme_toggle_id.clone(),
            system_query: RefCell::new(None),
        });
        binding.rebind();
        binding.follow_system();
        binding
    }

    #[must_use]
    pub fn controller(&self) -> &ThemeController<DomThemeEnv> {
        &self.controller
    }

    /// Re-apply the preference and bind a toggle control that appeared since.
    pub fn rebind(self: &Rc<Self>) {
        let theme = self.controller.initialize();
        log::debug!("theme initialized to {theme}");
        self.bind_toggle();
    }

    fn bind_toggle(self: &Rc<Self>) {
        let toggle = document().and_then(|doc| doc.get_element_by_id(&self.toggle_id));
        let Some(toggle) = toggle else {
            return;
        };
        let Ok(toggle) = toggle.dyn_into::<HtmlElement>() else {
            return;
        };
        let dataset = toggle.dataset();
        if dataset.get(TOGGLE_MARKER_KEY).is_some() {
            return;
        }
        log_failure("marking theme toggle", dataset.set(TOGGLE_MARKER_KEY, "true"));

        let binding = Rc::downgrade(self);
        let on_click = Closure::<dyn FnMut()>::new(move || {
            if let Some(binding) = binding.upgrade() {
                let theme = binding.controller.toggle();
                log::debug!("theme toggled to {theme}");
            }
        });
        log_failure(
            "theme toggle listener",
            toggle.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref()),
        );
        on_click.forget();
    }

    fn follow_system(self: &Rc<Self>) {
        if self.system_query.borrow().is_some() {
            return;
        }
        let Some(query) = dark_scheme_query() else {
            log::debug!("not following system color scheme");
            return;
        };

        let binding = Rc::downgrade(self);
        let on_change =
            Closure::<dyn FnMut(MediaQueryListEvent)>::new(move |event: MediaQueryListEvent| {
                let Some(binding) = binding.upgrade() else {
                    return;
                };
                if let Some(theme) = binding.controller.on_system_change(event.matches()) {
                    log::debug!("system color scheme changed; theme now {theme}");
                }
            });
        log_failure(
            "color scheme listener",
            query.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref()),
        );
        on_change.forget();
        *self.system_query.borrow_mut() = Some(query);
    }
}
