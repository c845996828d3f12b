//! Browser shell: the only module that touches `web_sys`.
//!
//! SYSTEM CONTEXT
//! ==============
//! `start` runs when the wasm module is instantiated. It installs the
//! console logger and panic hook, then boots the behaviors once the document
//! is ready. Booting builds one [`Site`] holding the per-page state that the
//! event handlers and JS exports share.
//!
//! ERROR HANDLING
//! ==============
//! DOM and storage calls are best-effort. Failures are logged at debug level
//! through [`log_failure`] and the page carries on in a simpler mode.

mod exports;
mod navigation;
mod scroll;
mod theme;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Document;

use crate::config::{CONFIG_ELEMENT_ID, SiteConfig};

pub use navigation::{BrowserHost, PageNavigator, attach_navigation_listeners};
pub use scroll::HeaderObserver;
pub use theme::{DomThemeEnv, ThemeBinding};

/// Per-page state built once at boot.
pub struct Site {
    pub theme: Rc<ThemeBinding>,
    pub navigator: Rc<PageNavigator>,
}

thread_local! {
    // Read only by the JS exports, which have no other way to reach the page state.
    static SITE: RefCell<Option<Rc<Site>>> = const { RefCell::new(None) };
}

/// Module entry point.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&JsValue::from_str("sitewire: logger already installed"));
    }
    when_ready(boot);
}

fn boot() {
    let config = SiteConfig::from_override(config_override().as_deref());
    let theme = ThemeBinding::install(&config);
    let header = HeaderObserver::install(&config);
    let navigator = navigation::install(&config, &theme, &header);
    let site = Rc::new(Site {
        theme,
        navigator,
    });
    SITE.with(|slot| *slot.borrow_mut() = Some(site));
}

/// Run `f` against the booted site, or log and return `None` before boot.
pub(crate) fn with_site<R>(f: impl FnOnce(&Site) -> R) -> Option<R> {
    let Some(site) = SITE.with(|slot| slot.borrow().clone()) else {
        log::warn!("sitewire has not finished booting");
        return None;
    };
    Some(f(&site))
}

/// Run `run` on `DOMContentLoaded`, or now if parsing already finished.
fn when_ready(run: fn()) {
    let Some(doc) = document() else {
        return;
    };
    if doc.ready_state() != "loading" {
        run();
        return;
    }
    let callback = Closure::once_into_js(run);
    log_failure(
        "DOMContentLoaded listener",
        doc.add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref()),
    );
}

fn config_override() -> Option<String> {
    document()?.get_element_by_id(CONFIG_ELEMENT_ID)?.text_content()
}

pub(crate) fn document() -> Option<Document> {
    web_sys::window().and_then(|w| w.document())
}

/// Best-effort message for a thrown JS value.
pub(crate) fn js_error_message(err: &JsValue) -> String {
    if let Some(message) = err.as_string() {
        return message;
    }
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    format!("{err:?}")
}

/// Log a failed best-effort browser call.
pub(crate) fn log_failure<T>(context: &str, result: Result<T, JsValue>) {
    if let Err(err) = result {
        log::debug!("{context} failed: {}", js_error_message(&err));
    }
}
