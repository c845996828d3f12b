//! Browser tests for the DOM shell.
//!
//! Run with `wasm-pack test --headless --firefox -- --features hydrate`.
#![cfg(all(target_arch = "wasm32", feature = "hydrate"))]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use sitewire::config::SiteConfig;
use sitewire::dom::{DomThemeEnv, HeaderObserver, ThemeBinding, attach_navigation_listeners};
use sitewire::navigator::{NavError, NavigationHost, Navigator};
use sitewire::theme::{Theme, ThemeController, ThemeEnv};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_test::*;
use web_sys::{HtmlAnchorElement, MouseEvent, MouseEventInit};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

fn test_config(key: &str) -> SiteConfig {
    SiteConfig {
        theme_storage_key: key.to_owned(),
        ..SiteConfig::default()
    }
}

fn root_theme() -> Option<String> {
    document().document_element().unwrap().get_attribute("data-theme")
}

/// Host that never leaves the test page: fetches fail, loads are recorded.
#[derive(Default)]
struct RecordingHost {
    loads: RefCell<Vec<String>>,
}

impl NavigationHost for RecordingHost {
    type Document = ();

    fn supports_transitions(&self) -> bool {
        true
    }

    async fn fetch_html(&self, url: &str) -> Result<String, NavError> {
        Err(NavError::Fetch(format!("{url} is not served in tests")))
    }

    fn parse_document(&self, _html: &str) -> Result<(), NavError> {
        Ok(())
    }

    async fn run_transition(&self, update: Box<dyn FnOnce()>) -> Result<(), NavError> {
        update();
        Ok(())
    }

    fn swap_content(&self, _document: &()) {}

    fn push_history(&self, _url: &str) {}

    fn scroll_to_top(&self) {}

    fn load_page(&self, url: &str) {
        self.loads.borrow_mut().push(url.to_owned());
    }

    fn reload(&self) {}

    fn current_url(&self) -> String {
        String::new()
    }
}

fn append_link(href: &str) -> HtmlAnchorElement {
    let doc = document();
    let link: HtmlAnchorElement = doc.create_element("a").unwrap().dyn_into().unwrap();
    link.set_attribute("href", href).unwrap();
    doc.body().unwrap().append_child(&link).unwrap();
    link
}

/// Dispatch a cancelable click and report whether anything prevented it.
///
/// A listener added after the navigation one records the verdict and then
/// cancels the click so the test page never follows the link.
fn click_was_prevented(link: &HtmlAnchorElement) -> bool {
    let verdict = Rc::new(Cell::new(None));
    let record = Rc::clone(&verdict);
    let recorder = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
        record.set(Some(event.default_prevented()));
        event.prevent_default();
    });
    link.add_event_listener_with_callback("click", recorder.as_ref().unchecked_ref())
        .unwrap();

    let init = MouseEventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    let event = MouseEvent::new_with_mouse_event_init_dict("click", &init).unwrap();
    link.dispatch_event(&event).unwrap();

    link.remove_event_listener_with_callback("click", recorder.as_ref().unchecked_ref())
        .unwrap();
    verdict.get().unwrap()
}

#[wasm_bindgen_test]
fn apply_preference_writes_storage_and_attribute() {
    let controller = ThemeController::new(DomThemeEnv::new(&test_config("sitewire-test-apply")));
    controller.apply_preference(Theme::Dark);
    assert_eq!(root_theme().as_deref(), Some("dark"));
    assert_eq!(controller.env().stored().as_deref(), Some("dark"));

    controller.clear_preference();
    assert_eq!(controller.env().stored(), None);
    assert_eq!(root_theme(), None);
}

#[wasm_bindgen_test]
fn initialize_persists_the_applied_theme() {
    let controller = ThemeController::new(DomThemeEnv::new(&test_config("sitewire-test-init")));
    controller.env().forget();
    let theme = controller.initialize();
    assert_eq!(root_theme().as_deref(), Some(theme.as_str()));
    assert_eq!(controller.env().stored().as_deref(), Some(theme.as_str()));

    controller.clear_preference();
}

#[wasm_bindgen_test]
fn toggle_control_is_bound_once_across_rebinds() {
    let doc = document();
    let button = doc.create_element("button").unwrap();
    button.set_id("theme-toggle");
    doc.body().unwrap().append_child(&button).unwrap();

    let binding = ThemeBinding::install(&test_config("sitewire-test-toggle"));
    binding.controller().apply_preference(Theme::Light);
    binding.rebind();
    binding.rebind();

    button.unchecked_ref::<web_sys::HtmlElement>().click();
    assert_eq!(root_theme().as_deref(), Some("dark"));

    binding.controller().clear_preference();
    button.remove();
}

#[wasm_bindgen_test]
fn header_starts_flat_at_top_of_page() {
    let doc = document();
    let header = doc.create_element("header").unwrap();
    header.set_class_name("top-app-bar");
    doc.body().unwrap().append_child(&header).unwrap();

    let observer = HeaderObserver::install(&SiteConfig::default());
    observer.rebind();
    assert!(!header.class_list().contains("scrolled"));

    header.remove();
}

#[wasm_bindgen_test]
fn links_are_bound_once_and_marked() {
    let navigator = Rc::new(Navigator::new(RecordingHost::default()));
    let link = append_link("/sitewire-once");

    assert!(attach_navigation_listeners(&navigator) >= 1);
    assert_eq!(link.dataset().get("viewTransition").as_deref(), Some("true"));
    assert_eq!(attach_navigation_listeners(&navigator), 0);

    link.remove();
}

#[wasm_bindgen_test]
fn pre_marked_link_is_left_alone() {
    let navigator = Rc::new(Navigator::new(RecordingHost::default()));
    let link = append_link("/sitewire-premarked");
    link.dataset().set("viewTransition", "true").unwrap();

    assert_eq!(attach_navigation_listeners(&navigator), 0);
    assert!(!click_was_prevented(&link));

    link.remove();
}

#[wasm_bindgen_test]
fn same_origin_click_is_intercepted() {
    let navigator = Rc::new(Navigator::new(RecordingHost::default()));
    let link = append_link("/about");
    assert_eq!(attach_navigation_listeners(&navigator), 1);

    assert!(click_was_prevented(&link));

    link.remove();
}

#[wasm_bindgen_test]
fn blank_target_click_is_not_intercepted() {
    let navigator = Rc::new(Navigator::new(RecordingHost::default()));
    let link = append_link("/about-new-tab");
    link.set_target("_blank");
    assert_eq!(attach_navigation_listeners(&navigator), 1);

    assert!(!click_was_prevented(&link));
    assert!(navigator.host().loads.borrow().is_empty());

    link.remove();
}
