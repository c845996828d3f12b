//! Header elevation wiring.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Element};

use super::{document, js_error_message, log_failure};
use crate::config::SiteConfig;
use crate::scroll::ScrollTracker;

/// Toggles the scrolled class on the page header as the window scrolls.
pub struct HeaderObserver {
    selector: String,
    class: String,
    tracker: RefCell<ScrollTracker>,
    header: RefCell<Option<Element>>,
    listening: Cell<bool>,
}

impl HeaderObserver {
    #[must_use]
    pub fn install(config: &SiteConfig) -> Rc<Self> {
        let observer = Rc::new(Self {
            selector: config.header_selector.clone(),
            class: config.scrolled_class.clone(),
            tracker: RefCell::new(ScrollTracker::new(config.scroll_threshold)),
            header: RefCell::new(None),
            listening: Cell::new(false),
        });
        observer.rebind();
        observer
    }

    /// Locate the header again; swapped content replaces the old element.
    pub fn rebind(self: &Rc<Self>) {
        let header = document().and_then(|doc| match doc.query_selector(&self.selector) {
            Ok(found) => found,
            Err(err) => {
                log::debug!("bad header selector {}: {}", self.selector, js_error_message(&err));
                None
            }
        });
        let found = header.is_some();
        *self.header.borrow_mut() = header;
        if !found {
            return;
        }
        self.listen();
        self.refresh();
    }

    fn listen(self: &Rc<Self>) {
        if self.listening.get() {
            return;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        let observer = Rc::downgrade(self);
        let on_scroll = Closure::<dyn FnMut()>::new(move || {
            if let Some(observer) = observer.upgrade() {
                observer.refresh();
            }
        });
        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        match window.add_event_listener_with_callback_and_add_event_listener_options(
            "scroll",
            on_scroll.as_ref().unchecked_ref(),
            &options,
        ) {
            Ok(()) => {
                self.listening.set(true);
                on_scroll.forget();
            }
            Err(err) => log::debug!("scroll listener failed: {}", js_error_message(&err)),
        }
    }

    fn refresh(&self) {
        let elevation = self.tracker.borrow_mut().observe(scroll_offset());
        if let Some(header) = self.header.borrow().as_ref() {
            log_failure(
                "toggling scrolled class",
                header.class_list().toggle_with_force(&self.class, elevation.is_elevated()),
            );
        }
    }
}

fn scroll_offset() -> f64 {
    let Some(window) = web_sys::window() else {
        return 0.0;
    };
    if let Ok(offset) = window.page_y_offset() {
        return offset;
    }
    window
        .document()
        .and_then(|doc| doc.document_element())
        .map_or(0.0, |root| f64::from(root.scroll_top()))
}
