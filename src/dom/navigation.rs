//! View-transition navigation against the live page.
//!
//! [`BrowserHost`] implements [`NavigationHost`] with `fetch` (through
//! `gloo-net`), `DOMParser`, and `document.startViewTransition`. The
//! transition API is looked up reflectively because `web-sys` has no
//! stable binding for it.

use std::rc::Rc;

use js_sys::{Function, Promise, Reflect};
use url::Url;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{Document, DomParser, HtmlAnchorElement, MouseEvent, SupportedType};

use super::{HeaderObserver, ThemeBinding, document, js_error_message, log_failure};
use crate::config::SiteConfig;
use crate::links::{
    ClickDecision, LINK_MARKER_KEY, LinkClick, Modifiers, NAVIGATION_LINK_SELECTOR, classify_click,
};
use crate::navigator::{NavError, NavKind, NavigationHost, Navigator};

pub type PageNavigator = Navigator<BrowserHost>;

/// The real browser behind [`Navigator`].
pub struct BrowserHost {
    enabled: bool,
}

impl BrowserHost {
    /// `enabled: false` reports transitions as unsupported regardless of the browser.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl NavigationHost for BrowserHost {
    type Document = Document;

    fn supports_transitions(&self) -> bool {
        self.enabled && document().is_some_and(|doc| start_view_transition(&doc).is_some())
    }

    async fn fetch_html(&self, url: &str) -> Result<String, NavError> {
        let response = gloo_net::http::Request::get(url)
            .send()
            .await
            .map_err(|err| NavError::Fetch(err.to_string()))?;
        let status = response.status();
        if !(200..300).contains(&status) {
            log::warn!("{url} answered {status} {}", response.status_text());
        }
        response.text().await.map_err(|err| NavError::Fetch(err.to_string()))
    }

    fn parse_document(&self, html: &str) -> Result<Document, NavError> {
        let parser = DomParser::new().map_err(|err| NavError::Parse(js_error_message(&err)))?;
        parser
            .parse_from_string(html, SupportedType::TextHtml)
            .map_err(|err| NavError::Parse(js_error_message(&err)))
    }

    async fn run_transition(&self, update: Box<dyn FnOnce()>) -> Result<(), NavError> {
        let doc = document().ok_or_else(|| NavError::Transition("no document".to_owned()))?;
        let start = start_view_transition(&doc)
            .ok_or_else(|| NavError::Transition("startViewTransition is unavailable".to_owned()))?;
        let callback = Closure::once_into_js(move || update());
        let transition = start.call1(&doc, &callback).map_err(transition_error)?;
        let finished =
            Reflect::get(&transition, &JsValue::from_str("finished")).map_err(transition_error)?;
        let finished = finished.dyn_into::<Promise>().map_err(transition_error)?;
        JsFuture::from(finished).await.map_err(transition_error)?;
        Ok(())
    }

    fn swap_content(&self, fetched: &Document) {
        let Some(doc) = document() else {
            return;
        };
        let markup = fetched.body().map(|body| body.inner_html()).unwrap_or_default();
        match doc.body() {
            Some(body) => body.set_inner_html(&markup),
            None => log::debug!("current document has no body to replace"),
        }
        doc.set_title(&fetched.title());
    }

    fn push_history(&self, url: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        match window.history() {
            Ok(history) => log_failure(
                "pushState",
                history.push_state_with_url(&JsValue::NULL, "", Some(url)),
            ),
            Err(err) => log::debug!("history unavailable: {}", js_error_message(&err)),
        }
    }

    fn scroll_to_top(&self) {
        if let Some(window) = web_sys::window() {
            window.scroll_to_with_x_and_y(0.0, 0.0);
        }
    }

    fn load_page(&self, url: &str) {
        if let Some(window) = web_sys::window() {
            log_failure("location.href", window.location().set_href(url));
        }
    }

    fn reload(&self) {
        if let Some(window) = web_sys::window() {
            log_failure("location.reload", window.location().reload());
        }
    }

    fn current_url(&self) -> String {
        web_sys::window()
            .and_then(|window| match window.location().href() {
                Ok(href) => Some(href),
                Err(err) => {
                    log::debug!("location.href unreadable: {}", js_error_message(&err));
                    None
                }
            })
            .unwrap_or_default()
    }
}

fn start_view_transition(doc: &Document) -> Option<Function> {
    let Ok(value) = Reflect::get(doc, &JsValue::from_str("startViewTransition")) else {
        return None;
    };
    value.dyn_ref::<Function>().cloned()
}

fn transition_error(err: JsValue) -> NavError {
    NavError::Transition(js_error_message(&err))
}

/// Build the page navigator and, where transitions are usable, hook up
/// links, back/forward, and post-swap reinitialization.
pub fn install(
    config: &SiteConfig,
    theme: &Rc<ThemeBinding>,
    header: &Rc<HeaderObserver>,
) -> Rc<PageNavigator> {
    let navigator = Rc::new(Navigator::new(BrowserHost::new(config.view_transitions)));
    if !config.view_transitions {
        log::info!("View Transitions disabled by configuration");
        return navigator;
    }
    if !navigator.is_supported() {
        log::info!("View Transitions API not supported");
        return navigator;
    }

    let theme = Rc::clone(theme);
    navigator.on_reinitialize(move || theme.rebind());
    let header = Rc::clone(header);
    navigator.on_reinitialize(move || header.rebind());
    let weak = Rc::downgrade(&navigator);
    navigator.on_reinitialize(move || {
        if let Some(navigator) = weak.upgrade() {
            let attached = attach_navigation_listeners(&navigator);
            log::debug!("attached transition listeners to {attached} new links");
        }
    });

    let attached = attach_navigation_listeners(&navigator);
    log::debug!("attached transition listeners to {attached} links");
    listen_pop_state(&navigator);
    log::info!("View Transitions enabled");
    navigator
}

/// Bind click handlers to every unmarked candidate anchor, returning how
/// many were newly bound. Already-marked anchors are skipped.
#[must_use]
pub fn attach_navigation_listeners<H: NavigationHost>(navigator: &Rc<Navigator<H>>) -> u32 {
    let Some(doc) = document() else {
        return 0;
    };
    let links = match doc.query_selector_all(NAVIGATION_LINK_SELECTOR) {
        Ok(links) => links,
        Err(err) => {
            log::debug!("link query failed: {}", js_error_message(&err));
            return 0;
        }
    };

    let mut attached = 0_u32;
    for index in 0..links.length() {
        let Some(node) = links.item(index) else {
            continue;
        };
        let Ok(anchor) = node.dyn_into::<HtmlAnchorElement>() else {
            continue;
        };
        let dataset = anchor.dataset();
        if dataset.get(LINK_MARKER_KEY).is_some() {
            continue;
        }
        log_failure("marking link", dataset.set(LINK_MARKER_KEY, "true"));
        bind_link(navigator, anchor);
        attached += 1;
    }
    attached
}

fn bind_link<H: NavigationHost>(navigator: &Rc<Navigator<H>>, anchor: HtmlAnchorElement) {
    let weak = Rc::downgrade(navigator);
    let link = anchor.clone();
    let on_click = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
        let Some(navigator) = weak.upgrade() else {
            return;
        };
        let Some(url) = intercept(&link, &event) else {
            return;
        };
        event.prevent_default();
        spawn_local(async move {
            let outcome = navigator.navigate(url, NavKind::Push).await;
            log::debug!("navigation finished: {outcome:?}");
        });
    });
    log_failure(
        "link click listener",
        anchor.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref()),
    );
    on_click.forget();
}

/// The absolute URL to navigate to, or `None` to leave the click alone.
fn intercept(link: &HtmlAnchorElement, event: &MouseEvent) -> Option<String> {
    let href = link.get_attribute("href")?;
    let page = current_page_url()?;
    let target = link.target();
    let click = LinkClick {
        href: &href,
        modifiers: Modifiers {
            ctrl: event.ctrl_key(),
            meta: event.meta_key(),
            shift: event.shift_key(),
        },
        download: link.has_attribute("download"),
        target: &target,
    };
    match classify_click(&click, &page) {
        ClickDecision::Intercept(url) => Some(String::from(url)),
        ClickDecision::Passthrough(reason) => {
            log::debug!("leaving click on {href} to the browser: {reason:?}");
            None
        }
    }
}

fn current_page_url() -> Option<Url> {
    let href = match web_sys::window()?.location().href() {
        Ok(href) => href,
        Err(err) => {
            log::debug!("location.href unreadable: {}", js_error_message(&err));
            return None;
        }
    };
    match Url::parse(&href) {
        Ok(url) => Some(url),
        Err(err) => {
            log::debug!("page URL {href} did not parse: {err}");
            None
        }
    }
}

fn listen_pop_state<H: NavigationHost>(navigator: &Rc<Navigator<H>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let weak = Rc::downgrade(navigator);
    let on_pop = Closure::<dyn FnMut()>::new(move || {
        let Some(navigator) = weak.upgrade() else {
            return;
        };
        spawn_local(async move {
            let outcome = navigator.restore_current().await;
            log::debug!("history restore finished: {outcome:?}");
        });
    });
    log_failure(
        "popstate listener",
        window.add_event_listener_with_callback("popstate", on_pop.as_ref().unchecked_ref()),
    );
    on_pop.forget();
}
