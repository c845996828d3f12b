//! Deciding which link clicks become in-place transitions.
//!
//! Only relative and root-relative anchors are candidates. A candidate click
//! is intercepted unless the user or the markup asks for something the
//! browser should handle itself: a modifier key, an in-page fragment, a
//! download, a new browsing context, or a different origin.

#[cfg(test)]
#[path = "links_test.rs"]
mod links_test;

use url::Url;

/// Anchors whose `href` is `/...`, `./...`, or `../...`.
pub const NAVIGATION_LINK_SELECTOR: &str = r#"a[href^="/"], a[href^="./"], a[href^="../"]"#;

/// `dataset` key marking an anchor whose click listener is attached.
/// Appears in markup as `data-view-transition="true"`.
pub const LINK_MARKER_KEY: &str = "viewTransition";

/// String form of [`NAVIGATION_LINK_SELECTOR`]'s prefix match.
#[must_use]
pub fn is_navigation_candidate(href: &str) -> bool {
    href.starts_with('/') || href.starts_with("./") || href.starts_with("../")
}

/// Modifier keys held during a click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    /// Cmd on macOS.
    pub meta: bool,
    pub shift: bool,
}

impl Modifiers {
    #[must_use]
    pub fn any(self) -> bool {
        self.ctrl || self.meta || self.shift
    }
}

/// Everything the classifier needs to know about one click.
#[derive(Debug, Clone, Copy)]
pub struct LinkClick<'a> {
    /// The raw `href` attribute, not the resolved property.
    pub href: &'a str,
    pub modifiers: Modifiers,
    /// The anchor carries a `download` attribute.
    pub download: bool,
    /// The anchor's `target` attribute, empty when absent.
    pub target: &'a str,
}

/// Why a click was left to the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassReason {
    ModifierKey,
    InPageAnchor,
    Download,
    NewContext,
    CrossOrigin,
    Unresolvable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickDecision {
    /// Prevent default and navigate in place to this absolute URL.
    Intercept(Url),
    /// Let the browser perform its default action.
    Passthrough(PassReason),
}

/// Resolve `href` against the current page, as `new URL(href, location)` would.
///
/// # Errors
///
/// Returns the parse error when `href` cannot form a URL relative to `page`.
pub fn resolve_href(href: &str, page: &Url) -> Result<Url, url::ParseError> {
    page.join(href)
}

/// Scheme, host, and port all match.
#[must_use]
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.origin() == b.origin()
}

/// Classify a click on a candidate anchor while `page` is displayed.
#[must_use]
pub fn classify_click(click: &LinkClick<'_>, page: &Url) -> ClickDecision {
    if click.modifiers.any() {
        return ClickDecision::Passthrough(PassReason::ModifierKey);
    }
    if click.href.starts_with('#') {
        return ClickDecision::Passthrough(PassReason::InPageAnchor);
    }
    if click.download {
        return ClickDecision::Passthrough(PassReason::Download);
    }
    if click.target.eq_ignore_ascii_case("_blank") {
        return ClickDecision::Passthrough(PassReason::NewContext);
    }
    let Ok(url) = resolve_href(click.href, page) else {
        return ClickDecision::Passthrough(PassReason::Unresolvable);
    };
    if !same_origin(&url, page) {
        return ClickDecision::Passthrough(PassReason::CrossOrigin);
    }
    ClickDecision::Intercept(url)
}
