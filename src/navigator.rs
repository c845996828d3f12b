//! In-place page navigation through the view-transition primitive.
//!
//! SYSTEM CONTEXT
//! ==============
//! A navigation attempt runs `Idle -> Fetching -> Swapping -> Settled`, or
//! `Fetching -> Failed -> FallbackNavigated` when anything on the animated
//! path breaks. The fallback is a plain full-page load, so the user always
//! ends up on a rendered page.
//!
//! The browser specifics (fetching, parsing, the transition call, history)
//! sit behind [`NavigationHost`] so the flow itself runs and is tested
//! without a DOM.
//!
//! CONCURRENCY
//! ===========
//! Single-threaded. Suspension happens at the fetch and at the transition's
//! completion, where another click can start a second attempt. The newest
//! attempt wins: an older attempt that resumes after its fetch or parse and
//! finds a newer generation is dropped without touching the page.

#[cfg(test)]
#[path = "navigator_test.rs"]
mod navigator_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Failures on the animated path. Each one ends in a full-page load.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavError {
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("could not parse fetched document: {0}")]
    Parse(String),
    #[error("view transition failed: {0}")]
    Transition(String),
    #[error("invalid navigation target: {0}")]
    InvalidUrl(String),
}

/// Whether a navigation adds a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKind {
    /// A link click: push the target onto session history.
    Push,
    /// Back/forward: history already points at the target.
    Restore,
}

/// Progress of the most recent navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavPhase {
    #[default]
    Idle,
    Fetching,
    Swapping,
    Settled,
    Failed,
    FallbackNavigated,
}

/// How a navigation attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// Content swapped in place under a view transition.
    Transitioned,
    /// Transitions unsupported; the browser loaded the page directly.
    FullLoad,
    /// The animated path failed and the browser loaded the page directly.
    FellBack,
    /// Transitions unsupported on back/forward; the page reloaded.
    Reloaded,
    /// A newer navigation started before this one could swap.
    Superseded,
}

/// Browser operations the navigator drives.
#[allow(async_fn_in_trait)]
pub trait NavigationHost: 'static {
    /// A parsed document ready to be swapped in.
    type Document: 'static;

    /// Whether the view-transition primitive exists.
    fn supports_transitions(&self) -> bool;

    /// GET `url` and return the response body.
    async fn fetch_html(&self, url: &str) -> Result<String, NavError>;

    fn parse_document(&self, html: &str) -> Result<Self::Document, NavError>;

    /// Start a view transition whose update callback is `update`, and resolve
    /// once the transition has finished.
    async fn run_transition(&self, update: Box<dyn FnOnce()>) -> Result<(), NavError>;

    /// Replace body content and title with those of `document`.
    fn swap_content(&self, document: &Self::Document);

    fn push_history(&self, url: &str);

    fn scroll_to_top(&self);

    /// Full-page load of `url`.
    fn load_page(&self, url: &str);

    fn reload(&self);

    /// The location currently shown in the address bar.
    fn current_url(&self) -> String;
}

/// Drives navigation attempts and re-runs page behaviors after each swap.
pub struct Navigator<H: NavigationHost> {
    host: H,
    phase: Cell<NavPhase>,
    generation: Cell<u64>,
    hooks: RefCell<Vec<Box<dyn Fn()>>>,
}

impl<H: NavigationHost> Navigator<H> {
    #[must_use]
    pub fn new(host: H) -> Self {
        Self {
            host,
            phase: Cell::new(NavPhase::Idle),
            generation: Cell::new(0),
            hooks: RefCell::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    #[must_use]
    pub fn phase(&self) -> NavPhase {
        self.phase.get()
    }

    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.host.supports_transitions()
    }

    /// Register a behavior to re-run against freshly swapped content.
    /// Hooks run in registration order.
    pub fn on_reinitialize(&self, hook: impl Fn() + 'static) {
        self.hooks.borrow_mut().push(Box::new(hook));
    }

    /// Reset scroll and re-run every registered hook.
    pub fn reinitialize_components(&self) {
        self.host.scroll_to_top();
        for hook in self.hooks.borrow().iter() {
            hook();
        }
    }

    /// Navigate to `url`, animating the swap where the browser allows it.
    pub async fn navigate(self: &Rc<Self>, url: String, kind: NavKind) -> NavOutcome {
        if !self.host.supports_transitions() {
            self.host.load_page(&url);
            self.phase.set(NavPhase::FallbackNavigated);
            return NavOutcome::FullLoad;
        }

        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);

        match self.transition_to(&url, kind, generation).await {
            Ok(outcome) => outcome,
            Err(err) if self.is_stale(generation) => {
                log::debug!("superseded navigation to {url} failed: {err}");
                NavOutcome::Superseded
            }
            Err(err) => {
                self.phase.set(NavPhase::Failed);
                log::error!("view transition to {url} failed: {err}");
                self.host.load_page(&url);
                self.phase.set(NavPhase::FallbackNavigated);
                NavOutcome::FellBack
            }
        }
    }

    /// Re-display whatever history now points at after back/forward.
    pub async fn restore_current(self: &Rc<Self>) -> NavOutcome {
        if !self.host.supports_transitions() {
            self.host.reload();
            return NavOutcome::Reloaded;
        }
        let url = self.host.current_url();
        self.navigate(url, NavKind::Restore).await
    }

    async fn transition_to(
        self: &Rc<Self>,
        url: &str,
        kind: NavKind,
        generation: u64,
    ) -> Result<NavOutcome, NavError> {
        self.phase.set(NavPhase::Fetching);
        let html = self.host.fetch_html(url).await?;
        if self.is_stale(generation) {
            log::debug!("dropping superseded navigation to {url}");
            return Ok(NavOutcome::Superseded);
        }

        let document = self.host.parse_document(&html)?;

        self.phase.set(NavPhase::Swapping);
        let navigator = Rc::clone(self);
        let target = url.to_owned();
        let update: Box<dyn FnOnce()> =
            Box::new(move || navigator.commit(&document, &target, kind));
        self.host.run_transition(update).await?;

        if !self.is_stale(generation) {
            self.phase.set(NavPhase::Settled);
        }
        Ok(NavOutcome::Transitioned)
    }

    fn commit(&self, document: &H::Document, url: &str, kind: NavKind) {
        self.host.swap_content(document);
        if kind == NavKind::Push {
            self.host.push_history(url);
        }
        self.reinitialize_components();
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.generation.get() != generation
    }
}
