//! # sitewire
//!
//! WebAssembly behavior bundle for a statically generated site. Compiled with
//! the `hydrate` feature it attaches three independent behaviors to the
//! page once the DOM is ready:
//!
//! - a light/dark theme controller persisted to `localStorage`,
//! - header elevation on scroll,
//! - same-origin link navigation through the view-transition primitive,
//!   falling back to ordinary page loads.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | DOM hook names, thresholds, and the JSON override |
//! | [`theme`] | Theme value type and the testable [`theme::ThemeController`] |
//! | [`scroll`] | Elevation state machine for the header |
//! | [`links`] | Which anchor clicks are intercepted, and where they go |
//! | [`navigator`] | Fetch/swap/fallback flow behind [`navigator::NavigationHost`] |
//! | `dom` | web-sys bindings, bootstrap, and JS exports (`hydrate` only) |
//!
//! Everything outside `dom` is browser-free and unit tested natively.

pub mod config;
#[cfg(feature = "hydrate")]
pub mod dom;
pub mod links;
pub mod navigator;
pub mod scroll;
pub mod theme;
