//! Light/dark theme resolution, persistence, and toggling.
//!
//! Reads the user's preference from storage and applies a `data-theme`
//! attribute to the `<html>` element. Toggle writes back to storage and
//! updates that attribute.
//!
//! TRADE-OFFS
//! ==========
//! Storage and media-query access are best-effort. An environment without
//! either degrades to the light default and simply stops reacting; nothing
//! here reports an error to the caller.
//!
//! Every operation leaves storage and the attribute agreeing. A system
//! change only takes effect while nothing is stored, and since applying
//! persists, the first value applied pins the page until the preference is
//! cleared. Clearing removes both the entry and the attribute.

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

use std::fmt;

/// The two supported color themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The literal stored in `localStorage` and in the theme attribute.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parse a stored or attribute value. Anything but `light`/`dark` is rejected.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Map a `prefers-color-scheme: dark` sample; unknown means light.
    #[must_use]
    pub fn from_system(prefers_dark: Option<bool>) -> Self {
        if prefers_dark == Some(true) {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Browser capabilities the controller depends on.
///
/// Every method is infallible from the caller's side: implementations
/// swallow (and log) failures and return `None` where a value is unavailable.
pub trait ThemeEnv {
    /// Raw persisted value, if storage is available and holds one.
    fn stored(&self) -> Option<String>;
    fn store(&self, value: &str);
    fn forget(&self);
    /// Current `prefers-color-scheme: dark` match, or `None` without media-query support.
    fn system_prefers_dark(&self) -> Option<bool>;
    /// Current value of the theme attribute on the document element.
    fn applied(&self) -> Option<String>;
    fn set_applied(&self, value: &str);
    fn clear_applied(&self);
}

/// Owns the theme state machine for one page.
pub struct ThemeController<E> {
    env: E,
}

impl<E: ThemeEnv> ThemeController<E> {
    #[must_use]
    pub fn new(env: E) -> Self {
        Self { env }
    }

    #[must_use]
    pub fn env(&self) -> &E {
        &self.env
    }

    /// The explicit, persisted choice, if one exists and is recognizable.
    #[must_use]
    pub fn stored_preference(&self) -> Option<Theme> {
        let raw = self.env.stored()?;
        let theme = Theme::parse(&raw);
        if theme.is_none() {
            log::debug!("ignoring unrecognized stored theme {raw:?}");
        }
        theme
    }

    #[must_use]
    pub fn system_theme(&self) -> Theme {
        Theme::from_system(self.env.system_prefers_dark())
    }

    /// Persisted choice first, then the system signal, then light.
    #[must_use]
    pub fn resolve_preference(&self) -> Theme {
        self.stored_preference().unwrap_or_else(|| self.system_theme())
    }

    /// Set the attribute and persist `theme` as an explicit choice.
    pub fn apply_preference(&self, theme: Theme) {
        self.env.set_applied(theme.as_str());
        self.env.store(theme.as_str());
    }

    /// The theme currently on the document, light when unset or unrecognized.
    #[must_use]
    pub fn applied_theme(&self) -> Theme {
        self.env
            .applied()
            .and_then(|raw| Theme::parse(&raw))
            .unwrap_or_default()
    }

    /// Flip the applied theme and persist the result.
    pub fn toggle(&self) -> Theme {
        let next = self.applied_theme().flipped();
        self.apply_preference(next);
        next
    }

    /// Apply the resolved preference. Safe to call repeatedly.
    pub fn initialize(&self) -> Theme {
        let theme = self.resolve_preference();
        self.apply_preference(theme);
        theme
    }

    /// React to a system color-scheme change.
    ///
    /// Returns the newly applied theme, or `None` when a stored preference
    /// suppresses auto-switching.
    pub fn on_system_change(&self, prefers_dark: bool) -> Option<Theme> {
        if self.env.stored().is_some() {
            return None;
        }
        let theme = Theme::from_system(Some(prefers_dark));
        self.apply_preference(theme);
        Some(theme)
    }

    /// Drop the stored preference and the attribute, so the next system
    /// change or page load resolves afresh.
    pub fn clear_preference(&self) {
        self.env.forget();
        self.env.clear_applied();
    }
}
