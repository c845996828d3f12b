//! Site configuration: the names of the DOM hooks the bundle binds to.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages normally rely on the defaults, which match the markup the site
//! templates emit. A page may override any field with a JSON block:
//!
//! ```html
//! <script type="application/json" id="site-config">{"scroll_threshold": 48}</script>
//! ```
//!
//! Missing fields keep their defaults. A block that fails to parse is logged
//! and ignored, so a typo never disables the bundle.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

/// Element id of the optional JSON override block.
pub const CONFIG_ELEMENT_ID: &str = "site-config";

/// Errors produced while reading a config override.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid site config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("scroll threshold must be finite and non-negative, got {0}")]
    InvalidThreshold(f64),
}

/// Names and thresholds shared by the theme, scroll, and navigation behaviors.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// `localStorage` key holding the persisted theme.
    pub theme_storage_key: String,
    /// Attribute on `<html>` carrying the applied theme.
    pub theme_attribute: String,
    /// Id of the optional theme toggle control.
    pub theme_toggle_id: String,
    /// Selector for the header that elevates on scroll.
    pub header_selector: String,
    /// Class set on the header while elevated.
    pub scrolled_class: String,
    /// Vertical offset above which the header is elevated.
    pub scroll_threshold: f64,
    /// Set to `false` to keep plain navigation even where view transitions exist.
    pub view_transitions: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            theme_storage_key: "theme".to_owned(),
            theme_attribute: "data-theme".to_owned(),
            theme_toggle_id: "theme-toggle".to_owned(),
            header_selector: ".top-app-bar".to_owned(),
            scrolled_class: "scrolled".to_owned(),
            scroll_threshold: 20.0,
            view_transitions: true,
        }
    }
}

impl SiteConfig {
    /// Parse a JSON override, filling unspecified fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or mistyped fields and
    /// [`ConfigError::InvalidThreshold`] for a negative or non-finite threshold.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`SiteConfig::from_json`], but an absent or broken override yields defaults.
    #[must_use]
    pub fn from_override(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
            return Self::default();
        };
        match Self::from_json(raw) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("ignoring #{CONFIG_ELEMENT_ID}: {err}");
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.scroll_threshold.is_finite() || self.scroll_threshold < 0.0 {
            return Err(ConfigError::InvalidThreshold(self.scroll_threshold));
        }
        Ok(())
    }
}
