//! Header elevation driven by vertical scroll offset.
//!
//! Two states, no hysteresis: the header is elevated exactly while the latest
//! offset sample is strictly above the threshold.

#[cfg(test)]
#[path = "scroll_test.rs"]
mod scroll_test;

/// Default offset, in CSS pixels, above which the header elevates.
pub const ELEVATION_THRESHOLD: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Elevation {
    /// At or near the top of the page.
    #[default]
    Flat,
    /// Scrolled past the threshold; the header carries the scrolled class.
    Elevated,
}

impl Elevation {
    /// Classify one offset sample. The boundary itself is flat.
    #[must_use]
    pub fn from_offset(offset: f64, threshold: f64) -> Self {
        if offset > threshold {
            Self::Elevated
        } else {
            Self::Flat
        }
    }

    #[must_use]
    pub fn is_elevated(self) -> bool {
        self == Self::Elevated
    }
}

/// Scroll bookkeeping for one header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTracker {
    threshold: f64,
    last_offset: f64,
    elevation: Elevation,
}

impl Default for ScrollTracker {
    fn default() -> Self {
        Self::new(ELEVATION_THRESHOLD)
    }
}

impl ScrollTracker {
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            last_offset: 0.0,
            elevation: Elevation::Flat,
        }
    }

    /// Record a sample and return the elevation the header should show.
    pub fn observe(&mut self, offset: f64) -> Elevation {
        self.last_offset = offset;
        self.elevation = Elevation::from_offset(offset, self.threshold);
        self.elevation
    }

    #[must_use]
    pub fn last_offset(&self) -> f64 {
        self.last_offset
    }

    #[must_use]
    pub fn elevation(&self) -> Elevation {
        self.elevation
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}
