//! Scroll geometry, timing and style configuration.
//!
//! Every field has a default matching the tuned values the scene was built
//! around, so a config file only needs to name what it overrides:
//!
//! ```toml
//! closed_threshold = 1.0
//! engagement_ms    = 3000
//! styles = ["Zen Ink Art"]
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Painting styles offered to the image provider when none are configured.
pub const DEFAULT_STYLES: [&str; 5] = [
    "Ink Wash Landscape",
    "Blue-Green Landscape",
    "Meticulous Flower and Bird",
    "Freehand Brushwork Landscape",
    "Zen Ink Art",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Full logical canvas width in world units; the artwork spans all of it.
    pub world_width: f32,
    /// Shaft radius. Each shaft is kept at least this far from the centreline,
    /// so the fully-closed separation is `2 * shaft_radius`.
    pub shaft_radius: f32,
    /// Per-frame exponential smoothing factor, in (0, 1).
    pub smoothing_factor: f32,
    /// Separation below which the scroll counts as closed.
    pub closed_threshold: f32,
    /// How long the scroll must stay closed before a painting is requested.
    pub engagement_ms: u64,
    /// After a successful painting, how long the shafts stay shut before
    /// following the hands again.
    pub success_hold_ms: u64,
    /// Style prompts; one is picked at random per request.
    pub styles: Vec<String>,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        ScrollConfig {
            world_width:      20.0,
            shaft_radius:     0.45,
            smoothing_factor: 0.15,
            closed_threshold: 0.95,
            engagement_ms:    5000,
            success_hold_ms:  1500,
            styles:           DEFAULT_STYLES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ScrollConfig {
    /// Shaft rotation per unit of linear travel (rolling without slipping).
    pub fn rotation_scale(&self) -> f32 {
        1.0 / self.shaft_radius
    }

    pub fn engagement_duration(&self) -> Duration {
        Duration::from_millis(self.engagement_ms)
    }

    pub fn success_hold(&self) -> Duration {
        Duration::from_millis(self.success_hold_ms)
    }

    /// Separation of the two shaft centres when the scroll is fully shut.
    pub fn closed_separation(&self) -> f32 {
        2.0 * self.shaft_radius
    }

    /// Check every field; reports the first one out of range.
    pub fn validate(&self) -> Result<()> {
        if !(self.world_width.is_finite() && self.world_width > 0.0) {
            return Err(Error::Config(format!(
                "world_width must be positive, got {}", self.world_width
            )));
        }
        if !(self.shaft_radius.is_finite() && self.shaft_radius > 0.0) {
            return Err(Error::Config(format!(
                "shaft_radius must be positive, got {}", self.shaft_radius
            )));
        }
        if 4.0 * self.shaft_radius >= self.world_width {
            return Err(Error::Config(format!(
                "shaft_radius {} leaves no room to open a canvas {} wide",
                self.shaft_radius, self.world_width
            )));
        }
        if !(self.smoothing_factor > 0.0 && self.smoothing_factor < 1.0) {
            return Err(Error::Config(format!(
                "smoothing_factor must be in (0, 1), got {}", self.smoothing_factor
            )));
        }
        if !self.closed_threshold.is_finite() {
            return Err(Error::Config(format!(
                "closed_threshold must be finite, got {}", self.closed_threshold
            )));
        }
        if self.closed_threshold <= self.closed_separation() {
            return Err(Error::Config(format!(
                "closed_threshold {} must exceed the closed separation {}",
                self.closed_threshold, self.closed_separation()
            )));
        }
        if self.closed_threshold >= self.world_width {
            return Err(Error::Config(format!(
                "closed_threshold {} must be smaller than world_width {}",
                self.closed_threshold, self.world_width
            )));
        }
        if self.engagement_ms == 0 {
            return Err(Error::Config("engagement_ms must be > 0".to_string()));
        }
        if self.styles.is_empty() {
            return Err(Error::Config("at least one style is required".to_string()));
        }
        if self.styles.iter().any(|s| s.trim().is_empty()) {
            return Err(Error::Config("styles must not be blank".to_string()));
        }
        Ok(())
    }

    /// Read a TOML file; absent keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }
}
