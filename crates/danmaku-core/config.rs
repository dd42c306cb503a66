//! Canvas configuration for a single conversion
//!
//! Everything here is caller supplied. The stage size has no default: callers
//! must know the video dimensions (or pick their own fallback) before asking
//! for a conversion.

use crate::utils::{CoreError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Wire font size that maps onto the canvas font size unchanged
pub const REFERENCE_FONT_SIZE: f64 = 25.0;

/// Stage size, styling and timing parameters for a conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Stage width in pixels (`PlayResX`)
    pub width: u32,
    /// Stage height in pixels (`PlayResY`)
    pub height: u32,
    /// Base font face for the generated style
    #[serde(default = "default_font_name")]
    pub font_name: String,
    /// Base font size in pixels; also the lane height
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    /// Text opacity, 0.0 (invisible) to 1.0 (opaque)
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Seconds a scrolling comment needs to cross the stage
    #[serde(default = "default_duration_scroll")]
    pub duration_scroll: f64,
    /// Seconds a fixed comment stays on screen
    #[serde(default = "default_duration_still")]
    pub duration_still: f64,
    /// Pixels kept free at the bottom of the stage
    #[serde(default)]
    pub reserve_blank: u32,
    /// Name of the generated ASS style
    #[serde(default = "default_style_name")]
    pub style_name: String,
    /// Drop comments instead of overlaying them when every lane is busy
    #[serde(default)]
    pub reduced: bool,
    /// Regular expressions; comments whose text matches any are removed
    #[serde(default)]
    pub filters: Vec<String>,
}

fn default_font_name() -> String {
    "Simsun".to_string()
}

const fn default_font_size() -> f64 {
    REFERENCE_FONT_SIZE
}

const fn default_opacity() -> f64 {
    1.0
}

const fn default_duration_scroll() -> f64 {
    7.0
}

const fn default_duration_still() -> f64 {
    5.0
}

fn default_style_name() -> String {
    "Danmaku".to_string()
}

impl CanvasConfig {
    /// Create a configuration for the given stage with default styling
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            font_name: default_font_name(),
            font_size: default_font_size(),
            opacity: default_opacity(),
            duration_scroll: default_duration_scroll(),
            duration_still: default_duration_still(),
            reserve_blank: 0,
            style_name: default_style_name(),
            reduced: false,
            filters: Vec::new(),
        }
    }

    /// Set font face
    #[must_use]
    pub fn with_font(mut self, name: &str, size: f64) -> Self {
        self.font_name = name.to_string();
        self.font_size = size;
        self
    }

    /// Set text opacity (0.0-1.0)
    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    /// Set scroll and still durations in seconds
    #[must_use]
    pub fn with_durations(mut self, scroll: f64, still: f64) -> Self {
        self.duration_scroll = scroll;
        self.duration_still = still;
        self
    }

    /// Set the number of pixels kept free at the bottom
    #[must_use]
    pub fn with_reserve_blank(mut self, pixels: u32) -> Self {
        self.reserve_blank = pixels;
        self
    }

    /// Drop comments instead of overlaying them under overload
    #[must_use]
    pub fn with_reduced(mut self, reduced: bool) -> Self {
        self.reduced = reduced;
        self
    }

    /// Add a text filter pattern
    #[must_use]
    pub fn with_filter(mut self, pattern: &str) -> Self {
        self.filters.push(pattern.to_string());
        self
    }

    /// Check every value the layout engine and emitter rely on
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidStage`] for a zero dimension,
    /// [`CoreError::InvalidFilter`] for a pattern that does not compile and
    /// [`CoreError::Config`] for any other out of range value.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CoreError::InvalidStage {
                width: self.width,
                height: self.height,
            });
        }
        if self.reserve_blank >= self.height {
            return Err(CoreError::config(format!(
                "reserve_blank ({}) must be smaller than the stage height ({})",
                self.reserve_blank, self.height
            )));
        }
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(CoreError::config(format!(
                "font_size must be positive, got {}",
                self.font_size
            )));
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(CoreError::config(format!(
                "opacity must be within 0.0..=1.0, got {}",
                self.opacity
            )));
        }
        if !self.duration_scroll.is_finite() || !self.duration_still.is_finite() {
            return Err(CoreError::config("durations must be finite numbers"));
        }
        if self.style_name.is_empty() || self.style_name.contains(',') {
            return Err(CoreError::config(format!(
                "style_name must be non-empty and contain no commas: {:?}",
                self.style_name
            )));
        }
        self.compile_filters().map(|_| ())
    }

    /// Compile the filter patterns
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidFilter`] naming the first bad pattern.
    pub fn compile_filters(&self) -> Result<Vec<Regex>> {
        self.filters
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| CoreError::InvalidFilter {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                })
            })
            .collect()
    }

    /// Usable stage height once the reserved strip is removed
    #[must_use]
    pub const fn usable_height(&self) -> u32 {
        self.height.saturating_sub(self.reserve_blank)
    }

    /// ASS alpha byte for the configured opacity (0 = opaque)
    #[must_use]
    pub fn alpha_byte(&self) -> u8 {
        255 - (self.opacity.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_player() {
        let config = CanvasConfig::new(1920, 1080);
        assert_eq!(config.font_name, "Simsun");
        assert!((config.font_size - 25.0).abs() < f64::EPSILON);
        assert!((config.duration_scroll - 7.0).abs() < f64::EPSILON);
        assert!((config.duration_still - 5.0).abs() < f64::EPSILON);
        assert_eq!(config.alpha_byte(), 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_stage_is_rejected() {
        let err = CanvasConfig::new(0, 720).validate().unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidStage {
                width: 0,
                height: 720
            }
        );
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(CanvasConfig::new(640, 480)
            .with_opacity(1.5)
            .validate()
            .is_err());
        assert!(CanvasConfig::new(640, 480)
            .with_reserve_blank(480)
            .validate()
            .is_err());
        assert!(CanvasConfig::new(640, 480)
            .with_font("Arial", 0.0)
            .validate()
            .is_err());
        assert!(CanvasConfig::new(640, 480)
            .with_durations(f64::INFINITY, 5.0)
            .validate()
            .is_err());
    }

    #[test]
    fn bad_filter_is_reported_by_pattern() {
        let err = CanvasConfig::new(640, 480)
            .with_filter("(unclosed")
            .validate()
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidFilter { ref pattern, .. } if pattern == "(unclosed"));
    }

    #[test]
    fn alpha_from_opacity() {
        let config = CanvasConfig::new(1280, 720)
            .with_font("Arial", 50.0)
            .with_opacity(0.5);
        assert_eq!(config.alpha_byte(), 127);
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: CanvasConfig =
            serde_json::from_str(r#"{"width": 1440, "height": 1080, "opacity": 0.8}"#).unwrap();
        assert_eq!(config.width, 1440);
        assert_eq!(config.style_name, "Danmaku");
        assert!((config.opacity - 0.8).abs() < f64::EPSILON);
        assert!(config.filters.is_empty());
    }
}
