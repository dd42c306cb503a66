//! Canvas settings from a TOML file, overridable from the command line

use anyhow::{bail, Context as _};
use danmaku_core::CanvasConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Canvas settings as written in a config file; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CanvasSettings {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub font_name: Option<String>,
    pub font_size: Option<f64>,
    /// 0.0 (invisible) to 1.0 (opaque)
    pub opacity: Option<f64>,
    /// Seconds a scrolling comment takes to cross the stage
    pub duration_scroll: Option<f64>,
    /// Seconds a fixed comment stays on screen
    pub duration_still: Option<f64>,
    /// Pixels kept free at the bottom of the stage
    pub reserve_blank: Option<u32>,
    pub style_name: Option<String>,
    pub reduced: Option<bool>,
    #[serde(default)]
    pub filters: Vec<String>,
}

impl CanvasSettings {
    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parse config '{}'", path.display()))
    }

    /// Overlay `other` on top of `self`; set fields of `other` win and
    /// filters accumulate
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        let mut filters = self.filters;
        filters.extend(other.filters);
        Self {
            width: other.width.or(self.width),
            height: other.height.or(self.height),
            font_name: other.font_name.or(self.font_name),
            font_size: other.font_size.or(self.font_size),
            opacity: other.opacity.or(self.opacity),
            duration_scroll: other.duration_scroll.or(self.duration_scroll),
            duration_still: other.duration_still.or(self.duration_still),
            reserve_blank: other.reserve_blank.or(self.reserve_blank),
            style_name: other.style_name.or(self.style_name),
            reduced: other.reduced.or(self.reduced),
            filters,
        }
    }

    /// Build the canvas configuration, filling unset fields with defaults
    pub fn into_canvas(self) -> anyhow::Result<CanvasConfig> {
        let (Some(width), Some(height)) = (self.width, self.height) else {
            bail!("stage size is required: pass --width and --height or set them in the config file");
        };
        let defaults = CanvasConfig::new(width, height);
        let config = CanvasConfig {
            font_name: self.font_name.unwrap_or(defaults.font_name),
            font_size: self.font_size.unwrap_or(defaults.font_size),
            opacity: self.opacity.unwrap_or(defaults.opacity),
            duration_scroll: self.duration_scroll.unwrap_or(defaults.duration_scroll),
            duration_still: self.duration_still.unwrap_or(defaults.duration_still),
            reserve_blank: self.reserve_blank.unwrap_or(defaults.reserve_blank),
            style_name: self.style_name.unwrap_or(defaults.style_name),
            reduced: self.reduced.unwrap_or(defaults.reduced),
            filters: self.filters,
            ..defaults
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_file_values() {
        let file: CanvasSettings = toml::from_str(
            r#"
            width = 1920
            height = 1080
            font_name = "Noto Sans CJK SC"
            opacity = 0.6
            filters = ["^233+$"]
            "#,
        )
        .unwrap();
        let flags = CanvasSettings {
            height: Some(720),
            opacity: Some(0.9),
            filters: vec!["spoiler".to_string()],
            ..CanvasSettings::default()
        };

        let config = file.merge(flags).into_canvas().unwrap();
        assert_eq!((config.width, config.height), (1920, 720));
        assert_eq!(config.font_name, "Noto Sans CJK SC");
        assert!((config.opacity - 0.9).abs() < f64::EPSILON);
        assert!((config.duration_scroll - 7.0).abs() < f64::EPSILON);
        assert_eq!(config.filters, vec!["^233+$".to_string(), "spoiler".to_string()]);
    }

    #[test]
    fn stage_size_is_required() {
        let err = CanvasSettings::default().into_canvas().unwrap_err();
        assert!(err.to_string().contains("--width"));
    }

    #[test]
    fn invalid_values_fail_validation() {
        let settings = CanvasSettings {
            width: Some(1280),
            height: Some(720),
            opacity: Some(1.5),
            ..CanvasSettings::default()
        };
        assert!(settings.into_canvas().is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<CanvasSettings>("widht = 3").is_err());
    }
}
