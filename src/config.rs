//! Editor configuration
//!
//! Configuration is plain data with builder-style setters and can be loaded
//! from TOML:
//!
//! ```toml
//! touch_slop = 10.0
//! frame_interval_ms = 8
//!
//! [viewport]
//! width = 1080.0
//! height = 1920.0
//!
//! [swap]
//! motion = "tween"
//! duration_ms = 250
//! easing = "ease_in_out"
//!
//! [defaults]
//! margin = 2.0
//! background = "Magenta"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::animation::SwapMotion;
use crate::geometry::Size;
use crate::params::{ParameterDefaults, CORNER_RADIUS_RANGE, MARGIN_RANGE};

/// Errors that can occur when loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Validation(String),
}

/// Configuration options for an editing session
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Screen size the scene camera fits pages into
    pub viewport: Size,

    /// Pointer travel that cancels a pending long press, screen units
    pub touch_slop: f64,

    /// Frame step used when settling an animated swap
    pub frame_interval_ms: u64,

    /// How placeholder swaps move
    pub swap: SwapMotion,

    /// Initial parameter values
    pub defaults: ParameterDefaults,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            viewport: Size::new(360.0, 640.0),
            touch_slop: 8.0,
            frame_interval_ms: 16,
            swap: SwapMotion::default(),
            defaults: ParameterDefaults::default(),
        }
    }
}

impl EditorConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport = Size::new(width, height);
        self
    }

    pub fn with_touch_slop(mut self, slop: f64) -> Self {
        self.touch_slop = slop;
        self
    }

    pub fn with_frame_interval_ms(mut self, interval: u64) -> Self {
        self.frame_interval_ms = interval;
        self
    }

    /// Set how swaps are animated
    pub fn with_swap(mut self, swap: SwapMotion) -> Self {
        self.swap = swap;
        self
    }

    pub fn with_defaults(mut self, defaults: ParameterDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    /// Load and validate configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load and validate configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
            return Err(invalid(format!(
                "viewport must be positive, got {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }
        if !(self.touch_slop >= 0.0) {
            return Err(invalid(format!(
                "touch_slop must not be negative, got {}",
                self.touch_slop
            )));
        }
        if self.frame_interval_ms == 0 {
            return Err(invalid("frame_interval_ms must be at least 1".to_string()));
        }
        if !MARGIN_RANGE.contains(&self.defaults.margin) {
            return Err(invalid(format!(
                "default margin {} is outside {:?}",
                self.defaults.margin, MARGIN_RANGE
            )));
        }
        if !CORNER_RADIUS_RANGE.contains(&self.defaults.corner_radius) {
            return Err(invalid(format!(
                "default corner radius {} is outside {:?}",
                self.defaults.corner_radius, CORNER_RADIUS_RANGE
            )));
        }
        if let SwapMotion::Spring(spring) = self.swap {
            for (name, value) in [
                ("stiffness", spring.stiffness),
                ("damping_ratio", spring.damping_ratio),
                ("velocity_threshold", spring.velocity_threshold),
                ("position_threshold", spring.position_threshold),
            ] {
                if !(value > 0.0) {
                    return Err(invalid(format!(
                        "spring {} must be positive, got {}",
                        name, value
                    )));
                }
            }
        }
        Ok(())
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Validation(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Easing, SpringSpec, TweenSpec};
    use crate::color::Rgba;

    #[test]
    fn test_default_config() {
        let config = EditorConfig::default();
        assert_eq!(config.viewport, Size::new(360.0, 640.0));
        assert_eq!(config.touch_slop, 8.0);
        assert_eq!(config.frame_interval(), Duration::from_millis(16));
        assert_eq!(config.swap, SwapMotion::Spring(SpringSpec::low_bouncy()));
        assert_eq!(config.defaults.margin, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config = EditorConfig::new()
            .with_viewport(100.0, 200.0)
            .with_touch_slop(0.0)
            .with_swap(SwapMotion::Instant);
        assert_eq!(config.viewport, Size::new(100.0, 200.0));
        assert_eq!(config.touch_slop, 0.0);
        assert_eq!(config.swap, SwapMotion::Instant);
    }

    #[test]
    fn test_from_str_partial() {
        let config = EditorConfig::from_str(
            r##"
            touch_slop = 12.0

            [swap]
            motion = "tween"
            duration_ms = 250
            easing = "ease_in_out"

            [defaults]
            margin = 2.5
            background = "#000000"
            "##,
        )
        .expect("Should parse config");
        assert_eq!(config.touch_slop, 12.0);
        assert_eq!(config.frame_interval_ms, 16);
        assert_eq!(
            config.swap,
            SwapMotion::Tween(TweenSpec {
                duration_ms: 250,
                easing: Easing::EaseInOut,
            })
        );
        assert_eq!(config.defaults.margin, 2.5);
        assert_eq!(config.defaults.corner_radius, 1.0);
        assert_eq!(config.defaults.background, Rgba::rgb(0, 0, 0));
    }

    #[test]
    fn test_instant_swap_and_swatch_background() {
        let config = EditorConfig::from_str(
            r#"
            [swap]
            motion = "instant"

            [defaults]
            background = "Dark Gray"
            "#,
        )
        .expect("Should parse config");
        assert_eq!(config.swap, SwapMotion::Instant);
        assert_eq!(
            config.defaults.background,
            "DarkGray".parse::<Rgba>().unwrap()
        );
    }

    #[test]
    fn test_validation_errors() {
        for source in [
            "touch_slop = -1.0",
            "frame_interval_ms = 0",
            "[defaults]\nmargin = 11.0",
            "[defaults]\ncorner_radius = -2.0",
            "[swap]\nmotion = \"spring\"\nstiffness = 0.0",
            "[swap]\nmotion = \"spring\"\ndamping_ratio = 0.0",
            "[swap]\nmotion = \"spring\"\ndamping_ratio = -0.5",
            "[swap]\nmotion = \"spring\"\nvelocity_threshold = 0.0",
            "[swap]\nmotion = \"spring\"\nposition_threshold = -1.0",
            "[viewport]\nwidth = 0.0\nheight = 10.0",
        ] {
            let result = EditorConfig::from_str(source);
            assert!(
                matches!(result, Err(ConfigError::Validation(_))),
                "{} should be rejected",
                source
            );
        }
    }

    #[test]
    fn test_parse_error() {
        let result = EditorConfig::from_str("touch_slop = \"far\"");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
