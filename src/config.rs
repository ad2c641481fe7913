use std::fs;
use std::path::Path;
use std::time::Duration;

use egui::Color32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Environment variable naming an optional JSON config file
pub const CONFIG_ENV_VAR: &str = "RAINBOW_SKETCH_CONFIG";

/// Startup settings. Missing fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub brush_size: f32,
    /// Initial brush color as `[r, g, b]`
    pub brush_color: [u8; 3],
    pub hue_step_degrees: f32,
    pub spray_density: usize,
    pub playback_interval_ms: u64,
    pub dark_mode: bool,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 600,
            brush_size: 5.0,
            brush_color: [0, 0, 0],
            hue_step_degrees: crate::color::DEFAULT_HUE_STEP,
            spray_density: crate::tools::SPRAY_DENSITY,
            playback_interval_ms: 500,
            dark_mode: false,
        }
    }
}

impl SketchConfig {
    /// Parses and validates a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Loads the file named by `RAINBOW_SKETCH_CONFIG`, or the defaults if the
    /// variable is unset. A broken file is logged and the defaults are used.
    pub fn from_env() -> Self {
        let Ok(path) = std::env::var(CONFIG_ENV_VAR) else {
            return Self::default();
        };
        match Self::load(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path);
                config
            }
            Err(err) => {
                log::error!("Ignoring config {}: {}", path, err);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(ConfigError::Invalid("canvas size must be non-zero".to_owned()));
        }
        if !(self.brush_size.is_finite() && self.brush_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "brush_size must be positive, got {}",
                self.brush_size
            )));
        }
        if !(self.hue_step_degrees > 0.0 && self.hue_step_degrees < 360.0) {
            return Err(ConfigError::Invalid(format!(
                "hue_step_degrees must be in (0, 360), got {}",
                self.hue_step_degrees
            )));
        }
        if self.spray_density == 0 {
            return Err(ConfigError::Invalid("spray_density must be non-zero".to_owned()));
        }
        if self.playback_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "playback_interval_ms must be non-zero".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn brush_color(&self) -> Color32 {
        let [r, g, b] = self.brush_color;
        Color32::from_rgb(r, g, b)
    }

    pub fn playback_interval(&self) -> Duration {
        Duration::from_millis(self.playback_interval_ms)
    }
}
