use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::brush::{BrushColor, BrushSettings};
use crate::error::AnnotatorResult;
use crate::surface::{SURFACE_HEIGHT, SURFACE_WIDTH};

/// Largest accepted surface side; larger values are clamped to it
pub const MAX_SURFACE_SIDE: u32 = 4096;

/// Environment variable naming a JSON config file (native only)
pub const CONFIG_ENV_VAR: &str = "IMAGE_ANNOTATOR_CONFIG";

/// Startup configuration of the annotator.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)] // missing fields fall back to their defaults
pub struct AnnotatorConfig {
    pub surface_width: u32,
    pub surface_height: u32,
    pub default_color: String,
    pub default_line_width: f32,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            surface_width: SURFACE_WIDTH,
            surface_height: SURFACE_HEIGHT,
            default_color: BrushColor::BLACK.to_hex(),
            default_line_width: 1.0,
        }
    }
}

impl AnnotatorConfig {
    pub fn from_json(json: &str) -> AnnotatorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> AnnotatorResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from the file named by [`CONFIG_ENV_VAR`], falling back to defaults
    pub fn from_env() -> Self {
        let Ok(path) = std::env::var(CONFIG_ENV_VAR) else {
            return Self::default();
        };
        match Self::load(&path) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path);
                config
            }
            Err(err) => {
                log::warn!("Ignoring configuration {}: {}", path, err);
                Self::default()
            }
        }
    }

    /// Backing resolution. Zero dimensions are replaced by the defaults and
    /// anything above [`MAX_SURFACE_SIDE`] is clamped to it.
    pub fn surface_size(&self) -> (u32, u32) {
        let side = |value: u32, default: u32| match value {
            0 => default,
            v if v > MAX_SURFACE_SIDE => {
                log::warn!("Surface side {} clamped to {}", v, MAX_SURFACE_SIDE);
                MAX_SURFACE_SIDE
            }
            v => v,
        };
        (
            side(self.surface_width, SURFACE_WIDTH),
            side(self.surface_height, SURFACE_HEIGHT),
        )
    }

    /// Initial brush; invalid entries fall back to the default brush values
    pub fn brush_settings(&self) -> BrushSettings {
        let mut settings = BrushSettings::default();
        if let Err(err) = settings.set_color_hex(&self.default_color) {
            log::warn!("Configured color rejected: {}", err);
        }
        if let Err(err) = settings.set_line_width(self.default_line_width) {
            log::warn!("Configured line width rejected: {}", err);
        }
        settings
    }
}
