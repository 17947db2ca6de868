//! Raster preview settings.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PREVIEW_BACKGROUND, DEFAULT_PREVIEW_SCALE};
use crate::watermark::Rgb;

fn default_scale() -> f64 {
    DEFAULT_PREVIEW_SCALE
}

fn default_background() -> Rgb {
    Rgb::from_hex(DEFAULT_PREVIEW_BACKGROUND).unwrap_or(Rgb::new(1.0, 1.0, 1.0))
}

/// Preview configuration (YAML format)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Pixels per page unit
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default = "default_background")]
    pub background: Rgb,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            background: default_background(),
        }
    }
}

impl PreviewConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(format!(
                "Preview scale must be a finite positive value, got {}",
                self.scale
            ));
        }
        self.background.validate()
    }
}
