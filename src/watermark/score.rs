//! Protection score: a 0-100 rating of how many protection layers a
//! configuration runs and how densely.

use serde::Serialize;

use crate::constants::LAYER_KIND_COUNT;

use super::WatermarkConfig;

/// Points available for the number of enabled layers.
const TECHNIQUE_POINTS: f64 = 50.0;

/// Points available for the summed density rating.
const DENSITY_POINTS: f64 = 50.0;

/// Summed density rating that earns all density points.
const DENSITY_SATURATION: f64 = 10.0;

/// Qualitative protection level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProtectionLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ProtectionLevel {
    pub fn from_value(value: u8) -> Self {
        match value {
            85..=u8::MAX => Self::VeryHigh,
            70..=84 => Self::High,
            50..=69 => Self::Medium,
            30..=49 => Self::Low,
            _ => Self::VeryLow,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryLow => "very low",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::VeryHigh => "very high",
        }
    }
}

/// Score of one configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProtectionScore {
    pub value: u8,
    pub level: ProtectionLevel,
    pub enabled_layers: usize,
    pub total_count: u32,
}

/// Score the layers that would run for `config`.
///
/// Half the points come from the share of the seven layers that are enabled,
/// half from the summed density ratings, saturating at 10.
pub fn score(config: &WatermarkConfig) -> ProtectionScore {
    let layers = config.layer_set();
    let enabled_layers = layers.enabled_count();
    let total_count = layers.total_count();

    let technique = enabled_layers as f64 / LAYER_KIND_COUNT as f64 * TECHNIQUE_POINTS;
    let density =
        (f64::from(total_count) / DENSITY_SATURATION * DENSITY_POINTS).min(DENSITY_POINTS);
    let value = (technique + density).round().clamp(0.0, 100.0) as u8;

    ProtectionScore {
        value,
        level: ProtectionLevel::from_value(value),
        enabled_layers,
        total_count,
    }
}

/// Label for a summed density rating.
pub fn density_label(total_count: u32) -> &'static str {
    match total_count {
        0..=3 => "low",
        4..=7 => "moderate",
        8..=12 => "high",
        _ => "very high",
    }
}
