//! Named configuration presets.

use super::{Pattern, Rgb, WatermarkConfig};

/// A named starting configuration.
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    text: &'static str,
    pattern: Pattern,
    font_size: f64,
    opacity: f64,
    rotation: f64,
    color: [u8; 3],
    spacing: f64,
}

impl Preset {
    /// Build the configuration described by this preset.
    pub fn config(&self) -> WatermarkConfig {
        WatermarkConfig {
            text: self.text.to_string(),
            font_size: self.font_size,
            opacity: self.opacity,
            rotation: self.rotation,
            color: Rgb::from_bytes(self.color),
            spacing: self.spacing,
            pattern: self.pattern,
            ..WatermarkConfig::default()
        }
    }

    pub fn pattern(&self) -> Pattern {
        self.pattern
    }
}

const PRESETS: [Preset; 6] = [
    Preset {
        name: "top-secret",
        description: "Layered randomized marks for highly sensitive pages",
        text: "TOP SECRET",
        pattern: Pattern::Paranoid,
        font_size: 42.0,
        opacity: 0.25,
        rotation: 25.0,
        color: [0xcc, 0x00, 0x00],
        spacing: 100.0,
    },
    Preset {
        name: "copyright",
        description: "Every protection layer, tuned against removal tools",
        text: "COPYRIGHT",
        pattern: Pattern::AntiRemoval,
        font_size: 38.0,
        opacity: 0.2,
        rotation: 15.0,
        color: [0x99, 0x00, 0x00],
        spacing: 120.0,
    },
    Preset {
        name: "confidential",
        description: "Diagonal bands across the page",
        text: "CONFIDENTIAL",
        pattern: Pattern::Diagonal,
        font_size: 48.0,
        opacity: 0.3,
        rotation: 45.0,
        color: [0xff, 0x00, 0x00],
        spacing: 150.0,
    },
    Preset {
        name: "internal",
        description: "Light horizontal grid",
        text: "INTERNAL",
        pattern: Pattern::Grid,
        font_size: 24.0,
        opacity: 0.2,
        rotation: 0.0,
        color: [0x66, 0x66, 0x66],
        spacing: 100.0,
    },
    Preset {
        name: "do-not-copy",
        description: "Repeated tiles at a counter-diagonal angle",
        text: "DO NOT COPY",
        pattern: Pattern::Repeat,
        font_size: 36.0,
        opacity: 0.4,
        rotation: -45.0,
        color: [0x00, 0x66, 0xcc],
        spacing: 120.0,
    },
    Preset {
        name: "reference-only",
        description: "Sparse faint grid",
        text: "FOR REFERENCE ONLY",
        pattern: Pattern::Grid,
        font_size: 20.0,
        opacity: 0.15,
        rotation: 30.0,
        color: [0x00, 0x88, 0x00],
        spacing: 200.0,
    },
];

/// Every preset, in display order.
pub fn all() -> &'static [Preset] {
    &PRESETS
}

/// Look up a preset by name (case-insensitive).
pub fn find(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}
