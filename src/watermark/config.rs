//! Watermark configuration types.
//!
//! This module defines the user-facing watermark configuration including:
//! - Text, size, opacity, rotation and color
//! - The layout pattern and the anchor used by the single pattern
//! - Protection mode and the fixed record of protection layers
//!
//! A configuration is validated once, before any generator is built.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_COLOR_HEX, DEFAULT_FONT_SIZE, DEFAULT_OPACITY, DEFAULT_ROTATION, DEFAULT_SPACING,
    DEFAULT_TEXT, HEAVY_LAYER_COUNT, LIGHT_LAYER_COUNT, MAX_FONT_SIZE, MAX_LAYER_COUNT,
    MIN_FONT_SIZE, SMART_LAYER_COUNT,
};

use super::WatermarkError;

// Default values
fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}

fn default_opacity() -> f64 {
    DEFAULT_OPACITY
}

fn default_rotation() -> f64 {
    DEFAULT_ROTATION
}

fn default_spacing() -> f64 {
    DEFAULT_SPACING
}

fn default_color() -> Rgb {
    Rgb::from_hex(DEFAULT_COLOR_HEX).unwrap_or(Rgb::BLACK)
}

fn default_layer_count() -> u8 {
    SMART_LAYER_COUNT
}

/// Color with components in `[0, 1]`.
///
/// Deserializes from `{ r, g, b }` or from a `#RGB` / `#RRGGBB` string and
/// always serializes as components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr")]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Hex(String),
    Components { r: f64, g: f64, b: f64 },
}

impl TryFrom<ColorRepr> for Rgb {
    type Error = String;

    fn try_from(repr: ColorRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorRepr::Hex(hex) => Rgb::from_hex(&hex),
            ColorRepr::Components { r, g, b } => Ok(Rgb { r, g, b }),
        }
    }
}

impl Rgb {
    pub const BLACK: Rgb = Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub const LIGHT_GRAY: Rgb = Rgb {
        r: 0.8,
        g: 0.8,
        b: 0.8,
    };

    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#RGB` or `#RRGGBB` color.
    pub fn from_hex(hex: &str) -> Result<Self, String> {
        let digits = hex
            .strip_prefix('#')
            .ok_or_else(|| format!("Color must start with '#', got '{}'", hex))?;

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("Color has invalid hex digits: '{}'", hex));
        }

        let channel = |s: &str| -> Result<u8, String> {
            u8::from_str_radix(s, 16).map_err(|_| format!("Invalid hex digit in '{}'", hex))
        };

        let (r, g, b) = match digits.len() {
            // Each digit doubles: 0xF -> 0xFF
            3 => (
                channel(&digits[0..1])? * 17,
                channel(&digits[1..2])? * 17,
                channel(&digits[2..3])? * 17,
            ),
            6 => (
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            ),
            n => {
                return Err(format!(
                    "Color must be #RGB or #RRGGBB format, got {} characters",
                    n
                ))
            }
        };

        Ok(Self::from_bytes([r, g, b]))
    }

    pub fn from_bytes(bytes: [u8; 3]) -> Self {
        Self {
            r: f64::from(bytes[0]) / 255.0,
            g: f64::from(bytes[1]) / 255.0,
            b: f64::from(bytes[2]) / 255.0,
        }
    }

    /// Components quantized to 8 bits, clamped into range.
    pub fn to_bytes(self) -> [u8; 3] {
        let q = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [("r", self.r), ("g", self.g), ("b", self.b)] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(format!(
                    "Color component '{}' must be a finite value between 0.0 and 1.0, got {}",
                    name, value
                ));
            }
        }
        Ok(())
    }
}

/// Anchor used by the single pattern.
///
/// Three rows by three columns. `middle-left` and `middle-right` are accepted
/// as aliases of the center row's outer anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PositionAnchor {
    TopLeft,
    TopCenter,
    TopRight,
    #[serde(alias = "middle-left")]
    CenterLeft,
    #[default]
    Center,
    #[serde(alias = "middle-right")]
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

/// Top-level layout strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pattern {
    /// One instance at the configured anchor
    Single,
    /// Uniform tiling (same geometry as `grid`)
    Repeat,
    /// Uniform tiling
    Grid,
    /// Bands of instances along diagonal lines
    #[default]
    Diagonal,
    /// Randomized protection layers 1-4
    Paranoid,
    /// All seven protection layers
    AntiRemoval,
}

impl Pattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Repeat => "repeat",
            Self::Grid => "grid",
            Self::Diagonal => "diagonal",
            Self::Paranoid => "paranoid",
            Self::AntiRemoval => "anti-removal",
        }
    }

    /// Whether placement for this pattern draws from the seeded generator.
    pub fn is_seeded(&self) -> bool {
        matches!(self, Self::Paranoid | Self::AntiRemoval)
    }
}

/// How aggressively the protection layers are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtectionMode {
    /// Pattern's default layers at a moderate density rating
    #[default]
    Smart,
    /// Every layer the pattern supports at a high density rating
    Heavy,
    /// Only the randomized grid
    Light,
    /// The explicit `layers` record
    Custom,
}

impl ProtectionMode {
    pub fn default_count(&self) -> u8 {
        match self {
            Self::Smart | Self::Custom => SMART_LAYER_COUNT,
            Self::Heavy => HEAVY_LAYER_COUNT,
            Self::Light => LIGHT_LAYER_COUNT,
        }
    }
}

/// Named protection layers, in draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    RandomizedGrid,
    NoiseScatter,
    BoundaryConfusion,
    MicroMarks,
    WordStyle,
    AntiDetection,
    Zonal,
}

impl LayerKind {
    pub const ALL: [LayerKind; 7] = [
        LayerKind::RandomizedGrid,
        LayerKind::NoiseScatter,
        LayerKind::BoundaryConfusion,
        LayerKind::MicroMarks,
        LayerKind::WordStyle,
        LayerKind::AntiDetection,
        LayerKind::Zonal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RandomizedGrid => "randomized_grid",
            Self::NoiseScatter => "noise_scatter",
            Self::BoundaryConfusion => "boundary_confusion",
            Self::MicroMarks => "micro_marks",
            Self::WordStyle => "word_style",
            Self::AntiDetection => "anti_detection",
            Self::Zonal => "zonal",
        }
    }

    const PARANOID_DEFAULT: [LayerKind; 3] = [
        LayerKind::RandomizedGrid,
        LayerKind::NoiseScatter,
        LayerKind::BoundaryConfusion,
    ];

    const PARANOID_FAMILY: [LayerKind; 4] = [
        LayerKind::RandomizedGrid,
        LayerKind::NoiseScatter,
        LayerKind::BoundaryConfusion,
        LayerKind::MicroMarks,
    ];

    /// Layers a pattern is able to run.
    pub fn family(pattern: Pattern) -> &'static [LayerKind] {
        match pattern {
            Pattern::Paranoid => &Self::PARANOID_FAMILY,
            Pattern::AntiRemoval => &Self::ALL,
            Pattern::Single | Pattern::Repeat | Pattern::Grid | Pattern::Diagonal => &[],
        }
    }
}

/// Toggle and density rating of one layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSpec {
    #[serde(default)]
    pub enabled: bool,

    /// Density rating 0-5, read by the scorer
    #[serde(default = "default_layer_count")]
    pub count: u8,
}

impl Default for LayerSpec {
    fn default() -> Self {
        Self {
            enabled: false,
            count: SMART_LAYER_COUNT,
        }
    }
}

impl LayerSpec {
    pub fn on(count: u8) -> Self {
        Self {
            enabled: true,
            count,
        }
    }
}

/// Fixed record of the seven protection layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerSet {
    pub randomized_grid: LayerSpec,
    pub noise_scatter: LayerSpec,
    pub boundary_confusion: LayerSpec,
    pub micro_marks: LayerSpec,
    pub word_style: LayerSpec,
    pub anti_detection: LayerSpec,
    pub zonal: LayerSpec,
}

impl LayerSet {
    /// Every layer switched off.
    pub fn none() -> Self {
        Self::default()
    }

    /// Default layers for a pattern under a protection mode.
    pub fn preset(pattern: Pattern, mode: ProtectionMode) -> Self {
        let count = mode.default_count();
        let mut set = Self::none();

        let kinds: &[LayerKind] = match (pattern, mode) {
            (_, ProtectionMode::Light) if pattern.is_seeded() => &[LayerKind::RandomizedGrid],
            (Pattern::Paranoid, ProtectionMode::Heavy) => LayerKind::family(Pattern::Paranoid),
            (Pattern::Paranoid, _) => &LayerKind::PARANOID_DEFAULT,
            (pattern, _) => LayerKind::family(pattern),
        };

        for kind in kinds {
            *set.get_mut(*kind) = LayerSpec::on(count);
        }
        set
    }

    pub fn get(&self, kind: LayerKind) -> &LayerSpec {
        match kind {
            LayerKind::RandomizedGrid => &self.randomized_grid,
            LayerKind::NoiseScatter => &self.noise_scatter,
            LayerKind::BoundaryConfusion => &self.boundary_confusion,
            LayerKind::MicroMarks => &self.micro_marks,
            LayerKind::WordStyle => &self.word_style,
            LayerKind::AntiDetection => &self.anti_detection,
            LayerKind::Zonal => &self.zonal,
        }
    }

    pub fn get_mut(&mut self, kind: LayerKind) -> &mut LayerSpec {
        match kind {
            LayerKind::RandomizedGrid => &mut self.randomized_grid,
            LayerKind::NoiseScatter => &mut self.noise_scatter,
            LayerKind::BoundaryConfusion => &mut self.boundary_confusion,
            LayerKind::MicroMarks => &mut self.micro_marks,
            LayerKind::WordStyle => &mut self.word_style,
            LayerKind::AntiDetection => &mut self.anti_detection,
            LayerKind::Zonal => &mut self.zonal,
        }
    }

    pub fn is_enabled(&self, kind: LayerKind) -> bool {
        self.get(kind).enabled
    }

    /// Enabled layers in draw order.
    pub fn enabled(&self) -> impl Iterator<Item = LayerKind> + '_ {
        LayerKind::ALL
            .into_iter()
            .filter(move |kind| self.is_enabled(*kind))
    }

    pub fn enabled_count(&self) -> usize {
        self.enabled().count()
    }

    /// Sum of density ratings over enabled layers.
    pub fn total_count(&self) -> u32 {
        self.enabled().map(|kind| u32::from(self.get(kind).count)).sum()
    }

    /// Switch off every layer outside `family`.
    pub fn restricted_to(mut self, family: &[LayerKind]) -> Self {
        for kind in LayerKind::ALL {
            if !family.contains(&kind) {
                self.get_mut(kind).enabled = false;
            }
        }
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        for kind in LayerKind::ALL {
            let count = self.get(kind).count;
            if count > MAX_LAYER_COUNT {
                return Err(format!(
                    "Layer '{}' count must be between 0 and {}, got {}",
                    kind.as_str(),
                    MAX_LAYER_COUNT,
                    count
                ));
            }
        }
        Ok(())
    }
}

/// Complete watermark configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkConfig {
    /// Text to place (non-empty)
    pub text: String,

    /// Font size in page units (default: 48)
    #[serde(default = "default_font_size")]
    pub font_size: f64,

    /// Opacity from 0.0 (transparent) to 1.0 (opaque) (default: 0.3)
    #[serde(default = "default_opacity")]
    pub opacity: f64,

    /// Rotation in degrees, clockwise on the page (default: 45)
    #[serde(default = "default_rotation")]
    pub rotation: f64,

    /// Text color (default: "#ff0000")
    #[serde(default = "default_color")]
    pub color: Rgb,

    /// Anchor used by the single pattern
    #[serde(default)]
    pub position: PositionAnchor,

    /// Spacing between tiled instances in page units (default: 150)
    #[serde(default = "default_spacing")]
    pub spacing: f64,

    #[serde(default)]
    pub pattern: Pattern,

    /// Seed for the protection layers; the text is used when absent or empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random_seed: Option<String>,

    #[serde(default)]
    pub protection_mode: ProtectionMode,

    /// Explicit layer record, honored in custom mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layers: Option<LayerSet>,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT.to_string(),
            font_size: default_font_size(),
            opacity: default_opacity(),
            rotation: default_rotation(),
            color: default_color(),
            position: PositionAnchor::default(),
            spacing: default_spacing(),
            pattern: Pattern::default(),
            random_seed: None,
            protection_mode: ProtectionMode::default(),
            layers: None,
        }
    }
}

impl WatermarkConfig {
    pub fn new(text: impl Into<String>, pattern: Pattern) -> Self {
        Self {
            text: text.into(),
            pattern,
            ..Self::default()
        }
    }

    /// Seed used by the protection layers.
    pub fn effective_seed(&self) -> &str {
        match self.random_seed.as_deref() {
            Some(seed) if !seed.is_empty() => seed,
            _ => &self.text,
        }
    }

    /// Layers that will run for this configuration.
    pub fn layer_set(&self) -> LayerSet {
        let chosen = match (self.protection_mode, self.layers) {
            (ProtectionMode::Custom, Some(layers)) => layers,
            (ProtectionMode::Custom, None) => LayerSet::preset(self.pattern, ProtectionMode::Smart),
            (mode, _) => LayerSet::preset(self.pattern, mode),
        };
        chosen.restricted_to(LayerKind::family(self.pattern))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.text.is_empty() {
            return Err("Watermark 'text' field cannot be empty".to_string());
        }

        // Check for NaN/Infinity and valid range
        if !self.font_size.is_finite() || !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&self.font_size)
        {
            return Err(format!(
                "Watermark font_size must be a finite value between {} and {}, got {}",
                MIN_FONT_SIZE, MAX_FONT_SIZE, self.font_size
            ));
        }

        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(format!(
                "Watermark opacity must be a finite value between 0.0 and 1.0, got {}",
                self.opacity
            ));
        }

        if !self.rotation.is_finite() {
            return Err(format!(
                "Watermark rotation must be finite, got {}",
                self.rotation
            ));
        }

        if !self.spacing.is_finite() || self.spacing <= 0.0 {
            return Err(format!(
                "Watermark spacing must be a finite positive value, got {}",
                self.spacing
            ));
        }

        self.color.validate()?;

        if let Some(layers) = &self.layers {
            layers.validate()?;
        }

        Ok(())
    }

    /// Validate, mapping failures into [`WatermarkError::InvalidConfig`].
    pub fn checked(&self) -> Result<&Self, WatermarkError> {
        self.validate()?;
        Ok(self)
    }
}
