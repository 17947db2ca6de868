//! Deterministic watermark placement.
//!
//! Given a [`WatermarkConfig`] and a [`Page`], this module computes an ordered
//! list of [`WatermarkInstance`]s. The list is a pure function of its inputs:
//! the randomized patterns draw from a [`SeededGenerator`] seeded from the
//! configuration, so the same configuration always yields the same
//! placements on every rendering surface.
//!
//! # Features
//!
//! - **Closed-form patterns**: single anchor, repeat/grid tiling, diagonal bands
//! - **Protection layers**: seven additive randomized layers behind the
//!   `paranoid` and `anti-removal` patterns
//! - **Protection modes**: smart, heavy, light and custom layer selection
//! - **Protection score**: a 0-100 rating of the selected layers
//!
//! # Configuration Example
//!
//! ```yaml
//! watermark:
//!   text: "TOP SECRET"
//!   font_size: 42
//!   opacity: 0.25
//!   rotation: 25
//!   color: "#cc0000"
//!   pattern: paranoid
//!   random_seed: "case-4711"
//!   protection_mode: heavy
//! ```

pub mod config;
pub mod error;
pub mod instance;
pub mod layers;
pub mod pattern;
pub mod placement;
pub mod position;
pub mod presets;
pub mod rng;
pub mod score;

// Re-export main types for convenience
pub use config::{
    LayerKind, LayerSet, LayerSpec, Pattern, PositionAnchor, ProtectionMode, Rgb,
    WatermarkConfig,
};
pub use error::WatermarkError;
pub use instance::{InstanceSink, WatermarkInstance};
pub use placement::{place, place_with_limits, Placement, PlacementLimits};
pub use position::{estimate_text_width, resolve_anchor, Page};
pub use presets::Preset;
pub use rng::SeededGenerator;
pub use score::{density_label, score, ProtectionLevel, ProtectionScore};
