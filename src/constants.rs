// Constants module - centralized default values for configuration
//
// Defaults used by the YAML loader, the CLI and the placement engine live
// here so that tests and docs can refer to a single source.

// =============================================================================
// Watermark defaults
// =============================================================================

/// Default watermark text
pub const DEFAULT_TEXT: &str = "CONFIDENTIAL";

/// Default font size in page units (points)
pub const DEFAULT_FONT_SIZE: f64 = 48.0;

/// Default opacity
pub const DEFAULT_OPACITY: f64 = 0.3;

/// Default rotation in degrees (clockwise on the page)
pub const DEFAULT_ROTATION: f64 = 45.0;

/// Default color as hex
pub const DEFAULT_COLOR_HEX: &str = "#ff0000";

/// Default spacing between tiled instances
pub const DEFAULT_SPACING: f64 = 150.0;

/// Smallest accepted font size
pub const MIN_FONT_SIZE: f64 = 1.0;

/// Largest accepted font size
pub const MAX_FONT_SIZE: f64 = 2000.0;

// =============================================================================
// Placement defaults
// =============================================================================

/// Distance from the page edge used by the single-pattern anchors
pub const ANCHOR_MARGIN: f64 = 50.0;

/// Estimated glyph advance as a fraction of the font size
pub const TEXT_WIDTH_FACTOR: f64 = 0.6;

/// Largest accepted page edge in page units
pub const MAX_PAGE_DIMENSION: f64 = 1_000_000.0;

/// Hard ceiling on instances produced by one placement run
pub const MAX_INSTANCES_PER_RUN: usize = 200_000;

// =============================================================================
// Protection layer defaults
// =============================================================================

/// Per-layer density rating in smart mode
pub const SMART_LAYER_COUNT: u8 = 2;

/// Per-layer density rating in heavy mode
pub const HEAVY_LAYER_COUNT: u8 = 4;

/// Per-layer density rating in light mode
pub const LIGHT_LAYER_COUNT: u8 = 1;

/// Largest accepted per-layer density rating
pub const MAX_LAYER_COUNT: u8 = 5;

/// Number of named protection layers
pub const LAYER_KIND_COUNT: usize = 7;

// =============================================================================
// Page selection defaults
// =============================================================================

/// Default margin kept free of marks on every page edge
pub const DEFAULT_PAGE_MARGIN: f64 = 0.0;

// =============================================================================
// Preview defaults
// =============================================================================

/// Default preview scale (pixels per page unit)
pub const DEFAULT_PREVIEW_SCALE: f64 = 1.0;

/// Default preview background
pub const DEFAULT_PREVIEW_BACKGROUND: &str = "#ffffff";

/// Largest preview edge in pixels
pub const MAX_PREVIEW_DIMENSION: u32 = 8192;

// =============================================================================
// Logging defaults
// =============================================================================

/// Default log level directive
pub const DEFAULT_LOG_LEVEL: &str = "info";
