//! Embedded font used by the raster preview.
//!
//! DejaVu Sans Mono is compiled into the binary and parsed once on first use.

use ab_glyph::{Font, FontRef, GlyphId, PxScale, ScaleFont};
use std::sync::OnceLock;

use crate::watermark::WatermarkError;

static DEFAULT_FONT: OnceLock<Result<FontRef<'static>, String>> = OnceLock::new();

const EMBEDDED_FONT_DATA: &[u8] = include_bytes!("fonts/DejaVuSansMono.ttf");

/// Get the embedded font, parsing it lazily.
pub fn default_font() -> Result<&'static FontRef<'static>, WatermarkError> {
    DEFAULT_FONT
        .get_or_init(|| FontRef::try_from_slice(EMBEDDED_FONT_DATA).map_err(|e| e.to_string()))
        .as_ref()
        .map_err(|e| WatermarkError::Font(format!("embedded font is invalid: {}", e)))
}

/// Whether the font has a glyph for `ch`.
pub fn supports(font: &FontRef<'_>, ch: char) -> bool {
    font.glyph_id(ch) != GlyphId(0)
}

/// Measured extent of a line of text at a pixel size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    /// Advance width including kerning
    pub width: f32,
    pub ascent: f32,
    /// Positive distance below the baseline
    pub descent: f32,
}

/// Measure `text` at `px_size`.
pub fn measure_text(font: &FontRef<'_>, text: &str, px_size: f32) -> TextMetrics {
    let scaled_font = font.as_scaled(PxScale::from(px_size));

    let mut width = 0.0f32;
    let mut prev_glyph: Option<GlyphId> = None;

    for c in text.chars() {
        let glyph_id = scaled_font.glyph_id(c);

        // Add kerning if there's a previous glyph
        if let Some(prev) = prev_glyph {
            width += scaled_font.kern(prev, glyph_id);
        }

        width += scaled_font.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    TextMetrics {
        width,
        ascent: scaled_font.ascent(),
        descent: -scaled_font.descent(),
    }
}
