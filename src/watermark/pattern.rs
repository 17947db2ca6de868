//! Closed-form layouts: single, repeat/grid and diagonal.
//!
//! None of these draw from the seeded generator, so their output depends on
//! the configuration and page size only. Every loop is bounded by the page
//! dimensions and stops early once the sink is full.

use crate::constants::ANCHOR_MARGIN;

use super::instance::{InstanceSink, WatermarkInstance};
use super::position::{estimate_text_width, resolve_anchor, Page};
use super::WatermarkConfig;

/// Diagonal rows advance by this fraction of the spacing.
const DIAGONAL_ROW_FACTOR: f64 = 0.7;

/// Rotation added to every diagonal instance.
const DIAGONAL_EXTRA_ROTATION: f64 = 45.0;

/// Instance carrying the configuration's text and style at `(x, y)`.
pub(crate) fn instance_at(config: &WatermarkConfig, x: f64, y: f64) -> WatermarkInstance {
    WatermarkInstance {
        text: config.text.clone(),
        x,
        y,
        font_size: config.font_size,
        rotation: config.rotation,
        opacity: config.opacity,
        color: config.color,
    }
}

/// One instance at the configured anchor.
pub fn place_single(config: &WatermarkConfig, page: &Page, sink: &mut InstanceSink) {
    let text_width = estimate_text_width(&config.text, config.font_size);
    let (x, y) = resolve_anchor(
        config.position,
        page,
        text_width,
        config.font_size,
        ANCHOR_MARGIN,
    );
    sink.push(instance_at(config, x, y));
}

/// Uniform tiling used by both `repeat` and `grid`.
///
/// Cells are `(text_width + spacing, font_size + spacing)`, the first
/// instance sits at `(spacing / 2, spacing / 2)`. Columns are emitted left to
/// right, each column top to bottom.
pub fn place_grid(config: &WatermarkConfig, page: &Page, sink: &mut InstanceSink) {
    let text_width = estimate_text_width(&config.text, config.font_size);
    let step_x = text_width + config.spacing;
    let step_y = config.font_size + config.spacing;
    let start = config.spacing / 2.0;

    let mut x = start;
    'columns: while x < page.width {
        let mut y = start;
        while y < page.height {
            if !sink.push(instance_at(config, x, y)) {
                break 'columns;
            }
            y += step_y;
        }
        x += step_x;
    }
}

/// Families of diagonal bands.
///
/// The band offset walks from `-height` to `width` in steps of
/// `spacing + text_width`; within a band rows are `spacing * 0.7` apart and
/// `x = offset + y`. Points off the page are discarded and every instance is
/// rotated by an extra 45 degrees.
pub fn place_diagonal(config: &WatermarkConfig, page: &Page, sink: &mut InstanceSink) {
    let text_width = estimate_text_width(&config.text, config.font_size);
    let band_step = config.spacing + text_width;
    let row_step = config.spacing * DIAGONAL_ROW_FACTOR;
    let rotation = config.rotation + DIAGONAL_EXTRA_ROTATION;

    let mut offset = -page.height;
    while offset < page.width {
        // Rows above the page's left edge for this band are skipped outright.
        // Row indices stay in f64 so sub-unit spacings cannot overflow them.
        let mut row = if offset < 0.0 {
            (-offset / row_step).ceil()
        } else {
            0.0
        };
        let mut previous_y = f64::NEG_INFINITY;

        loop {
            let y = row * row_step;
            let x = offset + y;
            // Also stops once the row step falls below the resolution of y.
            if !(y < page.height && x <= page.width) || y <= previous_y {
                break;
            }
            if page.contains(x, y) {
                let mut instance = instance_at(config, x, y);
                instance.rotation = rotation;
                if !sink.push(instance) {
                    return;
                }
            }
            previous_y = y;
            row += 1.0;
        }

        offset += band_step;
    }
}
