//! Page geometry for watermark placement.
//!
//! All coordinates use a top-left origin with Y growing downward, in page
//! units (points for documents). An instance's `(x, y)` is the left end of its
//! text baseline.
//!
//! # Example
//!
//! ```ignore
//! use guardmark::watermark::position::{resolve_anchor, Page};
//! use guardmark::watermark::PositionAnchor;
//!
//! let page = Page::new(800.0, 600.0).unwrap();
//! // 10 characters at 20pt are estimated as 120 units wide.
//! let (x, y) = resolve_anchor(PositionAnchor::BottomRight, &page, 120.0, 20.0, 50.0);
//! assert_eq!((x, y), (630.0, 550.0)); // 800 - 120 - 50, 600 - 50
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_PAGE_DIMENSION, TEXT_WIDTH_FACTOR};

use super::{PositionAnchor, WatermarkError};

/// Size of the target page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub width: f64,
    pub height: f64,
}

impl Page {
    /// Create a page, rejecting sizes outside `(0, MAX_PAGE_DIMENSION]`.
    pub fn new(width: f64, height: f64) -> Result<Self, WatermarkError> {
        let page = Self { width, height };
        page.validate()?;
        Ok(page)
    }

    pub fn validate(&self) -> Result<(), WatermarkError> {
        let ok = |v: f64| v.is_finite() && v > 0.0 && v <= MAX_PAGE_DIMENSION;
        if ok(self.width) && ok(self.height) {
            Ok(())
        } else {
            Err(WatermarkError::InvalidPage {
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Whether a point lies within `[0, width] x [0, height]`.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
    }

    /// Whether a point lies strictly inside the page.
    pub fn contains_strict(&self, x: f64, y: f64) -> bool {
        x > 0.0 && x < self.width && y > 0.0 && y < self.height
    }

    /// Page shrunk by `margin` on every side, or `None` when nothing is left.
    pub fn inset(&self, margin: f64) -> Option<Page> {
        let page = Page {
            width: self.width - 2.0 * margin,
            height: self.height - 2.0 * margin,
        };
        page.validate().ok().map(|_| page)
    }
}

/// Estimated advance width of `text` at `font_size`.
///
/// Placement uses this estimate for every pattern so that both rendering
/// surfaces receive identical positions regardless of their font metrics.
pub fn estimate_text_width(text: &str, font_size: f64) -> f64 {
    font_size * text.chars().count() as f64 * TEXT_WIDTH_FACTOR
}

/// Resolve a single-pattern anchor to a baseline-left position.
///
/// Columns: left edge at `margin`, centered, right edge at `margin` from the
/// right side. Rows: the baseline sits one font size below the top margin, on
/// the vertical center line of the text box, or `margin` above the bottom.
/// The result is clamped onto the page.
pub fn resolve_anchor(
    anchor: PositionAnchor,
    page: &Page,
    text_width: f64,
    font_size: f64,
    margin: f64,
) -> (f64, f64) {
    let w = page.width;
    let h = page.height;

    let left = margin;
    let center = (w - text_width) / 2.0;
    let right = w - text_width - margin;

    let top = margin + font_size;
    let middle = (h + font_size) / 2.0;
    let bottom = h - margin;

    let (x, y) = match anchor {
        // Top row
        PositionAnchor::TopLeft => (left, top),
        PositionAnchor::TopCenter => (center, top),
        PositionAnchor::TopRight => (right, top),

        // Center row
        PositionAnchor::CenterLeft => (left, middle),
        PositionAnchor::Center => (center, middle),
        PositionAnchor::CenterRight => (right, middle),

        // Bottom row
        PositionAnchor::BottomLeft => (left, bottom),
        PositionAnchor::BottomCenter => (center, bottom),
        PositionAnchor::BottomRight => (right, bottom),
    };

    clamp_to_page(page, x, y)
}

/// Clamp a point onto the page rectangle.
pub fn clamp_to_page(page: &Page, x: f64, y: f64) -> (f64, f64) {
    (x.clamp(0.0, page.width), y.clamp(0.0, page.height))
}
