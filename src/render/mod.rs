//! Rendering surfaces for placed watermark instances.
//!
//! Two adapters realize the same instance list:
//!
//! - [`preview::PreviewSurface`] rasterizes into an RGBA image (top-left
//!   origin, Y down).
//! - [`document::DocumentCanvas`] emits PDF content operations (bottom-left
//!   origin, Y up).
//!
//! Adapters never reposition, drop or reorder marks on their own. An instance
//! they cannot draw is reported as a [`RenderSkip`] and the run continues.
//! The only coordinate difference between the two is [`AxisFlip`].

pub mod document;
pub mod encoding;
pub mod font;
pub mod preview;

use thiserror::Error;

use crate::watermark::WatermarkInstance;

pub use document::DocumentCanvas;
pub use preview::PreviewSurface;

/// Reason an instance was not drawn.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderSkip {
    #[error("glyph {ch:?} is not supported by this surface")]
    UnsupportedGlyph { ch: char },

    #[error("degenerate transform")]
    DegenerateTransform,

    #[error("empty text")]
    EmptyText,
}

/// Geometry of a mark as realized by a surface, in that surface's page
/// space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawnMark {
    pub x: f64,
    pub y: f64,
    /// Degrees, counter-clockwise positive in Y-up space and clockwise
    /// positive in Y-down space
    pub rotation: f64,
    pub opacity: f64,
}

impl DrawnMark {
    /// Whether two marks agree within `tolerance` on every field.
    pub fn approx_eq(&self, other: &DrawnMark, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.rotation - other.rotation).abs() <= tolerance
            && (self.opacity - other.opacity).abs() <= tolerance
    }
}

/// A surface that draws one instance at a time.
pub trait RenderAdapter {
    fn draw(&mut self, instance: &WatermarkInstance) -> Result<DrawnMark, RenderSkip>;
}

/// Outcome of drawing an instance list.
#[derive(Debug, Clone, Default)]
pub struct RenderReport {
    pub drawn: Vec<DrawnMark>,
    /// Index into the input list and reason, for every skipped instance
    pub skipped: Vec<(usize, RenderSkip)>,
}

impl RenderReport {
    pub fn total(&self) -> usize {
        self.drawn.len() + self.skipped.len()
    }
}

/// Draw every instance in order, collecting marks and skips.
pub fn render_instances<A: RenderAdapter + ?Sized>(
    adapter: &mut A,
    instances: &[WatermarkInstance],
) -> RenderReport {
    let mut report = RenderReport::default();

    for (index, instance) in instances.iter().enumerate() {
        match adapter.draw(instance) {
            Ok(mark) => report.drawn.push(mark),
            Err(skip) => {
                tracing::debug!(index, text = %instance.text, reason = %skip, "Instance skipped");
                report.skipped.push((index, skip));
            }
        }
    }

    if !report.skipped.is_empty() {
        tracing::warn!(
            drawn = report.drawn.len(),
            skipped = report.skipped.len(),
            "Some watermark instances could not be drawn"
        );
    }

    report
}

/// Conversion between top-left (Y down) and bottom-left (Y up) page space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisFlip {
    pub page_height: f64,
}

impl AxisFlip {
    pub fn new(page_height: f64) -> Self {
        Self { page_height }
    }

    /// `(x, y, r)` in top-left space to `(x, h - y, -r)`.
    pub fn to_document(&self, mark: &DrawnMark) -> DrawnMark {
        DrawnMark {
            x: mark.x,
            y: self.page_height - mark.y,
            rotation: -mark.rotation,
            opacity: mark.opacity,
        }
    }

    /// Inverse of [`AxisFlip::to_document`].
    pub fn to_preview(&self, mark: &DrawnMark) -> DrawnMark {
        // The flip is an involution.
        self.to_document(mark)
    }
}

/// Checks shared by every surface before any drawing.
///
/// Whether a mark is drawable depends only on the instance, never on the
/// surface or its scale, so every adapter skips exactly the same marks.
pub(crate) fn precheck(instance: &WatermarkInstance) -> Result<(), RenderSkip> {
    if instance.text.is_empty() {
        return Err(RenderSkip::EmptyText);
    }
    // Content streams carry single-precision reals.
    let fits_f32 = [instance.x, instance.y, instance.font_size]
        .iter()
        .all(|v| (*v as f32).is_finite());
    if !instance.is_finite() || instance.font_size <= 0.0 || !fits_f32 {
        return Err(RenderSkip::DegenerateTransform);
    }
    if let Some(ch) = first_undrawable(&instance.text) {
        return Err(RenderSkip::UnsupportedGlyph { ch });
    }
    Ok(())
}

/// First character that is not both WinAnsi-encodable and covered by the
/// embedded font. Whitespace only needs the encoding.
fn first_undrawable(text: &str) -> Option<char> {
    // A broken embedded font already fails `PreviewSurface::new`.
    let embedded = font::default_font().ok();
    text.chars().find(|ch| {
        encoding::win_ansi_byte(*ch).is_none()
            || (!ch.is_whitespace() && embedded.map_or(false, |f| !font::supports(f, *ch)))
    })
}
