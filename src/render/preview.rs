//! Raster preview surface.
//!
//! Each instance is rasterized unrotated into a coverage stamp whose
//! baseline-left point is known, then composited onto the surface by inverse
//! rotation about the instance anchor with bilinear sampling. Blending uses
//! the Porter-Duff "over" operator with the instance opacity applied to the
//! coverage.
//!
//! Only the part of a stamp that can land on the surface is rasterized, and
//! glyphs larger than [`MAX_RASTER_PX`] are rasterized at that size and
//! magnified. Every mark that passes the shared checks is drawn, whatever
//! its size relative to the surface.

use ab_glyph::{point, Font, FontRef, GlyphId, PxScale, ScaleFont};
use image::{GrayImage, ImageFormat, Luma, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::Path;

use crate::constants::MAX_PREVIEW_DIMENSION;
use crate::watermark::{Page, Rgb, WatermarkError, WatermarkInstance};

use super::font::{default_font, measure_text};
use super::{precheck, DrawnMark, RenderAdapter, RenderSkip};

/// Transparent border around a stamp so bilinear sampling reaches zero.
const STAMP_PADDING: u32 = 2;

/// Largest em size, in pixels, handed to the glyph rasterizer.
const MAX_RASTER_PX: f32 = 512.0;

/// Raster surface covering one page.
pub struct PreviewSurface {
    image: RgbaImage,
    /// Pixels per page unit
    scale: f64,
    font: &'static FontRef<'static>,
}

impl std::fmt::Debug for PreviewSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewSurface")
            .field("width", &self.image.width())
            .field("height", &self.image.height())
            .field("scale", &self.scale)
            .finish()
    }
}

impl PreviewSurface {
    /// Create a surface of `ceil(page * scale)` pixels filled with `background`.
    pub fn new(page: &Page, scale: f64, background: Rgb) -> Result<Self, WatermarkError> {
        page.validate()?;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(WatermarkError::InvalidConfig(format!(
                "Preview scale must be a finite positive value, got {}",
                scale
            )));
        }

        let width = (page.width * scale).ceil();
        let height = (page.height * scale).ceil();
        let max = f64::from(MAX_PREVIEW_DIMENSION);
        if width > max || height > max {
            return Err(WatermarkError::InvalidConfig(format!(
                "Preview size {}x{} exceeds the maximum of {} pixels per side",
                width, height, MAX_PREVIEW_DIMENSION
            )));
        }

        let [r, g, b] = background.to_bytes();
        let image = RgbaImage::from_pixel(
            (width as u32).max(1),
            (height as u32).max(1),
            Rgba([r, g, b, 255]),
        );

        Ok(Self {
            image,
            scale,
            font: default_font()?,
        })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Encode the surface as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>, image::ImageError> {
        let mut buffer = Cursor::new(Vec::new());
        self.image.write_to(&mut buffer, ImageFormat::Png)?;
        Ok(buffer.into_inner())
    }

    pub fn save_png(&self, path: &Path) -> Result<(), image::ImageError> {
        self.image.save_with_format(path, ImageFormat::Png)
    }

    fn composite(&mut self, stamp: &Stamp, anchor: (f64, f64), rotation: f64, opacity: f32) {
        let (cos, sin) = (rotation.to_radians().cos(), rotation.to_radians().sin());
        let (ax, ay) = anchor;
        let (ox, oy) = stamp.origin;
        let (wx, wy) = stamp.offset;
        let k = stamp.magnification;
        let (cw, ch) = (
            f64::from(stamp.coverage.width()),
            f64::from(stamp.coverage.height()),
        );

        // Destination bounding box of the rotated window
        let corners = [(wx, wy), (wx + cw, wy), (wx, wy + ch), (wx + cw, wy + ch)];
        let mut min = (f64::INFINITY, f64::INFINITY);
        let mut max = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for (sx, sy) in corners {
            let (u, v) = ((sx - ox) * k, (sy - oy) * k);
            let x = ax + u * cos - v * sin;
            let y = ay + u * sin + v * cos;
            min = (min.0.min(x), min.1.min(y));
            max = (max.0.max(x), max.1.max(y));
        }

        let width = f64::from(self.image.width());
        let height = f64::from(self.image.height());
        let x0 = min.0.floor().clamp(0.0, width) as u32;
        let x1 = max.0.ceil().clamp(0.0, width) as u32;
        let y0 = min.1.floor().clamp(0.0, height) as u32;
        let y1 = max.1.ceil().clamp(0.0, height) as u32;

        let [r, g, b] = stamp.color;
        for py in y0..y1 {
            for px in x0..x1 {
                // Inverse rotation of the pixel center into stamp space
                let dx = f64::from(px) + 0.5 - ax;
                let dy = f64::from(py) + 0.5 - ay;
                let u = (dx * cos + dy * sin) / k;
                let v = (-dx * sin + dy * cos) / k;

                let coverage =
                    sample_bilinear(&stamp.coverage, u + ox - wx - 0.5, v + oy - wy - 0.5);
                if let Some(alpha) = coverage.filter(|a| *a > 0) {
                    let background = *self.image.get_pixel(px, py);
                    self.image
                        .put_pixel(px, py, over(background, Rgba([r, g, b, alpha]), opacity));
                }
            }
        }
    }

    /// Stamp-space rectangle, in raster pixels, that can reach the surface
    /// for a mark anchored at `anchor`.
    fn visible_window(
        &self,
        layout: &StampLayout,
        anchor: (f64, f64),
        rotation: f64,
    ) -> Option<Window> {
        let (cos, sin) = (rotation.to_radians().cos(), rotation.to_radians().sin());
        let (ax, ay) = anchor;
        let (ox, oy) = layout.origin;
        let k = layout.magnification;
        let width = f64::from(self.image.width());
        let height = f64::from(self.image.height());

        let mut min = (f64::INFINITY, f64::INFINITY);
        let mut max = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for (x, y) in [(0.0, 0.0), (width, 0.0), (0.0, height), (width, height)] {
            let (dx, dy) = (x - ax, y - ay);
            let u = (dx * cos + dy * sin) / k + ox;
            let v = (-dx * sin + dy * cos) / k + oy;
            min = (min.0.min(u), min.1.min(v));
            max = (max.0.max(u), max.1.max(v));
        }

        // Sampling reads one pixel past the mapped area.
        let pad = f64::from(STAMP_PADDING);
        let x0 = (min.0 - pad).floor().max(0.0);
        let y0 = (min.1 - pad).floor().max(0.0);
        let x1 = (max.0 + pad).ceil().min(layout.size.0);
        let y1 = (max.1 + pad).ceil().min(layout.size.1);
        if !(x1 > x0 && y1 > y0) {
            return None;
        }
        Some(Window {
            origin: (x0, y0),
            size: ((x1 - x0) as u32, (y1 - y0) as u32),
        })
    }
}

impl RenderAdapter for PreviewSurface {
    fn draw(&mut self, instance: &WatermarkInstance) -> Result<DrawnMark, RenderSkip> {
        precheck(instance)?;

        let anchor = (instance.x * self.scale, instance.y * self.scale);
        let drawn = DrawnMark {
            x: anchor.0 / self.scale,
            y: anchor.1 / self.scale,
            rotation: instance.rotation,
            opacity: instance.opacity,
        };

        let px_size = (instance.font_size * self.scale) as f32;
        if !(px_size.is_normal() && anchor.0.is_finite() && anchor.1.is_finite()) {
            return Ok(drawn);
        }

        let layout = StampLayout::new(self.font, &instance.text, px_size);
        if let Some(window) = self.visible_window(&layout, anchor, instance.rotation) {
            let stamp = render_stamp(self.font, &instance.text, &layout, &window, instance.color);
            self.composite(&stamp, anchor, instance.rotation, instance.opacity as f32);
        }

        Ok(drawn)
    }
}

/// Geometry of an unrotated text line in raster pixels.
struct StampLayout {
    /// Em size handed to the rasterizer
    raster_px: f32,
    /// Surface pixels per raster pixel, at least 1
    magnification: f64,
    /// Full extent including padding
    size: (f64, f64),
    /// Baseline-left point
    origin: (f64, f64),
}

impl StampLayout {
    fn new(font: &FontRef<'_>, text: &str, px_size: f32) -> Self {
        let raster_px = px_size.min(MAX_RASTER_PX);
        let metrics = measure_text(font, text, raster_px);
        let pad = f64::from(STAMP_PADDING);
        let ascent = f64::from(metrics.ascent.ceil().max(0.0));
        let descent = f64::from(metrics.descent.ceil().max(0.0));

        Self {
            raster_px,
            magnification: f64::from(px_size) / f64::from(raster_px),
            size: (
                f64::from(metrics.width.ceil().max(1.0)) + 2.0 * pad,
                ascent + descent + 2.0 * pad,
            ),
            origin: (pad, pad + ascent),
        }
    }
}

/// Integer sub-rectangle of a stamp layout.
struct Window {
    origin: (f64, f64),
    size: (u32, u32),
}

/// Glyph coverage for one window of a stamp layout.
struct Stamp {
    coverage: GrayImage,
    /// Layout position of coverage pixel (0, 0)
    offset: (f64, f64),
    origin: (f64, f64),
    magnification: f64,
    color: [u8; 3],
}

/// Rasterize the glyphs of `text` that intersect `window`.
fn render_stamp(
    font: &FontRef<'_>,
    text: &str,
    layout: &StampLayout,
    window: &Window,
    color: Rgb,
) -> Stamp {
    let scale = PxScale::from(layout.raster_px);
    let scaled_font = font.as_scaled(scale);
    let (width, height) = window.size;
    let (wx, wy) = (window.origin.0 as f32, window.origin.1 as f32);
    let mut coverage = GrayImage::new(width, height);

    let baseline_y = layout.origin.1 as f32;
    let mut cursor_x = layout.origin.0 as f32;
    let mut prev_glyph: Option<GlyphId> = None;

    for c in text.chars() {
        let glyph_id = scaled_font.glyph_id(c);

        if let Some(prev) = prev_glyph {
            cursor_x += scaled_font.kern(prev, glyph_id);
        }

        let glyph = glyph_id.with_scale_and_position(scale, point(cursor_x, baseline_y));
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            let visible = bounds.max.x >= wx
                && bounds.min.x <= wx + width as f32
                && bounds.max.y >= wy
                && bounds.min.y <= wy + height as f32;

            if visible {
                outlined.draw(|px, py, value| {
                    let x = (px as f32 + bounds.min.x - wx) as i64;
                    let y = (py as f32 + bounds.min.y - wy) as i64;

                    if x >= 0 && y >= 0 && x < i64::from(width) && y < i64::from(height) {
                        let pixel = coverage.get_pixel_mut(x as u32, y as u32);
                        let existing = f32::from(pixel[0]) / 255.0;
                        let added = value.clamp(0.0, 1.0);
                        let combined = added + existing * (1.0 - added);
                        *pixel = Luma([(combined * 255.0).round() as u8]);
                    }
                });
            }
        }

        cursor_x += scaled_font.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    Stamp {
        coverage,
        offset: window.origin,
        origin: layout.origin,
        magnification: layout.magnification,
        color: color.to_bytes(),
    }
}

/// Bilinear coverage sample at a continuous pixel-index position.
fn sample_bilinear(image: &GrayImage, sx: f64, sy: f64) -> Option<u8> {
    let src_w = f64::from(image.width());
    let src_h = f64::from(image.height());
    if !(sx >= 0.0 && sx < src_w - 1.0 && sy >= 0.0 && sy < src_h - 1.0) {
        return None;
    }

    let x0 = sx.floor() as u32;
    let y0 = sy.floor() as u32;
    let fx = (sx - f64::from(x0)) as f32;
    let fy = (sy - f64::from(y0)) as f32;

    let p00 = f32::from(image.get_pixel(x0, y0)[0]);
    let p10 = f32::from(image.get_pixel(x0 + 1, y0)[0]);
    let p01 = f32::from(image.get_pixel(x0, y0 + 1)[0]);
    let p11 = f32::from(image.get_pixel(x0 + 1, y0 + 1)[0]);

    let v = p00 * (1.0 - fx) * (1.0 - fy)
        + p10 * fx * (1.0 - fy)
        + p01 * (1.0 - fx) * fy
        + p11 * fx * fy;
    Some(v.round().clamp(0.0, 255.0) as u8)
}

/// Source-over compositing of `fg`, faded by `opacity`, onto `bg`.
fn over(bg: Rgba<u8>, fg: Rgba<u8>, opacity: f32) -> Rgba<u8> {
    let a_fg = f32::from(fg[3]) / 255.0 * opacity.clamp(0.0, 1.0);
    let a_bg = f32::from(bg[3]) / 255.0;
    let a_bg_visible = a_bg * (1.0 - a_fg);
    let alpha = a_fg + a_bg_visible;
    if alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let mut out = [0u8; 4];
    for (c, slot) in out.iter_mut().take(3).enumerate() {
        let mixed = (f32::from(fg[c]) * a_fg + f32::from(bg[c]) * a_bg_visible) / alpha;
        *slot = mixed.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (alpha * 255.0).round() as u8;
    Rgba(out)
}
