//! Randomized protection layers behind the `paranoid` and `anti-removal`
//! patterns.
//!
//! Layers are additive: each appends instances to the same sink with its
//! opacity weight already multiplied in. All layers share one generator and
//! run in [`LayerKind::ALL`] order, so the position of a draw in the stream
//! is fixed by the layer order and the loop order inside each layer. Layers
//! that are switched off consume no draws.

use std::f64::consts::TAU;

use super::config::{LayerKind, LayerSet, Rgb};
use super::instance::{InstanceSink, WatermarkInstance};
use super::pattern::instance_at;
use super::position::Page;
use super::rng::SeededGenerator;
use super::WatermarkConfig;

// Randomized grid
const GRID_OPACITY_WEIGHT: f64 = 0.8;
const GRID_SPACING_FACTOR: f64 = 0.4;
const GRID_MIN_CELL: f64 = 50.0;
const GRID_JITTER_FACTOR: f64 = 0.6;
const GRID_INNER_MARGIN: f64 = 20.0;
const GRID_ROTATION_SPREAD: f64 = 60.0;

// Noise scatter
const NOISE_OPACITY_WEIGHT: f64 = 0.3;
const NOISE_AREA_PER_MARK: f64 = 8000.0;
const NOISE_SYMBOLS: [&str; 5] = ["©", "®", "•", "°", "™"];

// Boundary confusion
const BOUNDARY_OPACITY_WEIGHT: f64 = 0.2;
const BOUNDARY_MARGIN: f64 = 25.0;
const BOUNDARY_STEP_FACTOR: f64 = 0.8;
const BOUNDARY_INSET: f64 = 35.0;
const BOUNDARY_ALONG_JITTER: f64 = 10.0;
const BOUNDARY_ACROSS_JITTER: f64 = 5.0;
const BOUNDARY_SIZE_FACTOR: f64 = 0.6;
const BOUNDARY_ROTATION_SPREAD: f64 = 30.0;
const BOUNDARY_GLYPH: &str = "•";

// Micro marks
const MICRO_OPACITY_WEIGHT: f64 = 0.1;
const MICRO_AREA_PER_MARK: f64 = 100_000.0;
const MICRO_SIZE_FACTOR: f64 = 0.3;
const MICRO_MIN_SIZE: f64 = 6.0;
const MICRO_SYMBOLS: [&str; 6] = ["©", "®", "™", "°", "•", "·"];

// Word-style mimicry
const WORD_OPACITY_WEIGHT: f64 = 0.15;
const WORD_SIZE_FACTOR: f64 = 1.5;
const WORD_SPACING_FACTOR: f64 = 3.0;
const WORD_ROTATION: f64 = -45.0;

// Anti-detection fake features: (glyph, absolute opacity, base angle)
const FAKE_FEATURES: [(&str, f64, f64); 3] =
    [(".", 0.02, 0.0), ("|", 0.03, 90.0), ("/", 0.025, 45.0)];
const FAKE_EDGE: f64 = 20.0;
const FAKE_STEP: f64 = 40.0;
const FAKE_JITTER: f64 = 20.0;
const FAKE_MIN_SIZE: f64 = 8.0;
const FAKE_SIZE_SPREAD: f64 = 4.0;
const FAKE_RED_SPREAD: f64 = 0.2;
const FAKE_ROTATION_SPREAD: f64 = 30.0;

// Zonal distribution: (x fraction, y fraction, density)
const ZONES: [(f64, f64, f64); 4] = [
    (0.1, 0.1, 0.3),
    (0.5, 0.3, 0.5),
    (0.8, 0.7, 0.4),
    (0.3, 0.8, 0.6),
];
const ZONE_MARKS_PER_DENSITY: f64 = 20.0;
const ZONE_MIN_RADIUS: f64 = 50.0;
const ZONE_RADIUS_SPREAD: f64 = 100.0;
const ZONE_ROTATION_SPREAD: f64 = 90.0;

/// Run every enabled layer in order.
pub fn compose(
    config: &WatermarkConfig,
    page: &Page,
    layers: &LayerSet,
    gen: &mut SeededGenerator,
    sink: &mut InstanceSink,
) {
    for kind in layers.enabled() {
        if sink.is_full() {
            break;
        }

        let before = sink.len();
        match kind {
            LayerKind::RandomizedGrid => randomized_grid(config, page, gen, sink),
            LayerKind::NoiseScatter => noise_scatter(config, page, gen, sink),
            LayerKind::BoundaryConfusion => boundary_confusion(config, page, gen, sink),
            LayerKind::MicroMarks => micro_marks(config, page, gen, sink),
            LayerKind::WordStyle => word_style(config, page, sink),
            LayerKind::AntiDetection => anti_detection(config, page, gen, sink),
            LayerKind::Zonal => zonal(config, page, gen, sink),
        }

        tracing::debug!(
            layer = kind.as_str(),
            instances = sink.len() - before,
            "Protection layer composed"
        );
    }
}

fn grid_cell(config: &WatermarkConfig) -> f64 {
    (config.spacing * GRID_SPACING_FACTOR).max(GRID_MIN_CELL)
}

/// Layer 1: a jittered grid of full-size text variants.
///
/// Every cell draws two jitters; only points inside the 20-unit inner margin
/// go on to draw scale, rotation and variant.
pub fn randomized_grid(
    config: &WatermarkConfig,
    page: &Page,
    gen: &mut SeededGenerator,
    sink: &mut InstanceSink,
) {
    let cell = grid_cell(config);
    let variants = [
        config.text.clone(),
        config.text.to_uppercase(),
        format!("{}•", config.text),
    ];

    let mut x = 0.0;
    while x < page.width {
        let mut y = 0.0;
        while y < page.height {
            let fx = x + gen.centered(cell * GRID_JITTER_FACTOR);
            let fy = y + gen.centered(cell * GRID_JITTER_FACTOR);

            let inside = fx > GRID_INNER_MARGIN
                && fx < page.width - GRID_INNER_MARGIN
                && fy > GRID_INNER_MARGIN
                && fy < page.height - GRID_INNER_MARGIN;

            if inside {
                let scale = gen.range(0.7, 1.3);
                let rotation = config.rotation + gen.centered(GRID_ROTATION_SPREAD);
                let text = gen.pick(&variants).clone();

                let pushed = sink.push(WatermarkInstance {
                    text,
                    x: fx,
                    y: fy,
                    font_size: config.font_size * scale,
                    rotation,
                    opacity: config.opacity * GRID_OPACITY_WEIGHT,
                    color: config.color,
                });
                if !pushed {
                    return;
                }
            }
            y += cell;
        }
        x += cell;
    }
}

/// Layer 2: small symbols scattered uniformly, one per 8000 square units.
pub fn noise_scatter(
    config: &WatermarkConfig,
    page: &Page,
    gen: &mut SeededGenerator,
    sink: &mut InstanceSink,
) {
    let count = (page.area() / NOISE_AREA_PER_MARK).floor() as usize;

    for _ in 0..count {
        let x = gen.next_f64() * page.width;
        let y = gen.next_f64() * page.height;
        let rotation = gen.next_f64() * 360.0;
        let scale = gen.range(0.4, 0.8);
        let text = (*gen.pick(&NOISE_SYMBOLS)).to_string();

        let pushed = sink.push(WatermarkInstance {
            text,
            x,
            y,
            font_size: config.font_size * scale,
            rotation,
            opacity: config.opacity * NOISE_OPACITY_WEIGHT,
            color: config.color,
        });
        if !pushed {
            return;
        }
    }
}

/// Layer 3: dots hugging the four edges.
///
/// Top and bottom marks are emitted in pairs while walking the width, then
/// left and right pairs while walking the height. Each mark draws an
/// along-edge jitter, an inset jitter and a rotation; marks that end up off
/// the page are dropped after their draws.
pub fn boundary_confusion(
    config: &WatermarkConfig,
    page: &Page,
    gen: &mut SeededGenerator,
    sink: &mut InstanceSink,
) {
    let step = grid_cell(config) * BOUNDARY_STEP_FACTOR;
    let w = page.width;
    let h = page.height;

    let mut x = BOUNDARY_MARGIN;
    while x < w - BOUNDARY_MARGIN {
        let (along, inset) = boundary_jitter(gen);
        if !push_boundary(config, page, gen, sink, x + along, inset) {
            return;
        }
        let (along, inset) = boundary_jitter(gen);
        if !push_boundary(config, page, gen, sink, x + along, h - inset) {
            return;
        }
        x += step;
    }

    let mut y = BOUNDARY_MARGIN;
    while y < h - BOUNDARY_MARGIN {
        let (along, inset) = boundary_jitter(gen);
        if !push_boundary(config, page, gen, sink, inset, y + along) {
            return;
        }
        let (along, inset) = boundary_jitter(gen);
        if !push_boundary(config, page, gen, sink, w - inset, y + along) {
            return;
        }
        y += step;
    }
}

fn boundary_jitter(gen: &mut SeededGenerator) -> (f64, f64) {
    let along = gen.next_f64() * BOUNDARY_ALONG_JITTER;
    let inset = BOUNDARY_INSET + gen.next_f64() * BOUNDARY_ACROSS_JITTER;
    (along, inset)
}

/// Draws the rotation, then pushes when on the page. Returns `false` only
/// when the sink is full.
fn push_boundary(
    config: &WatermarkConfig,
    page: &Page,
    gen: &mut SeededGenerator,
    sink: &mut InstanceSink,
    x: f64,
    y: f64,
) -> bool {
    let rotation = config.rotation + gen.centered(BOUNDARY_ROTATION_SPREAD);
    if !page.contains(x, y) {
        return true;
    }

    sink.push(WatermarkInstance {
        text: BOUNDARY_GLYPH.to_string(),
        x,
        y,
        font_size: config.font_size * BOUNDARY_SIZE_FACTOR,
        rotation,
        opacity: config.opacity * BOUNDARY_OPACITY_WEIGHT,
        color: config.color,
    })
}

/// Layer 4: tiny single glyphs, one per 100000 square units.
pub fn micro_marks(
    config: &WatermarkConfig,
    page: &Page,
    gen: &mut SeededGenerator,
    sink: &mut InstanceSink,
) {
    let count = (page.area() / MICRO_AREA_PER_MARK).floor() as usize;
    let font_size = (config.font_size * MICRO_SIZE_FACTOR).max(MICRO_MIN_SIZE);

    for _ in 0..count {
        let x = gen.next_f64() * page.width;
        let y = gen.next_f64() * page.height;
        let rotation = gen.next_f64() * 360.0;
        let text = (*gen.pick(&MICRO_SYMBOLS)).to_string();

        let pushed = sink.push(WatermarkInstance {
            text,
            x,
            y,
            font_size,
            rotation,
            opacity: config.opacity * MICRO_OPACITY_WEIGHT,
            color: config.color,
        });
        if !pushed {
            return;
        }
    }
}

/// Layer 5: a regular light-gray grid mimicking office-suite watermarks.
///
/// Draws nothing from the generator.
pub fn word_style(config: &WatermarkConfig, page: &Page, sink: &mut InstanceSink) {
    let font_size = config.font_size * WORD_SIZE_FACTOR;
    let spacing = font_size * WORD_SPACING_FACTOR;

    let mut x = spacing;
    while x < page.width {
        let mut y = spacing;
        while y < page.height {
            let mut instance = instance_at(config, x, y);
            instance.font_size = font_size;
            instance.rotation = WORD_ROTATION;
            instance.opacity = config.opacity * WORD_OPACITY_WEIGHT;
            instance.color = Rgb::LIGHT_GRAY;
            if !sink.push(instance) {
                return;
            }
            y += spacing;
        }
        x += spacing;
    }
}

/// Layer 6: faint decoy strokes tiled every 40 units, one pass per glyph.
pub fn anti_detection(
    config: &WatermarkConfig,
    page: &Page,
    gen: &mut SeededGenerator,
    sink: &mut InstanceSink,
) {
    for (glyph, opacity, angle) in FAKE_FEATURES {
        let mut x = FAKE_EDGE;
        while x < page.width - FAKE_EDGE {
            let mut y = FAKE_EDGE;
            while y < page.height - FAKE_EDGE {
                let jx = gen.centered(FAKE_JITTER);
                let jy = gen.centered(FAKE_JITTER);
                let font_size = FAKE_MIN_SIZE + gen.next_f64() * FAKE_SIZE_SPREAD;
                let red = (config.color.r + gen.centered(FAKE_RED_SPREAD)).clamp(0.0, 1.0);
                let rotation = angle + gen.centered(FAKE_ROTATION_SPREAD);

                let pushed = sink.push(WatermarkInstance {
                    text: glyph.to_string(),
                    x: x + jx,
                    y: y + jy,
                    font_size,
                    rotation,
                    opacity,
                    color: Rgb { r: red, ..config.color },
                });
                if !pushed {
                    return;
                }
                y += FAKE_STEP;
            }
            x += FAKE_STEP;
        }
    }
}

/// Layer 7: clusters around four fixed zones, sized and faded by density.
pub fn zonal(
    config: &WatermarkConfig,
    page: &Page,
    gen: &mut SeededGenerator,
    sink: &mut InstanceSink,
) {
    for (fx, fy, density) in ZONES {
        let cx = page.width * fx;
        let cy = page.height * fy;
        let count = (density * ZONE_MARKS_PER_DENSITY).floor() as usize;

        for _ in 0..count {
            let radius = ZONE_MIN_RADIUS + gen.next_f64() * ZONE_RADIUS_SPREAD;
            let angle = gen.next_f64() * TAU;
            let x = cx + angle.cos() * radius;
            let y = cy + angle.sin() * radius;

            if !page.contains_strict(x, y) {
                continue;
            }

            let rotation = config.rotation + gen.centered(ZONE_ROTATION_SPREAD);
            let pushed = sink.push(WatermarkInstance {
                text: config.text.clone(),
                x,
                y,
                font_size: config.font_size * (0.5 + density * 0.8),
                rotation,
                opacity: config.opacity * (0.3 + density * 0.4),
                color: config.color,
            });
            if !pushed {
                return;
            }
        }
    }
}
