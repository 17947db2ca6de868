//! Placed watermark instances.

use serde::{Deserialize, Serialize};

use super::Rgb;

/// One fully resolved mark.
///
/// `(x, y)` is the baseline-left anchor in top-left page space and the pivot
/// of `rotation` (degrees, clockwise on the page). Opacity already includes
/// any layer weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkInstance {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
    pub rotation: f64,
    pub opacity: f64,
    pub color: Rgb,
}

impl WatermarkInstance {
    /// Whether every numeric field is finite.
    pub fn is_finite(&self) -> bool {
        [self.x, self.y, self.font_size, self.rotation, self.opacity]
            .iter()
            .all(|v| v.is_finite())
    }

    /// Bit-level equality, used to check reproducibility.
    pub fn same_bits(&self, other: &Self) -> bool {
        let bits = |i: &Self| {
            [
                i.x.to_bits(),
                i.y.to_bits(),
                i.font_size.to_bits(),
                i.rotation.to_bits(),
                i.opacity.to_bits(),
                i.color.r.to_bits(),
                i.color.g.to_bits(),
                i.color.b.to_bits(),
            ]
        };
        self.text == other.text && bits(self) == bits(other)
    }
}

/// Bounded output buffer of a placement run.
///
/// Once `limit` instances are stored every further push is refused and the
/// run is marked truncated, so loops can stop early.
#[derive(Debug)]
pub struct InstanceSink {
    instances: Vec<WatermarkInstance>,
    limit: usize,
    truncated: bool,
}

impl InstanceSink {
    pub fn new(limit: usize) -> Self {
        Self {
            instances: Vec::new(),
            limit,
            truncated: false,
        }
    }

    /// Store an instance; returns `false` once the limit is reached.
    pub fn push(&mut self, instance: WatermarkInstance) -> bool {
        if self.instances.len() >= self.limit {
            self.truncated = true;
            return false;
        }
        self.instances.push(instance);
        true
    }

    pub fn is_full(&self) -> bool {
        self.instances.len() >= self.limit
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn into_instances(self) -> Vec<WatermarkInstance> {
        self.instances
    }
}
