//! Deterministic pseudo-random stream keyed by a string seed.
//!
//! Every placement run owns exactly one generator. Layers receive it by
//! `&mut` so the order of draws is the order of the code, and two runs with
//! the same seed see the same sequence.

/// Multiplier of the linear congruential recurrence.
const LCG_MULTIPLIER: u64 = 9301;

/// Increment of the linear congruential recurrence.
const LCG_INCREMENT: u64 = 49297;

/// Modulus of the linear congruential recurrence; also the divisor that maps
/// the state into `[0, 1)`.
const LCG_MODULUS: u64 = 233_280;

/// Seeded linear congruential generator.
///
/// Not suitable for anything security related. It exists so that placements
/// can be reproduced exactly from the configuration alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededGenerator {
    state: u64,
}

impl SeededGenerator {
    /// Create a generator from a seed string.
    ///
    /// The seed's UTF-16 code units are folded with `state * 31 + unit` in
    /// wrapping 32-bit signed arithmetic and the absolute value becomes the
    /// initial state.
    pub fn new(seed: &str) -> Self {
        let folded = seed
            .encode_utf16()
            .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)));

        Self {
            state: i64::from(folded).unsigned_abs(),
        }
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = (self.state * LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS;
        self.state as f64 / LCG_MODULUS as f64
    }

    /// Uniform value in `[low, high)`.
    pub fn range(&mut self, low: f64, high: f64) -> f64 {
        low + self.next_f64() * (high - low)
    }

    /// Uniform value in `[-span / 2, span / 2)`.
    pub fn centered(&mut self, span: f64) -> f64 {
        (self.next_f64() - 0.5) * span
    }

    /// Index in `0..len`, or 0 when `len` is 0.
    pub fn index(&mut self, len: usize) -> usize {
        let draw = (self.next_f64() * len as f64).floor() as usize;
        draw.min(len.saturating_sub(1))
    }

    /// Pick one element of a non-empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.index(items.len())]
    }
}
