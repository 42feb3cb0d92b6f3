//! Seeded per-run random source
//!
//! Every spawn, loot roll and upgrade offer draws from the single `Rng` owned by
//! the run. Same seed, same sequence, for all four operations.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;

/// Deterministic 32-bit generator
#[derive(Debug, Clone)]
pub struct Rng {
    seed: u64,
    inner: Pcg32,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: Pcg32::seed_from_u64(seed),
        }
    }

    /// Seed this generator was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform float in [0, 1)
    pub fn next_float(&mut self) -> f32 {
        // 24 high bits fit the f32 mantissa exactly, so 1.0 is unreachable
        (self.inner.next_u32() >> 8) as f32 * (1.0 / 16_777_216.0)
    }

    /// Uniform integer in [0, max). Returns 0 when `max` is 0.
    pub fn next_int(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        // Fixed-point multiply keeps the full 32 bits of the draw for any bound
        ((self.inner.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Random element of a slice, `None` if empty
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.next_int(items.len() as u32) as usize;
        items.get(idx)
    }

    /// Fisher-Yates shuffle into a new vector; the input is left untouched
    pub fn shuffle<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        let mut out = items.to_vec();
        for i in (1..out.len()).rev() {
            let j = self.next_int(i as u32 + 1) as usize;
            out.swap(i, j);
        }
        out
    }
}
