//! Injectable random number source
//!
//! Every random decision in growth, flattening and the light walker goes
//! through [`RandomSource`], so a seeded or scripted generator reproduces
//! identical output.

use rand::{Rng, RngCore};

/// Source of uniform random words and floats.
pub trait RandomSource {
    /// Next uniformly distributed 32-bit word
    fn next_word(&mut self) -> u32;

    /// Next uniform float in `[0, 1)` from the top 24 bits of a word
    fn next_f32(&mut self) -> f32 {
        (self.next_word() >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
    }

    /// Uniform float in `[min, max)`
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Uniform index in `[0, len)` by integer multiply-shift, so every index
    /// is reachable for any `len`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "index() on an empty range");
        match u32::try_from(len) {
            Ok(len) => ((self.next_word() as u64 * len as u64) >> 32) as usize,
            Err(_) => {
                let wide = ((self.next_word() as u64) << 32) | self.next_word() as u64;
                ((wide as u128 * len as u128) >> 64) as usize
            }
        }
    }

    /// Returns true with probability `p`
    fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }
}

impl<R: RngCore> RandomSource for R {
    fn next_word(&mut self) -> u32 {
        RngCore::next_u32(self)
    }

    fn next_f32(&mut self) -> f32 {
        self.random::<f32>()
    }
}
