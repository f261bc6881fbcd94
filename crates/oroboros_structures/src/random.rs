//! # Random Streams
//!
//! Sampling never touches a shared, mutable RNG. A stream is a value:
//! each draw consumes it and hands back its successor.
//!
//! ```rust,ignore
//! let stream = LegacyRandom::new(seed.value());
//! let (offset_x, stream) = stream.next_below(24);
//! let (offset_z, _) = stream.next_below(24);
//! ```
//!
//! Two implementations ship with the crate:
//!
//! - `LegacyRandom`: 48-bit LCG, bit-compatible with the `java.util.Random`
//!   family so existing worlds keep their structure positions
//! - `ChaChaStream`: ChaCha8 keyed by the region seed

use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::seed::RegionSeed;

/// A deterministic stream of uniform integers, threaded by value.
pub trait RandomStream: Sized {
    /// Draws a value in `[0, bound)` and returns it with the advanced stream.
    ///
    /// A zero bound yields `0` and returns the stream unchanged.
    #[must_use]
    fn next_below(self, bound: u32) -> (u32, Self);

    /// Mean of two independent draws in `[0, bound)`, rounded down.
    ///
    /// Biases the result toward the middle of the range.
    #[must_use]
    fn next_averaged(self, bound: u32) -> (u32, Self) {
        let (a, stream) = self.next_below(bound);
        let (b, stream) = stream.next_below(bound);
        ((a + b) / 2, stream)
    }
}

const LCG_MULTIPLIER: u64 = 0x5_DEEC_E66D;
const LCG_ADDEND: u64 = 0xB;
const LCG_MASK: u64 = (1 << 48) - 1;

/// 48-bit linear congruential stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LegacyRandom {
    state: u64,
}

impl LegacyRandom {
    /// Creates a stream from a 64-bit seed (scrambled the legacy way).
    #[inline]
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn new(seed: i64) -> Self {
        Self {
            state: (seed as u64 ^ LCG_MULTIPLIER) & LCG_MASK,
        }
    }

    /// Creates a stream keyed by a region seed.
    #[inline]
    #[must_use]
    pub const fn from_region(seed: RegionSeed) -> Self {
        Self::new(seed.value())
    }

    /// Draws a full 32-bit signed value.
    #[inline]
    #[must_use]
    pub const fn next_i32(self) -> (i32, Self) {
        self.next_bits(32)
    }

    /// Draws a full 64-bit signed value (two 32-bit draws, high word first).
    #[inline]
    #[must_use]
    pub const fn next_i64(self) -> (i64, Self) {
        let (high, stream) = self.next_bits(32);
        let (low, stream) = stream.next_bits(32);
        (((high as i64) << 32).wrapping_add(low as i64), stream)
    }

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    const fn next_bits(self, bits: u32) -> (i32, Self) {
        let state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_ADDEND)
            & LCG_MASK;
        ((state >> (48 - bits)) as u32 as i32, Self { state })
    }
}

impl RandomStream for LegacyRandom {
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    fn next_below(self, bound: u32) -> (u32, Self) {
        if bound == 0 {
            return (0, self);
        }
        let bound = i32::try_from(bound).unwrap_or(i32::MAX);

        // Powers of two take the high bits directly.
        if bound & bound.wrapping_neg() == bound {
            let (bits, next) = self.next_bits(31);
            let value = (i64::from(bound) * i64::from(bits)) >> 31;
            return (value as u32, next);
        }

        // Reject the tail that would bias the modulo.
        let mut stream = self;
        loop {
            let (bits, next) = stream.next_bits(31);
            stream = next;
            let value = bits % bound;
            if bits.wrapping_sub(value).wrapping_add(bound - 1) >= 0 {
                return (value as u32, stream);
            }
        }
    }
}

/// ChaCha8 stream keyed by a region seed.
#[derive(Clone)]
pub struct ChaChaStream {
    rng: ChaCha8Rng,
}

impl ChaChaStream {
    /// Creates a stream keyed by a region seed.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn from_region(seed: RegionSeed) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed.value() as u64),
        }
    }
}

impl fmt::Debug for ChaChaStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChaChaStream").finish_non_exhaustive()
    }
}

impl RandomStream for ChaChaStream {
    fn next_below(mut self, bound: u32) -> (u32, Self) {
        if bound == 0 {
            return (0, self);
        }
        let value = self.rng.gen_range(0..bound);
        (value, self)
    }
}
