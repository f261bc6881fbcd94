//! # Seeds
//!
//! Every placement decision derives from two values:
//!
//! - `WorldSeed`: fixed for the lifetime of a world
//! - `RegionSeed`: a pure function of (world seed, region cell, salt)
//!
//! ## Determinism Guarantee
//!
//! Region seeds use wrapping 64-bit arithmetic only. No ambient RNG state
//! is read, so the same arguments produce the same seed on any thread, in
//! any order, on any platform.

use crate::coords::ChunkPos;
use crate::grid::RegionCoord;
use crate::random::LegacyRandom;

/// X multiplier of the legacy per-cell seeding primitive.
const CELL_X_MULTIPLIER: i64 = 341_873_128_712;
/// Z multiplier of the legacy per-cell seeding primitive.
const CELL_Z_MULTIPLIER: i64 = 132_897_987_541;

/// World seed for deterministic generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Creates a world seed from its signed representation.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn from_signed(seed: i64) -> Self {
        Self(seed as u64)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Returns the seed reinterpreted as a signed 64-bit value.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn signed(self) -> i64 {
        self.0 as i64
    }

    /// Derives a sub-seed for a specific purpose (e.g., a noise channel).
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        // FNV-1a style mixing
        let mut hash = self.0;
        hash ^= purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(0xDEAD_BEEF_CAFE_BABE)
    }
}

/// Deterministic seed of one region cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegionSeed(i64);

impl RegionSeed {
    /// Wraps a raw region seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: i64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// The legacy per-cell seeding primitive:
    /// `x * 341873128712 + z * 132897987541 + world + salt`, wrapping.
    ///
    /// The vertical cell index, when present, does not take part; vertical
    /// offsets are drawn from the same stream after the horizontal ones.
    #[must_use]
    pub const fn legacy(world: WorldSeed, cell: RegionCoord, salt: i32) -> Self {
        Self(
            (cell.x as i64)
                .wrapping_mul(CELL_X_MULTIPLIER)
                .wrapping_add((cell.z as i64).wrapping_mul(CELL_Z_MULTIPLIER))
                .wrapping_add(world.signed())
                .wrapping_add(salt as i64),
        )
    }

    /// Seed handed to the layout generator for a structure rooted in `chunk`.
    ///
    /// Two 64-bit draws from a stream keyed by the world seed weight the
    /// chunk coordinates; the products are xor-ed with the world seed.
    #[must_use]
    pub const fn for_layout(world: WorldSeed, chunk: ChunkPos) -> Self {
        let stream = LegacyRandom::new(world.signed());
        let (x_weight, stream) = stream.next_i64();
        let (z_weight, _) = stream.next_i64();
        Self(
            (chunk.x as i64).wrapping_mul(x_weight)
                ^ (chunk.z as i64).wrapping_mul(z_weight)
                ^ world.signed(),
        )
    }
}
