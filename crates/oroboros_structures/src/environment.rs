//! # Environment Collaborators
//!
//! The placement core never stores terrain or lays out buildings itself.
//! It asks two collaborators:
//!
//! - `StructureEnvironment`: seeds, biomes, surfaces, materialisation state
//! - `StructureBuilder`: blueprint layout and clipped geometry placement
//!
//! All environment queries are read-only and expected to be fast and
//! synchronous. Implementations shared across worker threads must be `Sync`.

use crate::biome::BiomeSet;
use crate::coords::{BlockPos, BoundingBox, ChunkPos, CubePos};
use crate::grid::RegionCoord;
use crate::random::RandomStream;
use crate::registry::StructureStart;
use crate::seed::{RegionSeed, WorldSeed};

/// World queries the placement core depends on.
pub trait StructureEnvironment {
    /// Random stream type keyed by region seeds.
    type Stream: RandomStream;

    /// The world seed.
    fn world_seed(&self) -> WorldSeed;

    /// Deterministic per-cell seed.
    fn region_seed(&self, cell: RegionCoord, salt: i32) -> RegionSeed {
        RegionSeed::legacy(self.world_seed(), cell, salt)
    }

    /// Opens a random stream keyed by `seed`.
    fn rng_stream(&self, seed: RegionSeed) -> Self::Stream;

    /// Returns true if every column within `radius` blocks of `center` is in
    /// one of `biomes`.
    fn is_viable(&self, center: BlockPos, radius: i32, biomes: BiomeSet) -> bool;

    /// Returns true if the column has already been generated.
    fn is_materialized(&self, chunk: ChunkPos) -> bool;

    /// Returns true if the cube holds a solid support surface.
    fn surface_exists(&self, cube: CubePos) -> bool;

    /// Cube Y of the column's ground surface, if it has one.
    ///
    /// Starts on a flat grid are rooted in this layer, whichever cube of
    /// the column discovers them.
    fn surface_layer(&self, chunk: ChunkPos) -> Option<i32>;

    /// Height gate for vertically spaced structures.
    fn is_height_viable(&self, _cube: CubePos) -> bool {
        true
    }
}

/// Geometry of a freshly laid out structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StructureLayout {
    /// Blocks the finished structure may touch.
    pub bounding_box: BoundingBox,
    /// Whether the structure is big enough to warrant building at all.
    pub sizeable: bool,
}

/// Blueprint collaborator for one structure kind.
///
/// `build` is called with the owning registry locked; it must not call back
/// into the generator.
pub trait StructureBuilder<W: ?Sized> {
    /// Lays out a structure rooted at `origin`.
    ///
    /// Returns `None` when the blueprint does not fit; no start is recorded
    /// and a later discovery retries.
    fn lay_out(&self, world: &W, origin: CubePos, seed: RegionSeed, size: i32) -> Option<StructureLayout>;

    /// Places the part of `start` that falls inside `clip`.
    fn build(&self, world: &W, start: &StructureStart, clip: &BoundingBox);
}
