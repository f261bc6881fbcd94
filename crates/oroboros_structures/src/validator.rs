//! # Placement Gate
//!
//! Accept/reject decision for one cube:
//!
//! 1. Find the cube's region cell
//! 2. Seed the cell and draw its canonical candidate (single-draw mode)
//! 3. Reject unless the cube *is* that candidate
//! 4. Ask the environment whether the candidate's biomes allow the structure
//!
//! The gate is a pure function of its inputs plus read-only environment
//! queries, so it may run redundantly, out of order and on any thread.

use crate::biome::BiomeSet;
use crate::coords::CubePos;
use crate::environment::StructureEnvironment;
use crate::grid::RegionGrid;
use crate::sampler::{CandidateOrigin, CandidateSampler, SamplingMode};

/// The accept/reject gate for one structure kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementValidator {
    sampler: CandidateSampler,
    biomes: BiomeSet,
    radius: i32,
}

impl PlacementValidator {
    /// Creates a gate over `grid` requiring `biomes` within `radius` blocks
    /// of the candidate's centre.
    #[must_use]
    pub const fn new(grid: RegionGrid, biomes: BiomeSet, radius: i32) -> Self {
        Self {
            sampler: CandidateSampler::new(grid, SamplingMode::Single),
            biomes,
            radius,
        }
    }

    /// The grid the gate checks against.
    #[must_use]
    pub const fn grid(&self) -> &RegionGrid {
        self.sampler.grid()
    }

    /// Biomes a structure may spawn in.
    #[must_use]
    pub const fn biomes(&self) -> BiomeSet {
        self.biomes
    }

    /// The canonical candidate of the cell containing `cube`.
    #[must_use]
    pub fn canonical_candidate<E: StructureEnvironment + ?Sized>(
        &self,
        env: &E,
        cube: CubePos,
    ) -> CandidateOrigin {
        self.sampler.candidate_for(env, self.grid().cell_of(cube))
    }

    /// Returns true if `cube` is its cell's canonical candidate.
    #[must_use]
    pub fn is_canonical<E: StructureEnvironment + ?Sized>(&self, env: &E, cube: CubePos) -> bool {
        self.canonical_candidate(env, cube).matches(cube)
    }

    /// Environment check for a candidate, skipping the canonical test.
    ///
    /// `y` is the block height reported to the biome query.
    #[must_use]
    pub fn is_viable<E: StructureEnvironment + ?Sized>(
        &self,
        env: &E,
        candidate: &CandidateOrigin,
        y: i32,
    ) -> bool {
        if candidate.cube_y.is_some() && !env.is_height_viable(candidate.cube(y >> 4)) {
            return false;
        }
        env.is_viable(candidate.chunk.center_block(y), self.radius, self.biomes)
    }

    /// The full gate: canonical and viable.
    #[must_use]
    pub fn is_canonical_and_viable<E: StructureEnvironment + ?Sized>(
        &self,
        env: &E,
        cube: CubePos,
    ) -> bool {
        let candidate = self.canonical_candidate(env, cube);
        if !candidate.matches(cube) {
            return false;
        }
        let viable = self.is_viable(env, &candidate, cube.center_block().y);
        if viable {
            let spot = cube.center_block();
            tracing::info!(x = spot.x, y = spot.y, z = spot.z, "viable structure spot");
        }
        viable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{BlockPos, ChunkPos};
    use crate::grid::Spacing;
    use crate::random::LegacyRandom;
    use crate::seed::{RegionSeed, WorldSeed};

    struct OpenWorld {
        viable: bool,
    }

    impl StructureEnvironment for OpenWorld {
        type Stream = LegacyRandom;

        fn world_seed(&self) -> WorldSeed {
            WorldSeed::new(12345)
        }

        fn rng_stream(&self, seed: RegionSeed) -> LegacyRandom {
            LegacyRandom::from_region(seed)
        }

        fn is_viable(&self, _center: BlockPos, _radius: i32, _biomes: BiomeSet) -> bool {
            self.viable
        }

        fn is_materialized(&self, _chunk: ChunkPos) -> bool {
            false
        }

        fn surface_exists(&self, _cube: CubePos) -> bool {
            true
        }

        fn surface_layer(&self, _chunk: ChunkPos) -> Option<i32> {
            Some(4)
        }

        fn is_height_viable(&self, cube: CubePos) -> bool {
            cube.y >= 0
        }
    }

    fn gate() -> PlacementValidator {
        PlacementValidator::new(
            RegionGrid::new(Spacing::new(32, 8), None, 10_387_312),
            BiomeSet::VILLAGE,
            0,
        )
    }

    #[test]
    fn test_only_canonical_cube_accepted() {
        let env = OpenWorld { viable: true };
        let gate = gate();
        let mut accepted = Vec::new();
        for x in 0..32 {
            for z in 0..32 {
                if gate.is_canonical_and_viable(&env, CubePos::new(x, 4, z)) {
                    accepted.push((x, z));
                }
            }
        }
        assert_eq!(accepted, vec![(7, 23)]);
    }

    #[test]
    fn test_vertical_axis_ignored_without_vertical_spacing() {
        let env = OpenWorld { viable: true };
        let gate = gate();
        for y in [-64, -1, 0, 3, 200] {
            assert!(gate.is_canonical_and_viable(&env, CubePos::new(7, y, 23)));
        }
    }

    #[test]
    fn test_unviable_environment_rejects() {
        let env = OpenWorld { viable: false };
        assert!(gate().is_canonical(&env, CubePos::new(7, 0, 23)));
        assert!(!gate().is_canonical_and_viable(&env, CubePos::new(7, 0, 23)));
    }

    #[test]
    fn test_vertical_gate_checks_height() {
        let env = OpenWorld { viable: true };
        let gate = PlacementValidator::new(
            RegionGrid::new(Spacing::new(32, 8), Some(Spacing::new(4, 1)), 10_387_312),
            BiomeSet::VILLAGE,
            0,
        );

        // One accepted cube per vertical cell with y >= 0.
        let above = (0..4)
            .filter(|&y| gate.is_canonical_and_viable(&env, CubePos::new(7, y, 23)))
            .count();
        let below = (-4..0)
            .filter(|&y| gate.is_canonical_and_viable(&env, CubePos::new(7, y, 23)))
            .count();
        assert_eq!(above, 1);
        assert_eq!(below, 0);
    }
}
