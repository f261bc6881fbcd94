//! # Nearest Structure Search
//!
//! There is no spatial index of structures. Candidates are re-derived on
//! the fly, ring by ring, around the cell containing the query point:
//!
//! ```text
//!   ring 2   ring 1   ring 0
//!   #####
//!   #...#     ###
//!   #...#     #.#       #
//!   #...#     ###
//!   #####
//! ```
//!
//! Each perimeter cell's candidate is checked against the environment only;
//! the canonical test of the placement gate is not repeated. With
//! `SamplingMode::Averaged` the search may therefore report a column the
//! gate would reject. Results carry `gate_agrees` so callers can tell.
//!
//! ## Give Up Fast At Origin
//!
//! A failed check at ring 0 ends that ring at once. Ring 0 holds a single
//! cell, so this never skips a candidate; it is kept as a named switch so
//! the short-circuit can be disabled when profiling search cost.

use crate::coords::{BlockPos, CubePos};
use crate::environment::StructureEnvironment;
use crate::grid::RegionCoord;
use crate::sampler::{CandidateOrigin, CandidateSampler};
use crate::validator::PlacementValidator;

/// Block height reported for horizontally spaced results.
pub const SEARCH_RESULT_Y: i32 = 64;

/// Search tuning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchParams {
    /// Largest ring radius visited, in cells.
    pub max_rings: u32,
    /// Skip structures whose column is already generated.
    pub require_unmaterialized: bool,
    /// End ring 0 on its first failed check.
    pub give_up_fast_at_origin: bool,
}

/// A structure found by the search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NearestStructure {
    /// Representative block: the candidate column's centre.
    pub position: BlockPos,
    /// The candidate the position was derived from.
    pub origin: CandidateOrigin,
    /// Ring the candidate was found on.
    pub ring: u32,
    /// Whether the placement gate accepts the candidate's column as the
    /// canonical one for its cell.
    pub gate_agrees: bool,
}

/// Expanding-ring search over region cells.
#[derive(Clone, Copy, Debug)]
pub struct NearestSearch {
    sampler: CandidateSampler,
    validator: PlacementValidator,
    params: SearchParams,
}

impl NearestSearch {
    /// Creates a search drawing candidates with `sampler` and checking them
    /// with `validator`'s environment rules.
    #[must_use]
    pub const fn new(
        sampler: CandidateSampler,
        validator: PlacementValidator,
        params: SearchParams,
    ) -> Self {
        Self {
            sampler,
            validator,
            params,
        }
    }

    /// Finds the structure nearest to `from`, or `None` once `max_rings`
    /// is exhausted.
    #[must_use]
    pub fn find_nearest<E: StructureEnvironment + ?Sized>(
        &self,
        env: &E,
        from: BlockPos,
    ) -> Option<NearestStructure> {
        let center = self.sampler.grid().cell_of(from.cube_pos());
        let max_rings = i32::try_from(self.params.max_rings).unwrap_or(i32::MAX);

        for ring in 0..=max_rings {
            for dx in -ring..=ring {
                let on_x_edge = dx == -ring || dx == ring;
                // Interior rows only touch the ring at their two ends.
                let dz_step = if on_x_edge || ring == 0 { 1 } else { 2 * ring };
                let mut dz = -ring;
                while dz <= ring {
                    let cell = center.offset(dx, dz);
                    match self.check(env, cell, from.y) {
                        Some(origin) => {
                            return Some(self.found(env, origin, ring, from.y));
                        }
                        None if ring == 0 && self.params.give_up_fast_at_origin => break,
                        None => {}
                    }
                    dz += dz_step;
                }
                if ring == 0 && self.params.give_up_fast_at_origin {
                    break;
                }
            }
        }

        tracing::debug!(
            x = from.x,
            z = from.z,
            max_rings = self.params.max_rings,
            "no structure found"
        );
        None
    }

    fn check<E: StructureEnvironment + ?Sized>(
        &self,
        env: &E,
        cell: RegionCoord,
        y: i32,
    ) -> Option<CandidateOrigin> {
        let origin = self.sampler.candidate_for(env, cell);
        if !self.validator.is_viable(env, &origin, y) {
            return None;
        }
        if self.params.require_unmaterialized && env.is_materialized(origin.chunk) {
            return None;
        }
        Some(origin)
    }

    #[allow(clippy::cast_sign_loss)]
    fn found<E: StructureEnvironment + ?Sized>(
        &self,
        env: &E,
        origin: CandidateOrigin,
        ring: i32,
        y: i32,
    ) -> NearestStructure {
        let cube: CubePos = origin.cube(y >> 4);
        let position = match origin.cube_y {
            Some(_) => cube.center_block(),
            None => origin.chunk.center_block(SEARCH_RESULT_Y),
        };
        let gate_agrees = self.validator.is_canonical(env, cube);
        if !gate_agrees {
            tracing::debug!(
                x = origin.chunk.x,
                z = origin.chunk.z,
                "search candidate is not the gate's canonical candidate"
            );
        }
        NearestStructure {
            position,
            origin,
            ring: ring as u32,
            gate_agrees,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::BiomeSet;
    use crate::coords::ChunkPos;
    use crate::grid::{RegionGrid, Spacing};
    use crate::random::LegacyRandom;
    use crate::sampler::SamplingMode;
    use crate::seed::{RegionSeed, WorldSeed};

    /// Viable only in the listed columns.
    struct Sparse {
        viable: Vec<ChunkPos>,
        materialized: Vec<ChunkPos>,
    }

    impl StructureEnvironment for Sparse {
        type Stream = LegacyRandom;

        fn world_seed(&self) -> WorldSeed {
            WorldSeed::new(12345)
        }

        fn rng_stream(&self, seed: RegionSeed) -> LegacyRandom {
            LegacyRandom::from_region(seed)
        }

        fn is_viable(&self, center: BlockPos, _radius: i32, _biomes: BiomeSet) -> bool {
            self.viable.contains(&center.chunk_pos())
        }

        fn is_materialized(&self, chunk: ChunkPos) -> bool {
            self.materialized.contains(&chunk)
        }

        fn surface_exists(&self, _cube: CubePos) -> bool {
            true
        }

        fn surface_layer(&self, _chunk: ChunkPos) -> Option<i32> {
            Some(4)
        }
    }

    fn search(mode: SamplingMode, require_unmaterialized: bool) -> NearestSearch {
        let grid = RegionGrid::new(Spacing::new(32, 8), None, 10_387_312);
        NearestSearch::new(
            CandidateSampler::new(grid, mode),
            PlacementValidator::new(grid, BiomeSet::VILLAGE, 0),
            SearchParams {
                max_rings: 100,
                require_unmaterialized,
                give_up_fast_at_origin: true,
            },
        )
    }

    #[test]
    fn test_finds_candidate_in_origin_cell() {
        let env = Sparse {
            viable: vec![ChunkPos::new(7, 23)],
            materialized: vec![],
        };
        let found = search(SamplingMode::Single, false)
            .find_nearest(&env, BlockPos::new(5, 70, 5))
            .map(|n| (n.position, n.ring, n.gate_agrees));
        assert_eq!(found, Some((BlockPos::new(120, 64, 376), 0, true)));
    }

    #[test]
    fn test_finds_neighbour_ring() {
        // Cell (1, 0) candidate is chunk (41, 4).
        let env = Sparse {
            viable: vec![ChunkPos::new(41, 4)],
            materialized: vec![],
        };
        let found = search(SamplingMode::Single, false).find_nearest(&env, BlockPos::new(0, 64, 0));
        let found = found.map(|n| (n.origin.chunk, n.ring));
        assert_eq!(found, Some((ChunkPos::new(41, 4), 1)));
    }

    #[test]
    fn test_skips_materialized_when_asked() {
        let env = Sparse {
            viable: vec![ChunkPos::new(7, 23), ChunkPos::new(41, 4)],
            materialized: vec![ChunkPos::new(7, 23)],
        };
        let explored = search(SamplingMode::Single, false)
            .find_nearest(&env, BlockPos::new(0, 64, 0))
            .map(|n| n.origin.chunk);
        let unexplored = search(SamplingMode::Single, true)
            .find_nearest(&env, BlockPos::new(0, 64, 0))
            .map(|n| n.origin.chunk);
        assert_eq!(explored, Some(ChunkPos::new(7, 23)));
        assert_eq!(unexplored, Some(ChunkPos::new(41, 4)));
    }

    #[test]
    fn test_averaged_mode_flags_gate_disagreement() {
        // Averaged candidate of cell (0, 0) is chunk (15, 18); the gate's is (7, 23).
        let env = Sparse {
            viable: vec![ChunkPos::new(15, 18)],
            materialized: vec![],
        };
        let found = search(SamplingMode::Averaged, false).find_nearest(&env, BlockPos::new(0, 64, 0));
        let found = found.map(|n| (n.origin.chunk, n.gate_agrees));
        assert_eq!(found, Some((ChunkPos::new(15, 18), false)));
    }

    #[test]
    fn test_nothing_viable_terminates() {
        let env = Sparse {
            viable: vec![],
            materialized: vec![],
        };
        assert_eq!(
            search(SamplingMode::Single, false).find_nearest(&env, BlockPos::new(-9000, 64, 77)),
            None
        );
    }

    #[test]
    fn test_give_up_fast_does_not_change_results() {
        let env = Sparse {
            viable: vec![ChunkPos::new(-9, 21), ChunkPos::new(99, -51)],
            materialized: vec![],
        };
        let mut lazy = search(SamplingMode::Single, false);
        lazy.params.give_up_fast_at_origin = false;
        let eager = search(SamplingMode::Single, false);

        let from = BlockPos::new(100, 64, 100);
        assert_eq!(lazy.find_nearest(&env, from), eager.find_nearest(&env, from));
        assert_eq!(
            eager.find_nearest(&env, from).map(|n| n.origin.chunk),
            Some(ChunkPos::new(-9, 21))
        );
    }
}
