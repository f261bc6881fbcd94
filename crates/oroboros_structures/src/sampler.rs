//! # Candidate Sampler
//!
//! Derives the single candidate origin of a region cell. The cell seed keys
//! a fresh stream; offsets are drawn in a fixed order (x, then z, then y
//! when vertical spacing is on), each in `[0, distance - step_offset)`.
//!
//! Keeping offsets below `distance - step_offset` leaves a strip of
//! `step_offset` chunks at the far edge of every cell empty, so two
//! candidates in neighbouring cells are never closer than that strip.

use serde::{Deserialize, Serialize};

use crate::coords::{ChunkPos, CubePos};
use crate::environment::StructureEnvironment;
use crate::grid::{RegionCoord, RegionGrid, Spacing};
use crate::random::RandomStream;

/// How each offset is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMode {
    /// One draw per axis. The placement gate always uses this.
    #[default]
    Single,
    /// Mean of two draws per axis, pulling candidates toward cell centres.
    Averaged,
}

/// The canonical candidate of one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CandidateOrigin {
    /// The cell the candidate was drawn for.
    pub cell: RegionCoord,
    /// Column of the candidate.
    pub chunk: ChunkPos,
    /// Cube Y of the candidate, when vertical spacing is on.
    pub cube_y: Option<i32>,
}

impl CandidateOrigin {
    /// Returns true if `cube` is this candidate. Without vertical spacing
    /// only the column is compared.
    #[inline]
    #[must_use]
    pub const fn matches(&self, cube: CubePos) -> bool {
        let same_column = self.chunk.x == cube.x && self.chunk.z == cube.z;
        match self.cube_y {
            Some(y) => same_column && y == cube.y,
            None => same_column,
        }
    }

    /// The candidate cube, using `fallback_y` when no vertical index exists.
    #[inline]
    #[must_use]
    pub const fn cube(&self, fallback_y: i32) -> CubePos {
        let y = match self.cube_y {
            Some(y) => y,
            None => fallback_y,
        };
        CubePos::new(self.chunk.x, y, self.chunk.z)
    }
}

/// Draws candidate origins for one grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CandidateSampler {
    grid: RegionGrid,
    mode: SamplingMode,
}

impl CandidateSampler {
    /// Creates a sampler.
    #[must_use]
    pub const fn new(grid: RegionGrid, mode: SamplingMode) -> Self {
        Self { grid, mode }
    }

    /// The grid candidates are drawn on.
    #[must_use]
    pub const fn grid(&self) -> &RegionGrid {
        &self.grid
    }

    /// The sampling mode.
    #[must_use]
    pub const fn mode(&self) -> SamplingMode {
        self.mode
    }

    /// Draws the candidate of `cell` from `stream`.
    #[must_use]
    pub fn sample<S: RandomStream>(&self, cell: RegionCoord, stream: S) -> CandidateOrigin {
        let horizontal = self.grid.horizontal();
        let (x, stream) = self.draw(stream, cell.x, horizontal);
        let (z, stream) = self.draw(stream, cell.z, horizontal);

        let cube_y = match (cell.y, self.grid.vertical()) {
            (Some(cell_y), Some(vertical)) => Some(self.draw(stream, cell_y, vertical).0),
            _ => None,
        };

        CandidateOrigin {
            cell,
            chunk: ChunkPos::new(x, z),
            cube_y,
        }
    }

    /// Seeds a stream for `cell` through the environment and draws its
    /// candidate.
    #[must_use]
    pub fn candidate_for<E: StructureEnvironment + ?Sized>(
        &self,
        env: &E,
        cell: RegionCoord,
    ) -> CandidateOrigin {
        let seed = self.grid.seed_of(env, cell);
        self.sample(cell, env.rng_stream(seed))
    }

    #[allow(clippy::cast_possible_wrap)]
    fn draw<S: RandomStream>(&self, stream: S, cell: i32, spacing: Spacing) -> (i32, S) {
        let range = spacing.sampling_range();
        let (offset, stream) = match self.mode {
            SamplingMode::Single => stream.next_below(range),
            SamplingMode::Averaged => stream.next_averaged(range),
        };
        (
            cell.wrapping_mul(spacing.distance).wrapping_add(offset as i32),
            stream,
        )
    }
}
