//! # Region Grid
//!
//! The world is divided into square cells of `distance` chunks. Each cell
//! hosts at most one structure of a kind, which is what spaces them out
//! without a global pass over the world.
//!
//! ## Negative Coordinates
//!
//! Plain integer division truncates toward zero, which would merge chunks
//! `-distance+1..=distance-1` into one oversized cell. Negative inputs are
//! shifted by `distance - 1` first so every cell has exactly `distance`
//! chunks and chunk `-1` lands in cell `-1`.

use serde::{Deserialize, Serialize};

use crate::coords::CubePos;
use crate::environment::StructureEnvironment;
use crate::seed::RegionSeed;

/// Identifies one region cell.
///
/// `y` is only present when vertical placement is enabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionCoord {
    /// Cell X index.
    pub x: i32,
    /// Cell Y index, for vertically spaced structures.
    pub y: Option<i32>,
    /// Cell Z index.
    pub z: i32,
}

impl RegionCoord {
    /// A horizontal-only cell.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, y: None, z }
    }

    /// A cell with a vertical index.
    #[inline]
    #[must_use]
    pub const fn with_y(x: i32, y: i32, z: i32) -> Self {
        Self { x, y: Some(y), z }
    }

    /// Offsets the cell horizontally.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y,
            z: self.z + dz,
        }
    }
}

/// Cell size along one axis pair, in chunks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Spacing {
    /// Cell edge length in chunks.
    pub distance: i32,
    /// Chunks at the far edge of a cell that never host a candidate.
    pub step_offset: i32,
}

impl Spacing {
    /// Creates a spacing.
    #[inline]
    #[must_use]
    pub const fn new(distance: i32, step_offset: i32) -> Self {
        Self {
            distance,
            step_offset,
        }
    }

    /// Width of the range candidate offsets are drawn from.
    ///
    /// Zero for a degenerate spacing; configuration validation rejects those.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn sampling_range(self) -> u32 {
        let range = self.distance - self.step_offset;
        if range > 0 { range as u32 } else { 0 }
    }
}

/// Maps a raw chunk/cube coordinate to its cell index along one axis.
///
/// Total over all `i32` inputs for `distance >= 1`.
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn cell_index(coord: i32, distance: i32) -> i32 {
    let mut coord = coord as i64;
    let distance = distance as i64;
    if coord < 0 {
        coord -= distance - 1;
    }
    (coord / distance) as i32
}

/// The spacing grid of one structure kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionGrid {
    horizontal: Spacing,
    vertical: Option<Spacing>,
    salt: i32,
}

impl RegionGrid {
    /// Creates a grid. `salt` decorrelates structure kinds sharing a seed.
    #[must_use]
    pub const fn new(horizontal: Spacing, vertical: Option<Spacing>, salt: i32) -> Self {
        Self {
            horizontal,
            vertical,
            salt,
        }
    }

    /// Horizontal spacing.
    #[inline]
    #[must_use]
    pub const fn horizontal(&self) -> Spacing {
        self.horizontal
    }

    /// Vertical spacing, when structures are spaced in 3D.
    #[inline]
    #[must_use]
    pub const fn vertical(&self) -> Option<Spacing> {
        self.vertical
    }

    /// Salt mixed into every cell seed.
    #[inline]
    #[must_use]
    pub const fn salt(&self) -> i32 {
        self.salt
    }

    /// The cell containing `cube`.
    #[must_use]
    pub const fn cell_of(&self, cube: CubePos) -> RegionCoord {
        let distance = self.horizontal.distance;
        RegionCoord {
            x: cell_index(cube.x, distance),
            y: match self.vertical {
                Some(vertical) => Some(cell_index(cube.y, vertical.distance)),
                None => None,
            },
            z: cell_index(cube.z, distance),
        }
    }

    /// Deterministic seed of `cell`, from the environment's seeding primitive.
    #[must_use]
    pub fn seed_of<E: StructureEnvironment + ?Sized>(&self, env: &E, cell: RegionCoord) -> RegionSeed {
        env.region_seed(cell, self.salt)
    }
}
