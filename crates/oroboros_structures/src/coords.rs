//! # Coordinates
//!
//! Three granularities are in play:
//!
//! - `BlockPos`: a single block in world space
//! - `ChunkPos`: a 16-block column (x/z only), the unit of the spacing grid
//! - `CubePos`: a 16x16x16 volume, the unit of materialisation
//!
//! All conversions floor toward negative infinity, so block `-1` lives in
//! chunk `-1`, never chunk `0`.

use serde::{Deserialize, Serialize};

/// Edge length of a chunk/cube in blocks.
pub const CUBE_SIZE: i32 = 16;

/// Bits to shift a block coordinate by to get a chunk/cube coordinate.
pub const CUBE_SHIFT: u32 = 4;

/// Block position in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    /// X coordinate (blocks).
    pub x: i32,
    /// Y coordinate (blocks).
    pub y: i32,
    /// Z coordinate (blocks).
    pub z: i32,
}

impl BlockPos {
    /// Creates a new block position.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns the column containing this block.
    #[inline]
    #[must_use]
    pub const fn chunk_pos(self) -> ChunkPos {
        ChunkPos::new(self.x >> CUBE_SHIFT, self.z >> CUBE_SHIFT)
    }

    /// Returns the cube containing this block.
    #[inline]
    #[must_use]
    pub const fn cube_pos(self) -> CubePos {
        CubePos::new(
            self.x >> CUBE_SHIFT,
            self.y >> CUBE_SHIFT,
            self.z >> CUBE_SHIFT,
        )
    }
}

/// Chunk column coordinate (in chunks, not blocks).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkPos {
    /// X coordinate (in chunks).
    pub x: i32,
    /// Z coordinate (in chunks).
    pub z: i32,
}

impl ChunkPos {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// World X of the column's corner block.
    #[inline]
    #[must_use]
    pub const fn min_block_x(self) -> i32 {
        self.x << CUBE_SHIFT
    }

    /// World Z of the column's corner block.
    #[inline]
    #[must_use]
    pub const fn min_block_z(self) -> i32 {
        self.z << CUBE_SHIFT
    }

    /// The block at the horizontal centre of this column, at height `y`.
    #[inline]
    #[must_use]
    pub const fn center_block(self, y: i32) -> BlockPos {
        BlockPos::new(self.min_block_x() + 8, y, self.min_block_z() + 8)
    }
}

/// Cube coordinate (a 16x16x16 volume of blocks).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CubePos {
    /// X coordinate (in cubes).
    pub x: i32,
    /// Y coordinate (in cubes).
    pub y: i32,
    /// Z coordinate (in cubes).
    pub z: i32,
}

impl CubePos {
    /// Creates a new cube coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The column this cube belongs to.
    #[inline]
    #[must_use]
    pub const fn chunk_pos(self) -> ChunkPos {
        ChunkPos::new(self.x, self.z)
    }

    /// Centre block of the cube.
    #[inline]
    #[must_use]
    pub const fn center_block(self) -> BlockPos {
        BlockPos::new(
            (self.x << CUBE_SHIFT) + 8,
            (self.y << CUBE_SHIFT) + 8,
            (self.z << CUBE_SHIFT) + 8,
        )
    }

    /// The area structures are built into when this cube is populated.
    ///
    /// Starts at the cube's centre block and spans one cube on every axis.
    #[must_use]
    pub const fn population_box(self) -> BoundingBox {
        let min = self.center_block();
        BoundingBox::new(
            min,
            BlockPos::new(
                min.x + CUBE_SIZE - 1,
                min.y + CUBE_SIZE - 1,
                min.z + CUBE_SIZE - 1,
            ),
        )
    }
}

/// Inclusive, axis-aligned box of blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum corner (inclusive).
    pub min: BlockPos,
    /// Maximum corner (inclusive).
    pub max: BlockPos,
}

impl BoundingBox {
    /// Creates a box from two corners. Corners are normalised so that
    /// `min <= max` on every axis.
    #[must_use]
    pub const fn new(a: BlockPos, b: BlockPos) -> Self {
        Self {
            min: BlockPos::new(min_i32(a.x, b.x), min_i32(a.y, b.y), min_i32(a.z, b.z)),
            max: BlockPos::new(max_i32(a.x, b.x), max_i32(a.y, b.y), max_i32(a.z, b.z)),
        }
    }

    /// Returns true if the two boxes share at least one block.
    #[inline]
    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.max.x >= other.min.x
            && self.min.x <= other.max.x
            && self.max.y >= other.min.y
            && self.min.y <= other.max.y
            && self.max.z >= other.min.z
            && self.min.z <= other.max.z
    }

    /// The overlapping region, if any.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }
        Some(Self {
            min: BlockPos::new(
                self.min.x.max(other.min.x),
                self.min.y.max(other.min.y),
                self.min.z.max(other.min.z),
            ),
            max: BlockPos::new(
                self.max.x.min(other.max.x),
                self.max.y.min(other.max.y),
                self.max.z.min(other.max.z),
            ),
        })
    }
}

// `Ord::min`/`max` are not usable in const fn.
const fn min_i32(a: i32, b: i32) -> i32 {
    if a < b { a } else { b }
}

const fn max_i32(a: i32, b: i32) -> i32 {
    if a > b { a } else { b }
}
