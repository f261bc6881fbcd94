//! # Structure Registry
//!
//! Per-world record of every structure start discovered so far.
//!
//! ## Guarantees
//!
//! 1. **Idempotent starts**: one entry per canonical cell; discovering it
//!    again returns the existing entry
//! 2. **Append-only**: entries are never replaced or removed
//! 3. **At-most-once builds**: each start remembers the cubes it has been
//!    built into, so a cube is never built twice for the same start
//!
//! All access goes through one `parking_lot::Mutex`. Entries are kept in a
//! `BTreeMap` so that build order over overlapping starts is stable.

use std::collections::{BTreeMap, HashSet};

use parking_lot::{Mutex, MutexGuard};

use crate::coords::{BoundingBox, CubePos};
use crate::environment::StructureLayout;
use crate::grid::RegionCoord;

/// Registry key: the canonical cell the start belongs to.
pub type StartKey = RegionCoord;

/// A structure's intended placement and build progress.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructureStart {
    key: StartKey,
    origin: CubePos,
    bounding_box: BoundingBox,
    sizeable: bool,
    processed: HashSet<CubePos>,
}

impl StructureStart {
    /// Creates a start at `origin` with the given layout.
    #[must_use]
    pub fn new(key: StartKey, origin: CubePos, layout: StructureLayout) -> Self {
        Self {
            key,
            origin,
            bounding_box: layout.bounding_box,
            sizeable: layout.sizeable,
            processed: HashSet::new(),
        }
    }

    /// The cell this start belongs to.
    #[inline]
    #[must_use]
    pub const fn key(&self) -> StartKey {
        self.key
    }

    /// The cube the start was discovered in.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> CubePos {
        self.origin
    }

    /// Blocks the finished structure may touch.
    #[inline]
    #[must_use]
    pub const fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    /// Whether the structure warrants building.
    #[inline]
    #[must_use]
    pub const fn is_sizeable(&self) -> bool {
        self.sizeable
    }

    /// Returns true if the start has not yet been built into `cube`.
    #[inline]
    #[must_use]
    pub fn is_valid_for_post_process(&self, cube: CubePos) -> bool {
        !self.processed.contains(&cube)
    }

    /// Records that the start has been built into `cube`.
    ///
    /// Returns false if it already had been.
    pub fn notify_post_process(&mut self, cube: CubePos) -> bool {
        self.processed.insert(cube)
    }

    /// Number of cubes the start has been built into.
    #[must_use]
    pub fn processed_volumes(&self) -> usize {
        self.processed.len()
    }
}

/// Starts of one structure kind in one world.
#[derive(Debug, Default)]
pub struct StructureRegistry {
    starts: Mutex<BTreeMap<StartKey, StructureStart>>,
}

impl StructureRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered starts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.starts.lock().len()
    }

    /// Returns true if no start is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.starts.lock().is_empty()
    }

    /// Returns true if `key` has a start.
    #[must_use]
    pub fn contains(&self, key: StartKey) -> bool {
        self.starts.lock().contains_key(&key)
    }

    /// A copy of the start registered under `key`.
    #[must_use]
    pub fn get(&self, key: StartKey) -> Option<StructureStart> {
        self.starts.lock().get(&key).cloned()
    }

    /// Looks up `key`, creating the start with `create` if absent.
    ///
    /// `create` runs under the lock, so concurrent callers for the same key
    /// produce exactly one start. Returns `Some(true)` if a start was
    /// inserted, `Some(false)` if one already existed and `None` if
    /// `create` declined.
    pub fn get_or_insert_with<F>(&self, key: StartKey, create: F) -> Option<bool>
    where
        F: FnOnce() -> Option<StructureStart>,
    {
        let mut starts = self.starts.lock();
        if starts.contains_key(&key) {
            return Some(false);
        }
        let start = create()?;
        starts.insert(key, start);
        Some(true)
    }

    /// Holds the registry lock for a multi-step read-modify-write.
    pub(crate) fn lock(&self) -> MutexGuard<'_, BTreeMap<StartKey, StructureStart>> {
        self.starts.lock()
    }
}
