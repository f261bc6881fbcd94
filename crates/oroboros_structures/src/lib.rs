//! # OROBOROS Structure Placement
//!
//! Deterministic placement of large structures (villages) in an infinite,
//! cube-streamed world.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed always produces the same placements
//! 2. **Stateless gate**: Any cube can be tested without world history
//! 3. **No global state**: One registry per world, owned by its generator
//! 4. **At most once**: A start is built into a given cube exactly once
//!
//! ## Core Components
//!
//! - `RegionGrid`: Spacing cells and per-cell seeds
//! - `CandidateSampler`: The candidate position of a cell
//! - `PlacementValidator`: Canonical-candidate and biome gate
//! - `NearestSearch`: Ring search for the closest structure
//! - `StructureRegistry`: Discovered starts and their build progress
//! - `StructureGenerator`: Ties the above to one world
//! - `TerrainWorld`: In-memory reference environment
//!
//! ## Example
//!
//! ```rust,ignore
//! use oroboros_structures::{StructureConfig, StructureGenerator, TerrainWorld, WorldSeed};
//!
//! let world = TerrainWorld::new(WorldSeed::new(12345));
//! let generator = StructureGenerator::new(StructureConfig::default(), builder)?;
//!
//! generator.discover_around(&world, cube);
//! generator.on_volume_materialized(&world, cube);
//!
//! let nearest = generator.find_nearest(&world, BlockPos::new(0, 64, 0), false);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod biome;
pub mod config;
pub mod coords;
pub mod environment;
pub mod error;
pub mod generator;
pub mod grid;
pub mod random;
pub mod registry;
pub mod sampler;
pub mod search;
pub mod seed;
pub mod terrain;
pub mod validator;

pub use biome::{Biome, BiomeSet};
pub use config::StructureConfig;
pub use coords::{BlockPos, BoundingBox, ChunkPos, CubePos, CUBE_SIZE};
pub use environment::{StructureBuilder, StructureEnvironment, StructureLayout};
pub use error::{StructureError, StructureResult};
pub use generator::{Discovery, StructureGenerator, VILLAGE};
pub use grid::{cell_index, RegionCoord, RegionGrid, Spacing};
pub use random::{ChaChaStream, LegacyRandom, RandomStream};
pub use registry::{StartKey, StructureRegistry, StructureStart};
pub use sampler::{CandidateOrigin, CandidateSampler, SamplingMode};
pub use search::{NearestSearch, NearestStructure, SearchParams, SEARCH_RESULT_Y};
pub use seed::{RegionSeed, WorldSeed};
pub use terrain::{BiomeClassifier, TerrainWorld, ValueNoise};
pub use validator::PlacementValidator;
