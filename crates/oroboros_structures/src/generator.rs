//! # Structure Generator
//!
//! One generator per world per structure kind. It owns the kind's config,
//! its start registry and its blueprint builder; nothing is global.
//!
//! ## Generation Flow
//!
//! ```text
//!   cube generated ──> discover_around ──> gate per nearby chunk
//!                                            │ canonical + viable
//!                                            v
//!                                     registry.get_or_insert_with
//!
//!   cube materialised ──> on_volume_materialized
//!                            │ lock registry
//!                            │ for each sizeable start not yet built here
//!                            │   whose box touches the population area:
//!                            │     build, mark cube
//!                            v unlock
//! ```
//!
//! `find_nearest` is a separate, read-only path.

use std::collections::HashMap;

use crate::coords::{BlockPos, CubePos};
use crate::config::StructureConfig;
use crate::environment::{StructureBuilder, StructureEnvironment};
use crate::error::StructureResult;
use crate::registry::{StartKey, StructureRegistry, StructureStart};
use crate::sampler::CandidateSampler;
use crate::search::{NearestSearch, NearestStructure, SearchParams};
use crate::seed::RegionSeed;
use crate::validator::PlacementValidator;

/// Name of the structure kind the default configuration describes.
pub const VILLAGE: &str = "Village";

/// Outcome of a successful discovery.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Discovery {
    /// Registry key of the start.
    pub key: StartKey,
    /// True if this call registered the start.
    pub newly_registered: bool,
}

/// Places one structure kind into one world.
pub struct StructureGenerator<B> {
    config: StructureConfig,
    validator: PlacementValidator,
    registry: StructureRegistry,
    builder: B,
}

impl<B> StructureGenerator<B> {
    /// Creates a generator.
    ///
    /// # Errors
    ///
    /// Returns the first constraint `config` violates.
    pub fn new(config: StructureConfig, builder: B) -> StructureResult<Self> {
        config.validate()?;
        let validator =
            PlacementValidator::new(config.grid(), config.allowed_biomes, config.viability_radius);
        Ok(Self {
            config,
            validator,
            registry: StructureRegistry::new(),
            builder,
        })
    }

    /// Creates a generator from the default config plus string options.
    ///
    /// # Errors
    ///
    /// Never for the default config; kept fallible alongside [`Self::new`].
    pub fn with_options(options: &HashMap<String, String>, builder: B) -> StructureResult<Self> {
        let mut config = StructureConfig::default();
        config.apply_options(options);
        Self::new(config, builder)
    }

    /// Name of the structure kind.
    #[must_use]
    pub const fn structure_name(&self) -> &'static str {
        VILLAGE
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &StructureConfig {
        &self.config
    }

    /// Starts discovered so far.
    #[must_use]
    pub const fn registry(&self) -> &StructureRegistry {
        &self.registry
    }

    /// The blueprint builder.
    #[must_use]
    pub const fn builder(&self) -> &B {
        &self.builder
    }

    /// The placement gate.
    #[must_use]
    pub const fn validator(&self) -> &PlacementValidator {
        &self.validator
    }

    /// Returns true if `cube` may host this structure.
    #[must_use]
    pub fn can_spawn_at<E: StructureEnvironment + ?Sized>(&self, env: &E, cube: CubePos) -> bool {
        self.validator.is_canonical_and_viable(env, cube)
    }

    /// Nearest structure to `from`, whether built yet or not.
    #[must_use]
    pub fn find_nearest<E: StructureEnvironment + ?Sized>(
        &self,
        env: &E,
        from: BlockPos,
        require_unmaterialized: bool,
    ) -> Option<NearestStructure> {
        let search = NearestSearch::new(
            CandidateSampler::new(*self.validator.grid(), self.config.search_sampling),
            self.validator,
            SearchParams {
                max_rings: self.config.max_search_rings,
                require_unmaterialized,
                give_up_fast_at_origin: self.config.give_up_fast_at_origin,
            },
        );
        let found = search.find_nearest(env, from);
        if let Some(nearest) = &found {
            tracing::debug!(
                x = nearest.position.x,
                z = nearest.position.z,
                ring = nearest.ring,
                "nearest {} found",
                VILLAGE
            );
        }
        found
    }

    /// Registers the start of `cube`'s cell if the gate accepts `cube`.
    ///
    /// On a flat grid the start is rooted in the column's surface layer,
    /// not in `cube`, so every layer of the canonical column registers the
    /// same start. Idempotent: a cell that already has a start returns it
    /// unchanged. Returns `None` if the gate rejects `cube`, the column has
    /// no surface or the builder cannot lay the structure out.
    pub fn discover<W>(&self, world: &W, cube: CubePos) -> Option<Discovery>
    where
        W: StructureEnvironment + ?Sized,
        B: StructureBuilder<W>,
    {
        if !self.can_spawn_at(world, cube) {
            return None;
        }
        let key = self.validator.grid().cell_of(cube);
        let origin = match self.validator.grid().vertical() {
            Some(_) => cube,
            None => CubePos::new(cube.x, world.surface_layer(cube.chunk_pos())?, cube.z),
        };
        let newly_registered = self.registry.get_or_insert_with(key, || {
            let seed = RegionSeed::for_layout(world.world_seed(), origin.chunk_pos());
            let layout = self.builder.lay_out(world, origin, seed, self.config.size)?;
            let start = origin.center_block();
            tracing::info!(x = start.x, y = start.y, z = start.z, "registered {} start", VILLAGE);
            Some(StructureStart::new(key, origin, layout))
        })?;
        Some(Discovery {
            key,
            newly_registered,
        })
    }

    /// Runs discovery over every chunk within `discovery_range` of `cube`,
    /// at `cube`'s height. Returns the number of starts newly registered.
    pub fn discover_around<W>(&self, world: &W, cube: CubePos) -> usize
    where
        W: StructureEnvironment + ?Sized,
        B: StructureBuilder<W>,
    {
        let range = self.config.discovery_range;
        let mut registered = 0;
        for x in cube.x - range..=cube.x + range {
            for z in cube.z - range..=cube.z + range {
                let found = self.discover(world, CubePos::new(x, cube.y, z));
                if found.is_some_and(|d| d.newly_registered) {
                    registered += 1;
                }
            }
        }
        registered
    }

    /// Builds every known start into the freshly materialised `cube`.
    ///
    /// Returns true if anything was built. A cube without a support
    /// surface is skipped. The registry stays locked for the whole
    /// scan-build-mark sequence, so concurrent calls never build the same
    /// start into the same cube twice.
    pub fn on_volume_materialized<W>(&self, world: &W, cube: CubePos) -> bool
    where
        W: StructureEnvironment + ?Sized,
        B: StructureBuilder<W>,
    {
        if !world.surface_exists(cube) {
            return false;
        }

        let area = cube.population_box();
        let mut starts = self.registry.lock();
        let mut generated = false;

        for start in starts.values_mut() {
            if !start.is_sizeable() || !start.is_valid_for_post_process(cube) {
                continue;
            }
            let Some(clip) = start.bounding_box().intersection(&area) else {
                continue;
            };
            self.builder.build(world, start, &clip);
            start.notify_post_process(cube);
            generated = true;
            tracing::debug!(
                cube_x = cube.x,
                cube_y = cube.y,
                cube_z = cube.z,
                "built {} section",
                VILLAGE
            );
        }

        generated
    }
}
