//! # Reference Terrain
//!
//! A deterministic, in-memory `StructureEnvironment`: enough terrain to
//! run the placement core end to end without an engine attached.
//!
//! - Value noise channels for elevation, temperature and humidity
//! - Biome classification from the three channels
//! - Surface height per column
//! - Materialised-cube bookkeeping
//!
//! ## Determinism Guarantee
//!
//! Every query is a pure function of the world seed and the coordinates,
//! except `is_materialized`, which reflects `mark_materialized` calls.

use std::collections::HashSet;

use parking_lot::RwLock;

use crate::biome::{Biome, BiomeSet};
use crate::coords::{BlockPos, ChunkPos, CubePos, CUBE_SHIFT};
use crate::environment::StructureEnvironment;
use crate::random::LegacyRandom;
use crate::seed::{RegionSeed, WorldSeed};

/// Sea level of the reference terrain.
pub const SEA_LEVEL: i32 = 64;
/// Highest surface the reference terrain produces.
pub const MAX_HEIGHT: i32 = 192;

/// Blocks between biome samples in the viability check.
const BIOME_SAMPLE_STEP: i32 = 4;

/// 2D value noise on an integer lattice.
///
/// Produces smooth values in the range [-1, 1].
#[derive(Clone, Copy, Debug)]
pub struct ValueNoise {
    seed: u64,
}

impl ValueNoise {
    /// Creates a noise channel from a seed.
    #[must_use]
    pub const fn new(seed: WorldSeed) -> Self {
        Self { seed: seed.value() }
    }

    /// Samples the noise at `(x, z)`.
    #[must_use]
    pub fn sample(&self, x: f64, z: f64) -> f64 {
        let x0 = fast_floor(x);
        let z0 = fast_floor(z);
        let tx = smoothstep(x - x0 as f64);
        let tz = smoothstep(z - z0 as f64);

        let a = self.lattice(x0, z0);
        let b = self.lattice(x0 + 1, z0);
        let c = self.lattice(x0, z0 + 1);
        let d = self.lattice(x0 + 1, z0 + 1);

        let top = a + (b - a) * tx;
        let bottom = c + (d - c) * tx;
        top + (bottom - top) * tz
    }

    /// Fractal sum of `octaves` layers, normalised back to roughly [-1, 1].
    #[must_use]
    pub fn octaved(&self, x: f64, z: f64, octaves: u32, persistence: f64, lacunarity: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_amplitude = 0.0;

        for _ in 0..octaves {
            total += self.sample(x * frequency, z * frequency) * amplitude;
            max_amplitude += amplitude;
            amplitude *= persistence;
            frequency *= lacunarity;
        }

        total / max_amplitude
    }

    #[allow(clippy::cast_precision_loss, clippy::cast_sign_loss)]
    fn lattice(&self, x: i64, z: i64) -> f64 {
        // SplitMix64 finaliser over the packed lattice point.
        let mut h = self.seed
            ^ (x as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ (z as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
        h = (h ^ (h >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        h = (h ^ (h >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        h ^= h >> 31;
        (h >> 11) as f64 / (1u64 << 53) as f64 * 2.0 - 1.0
    }
}

#[inline]
#[allow(clippy::cast_possible_truncation)]
fn fast_floor(x: f64) -> i64 {
    let xi = x as i64;
    if x < xi as f64 { xi - 1 } else { xi }
}

#[inline]
fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// Classifies columns into biomes from climate noise.
#[derive(Clone, Copy, Debug)]
pub struct BiomeClassifier {
    elevation: ValueNoise,
    temperature: ValueNoise,
    humidity: ValueNoise,
}

impl BiomeClassifier {
    const ELEVATION_SCALE: f64 = 0.0025;
    const TEMPERATURE_SCALE: f64 = 0.002;
    const HUMIDITY_SCALE: f64 = 0.003;

    /// Creates a classifier from a world seed.
    #[must_use]
    pub const fn new(seed: WorldSeed) -> Self {
        Self {
            elevation: ValueNoise::new(seed.derive(3)),
            temperature: ValueNoise::new(seed.derive(1)),
            humidity: ValueNoise::new(seed.derive(2)),
        }
    }

    /// Elevation in [-1, 1]; below -0.2 is water.
    #[must_use]
    pub fn elevation(&self, x: i32, z: i32) -> f64 {
        self.elevation.octaved(
            f64::from(x) * Self::ELEVATION_SCALE,
            f64::from(z) * Self::ELEVATION_SCALE,
            4,
            0.5,
            2.0,
        )
    }

    /// The biome of column `(x, z)`.
    #[must_use]
    pub fn classify(&self, x: i32, z: i32) -> Biome {
        let elevation = self.elevation(x, z);
        let temperature = (self.temperature.sample(
            f64::from(x) * Self::TEMPERATURE_SCALE,
            f64::from(z) * Self::TEMPERATURE_SCALE,
        ) - elevation.max(0.0) * 0.5)
            .clamp(-1.0, 1.0);
        let humidity = self.humidity.octaved(
            f64::from(x) * Self::HUMIDITY_SCALE,
            f64::from(z) * Self::HUMIDITY_SCALE,
            3,
            0.5,
            2.0,
        );
        classify_climate(elevation, temperature, humidity)
    }

    /// Y of the topmost solid block in column `(x, z)`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        let elevation = self.elevation(x, z);
        let span = if elevation < 0.0 {
            f64::from(SEA_LEVEL)
        } else {
            f64::from(MAX_HEIGHT - SEA_LEVEL)
        };
        (f64::from(SEA_LEVEL) + elevation * span).round() as i32
    }
}

fn classify_climate(elevation: f64, temperature: f64, humidity: f64) -> Biome {
    if elevation < -0.5 {
        return Biome::DeepOcean;
    }
    if elevation < -0.2 {
        return Biome::Ocean;
    }
    if elevation < -0.1 {
        return Biome::Beach;
    }
    if elevation > 0.7 {
        return if temperature < -0.2 { Biome::SnowyPeaks } else { Biome::Mountains };
    }

    match (temperature, humidity) {
        (t, _) if t < -0.5 => Biome::Tundra,
        (t, h) if t < -0.2 && h > 0.0 => Biome::Taiga,
        (t, _) if t < -0.2 => Biome::Tundra,
        (t, h) if t > 0.5 && h < -0.3 => Biome::Desert,
        (t, h) if t > 0.5 && h > 0.5 => Biome::Jungle,
        (t, h) if t > 0.3 && h < 0.0 => Biome::Savanna,
        (t, _) if t > 0.6 => Biome::Badlands,
        (_, h) if h > 0.5 && elevation < 0.1 => Biome::Swamp,
        (_, h) if h > 0.2 => Biome::Forest,
        _ => Biome::Plains,
    }
}

/// In-memory world implementing every environment query.
#[derive(Debug)]
pub struct TerrainWorld {
    seed: WorldSeed,
    classifier: BiomeClassifier,
    materialized: RwLock<HashSet<CubePos>>,
    columns: RwLock<HashSet<ChunkPos>>,
}

impl TerrainWorld {
    /// Creates an empty world.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            seed,
            classifier: BiomeClassifier::new(seed),
            materialized: RwLock::new(HashSet::new()),
            columns: RwLock::new(HashSet::new()),
        }
    }

    /// The biome classifier.
    #[must_use]
    pub const fn classifier(&self) -> &BiomeClassifier {
        &self.classifier
    }

    /// Records that `cube` has been generated.
    ///
    /// Returns false if it already was.
    pub fn mark_materialized(&self, cube: CubePos) -> bool {
        self.columns.write().insert(cube.chunk_pos());
        self.materialized.write().insert(cube)
    }

    /// Returns true if `cube` itself has been generated.
    #[must_use]
    pub fn is_cube_materialized(&self, cube: CubePos) -> bool {
        self.materialized.read().contains(&cube)
    }

    /// Number of generated cubes.
    #[must_use]
    pub fn materialized_count(&self) -> usize {
        self.materialized.read().len()
    }
}

impl StructureEnvironment for TerrainWorld {
    type Stream = LegacyRandom;

    fn world_seed(&self) -> WorldSeed {
        self.seed
    }

    fn rng_stream(&self, seed: RegionSeed) -> LegacyRandom {
        LegacyRandom::from_region(seed)
    }

    fn is_viable(&self, center: BlockPos, radius: i32, biomes: BiomeSet) -> bool {
        let radius = radius.max(0);
        let mut x = center.x - radius;
        while x <= center.x + radius {
            let mut z = center.z - radius;
            while z <= center.z + radius {
                if !biomes.contains(self.classifier.classify(x, z)) {
                    return false;
                }
                z += BIOME_SAMPLE_STEP;
            }
            x += BIOME_SAMPLE_STEP;
        }
        true
    }

    fn is_materialized(&self, chunk: ChunkPos) -> bool {
        self.columns.read().contains(&chunk)
    }

    fn surface_exists(&self, cube: CubePos) -> bool {
        self.surface_layer(cube.chunk_pos()) == Some(cube.y)
    }

    fn surface_layer(&self, chunk: ChunkPos) -> Option<i32> {
        let center = chunk.center_block(0);
        Some(self.classifier.surface_height(center.x, center.z) >> CUBE_SHIFT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_determinism_and_range() {
        let a = ValueNoise::new(WorldSeed::new(42));
        let b = ValueNoise::new(WorldSeed::new(42));
        for i in 0..2000 {
            let x = f64::from(i) * 0.37 - 300.0;
            let z = f64::from(i) * 0.11 + 40.0;
            let v = a.sample(x, z);
            assert_eq!(v, b.sample(x, z));
            assert!((-1.0..=1.0).contains(&v), "value {v} out of range");
        }
    }

    #[test]
    fn test_noise_continuity() {
        let noise = ValueNoise::new(WorldSeed::new(7));
        let v1 = noise.sample(10.5, -3.25);
        let v2 = noise.sample(10.501, -3.25);
        assert!((v1 - v2).abs() < 0.01);
    }

    #[test]
    fn test_fast_floor() {
        assert_eq!(fast_floor(1.5), 1);
        assert_eq!(fast_floor(-0.5), -1);
        assert_eq!(fast_floor(-2.0), -2);
    }

    #[test]
    fn test_climate_classification() {
        assert_eq!(classify_climate(-0.8, 0.0, 0.0), Biome::DeepOcean);
        assert_eq!(classify_climate(0.9, -0.5, 0.0), Biome::SnowyPeaks);
        assert_eq!(classify_climate(0.2, 0.7, -0.5), Biome::Desert);
        assert_eq!(classify_climate(0.2, 0.0, 0.0), Biome::Plains);
    }

    #[test]
    fn test_world_has_village_land() {
        let world = TerrainWorld::new(WorldSeed::new(12345));
        let mut viable = 0;
        for x in (-4000..4000).step_by(64) {
            for z in (-4000..4000).step_by(64) {
                if world.is_viable(BlockPos::new(x, 64, z), 0, BiomeSet::VILLAGE) {
                    viable += 1;
                }
            }
        }
        assert!(viable > 0, "no village biome found in a 8000-block square");
    }

    #[test]
    fn test_surface_exists_in_exactly_one_cube() {
        let world = TerrainWorld::new(WorldSeed::new(3));
        for cx in -5..5 {
            for cz in -5..5 {
                let hits = (-8..16)
                    .filter(|&cy| world.surface_exists(CubePos::new(cx, cy, cz)))
                    .count();
                assert_eq!(hits, 1, "column ({cx}, {cz})");
                let layer = world.surface_layer(ChunkPos::new(cx, cz));
                assert!(layer.is_some_and(|y| world.surface_exists(CubePos::new(cx, y, cz))));
            }
        }
    }

    #[test]
    fn test_materialization_bookkeeping() {
        let world = TerrainWorld::new(WorldSeed::new(3));
        let cube = CubePos::new(2, 4, -7);
        assert!(!world.is_materialized(cube.chunk_pos()));
        assert!(world.mark_materialized(cube));
        assert!(!world.mark_materialized(cube));
        assert!(world.is_materialized(cube.chunk_pos()));
        assert!(world.is_cube_materialized(cube));
        assert!(!world.is_cube_materialized(CubePos::new(2, 5, -7)));
        assert_eq!(world.materialized_count(), 1);
    }
}
