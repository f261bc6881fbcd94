//! # Structure Configuration
//!
//! Spacing, search and biome settings for one structure kind.
//!
//! Two ways in:
//!
//! - `from_toml`/`load`: a full document, validated, errors propagated
//! - `apply_options`: the string-keyed option map generator presets carry;
//!   bad values are dropped with a warning and the previous value kept
//!
//! ```toml
//! distance = 24
//! size = 1
//! allowed_biomes = ["plains", "savanna"]
//! search_sampling = "averaged"
//!
//! [vertical]
//! distance = 4
//! step_offset = 1
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::biome::BiomeSet;
use crate::error::{StructureError, StructureResult};
use crate::grid::{RegionGrid, Spacing};
use crate::sampler::SamplingMode;

/// Default cell edge length in chunks.
pub const DEFAULT_DISTANCE: i32 = 32;
/// Smallest accepted cell edge length.
pub const MIN_DISTANCE: i32 = 9;
/// Default minimum separation strip at the far edge of each cell.
pub const DEFAULT_STEP_OFFSET: i32 = 8;
/// Salt of the village structure kind.
pub const VILLAGE_SALT: i32 = 10_387_312;
/// Default search radius in cells.
pub const DEFAULT_SEARCH_RINGS: u32 = 100;
/// Default discovery sweep radius in chunks.
pub const DEFAULT_DISCOVERY_RANGE: i32 = 8;

/// Settings of one structure kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StructureConfig {
    /// Cell edge length in chunks (>= 9).
    pub distance: i32,
    /// Footprint size hint passed to the layout generator (>= 0).
    pub size: i32,
    /// Chunks at the far edge of each cell that never host a candidate.
    pub step_offset: i32,
    /// Decorrelates this kind from others sharing the world seed.
    pub salt: i32,
    /// Search radius in cells.
    pub max_search_rings: u32,
    /// Candidate sampling used by the nearest-structure search.
    pub search_sampling: SamplingMode,
    /// End the search's ring 0 on its first failed check.
    pub give_up_fast_at_origin: bool,
    /// Biomes the structure may spawn in.
    pub allowed_biomes: BiomeSet,
    /// Radius in blocks around the candidate that must be allowed biomes.
    pub viability_radius: i32,
    /// Vertical spacing; `None` places structures on a 2D grid.
    pub vertical: Option<Spacing>,
    /// Radius in chunks of the discovery sweep around a generated cube.
    pub discovery_range: i32,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            distance: DEFAULT_DISTANCE,
            size: 0,
            step_offset: DEFAULT_STEP_OFFSET,
            salt: VILLAGE_SALT,
            max_search_rings: DEFAULT_SEARCH_RINGS,
            search_sampling: SamplingMode::Single,
            give_up_fast_at_origin: true,
            allowed_biomes: BiomeSet::VILLAGE,
            viability_radius: 0,
            vertical: None,
            discovery_range: DEFAULT_DISCOVERY_RANGE,
        }
    }
}

impl StructureConfig {
    /// Parses and validates a TOML document. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for malformed TOML and the `validate` errors
    /// for out-of-range values.
    pub fn from_toml(text: &str) -> StructureResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| StructureError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigRead` if the file cannot be read, otherwise as
    /// [`StructureConfig::from_toml`].
    pub fn load(path: impl AsRef<Path>) -> StructureResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| StructureError::ConfigRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&text)
    }

    /// Applies string-keyed options (`distance`, `size`).
    ///
    /// Values that are not integers, or are below the option's minimum, are
    /// ignored and the previous value kept. Unknown keys are ignored.
    pub fn apply_options(&mut self, options: &HashMap<String, String>) {
        for (key, raw) in options {
            match key.as_str() {
                "distance" => {
                    self.distance = parse_at_least("distance", raw, self.distance, MIN_DISTANCE);
                }
                "size" => {
                    self.size = parse_at_least("size", raw, self.size, 0);
                }
                other => {
                    tracing::debug!(option = other, "ignoring unknown structure option");
                }
            }
        }
    }

    /// Checks every invariant placement relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> StructureResult<()> {
        at_least("distance", self.distance, MIN_DISTANCE)?;
        at_least("size", self.size, 0)?;
        at_least("step_offset", self.step_offset, 0)?;
        at_least("viability_radius", self.viability_radius, 0)?;
        at_least("discovery_range", self.discovery_range, 0)?;
        check_spacing(self.horizontal_spacing())?;
        if let Some(vertical) = self.vertical {
            at_least("vertical.step_offset", vertical.step_offset, 0)?;
            check_spacing(vertical)?;
        }
        Ok(())
    }

    /// Horizontal spacing.
    #[must_use]
    pub const fn horizontal_spacing(&self) -> Spacing {
        Spacing::new(self.distance, self.step_offset)
    }

    /// The spacing grid these settings describe.
    #[must_use]
    pub const fn grid(&self) -> RegionGrid {
        RegionGrid::new(self.horizontal_spacing(), self.vertical, self.salt)
    }
}

fn parse_at_least(option: &str, raw: &str, current: i32, minimum: i32) -> i32 {
    match raw.parse::<i32>() {
        Ok(value) if value >= minimum => value,
        Ok(value) => {
            tracing::warn!(option, value, minimum, current, "option below minimum; keeping previous value");
            current
        }
        Err(e) => {
            tracing::warn!(option, raw, error = %e, current, "option is not an integer; keeping previous value");
            current
        }
    }
}

fn at_least(option: &'static str, value: i32, minimum: i32) -> StructureResult<()> {
    if value < minimum {
        return Err(StructureError::BelowMinimum {
            option,
            value: i64::from(value),
            minimum: i64::from(minimum),
        });
    }
    Ok(())
}

fn check_spacing(spacing: Spacing) -> StructureResult<()> {
    if spacing.distance <= spacing.step_offset {
        return Err(StructureError::InvalidSpacing {
            distance: spacing.distance,
            step_offset: spacing.step_offset,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::Biome;

    fn options(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = StructureConfig::default();
        assert_eq!(config.distance, 32);
        assert_eq!(config.step_offset, 8);
        assert_eq!(config.salt, 10_387_312);
        assert_eq!(config.max_search_rings, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_distance_at_minimum_accepted() {
        let mut config = StructureConfig::default();
        config.apply_options(&options(&[("distance", "9")]));
        assert_eq!(config.distance, 9);
    }

    #[test]
    fn test_distance_below_minimum_keeps_previous() {
        let mut config = StructureConfig::default();
        config.apply_options(&options(&[("distance", "3")]));
        assert_eq!(config.distance, 32);
    }

    #[test]
    fn test_non_integer_keeps_previous() {
        let mut config = StructureConfig::default();
        config.apply_options(&options(&[("distance", "far"), ("size", "2.5")]));
        assert_eq!(config.distance, 32);
        assert_eq!(config.size, 0);

        config.apply_options(&options(&[("size", "3"), ("flavour", "vanilla")]));
        assert_eq!(config.size, 3);
        config.apply_options(&options(&[("size", "-1")]));
        assert_eq!(config.size, 3);
    }

    #[test]
    fn test_from_toml() {
        let config = StructureConfig::from_toml(
            r#"
            distance = 24
            size = 1
            allowed_biomes = ["plains", "savanna"]
            search_sampling = "averaged"

            [vertical]
            distance = 4
            step_offset = 1
            "#,
        );
        let config = config.unwrap_or_default();
        assert_eq!(config.distance, 24);
        assert_eq!(config.size, 1);
        assert_eq!(config.step_offset, 8);
        assert_eq!(config.search_sampling, SamplingMode::Averaged);
        assert_eq!(config.vertical, Some(Spacing::new(4, 1)));
        assert!(config.allowed_biomes.contains(Biome::Savanna));
        assert!(!config.allowed_biomes.contains(Biome::Desert));
    }

    #[test]
    fn test_from_toml_rejects_bad_input() {
        assert!(matches!(
            StructureConfig::from_toml("distance = \"far\""),
            Err(StructureError::InvalidConfig(_))
        ));
        assert!(matches!(
            StructureConfig::from_toml("spacing = 3"),
            Err(StructureError::InvalidConfig(_))
        ));
        assert_eq!(
            StructureConfig::from_toml("distance = 3"),
            Err(StructureError::BelowMinimum {
                option: "distance",
                value: 3,
                minimum: 9
            })
        );
    }

    #[test]
    fn test_validate_rejects_degenerate_spacing() {
        let config = StructureConfig {
            distance: 10,
            step_offset: 10,
            ..StructureConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(StructureError::InvalidSpacing {
                distance: 10,
                step_offset: 10
            })
        );

        let config = StructureConfig {
            vertical: Some(Spacing::new(2, 3)),
            ..StructureConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(StructureError::InvalidSpacing { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = StructureConfig::load("/nonexistent/oroboros/structures.toml");
        assert!(matches!(result, Err(StructureError::ConfigRead { .. })));
    }
}
