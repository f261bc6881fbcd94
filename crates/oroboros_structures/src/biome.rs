//! # Biomes
//!
//! Structure kinds only spawn where every sampled column belongs to an
//! allowed biome. `BiomeSet` is a `Copy` bit set so the gate can carry it
//! around without allocating.

use serde::{Deserialize, Serialize};

/// Biome types in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Biome {
    /// Deep ocean
    DeepOcean = 0,
    /// Shallow ocean
    Ocean = 1,
    /// Beach/coastline
    Beach = 2,
    /// Plains/grassland
    Plains = 3,
    /// Forest
    Forest = 4,
    /// Dense jungle
    Jungle = 5,
    /// Arid desert
    Desert = 6,
    /// Cold tundra
    Tundra = 7,
    /// Snowy taiga forest
    Taiga = 8,
    /// High mountains
    Mountains = 9,
    /// Snowy peaks
    SnowyPeaks = 10,
    /// Swamp/wetland
    Swamp = 11,
    /// Savanna grassland
    Savanna = 12,
    /// Badlands
    Badlands = 13,
}

impl Biome {
    /// Every biome, in discriminant order.
    pub const ALL: [Self; 14] = [
        Self::DeepOcean,
        Self::Ocean,
        Self::Beach,
        Self::Plains,
        Self::Forest,
        Self::Jungle,
        Self::Desert,
        Self::Tundra,
        Self::Taiga,
        Self::Mountains,
        Self::SnowyPeaks,
        Self::Swamp,
        Self::Savanna,
        Self::Badlands,
    ];

    /// Returns whether this biome is water.
    #[must_use]
    pub const fn is_water(self) -> bool {
        matches!(self, Self::DeepOcean | Self::Ocean)
    }

    #[inline]
    const fn bit(self) -> u16 {
        1 << self as u8
    }
}

/// A set of biomes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Biome>", into = "Vec<Biome>")]
pub struct BiomeSet(u16);

impl BiomeSet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Biomes villages may spawn in.
    pub const VILLAGE: Self = Self::EMPTY
        .with(Biome::Plains)
        .with(Biome::Desert)
        .with(Biome::Savanna)
        .with(Biome::Taiga);

    /// Returns a copy of the set with `biome` added.
    #[inline]
    #[must_use]
    pub const fn with(self, biome: Biome) -> Self {
        Self(self.0 | biome.bit())
    }

    /// Returns true if `biome` is in the set.
    #[inline]
    #[must_use]
    pub const fn contains(self, biome: Biome) -> bool {
        self.0 & biome.bit() != 0
    }

    /// Returns true if the set holds no biomes.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates the members in discriminant order.
    pub fn iter(self) -> impl Iterator<Item = Biome> {
        Biome::ALL.into_iter().filter(move |&b| self.contains(b))
    }
}

impl FromIterator<Biome> for BiomeSet {
    fn from_iter<I: IntoIterator<Item = Biome>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

impl From<Vec<Biome>> for BiomeSet {
    fn from(biomes: Vec<Biome>) -> Self {
        biomes.into_iter().collect()
    }
}

impl From<BiomeSet> for Vec<Biome> {
    fn from(set: BiomeSet) -> Self {
        set.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_village_biomes() {
        let set = BiomeSet::VILLAGE;
        assert!(set.contains(Biome::Plains));
        assert!(set.contains(Biome::Desert));
        assert!(set.contains(Biome::Savanna));
        assert!(set.contains(Biome::Taiga));
        assert!(!set.contains(Biome::Ocean));
        assert!(!set.contains(Biome::Badlands));
        assert_eq!(set.iter().count(), 4);
    }

    #[test]
    fn test_collect_and_convert() {
        let set: BiomeSet = [Biome::Swamp, Biome::Beach, Biome::Swamp].into_iter().collect();
        let list: Vec<Biome> = set.into();
        assert_eq!(list, vec![Biome::Beach, Biome::Swamp]);
        assert!(BiomeSet::EMPTY.is_empty());
    }

    #[test]
    fn test_water() {
        assert!(Biome::DeepOcean.is_water());
        assert!(!Biome::Beach.is_water());
    }
}
