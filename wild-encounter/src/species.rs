//! Species, nature, ability, and item identifiers plus the species catalog seam.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Opaque species identifier owned by the content data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeciesId(pub u16);

/// Opaque move identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct MoveId(pub u16);

/// Elemental types as used for type-sharing and ability-influenced slot picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    Normal,
    Fighting,
    Flying,
    Poison,
    Ground,
    Rock,
    Bug,
    Ghost,
    Steel,
    Mystery,
    Fire,
    Water,
    Grass,
    Electric,
    Psychic,
    Ice,
    Dragon,
    Dark,
    Fairy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Genderless,
}

/// Gender distribution of a species.
///
/// `Mixed` carries the personality threshold: a personality whose low byte is
/// below the threshold is female.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenderRatio {
    MaleOnly,
    FemaleOnly,
    Genderless,
    Mixed(u8),
}

impl GenderRatio {
    /// Whether a freshly generated creature of this species can have more than one gender.
    #[must_use]
    pub const fn has_gender_choice(self) -> bool {
        matches!(self, Self::Mixed(_))
    }

    #[must_use]
    pub const fn gender_for_personality(self, personality: u32) -> Gender {
        match self {
            Self::MaleOnly => Gender::Male,
            Self::FemaleOnly => Gender::Female,
            Self::Genderless => Gender::Genderless,
            Self::Mixed(threshold) => {
                if ((personality & 0xFF) as u8) < threshold {
                    Gender::Female
                } else {
                    Gender::Male
                }
            }
        }
    }
}

/// Flavors in block order: spicy, dry, sweet, bitter, sour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flavor {
    Spicy,
    Dry,
    Sweet,
    Bitter,
    Sour,
}

pub const FLAVOR_COUNT: usize = 5;

/// The 25 natures in canonical index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Nature {
    Hardy,
    Lonely,
    Brave,
    Adamant,
    Naughty,
    Bold,
    Docile,
    Relaxed,
    Impish,
    Lax,
    Timid,
    Hasty,
    Serious,
    Jolly,
    Naive,
    Modest,
    Mild,
    Quiet,
    Bashful,
    Rash,
    Calm,
    Gentle,
    Sassy,
    Careful,
    Quirky,
}

pub const NATURE_COUNT: usize = 25;

// Stat order behind the nature grid: attack, defense, speed, sp. attack, sp. defense.
const STAT_FLAVORS: [Flavor; 5] = [
    Flavor::Spicy,
    Flavor::Sour,
    Flavor::Sweet,
    Flavor::Dry,
    Flavor::Bitter,
];

impl Nature {
    pub const ALL: [Self; NATURE_COUNT] = [
        Self::Hardy,
        Self::Lonely,
        Self::Brave,
        Self::Adamant,
        Self::Naughty,
        Self::Bold,
        Self::Docile,
        Self::Relaxed,
        Self::Impish,
        Self::Lax,
        Self::Timid,
        Self::Hasty,
        Self::Serious,
        Self::Jolly,
        Self::Naive,
        Self::Modest,
        Self::Mild,
        Self::Quiet,
        Self::Bashful,
        Self::Rash,
        Self::Calm,
        Self::Gentle,
        Self::Sassy,
        Self::Careful,
        Self::Quirky,
    ];

    /// Nature for a canonical index; indices wrap modulo 25.
    #[must_use]
    pub const fn from_index(index: u32) -> Self {
        Self::ALL[(index as usize) % NATURE_COUNT]
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Flavor this nature likes, `None` for neutral natures.
    #[must_use]
    pub const fn liked_flavor(self) -> Option<Flavor> {
        let raised = self.index() / 5;
        let lowered = self.index() % 5;
        if raised == lowered {
            None
        } else {
            Some(STAT_FLAVORS[raised])
        }
    }

    /// Flavor this nature dislikes, `None` for neutral natures.
    #[must_use]
    pub const fn disliked_flavor(self) -> Option<Flavor> {
        let raised = self.index() / 5;
        let lowered = self.index() % 5;
        if raised == lowered {
            None
        } else {
            Some(STAT_FLAVORS[lowered])
        }
    }
}

/// Abilities the encounter pipeline reacts to. Everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    // level scaling
    Hustle,
    VitalSpirit,
    Pressure,
    // nature and gender
    Synchronize,
    CuteCharm,
    // encounter rate
    Stench,
    Illuminate,
    WhiteSmoke,
    ArenaTrap,
    SandVeil,
    SnowCloak,
    QuickFeet,
    Infiltrator,
    NoGuard,
    // encounter filters
    KeenEye,
    Intimidate,
    // slot steering
    MagnetPull,
    Static,
    LightningRod,
    FlashFire,
    Harvest,
    StormDrain,
    Other(u16),
}

impl Ability {
    /// Abilities that push wild levels toward the top of the range.
    #[must_use]
    pub const fn raises_wild_level(self) -> bool {
        matches!(self, Self::Hustle | Self::VitalSpirit | Self::Pressure)
    }

    /// Abilities that may scare off much weaker wild creatures.
    #[must_use]
    pub const fn repels_weaker_wilds(self) -> bool {
        matches!(self, Self::KeenEye | Self::Intimidate)
    }
}

/// Held items relevant to encounters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeldItem {
    CleanseTag,
    Other(u16),
}

/// Static per-species data consumed by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesInfo {
    pub base_stat_total: u16,
    pub types: [ElementType; 2],
    pub gender_ratio: GenderRatio,
}

impl SpeciesInfo {
    #[must_use]
    pub fn has_type(&self, element: ElementType) -> bool {
        self.types.contains(&element)
    }

    #[must_use]
    pub fn shares_type_with(&self, other: &Self) -> bool {
        self.types.iter().any(|element| other.has_type(*element))
    }
}

/// Read-only species lookup supplied by the content layer.
pub trait SpeciesCatalog {
    fn species_info(&self, species: SpeciesId) -> Option<SpeciesInfo>;

    /// Resolve a content name such as `"FEEBAS"` to an identifier.
    fn species_named(&self, name: &str) -> Option<SpeciesId>;

    fn base_stat_total(&self, species: SpeciesId) -> Option<u16> {
        self.species_info(species).map(|info| info.base_stat_total)
    }

    fn gender_of(&self, species: SpeciesId, personality: u32) -> Gender {
        self.species_info(species).map_or(Gender::Genderless, |info| {
            info.gender_ratio.gender_for_personality(personality)
        })
    }
}

/// One row of a serialized species table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesEntry {
    pub id: SpeciesId,
    pub name: String,
    #[serde(flatten)]
    pub info: SpeciesInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SpeciesTableFile {
    species: Vec<SpeciesEntry>,
}

/// In-memory species catalog, loadable from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeciesTable {
    info: HashMap<SpeciesId, SpeciesInfo>,
    names: HashMap<String, SpeciesId>,
}

impl SpeciesTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a species table from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let file: SpeciesTableFile = serde_json::from_str(json)?;
        Ok(Self::from_entries(file.species))
    }

    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = SpeciesEntry>) -> Self {
        let mut table = Self::new();
        for entry in entries {
            table.insert(entry.id, &entry.name, entry.info);
        }
        table
    }

    pub fn insert(&mut self, id: SpeciesId, name: &str, info: SpeciesInfo) {
        self.info.insert(id, info);
        self.names.insert(name.to_ascii_uppercase(), id);
    }

    /// Canonical (upper-case) name registered for `species`.
    #[must_use]
    pub fn name_of(&self, species: SpeciesId) -> Option<&str> {
        self.names
            .iter()
            .find(|(_, id)| **id == species)
            .map(|(name, _)| name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.info.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.info.is_empty()
    }
}

impl SpeciesCatalog for SpeciesTable {
    fn species_info(&self, species: SpeciesId) -> Option<SpeciesInfo> {
        self.info.get(&species).copied()
    }

    fn species_named(&self, name: &str) -> Option<SpeciesId> {
        self.names.get(&name.to_ascii_uppercase()).copied()
    }
}
