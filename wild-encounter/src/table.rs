//! Encounter tables and per-map wild headers.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::slots::{FISHING_SLOT_COUNT, HONEY_SLOT_COUNT, LAND_SLOT_COUNT, WATER_ROCK_SLOT_COUNT};
use crate::species::SpeciesId;

/// Map identifier as a (group, number) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MapId {
    pub group: u8,
    pub num: u8,
}

impl MapId {
    #[must_use]
    pub const fn new(group: u8, num: u8) -> Self {
        Self { group, num }
    }
}

/// Which table of a header an encounter reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Land,
    Water,
    RockSmash,
    Fishing,
    Honey,
}

impl TableKind {
    #[must_use]
    pub const fn slot_count(self) -> usize {
        match self {
            Self::Land => LAND_SLOT_COUNT,
            Self::Water | Self::RockSmash => WATER_ROCK_SLOT_COUNT,
            Self::Fishing => FISHING_SLOT_COUNT,
            Self::Honey => HONEY_SLOT_COUNT,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Land => "land",
            Self::Water => "water",
            Self::RockSmash => "rock_smash",
            Self::Fishing => "fishing",
            Self::Honey => "honey",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("{kind} table needs {expected} slots (got {found})")]
    SlotCount {
        kind: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("{kind} slot {slot} has min level {min} above max level {max}")]
    LevelRange {
        kind: &'static str,
        slot: usize,
        min: u8,
        max: u8,
    },
    #[error("wild header data is invalid JSON: {0}")]
    Json(String),
}

/// One encounter slot. The level range is table data; wild levels are scaled from the party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WildSlot {
    pub species: SpeciesId,
    pub min_level: u8,
    pub max_level: u8,
}

impl WildSlot {
    #[must_use]
    pub const fn new(species: SpeciesId, min_level: u8, max_level: u8) -> Self {
        Self {
            species,
            min_level,
            max_level,
        }
    }
}

/// Immutable slot list plus its base encounter rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterTable {
    pub encounter_rate: u8,
    slots: Vec<WildSlot>,
}

impl EncounterTable {
    /// Build a table, checking the slot count for its kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot count does not match `kind` or a slot's level range is inverted.
    pub fn new(kind: TableKind, encounter_rate: u8, slots: Vec<WildSlot>) -> Result<Self, TableError> {
        let table = Self {
            encounter_rate,
            slots,
        };
        table.validate(kind)?;
        Ok(table)
    }

    fn validate(&self, kind: TableKind) -> Result<(), TableError> {
        if self.slots.len() != kind.slot_count() {
            return Err(TableError::SlotCount {
                kind: kind.label(),
                expected: kind.slot_count(),
                found: self.slots.len(),
            });
        }
        if let Some((slot, bad)) = self
            .slots
            .iter()
            .enumerate()
            .find(|(_, slot)| slot.min_level > slot.max_level)
        {
            return Err(TableError::LevelRange {
                kind: kind.label(),
                slot,
                min: bad.min_level,
                max: bad.max_level,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn slots(&self) -> &[WildSlot] {
        &self.slots
    }

    #[must_use]
    pub fn slot(&self, index: usize) -> Option<&WildSlot> {
        self.slots.get(index)
    }

    #[must_use]
    pub fn species_at(&self, index: usize) -> Option<SpeciesId> {
        self.slot(index).map(|slot| slot.species)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// All wild tables for a single map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WildHeader {
    pub map: MapId,
    #[serde(default)]
    pub land: Option<EncounterTable>,
    #[serde(default)]
    pub water: Option<EncounterTable>,
    #[serde(default)]
    pub rock_smash: Option<EncounterTable>,
    #[serde(default)]
    pub fishing: Option<EncounterTable>,
    #[serde(default)]
    pub honey: Option<EncounterTable>,
}

impl WildHeader {
    #[must_use]
    pub const fn empty(map: MapId) -> Self {
        Self {
            map,
            land: None,
            water: None,
            rock_smash: None,
            fishing: None,
            honey: None,
        }
    }

    #[must_use]
    pub const fn table(&self, kind: TableKind) -> Option<&EncounterTable> {
        match kind {
            TableKind::Land => self.land.as_ref(),
            TableKind::Water => self.water.as_ref(),
            TableKind::RockSmash => self.rock_smash.as_ref(),
            TableKind::Fishing => self.fishing.as_ref(),
            TableKind::Honey => self.honey.as_ref(),
        }
    }

    fn validate(&self) -> Result<(), TableError> {
        for kind in [
            TableKind::Land,
            TableKind::Water,
            TableKind::RockSmash,
            TableKind::Fishing,
            TableKind::Honey,
        ] {
            if let Some(table) = self.table(kind) {
                table.validate(kind)?;
            }
        }
        Ok(())
    }
}

/// Ordered header list for every map with wild creatures.
///
/// Order matters: a map with alternate sets stores them as consecutive headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WildHeaderSet {
    #[serde(default)]
    pub headers: Vec<WildHeader>,
    /// Headers indexed by berry-tree id.
    #[serde(default)]
    pub berry_trees: Vec<WildHeader>,
}

impl WildHeaderSet {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load and validate wild headers from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or any table has the wrong shape.
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        let set: Self = serde_json::from_str(json).map_err(|e| TableError::Json(e.to_string()))?;
        set.validate()?;
        Ok(set)
    }

    /// Validate every table in the set.
    ///
    /// # Errors
    ///
    /// Returns the first table shape error found.
    pub fn validate(&self) -> Result<(), TableError> {
        self.headers
            .iter()
            .chain(self.berry_trees.iter())
            .try_for_each(WildHeader::validate)
    }

    /// Index of the first header for `map`.
    #[must_use]
    pub fn position(&self, map: MapId) -> Option<usize> {
        self.headers.iter().position(|header| header.map == map)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&WildHeader> {
        self.headers.get(index)
    }

    #[must_use]
    pub fn berry_tree(&self, index: usize) -> Option<&WildHeader> {
        self.berry_trees.get(index)
    }
}
