//! Encounter tunables loaded from JSON and resolved against the species catalog.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::creature::SpecialForm;
use crate::rebalance::{RebalanceMode, RebalanceRoster, RebalanceSettings};
use crate::species::{SpeciesCatalog, SpeciesId};
use crate::table::MapId;

/// Errors raised when encounter configuration invariants are violated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("encounter config is invalid JSON: {0}")]
    Json(String),
    #[error("{field} must be at most {max} (got {value})")]
    AboveMax {
        field: &'static str,
        max: u32,
        value: u32,
    },
    #[error("{field} must be at least {min} (got {value})")]
    BelowMin {
        field: &'static str,
        min: u32,
        value: u32,
    },
    #[error("species {0:?} is not in the catalog")]
    UnknownSpecies(String),
    #[error("fishing window needs at least one row")]
    EmptyFishingRows,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebalanceConfig {
    #[serde(default)]
    pub mode: RebalanceMode,
    #[serde(default = "RebalanceConfig::default_step")]
    pub step: u16,
    #[serde(default = "RebalanceConfig::default_base_ceiling")]
    pub base_ceiling: u16,
    #[serde(default = "RebalanceConfig::default_clear_bonus")]
    pub clear_bonus: u16,
    #[serde(default = "RebalanceConfig::default_underflow_floor")]
    pub underflow_floor: u16,
    /// Replacement roster by species name; `None` uses the shipped roster.
    #[serde(default)]
    pub roster: Option<Vec<String>>,
}

impl RebalanceConfig {
    const fn default_step() -> u16 {
        25
    }

    const fn default_base_ceiling() -> u16 {
        400
    }

    const fn default_clear_bonus() -> u16 {
        5000
    }

    const fn default_underflow_floor() -> u16 {
        6
    }
}

impl Default for RebalanceConfig {
    fn default() -> Self {
        Self {
            mode: RebalanceMode::default(),
            step: Self::default_step(),
            base_ceiling: Self::default_base_ceiling(),
            clear_bonus: Self::default_clear_bonus(),
            underflow_floor: Self::default_underflow_floor(),
            roster: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialFormConfig {
    pub base: String,
    pub forms: [String; 6],
}

/// Tiles where fishing always hooks one rare species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FishingWindowConfig {
    pub map: MapId,
    /// Subtracted from the raw map coordinate before matching rows.
    pub offset: i16,
    pub rows: Vec<i16>,
    pub species: String,
}

/// Map whose wild header rotates through consecutive alternate sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternateSetConfig {
    pub map: MapId,
    /// Variable values above this fall back to set zero.
    pub max: u16,
}

/// Serialized encounter configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterConfig {
    #[serde(default = "EncounterConfig::default_badge_count")]
    pub badge_count: u8,
    #[serde(default = "EncounterConfig::default_step_gate_percent")]
    pub step_gate_percent: u8,
    #[serde(default = "EncounterConfig::default_double_battle_chance")]
    pub double_battle_chance: u8,
    #[serde(default)]
    pub rebalance: RebalanceConfig,
    #[serde(default)]
    pub special_form: Option<SpecialFormConfig>,
    #[serde(default)]
    pub fishing_window: Option<FishingWindowConfig>,
    /// Water encounters stop here while the legendary event runs.
    #[serde(default)]
    pub legendary_block_map: Option<MapId>,
    #[serde(default)]
    pub alternate_set: Option<AlternateSetConfig>,
}

impl EncounterConfig {
    const fn default_badge_count() -> u8 {
        8
    }

    const fn default_step_gate_percent() -> u8 {
        60
    }

    const fn default_double_battle_chance() -> u8 {
        10
    }

    /// Load encounter configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or validation fails.
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json_str).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check numeric ranges.
    ///
    /// # Errors
    ///
    /// Returns the first violated range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value, max) in [
            ("badge_count", self.badge_count, 8),
            ("step_gate_percent", self.step_gate_percent, 100),
            ("double_battle_chance", self.double_battle_chance, 101),
        ] {
            if value > max {
                return Err(ConfigError::AboveMax {
                    field,
                    max: u32::from(max),
                    value: u32::from(value),
                });
            }
        }
        if self.rebalance.step == 0 {
            return Err(ConfigError::BelowMin {
                field: "rebalance.step",
                min: 1,
                value: 0,
            });
        }
        if self
            .fishing_window
            .as_ref()
            .is_some_and(|window| window.rows.is_empty())
        {
            return Err(ConfigError::EmptyFishingRows);
        }
        Ok(())
    }

    /// Embedded default configuration.
    #[must_use]
    pub fn default_config() -> Self {
        serde_json::from_str(include_str!("../assets/encounter_config.json")).unwrap_or_else(|err| {
            log::warn!("embedded encounter config unreadable ({err}); using coded defaults");
            Self::coded_defaults()
        })
    }

    fn coded_defaults() -> Self {
        Self {
            badge_count: Self::default_badge_count(),
            step_gate_percent: Self::default_step_gate_percent(),
            double_battle_chance: Self::default_double_battle_chance(),
            rebalance: RebalanceConfig::default(),
            special_form: None,
            fishing_window: None,
            legendary_block_map: None,
            alternate_set: None,
        }
    }

    /// Resolve species names into identifiers and build runtime rules.
    ///
    /// # Errors
    ///
    /// Returns an error when validation fails or a named species is missing from the catalog.
    pub fn resolve<C: SpeciesCatalog + ?Sized>(&self, catalog: &C) -> Result<EncounterRules, ConfigError> {
        self.validate()?;
        let lookup = |name: &str| {
            catalog
                .species_named(name)
                .ok_or_else(|| ConfigError::UnknownSpecies(name.to_string()))
        };

        let roster = match &self.rebalance.roster {
            Some(names) => RebalanceRoster::from_names(names.as_slice(), catalog)?,
            None if self.rebalance.mode == RebalanceMode::Disabled => RebalanceRoster::default(),
            None => RebalanceRoster::from_names(RebalanceRoster::default_names()?.as_slice(), catalog)?,
        };
        let rebalance = RebalanceSettings {
            mode: self.rebalance.mode,
            step: self.rebalance.step,
            base_ceiling: self.rebalance.base_ceiling,
            clear_bonus: self.rebalance.clear_bonus,
            underflow_floor: self.rebalance.underflow_floor,
            roster,
        };

        let special_form = match &self.special_form {
            Some(form) => {
                let mut forms = [SpeciesId(0); 6];
                for (slot, name) in forms.iter_mut().zip(form.forms.iter()) {
                    *slot = lookup(name)?;
                }
                Some(SpecialForm {
                    base: lookup(&form.base)?,
                    forms,
                })
            }
            None => None,
        };

        let fishing_window = match &self.fishing_window {
            Some(window) => Some(FishingWindow {
                map: window.map,
                offset: window.offset,
                rows: window.rows.clone(),
                species: lookup(&window.species)?,
            }),
            None => None,
        };

        Ok(EncounterRules {
            badge_count: self.badge_count,
            step_gate_percent: u32::from(self.step_gate_percent),
            double_battle_chance: u32::from(self.double_battle_chance),
            rebalance,
            special_form,
            fishing_window,
            legendary_block_map: self.legendary_block_map,
            alternate_set: self.alternate_set,
        })
    }
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

/// Resolved fishing window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FishingWindow {
    pub map: MapId,
    pub offset: i16,
    pub rows: Vec<i16>,
    pub species: SpeciesId,
}

impl FishingWindow {
    /// Does fishing at `(x, y)` on `map` hit the window.
    #[must_use]
    pub fn covers(&self, map: MapId, (_, y): (i16, i16)) -> bool {
        map == self.map && self.rows.contains(&y.saturating_sub(self.offset))
    }
}

/// Runtime rules with every name resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncounterRules {
    pub badge_count: u8,
    pub step_gate_percent: u32,
    pub double_battle_chance: u32,
    pub rebalance: RebalanceSettings,
    pub special_form: Option<SpecialForm>,
    pub fishing_window: Option<FishingWindow>,
    pub legendary_block_map: Option<MapId>,
    pub alternate_set: Option<AlternateSetConfig>,
}

impl EncounterRules {
    /// Rules with no name-based features and rebalancing switched off.
    #[must_use]
    pub fn plain() -> Self {
        Self {
            badge_count: EncounterConfig::default_badge_count(),
            step_gate_percent: u32::from(EncounterConfig::default_step_gate_percent()),
            double_battle_chance: u32::from(EncounterConfig::default_double_battle_chance()),
            rebalance: RebalanceSettings::new(RebalanceMode::Disabled, RebalanceRoster::default()),
            special_form: None,
            fishing_window: None,
            legendary_block_map: None,
            alternate_set: None,
        }
    }
}
