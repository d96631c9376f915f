//! Progression-aware species rebalancing.
//!
//! A slot's species is swapped for a roster species whose base-stat total
//! falls in a window around the original, capped by how far the player has
//! progressed.
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::rng::RandomSource;
use crate::species::{SpeciesCatalog, SpeciesId};

const DEFAULT_ROSTER_JSON: &str = include_str!("../assets/rebalance_roster.json");

/// How a replacement is chosen from the candidate pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RebalanceMode {
    /// Keep the table species as-is.
    Disabled,
    /// Return the roster entry at the pool's size. Matches shipped behavior.
    #[default]
    RosterIndex,
    /// Return a uniformly drawn pool member.
    UniformPool,
}

/// Ordered, immutable list of species eligible as replacements.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RebalanceRoster {
    species: Vec<SpeciesId>,
}

#[derive(Debug, Deserialize)]
struct RosterFile {
    species: Vec<String>,
}

impl RebalanceRoster {
    #[must_use]
    pub const fn new(species: Vec<SpeciesId>) -> Self {
        Self { species }
    }

    /// Resolve roster names through the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownSpecies`] for the first name the catalog does not know.
    pub fn from_names<C, S>(names: &[S], catalog: &C) -> Result<Self, ConfigError>
    where
        C: SpeciesCatalog + ?Sized,
        S: AsRef<str>,
    {
        let species = names
            .iter()
            .map(|name| {
                catalog
                    .species_named(name.as_ref())
                    .ok_or_else(|| ConfigError::UnknownSpecies(name.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(species))
    }

    /// Names of the shipped roster.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded roster asset is malformed.
    pub fn default_names() -> Result<Vec<String>, ConfigError> {
        let file: RosterFile =
            serde_json::from_str(DEFAULT_ROSTER_JSON).map_err(|e| ConfigError::Json(e.to_string()))?;
        Ok(file.species)
    }

    #[must_use]
    pub fn species(&self) -> &[SpeciesId] {
        &self.species
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.species.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}

/// Read-only progression snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Progression {
    pub badges: u8,
    pub game_cleared: bool,
}

/// Rebalance tunables plus the resolved roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebalanceSettings {
    pub mode: RebalanceMode,
    pub step: u16,
    pub base_ceiling: u16,
    pub clear_bonus: u16,
    pub underflow_floor: u16,
    pub roster: RebalanceRoster,
}

impl RebalanceSettings {
    #[must_use]
    pub const fn new(mode: RebalanceMode, roster: RebalanceRoster) -> Self {
        Self {
            mode,
            step: 25,
            base_ceiling: 400,
            clear_bonus: 5000,
            underflow_floor: 6,
            roster,
        }
    }

    /// Highest base-stat total the player may normally meet.
    #[must_use]
    pub fn ceiling(&self, progression: Progression) -> u32 {
        let mut ceiling =
            u32::from(self.base_ceiling) + u32::from(self.step) * u32::from(progression.badges);
        if progression.game_cleared {
            ceiling += u32::from(self.clear_bonus);
        }
        ceiling
    }
}

/// Inclusive base-stat window for replacement candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BstWindow {
    pub low: u32,
    pub high: u32,
    /// Candidates must share a type with the original.
    pub type_locked: bool,
}

impl BstWindow {
    /// Window for a species of base-stat total `bst`; `None` when the lower
    /// edge would fall below the floor.
    #[must_use]
    pub fn compute(bst: u16, settings: &RebalanceSettings, progression: Progression) -> Option<Self> {
        let bst = u32::from(bst);
        let step = u32::from(settings.step);
        let low = bst
            .checked_sub(step)
            .filter(|low| *low >= u32::from(settings.underflow_floor))?;
        let ceiling = settings.ceiling(progression);

        let window = if bst + step > ceiling {
            if bst > ceiling {
                Self {
                    low,
                    high: bst,
                    type_locked: true,
                }
            } else {
                Self {
                    low,
                    high: ceiling,
                    type_locked: false,
                }
            }
        } else {
            Self {
                low,
                high: bst + step,
                type_locked: false,
            }
        };
        Some(window)
    }

    #[must_use]
    pub const fn contains(&self, bst: u16) -> bool {
        let bst = bst as u32;
        bst >= self.low && bst <= self.high
    }
}

/// Swap `species` for a progression-appropriate roster species.
///
/// Only [`RebalanceMode::UniformPool`] consumes a draw, and only when the pool is non-empty.
pub fn rebalance<C, R>(
    species: SpeciesId,
    settings: &RebalanceSettings,
    progression: Progression,
    catalog: &C,
    rng: &mut R,
) -> SpeciesId
where
    C: SpeciesCatalog + ?Sized,
    R: RandomSource + ?Sized,
{
    if settings.mode == RebalanceMode::Disabled {
        return species;
    }
    let Some(original) = catalog.species_info(species) else {
        return species;
    };
    let Some(window) = BstWindow::compute(original.base_stat_total, settings, progression) else {
        return species;
    };

    let roster = settings.roster.species();
    let mut pool = Vec::with_capacity(roster.len());
    pool.extend(roster.iter().copied().filter(|candidate| {
        catalog.species_info(*candidate).is_some_and(|info| {
            (!window.type_locked || original.shares_type_with(&info))
                && window.contains(info.base_stat_total)
        })
    }));

    if pool.is_empty() {
        return species;
    }

    let replacement = match settings.mode {
        RebalanceMode::RosterIndex => roster.get(pool.len()).copied(),
        RebalanceMode::UniformPool => {
            let pick = rng.below(u32::try_from(pool.len()).unwrap_or(u32::MAX)) as usize;
            pool.get(pick).copied()
        }
        RebalanceMode::Disabled => None,
    };
    let chosen = replacement.unwrap_or(species);
    log::trace!(
        "rebalanced {species:?} -> {chosen:?} (window {}..={}, locked {}, pool {})",
        window.low,
        window.high,
        window.type_locked,
        pool.len()
    );
    chosen
}
