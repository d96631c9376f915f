//! Mass outbreaks: a location-pinned species that overrides the land table.
use serde::{Deserialize, Serialize};

use crate::rng::RandomSource;
use crate::species::{MoveId, SpeciesId};
use crate::table::MapId;

/// Outbreak record read from save data. Species 0 means no outbreak is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MassOutbreak {
    pub species: SpeciesId,
    pub level: u8,
    pub moves: [MoveId; 4],
    pub map: MapId,
    /// Percent chance per qualifying encounter.
    pub probability: u8,
}

impl MassOutbreak {
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.species.0 != 0
    }

    #[must_use]
    pub fn applies_to(&self, map: MapId) -> bool {
        self.is_active() && self.map == map
    }

    /// Does the outbreak take this encounter. Draws only when it applies to `map`.
    pub fn roll<R: RandomSource + ?Sized>(&self, map: MapId, rng: &mut R) -> bool {
        self.applies_to(map) && rng.below(100) < u32::from(self.probability)
    }
}
