//! Collaborator interfaces the encounter engine reads from and writes to.
//!
//! The engine never owns game state. Everything it consults or changes goes
//! through these traits, bundled as [`Overworld`].
use serde::{Deserialize, Serialize};

use crate::creature::GeneratedCreature;
use crate::nature::FlavorBlock;
use crate::outbreak::MassOutbreak;
use crate::party::{PARTY_SIZE, PartyMember};
use crate::rng::RandomSource;
use crate::species::{SpeciesCatalog, SpeciesId};
use crate::table::{EncounterTable, MapId, WildHeaderSet};

/// Opaque tile behavior code from the map layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileBehavior(pub u16);

/// Special layouts that change how encounters work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facility {
    #[default]
    Field,
    /// Battle pike room that hosts wild creatures.
    PikeWildRoom,
    /// Any other battle pike layout.
    Pike,
    /// Battle pyramid floor with wild creatures.
    PyramidFloor,
    /// Any other battle pyramid layout.
    Pyramid,
    UnionRoom,
}

impl Facility {
    #[must_use]
    pub const fn in_pike(self) -> bool {
        matches!(self, Self::PikeWildRoom | Self::Pike)
    }

    #[must_use]
    pub const fn in_pyramid(self) -> bool {
        matches!(self, Self::PyramidFloor | Self::Pyramid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    #[default]
    Clear,
    Sandstorm,
    Snow,
    Other,
}

/// Battle variant handed to the battle launcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleKind {
    Wild,
    DoubleWild,
    Roamer,
    PikeWild,
}

/// A roamer that decided to intercept this encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoamerSighting {
    pub species: SpeciesId,
    pub level: u8,
}

/// Map, tile, and avatar state.
pub trait MapView {
    fn current_map(&self) -> MapId;

    fn facility(&self) -> Facility;

    /// Tile the player is about to step onto.
    fn destination_tile(&self) -> TileBehavior;

    /// Map coordinates one step in front of the player.
    fn coords_in_front(&self) -> (i16, i16);

    fn is_land_encounter_tile(&self, tile: TileBehavior) -> bool;

    fn is_water_encounter_tile(&self, tile: TileBehavior) -> bool;

    fn is_bridge_tile(&self, tile: TileBehavior) -> bool;

    fn is_surfing(&self) -> bool;

    fn is_cycling(&self) -> bool;

    fn weather(&self) -> Weather;

    fn in_safari_zone(&self) -> bool;

    /// Flavor treat placed in the safari zone, if any.
    fn safari_flavor(&self) -> Option<FlavorBlock>;

    fn wild_headers(&self) -> &WildHeaderSet;
}

/// Player party reads and opposing-party writes.
pub trait PartyStore {
    fn party(&self) -> &[PartyMember];

    fn lead(&self) -> Option<&PartyMember> {
        self.party().first()
    }

    fn has_two_usable_members(&self) -> bool {
        self.party()
            .iter()
            .take(PARTY_SIZE)
            .filter(|member| member.is_usable())
            .count()
            >= 2
    }

    fn clear_opposing(&mut self);

    fn set_opposing(&mut self, slot: usize, creature: GeneratedCreature);
}

/// Save flags and variables.
pub trait FlagStore {
    /// Badge `index` counts from zero.
    fn has_badge(&self, index: u8) -> bool;

    fn game_cleared(&self) -> bool;

    /// Legendary weather event is running on its map.
    fn legendaries_active(&self) -> bool;

    fn encounter_up_active(&self) -> bool;

    fn encounter_down_active(&self) -> bool;

    fn force_double_battle(&self) -> bool;

    fn repel_steps(&self) -> u16;

    fn set_repel_steps(&mut self, steps: u16);

    /// Raw alternate wild-set variable for maps that rotate tables.
    fn alternate_set(&self) -> u16;

    fn mass_outbreak(&self) -> Option<MassOutbreak>;
}

/// Roaming creature state.
pub trait RoamerTracker {
    /// Decide whether the roamer intercepts this encounter. On `Some`, the
    /// tracker has already placed the roamer in the opposing party.
    fn try_roamer_encounter<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Option<RoamerSighting>;
}

/// Battle frontier facilities with their own wild tables.
pub trait FrontierFacilities {
    fn pike_land_table(&self) -> Option<&EncounterTable>;

    fn pyramid_land_table(&self) -> Option<&EncounterTable>;

    /// Adjust the generated creature for the pike. With `strict`, the pike may refuse it.
    fn finalize_pike_creature(&mut self, strict: bool) -> bool;

    fn finalize_pyramid_creature(&mut self);
}

pub trait BattleLauncher {
    fn start_battle(&mut self, kind: BattleKind);
}

/// Side effects outside the battle itself.
pub trait FieldEffects {
    fn record_fishing_catch(&mut self);

    fn set_angler_species(&mut self, species: SpeciesId);

    fn run_repel_wore_off_script(&mut self);
}

/// Everything the encounter engine needs from the game.
pub trait Overworld:
    MapView + PartyStore + FlagStore + RoamerTracker + FrontierFacilities + BattleLauncher + FieldEffects + SpeciesCatalog
{
}

impl<T> Overworld for T where
    T: MapView
        + PartyStore
        + FlagStore
        + RoamerTracker
        + FrontierFacilities
        + BattleLauncher
        + FieldEffects
        + SpeciesCatalog
{
}
