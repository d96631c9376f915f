//! Encounter orchestration.
//!
//! Each entry point walks a fixed sequence of gates; the first "no" aborts
//! without refunding draws already taken. On success the opposing party is
//! populated and the battle launcher is invoked exactly once.
use std::ops::BitOr;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, EncounterConfig, EncounterRules};
use crate::creature::{CreationContext, GeneratedCreature, create_creature};
use crate::level::choose_level;
use crate::outbreak::MassOutbreak;
use crate::party::{PartyMember, first_usable_level};
use crate::rate::{RateInputs, should_trigger};
use crate::rebalance::Progression;
use crate::rng::RandomSource;
use crate::session::EncounterSession;
use crate::slots::{RodTier, SlotCategory, select_slot, steered_slot};
use crate::species::{SpeciesCatalog, SpeciesId};
use crate::table::{EncounterTable, TableKind};
use crate::world::{
    BattleKind, Facility, FlagStore, MapView, Overworld, PartyStore, TileBehavior,
};

/// Lead level must exceed this before Keen Eye or Intimidate can scare anything off.
const SCARE_MIN_LEAD_LEVEL: u8 = 5;
/// Percent chance that the local species query reads the land table when both exist.
const LOCAL_LAND_PERCENT: u32 = 80;

/// Tile behavior before and after the step that triggered the check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub previous: TileBehavior,
    pub current: TileBehavior,
}

impl Step {
    #[must_use]
    pub const fn new(previous: TileBehavior, current: TileBehavior) -> Self {
        Self { previous, current }
    }

    /// Stepping along the same tile kind skips the step gate.
    #[must_use]
    pub const fn entered_new_tile(&self) -> bool {
        self.previous.0 != self.current.0
    }
}

/// Filters applied to a generated level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CheckFlags(u8);

impl CheckFlags {
    pub const NONE: Self = Self(0);
    pub const REPEL: Self = Self(0x1);
    pub const KEEN_EYE: Self = Self(0x2);
    pub const ALL: Self = Self(0x3);

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for CheckFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Terrain a table-driven generation reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AreaKind {
    Land,
    Water,
    RockSmash,
    Honey,
}

impl AreaKind {
    #[must_use]
    pub const fn table_kind(self) -> TableKind {
        match self {
            Self::Land => TableKind::Land,
            Self::Water => TableKind::Water,
            Self::RockSmash => TableKind::RockSmash,
            Self::Honey => TableKind::Honey,
        }
    }

    #[must_use]
    pub const fn category(self) -> SlotCategory {
        match self {
            Self::Land => SlotCategory::Land,
            Self::Water | Self::RockSmash => SlotCategory::WaterRock,
            Self::Honey => SlotCategory::Honey,
        }
    }

    /// Lead abilities may steer the slot only on land and water.
    #[must_use]
    pub const fn allows_steering(self) -> bool {
        matches!(self, Self::Land | Self::Water)
    }
}

/// Species picked by the local species query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalSighting {
    pub species: SpeciesId,
    pub from_water: bool,
}

/// Stateless encounter orchestrator over resolved rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncounterEngine {
    rules: EncounterRules,
}

impl EncounterEngine {
    #[must_use]
    pub const fn new(rules: EncounterRules) -> Self {
        Self { rules }
    }

    /// Build an engine from serialized configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration fails validation or names unknown species.
    pub fn from_config<C: SpeciesCatalog + ?Sized>(
        config: &EncounterConfig,
        catalog: &C,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(config.resolve(catalog)?))
    }

    #[must_use]
    pub const fn rules(&self) -> &EncounterRules {
        &self.rules
    }

    /// Per-step land or water encounter check.
    pub fn standard_encounter<W, R>(
        &self,
        session: &mut EncounterSession,
        world: &mut W,
        step: Step,
        rng: &mut R,
    ) -> Option<BattleKind>
    where
        W: Overworld,
        R: RandomSource + ?Sized,
    {
        session.begin_attempt();
        if session.is_disabled() {
            log::debug!("wild encounters are disabled");
            return None;
        }

        let Some(header) = self.header_index(world) else {
            return self.facility_step(world, step, rng);
        };

        let tile = step.current;
        if world.is_land_encounter_tile(tile) {
            self.land_step(world, header, step, rng)
        } else if world.is_water_encounter_tile(tile) || (world.is_surfing() && world.is_bridge_tile(tile)) {
            self.water_step(session, world, header, step, rng)
        } else {
            None
        }
    }

    /// Forced encounter at the player's destination tile: no step gate, rate check, or filters.
    pub fn sweet_scent<W, R>(
        &self,
        session: &mut EncounterSession,
        world: &mut W,
        rng: &mut R,
    ) -> Option<BattleKind>
    where
        W: Overworld,
        R: RandomSource + ?Sized,
    {
        session.begin_attempt();
        let Some(header) = self.header_index(world) else {
            return self.facility_sweet_scent(world, rng);
        };

        let tile = world.destination_tile();
        if world.is_land_encounter_tile(tile) {
            table_at(world, header, TableKind::Land)?;
            if world.try_roamer_encounter(rng).is_some() {
                return launch(world, BattleKind::Roamer);
            }
            let outbreak = world.mass_outbreak();
            let map = world.current_map();
            let creature = match outbreak {
                Some(outbreak) if outbreak.roll(map, rng) => {
                    self.outbreak_creature(&outbreak, CheckFlags::NONE, world, rng)
                }
                _ => table_at(world, header, TableKind::Land)
                    .and_then(|table| self.generate(table, AreaKind::Land, CheckFlags::NONE, world, rng)),
            };
            place_single(world, creature?);
            launch(world, BattleKind::Wild)
        } else if world.is_water_encounter_tile(tile) {
            if self.legendaries_block_water(world) {
                log::debug!("legendary event blocks water encounters");
                return None;
            }
            table_at(world, header, TableKind::Water)?;
            if world.try_roamer_encounter(rng).is_some() {
                return launch(world, BattleKind::Roamer);
            }
            let creature = table_at(world, header, TableKind::Water)
                .and_then(|table| self.generate(table, AreaKind::Water, CheckFlags::NONE, world, rng))?;
            place_single(world, creature);
            launch(world, BattleKind::Wild)
        } else {
            None
        }
    }

    /// Fish with `rod`. The fishing window overrides the table entirely.
    pub fn fishing<W, R>(
        &self,
        session: &mut EncounterSession,
        world: &mut W,
        rod: RodTier,
        rng: &mut R,
    ) -> Option<BattleKind>
    where
        W: Overworld,
        R: RandomSource + ?Sized,
    {
        session.begin_attempt();
        let map = world.current_map();
        let ahead = world.coords_in_front();
        let window_species = self
            .rules
            .fishing_window
            .as_ref()
            .filter(|window| window.covers(map, ahead))
            .map(|window| window.species);

        let (hooked, creature) = if let Some(species) = window_species {
            log::debug!("fishing window hooked {species:?}");
            let level = choose_level(world.party(), rng);
            (species, self.create(species, level, world, rng))
        } else {
            let header = self.header_index(world)?;
            let table = table_at(world, header, TableKind::Fishing)?;
            let slot = select_slot(SlotCategory::Fishing(rod), rng);
            let level = choose_level(world.party(), rng);
            let species = table.species_at(slot)?;
            (species, self.create(species, level, world, rng))
        };

        place_single(world, creature);
        world.record_fishing_catch();
        world.set_angler_species(hooked);
        session.mark_fishing();
        launch(world, BattleKind::Wild)
    }

    /// Rock smash: needs a rock table and never filters.
    pub fn rock_smash<W, R>(
        &self,
        session: &mut EncounterSession,
        world: &mut W,
        rng: &mut R,
    ) -> Option<BattleKind>
    where
        W: Overworld,
        R: RandomSource + ?Sized,
    {
        session.begin_attempt();
        let header = self.header_index(world)?;
        self.unfiltered(world, AreaKind::RockSmash, |world| table_at(world, header, TableKind::RockSmash), rng)
    }

    /// Berry tree encounter from the berry header list.
    pub fn berry_tree<W, R>(
        &self,
        session: &mut EncounterSession,
        world: &mut W,
        tree: usize,
        rng: &mut R,
    ) -> Option<BattleKind>
    where
        W: Overworld,
        R: RandomSource + ?Sized,
    {
        session.begin_attempt();
        self.unfiltered(
            world,
            AreaKind::Land,
            |world| world.wild_headers().berry_tree(tree)?.land.as_ref(),
            rng,
        )
    }

    /// Honey tree encounter.
    pub fn honey_tree<W, R>(
        &self,
        session: &mut EncounterSession,
        world: &mut W,
        rng: &mut R,
    ) -> Option<BattleKind>
    where
        W: Overworld,
        R: RandomSource + ?Sized,
    {
        session.begin_attempt();
        let header = self.header_index(world)?;
        self.unfiltered(world, AreaKind::Honey, |world| table_at(world, header, TableKind::Honey), rng)
    }

    /// Whether the current map has a fishing table. No draws, no side effects.
    #[must_use]
    pub fn has_fishing_table<W: MapView + FlagStore>(&self, world: &W) -> bool {
        self.header_index(world)
            .and_then(|header| table_at(world, header, TableKind::Fishing))
            .is_some()
    }

    /// Species a local NPC might mention: land only, water only, or 80/20 between them.
    pub fn local_wild_species<W, R>(&self, world: &W, rng: &mut R) -> Option<LocalSighting>
    where
        W: MapView + FlagStore,
        R: RandomSource + ?Sized,
    {
        let header = self.header_index(world)?;
        let land = table_at(world, header, TableKind::Land);
        let water = table_at(world, header, TableKind::Water);
        let from_water = match (land, water) {
            (None, None) => return None,
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (Some(_), Some(_)) => rng.below(100) >= LOCAL_LAND_PERCENT,
        };
        let (table, category) = if from_water {
            (water?, SlotCategory::WaterRock)
        } else {
            (land?, SlotCategory::Land)
        };
        let species = table.species_at(select_slot(category, rng))?;
        Some(LocalSighting {
            species,
            from_water,
        })
    }

    pub fn local_water_species<W, R>(&self, world: &W, rng: &mut R) -> Option<SpeciesId>
    where
        W: MapView + FlagStore,
        R: RandomSource + ?Sized,
    {
        let water = table_at(world, self.header_index(world)?, TableKind::Water)?;
        water.species_at(select_slot(SlotCategory::WaterRock, rng))
    }

    /// Count down the repel by one step. Returns `true` on the step it wears off.
    pub fn tick_repel<W: Overworld>(&self, world: &mut W) -> bool {
        let facility = world.facility();
        if facility.in_pike() || facility.in_pyramid() || facility == Facility::UnionRoom {
            return false;
        }
        let steps = world.repel_steps();
        if steps == 0 {
            return false;
        }
        let remaining = steps - 1;
        world.set_repel_steps(remaining);
        if remaining == 0 {
            log::debug!("repel wore off");
            world.run_repel_wore_off_script();
            return true;
        }
        false
    }

    /// Encounter-rate roll for `base_rate` under the current world state.
    pub fn rate_check<W, R>(&self, world: &W, base_rate: u8, ignore_ability: bool, rng: &mut R) -> bool
    where
        W: MapView + PartyStore + FlagStore,
        R: RandomSource + ?Sized,
    {
        let lead = world.lead();
        let inputs = RateInputs {
            base_rate,
            cycling: world.is_cycling(),
            encounter_up: world.encounter_up_active(),
            encounter_down: world.encounter_down_active(),
            lead_item: lead.and_then(|member| member.held_item),
            lead_ability: if ignore_ability {
                None
            } else {
                lead.and_then(PartyMember::active_ability)
            },
            weather: world.weather(),
            in_pyramid: world.facility() == Facility::PyramidFloor,
        };
        should_trigger(&inputs, rng)
    }

    /// Header index for the current map, shifted by the alternate-set variable where it applies.
    fn header_index<W: MapView + FlagStore>(&self, world: &W) -> Option<usize> {
        let map = world.current_map();
        let index = world.wild_headers().position(map)?;
        let shift = match self.rules.alternate_set {
            Some(alternate) if alternate.map == map => {
                let set = world.alternate_set();
                if set > alternate.max { 0 } else { usize::from(set) }
            }
            _ => 0,
        };
        world.wild_headers().get(index + shift).map(|_| index + shift)
    }

    fn land_step<W, R>(&self, world: &mut W, header: usize, step: Step, rng: &mut R) -> Option<BattleKind>
    where
        W: Overworld,
        R: RandomSource + ?Sized,
    {
        let Some(base_rate) = table_at(world, header, TableKind::Land).map(|table| table.encounter_rate) else {
            log::debug!("map has no land table");
            return None;
        };
        if !self.passes_step_gate(step, rng) || !self.rate_check(world, base_rate, false, rng) {
            return None;
        }

        if let Some(roamer) = world.try_roamer_encounter(rng) {
            if !repel_allows(world, roamer.level) {
                log::debug!("repel turned away roamer at level {}", roamer.level);
                return None;
            }
            return launch(world, BattleKind::Roamer);
        }

        if let Some(outbreak) = world.mass_outbreak() {
            let map = world.current_map();
            if outbreak.roll(map, rng) {
                if let Some(creature) = self.outbreak_creature(&outbreak, CheckFlags::ALL, world, rng) {
                    place_single(world, creature);
                    return launch(world, BattleKind::Wild);
                }
            }
        }

        let first = table_at(world, header, TableKind::Land)
            .and_then(|table| self.generate(table, AreaKind::Land, CheckFlags::ALL, world, rng))?;
        self.dispatch_with_double(world, header, AreaKind::Land, first, rng)
    }

    fn water_step<W, R>(
        &self,
        session: &mut EncounterSession,
        world: &mut W,
        header: usize,
        step: Step,
        rng: &mut R,
    ) -> Option<BattleKind>
    where
        W: Overworld,
        R: RandomSource + ?Sized,
    {
        if self.legendaries_block_water(world) {
            log::debug!("legendary event blocks water encounters");
            return None;
        }
        let Some(base_rate) = table_at(world, header, TableKind::Water).map(|table| table.encounter_rate) else {
            log::debug!("map has no water table");
            return None;
        };
        if !self.passes_step_gate(step, rng) || !self.rate_check(world, base_rate, false, rng) {
            return None;
        }

        if let Some(roamer) = world.try_roamer_encounter(rng) {
            if !repel_allows(world, roamer.level) {
                log::debug!("repel turned away roamer at level {}", roamer.level);
                return None;
            }
            return launch(world, BattleKind::Roamer);
        }

        let first = table_at(world, header, TableKind::Water)
            .and_then(|table| self.generate(table, AreaKind::Water, CheckFlags::ALL, world, rng))?;
        session.mark_surfing();
        self.dispatch_with_double(world, header, AreaKind::Water, first, rng)
    }

    fn facility_step<W, R>(&self, world: &mut W, step: Step, rng: &mut R) -> Option<BattleKind>
    where
        W: Overworld,
        R: RandomSource + ?Sized,
    {
        match world.facility() {
            Facility::PikeWildRoom => {
                let base_rate = world.pike_land_table()?.encounter_rate;
                if !self.passes_step_gate(step, rng) || !self.rate_check(world, base_rate, false, rng) {
                    return None;
                }
                let creature = world
                    .pike_land_table()
                    .and_then(|table| self.generate(table, AreaKind::Land, CheckFlags::KEEN_EYE, world, rng))?;
                place_single(world, creature);
                if !world.finalize_pike_creature(true) {
                    log::debug!("pike refused the generated creature");
                    return None;
                }
                launch(world, BattleKind::PikeWild)
            }
            Facility::PyramidFloor => {
                let base_rate = world.pyramid_land_table()?.encounter_rate;
                if !self.passes_step_gate(step, rng) || !self.rate_check(world, base_rate, false, rng) {
                    return None;
                }
                let creature = world
                    .pyramid_land_table()
                    .and_then(|table| self.generate(table, AreaKind::Land, CheckFlags::KEEN_EYE, world, rng))?;
                place_single(world, creature);
                world.finalize_pyramid_creature();
                launch(world, BattleKind::Wild)
            }
            _ => {
                log::debug!("no wild header for {:?}", world.current_map());
                None
            }
        }
    }

    fn facility_sweet_scent<W, R>(&self, world: &mut W, rng: &mut R) -> Option<BattleKind>
    where
        W: Overworld,
        R: RandomSource + ?Sized,
    {
        match world.facility() {
            Facility::PikeWildRoom => {
                let creature = world
                    .pike_land_table()
                    .and_then(|table| self.generate(table, AreaKind::Land, CheckFlags::NONE, world, rng))?;
                place_single(world, creature);
                // a forced encounter keeps the creature even when the pike objects
                let _ = world.finalize_pike_creature(false);
                launch(world, BattleKind::PikeWild)
            }
            Facility::PyramidFloor => {
                let creature = world
                    .pyramid_land_table()
                    .and_then(|table| self.generate(table, AreaKind::Land, CheckFlags::NONE, world, rng))?;
                place_single(world, creature);
                world.finalize_pyramid_creature();
                launch(world, BattleKind::Wild)
            }
            _ => None,
        }
    }

    /// Generate from a table with no filters and start a wild battle.
    fn unfiltered<W, R, F>(&self, world: &mut W, area: AreaKind, table: F, rng: &mut R) -> Option<BattleKind>
    where
        W: Overworld,
        R: RandomSource + ?Sized,
        F: for<'w> Fn(&'w W) -> Option<&'w EncounterTable>,
    {
        let Some(table) = table(&*world) else {
            log::debug!("no {} table here", area.table_kind().label());
            return None;
        };
        let creature = self.generate(table, area, CheckFlags::NONE, world, rng)?;
        place_single(world, creature);
        launch(world, BattleKind::Wild)
    }

    /// Pick a slot and level, apply the filters, then create the creature.
    fn generate<W, R>(
        &self,
        table: &EncounterTable,
        area: AreaKind,
        checks: CheckFlags,
        world: &W,
        rng: &mut R,
    ) -> Option<GeneratedCreature>
    where
        W: Overworld,
        R: RandomSource + ?Sized,
    {
        let steered = if area.allows_steering() {
            let lead_ability = world.lead().and_then(PartyMember::active_ability);
            steered_slot(table, lead_ability, world, rng)
        } else {
            None
        };
        let slot = steered.unwrap_or_else(|| select_slot(area.category(), rng));

        let level = choose_level(world.party(), rng);
        if checks.contains(CheckFlags::REPEL) && !repel_allows(world, level) {
            log::debug!("repel turned away a level {level} wild creature");
            return None;
        }
        if checks.contains(CheckFlags::KEEN_EYE)
            && world.facility() != Facility::PikeWildRoom
            && !lead_allows(world, level, rng)
        {
            log::debug!("lead ability scared off a level {level} wild creature");
            return None;
        }

        let mut species = table.species_at(slot)?;
        if let Some(form) = &self.rules.special_form {
            species = form.roll(species, rng);
        }
        Some(self.create(species, level, world, rng))
    }

    fn outbreak_creature<W, R>(
        &self,
        outbreak: &MassOutbreak,
        checks: CheckFlags,
        world: &W,
        rng: &mut R,
    ) -> Option<GeneratedCreature>
    where
        W: Overworld,
        R: RandomSource + ?Sized,
    {
        if checks.contains(CheckFlags::REPEL) && !repel_allows(world, outbreak.level) {
            log::debug!("repel turned away the outbreak at level {}", outbreak.level);
            return None;
        }
        let creature = self.create(outbreak.species, outbreak.level, world, rng);
        Some(creature.with_moves(outbreak.moves))
    }

    fn create<W, R>(&self, species: SpeciesId, level: u8, world: &W, rng: &mut R) -> GeneratedCreature
    where
        W: Overworld,
        R: RandomSource + ?Sized,
    {
        let context = CreationContext {
            party: world.party(),
            in_safari: world.in_safari_zone(),
            flavor: world.safari_flavor(),
            progression: self.progression(world),
        };
        create_creature(species, level, &self.rules.rebalance, &context, world, rng)
    }

    fn dispatch_with_double<W, R>(
        &self,
        world: &mut W,
        header: usize,
        area: AreaKind,
        first: GeneratedCreature,
        rng: &mut R,
    ) -> Option<BattleKind>
    where
        W: Overworld,
        R: RandomSource + ?Sized,
    {
        if !self.wants_double(world, rng) {
            place_single(world, first);
            return launch(world, BattleKind::Wild);
        }
        let partner = table_at(world, header, area.table_kind())
            .and_then(|table| self.generate(table, area, CheckFlags::KEEN_EYE, world, rng));
        world.clear_opposing();
        // a failed partner roll leaves the first creature in both slots
        world.set_opposing(0, partner.unwrap_or_else(|| first.clone()));
        world.set_opposing(1, first);
        launch(world, BattleKind::DoubleWild)
    }

    fn wants_double<W, R>(&self, world: &W, rng: &mut R) -> bool
    where
        W: Overworld,
        R: RandomSource + ?Sized,
    {
        if world.in_safari_zone() || !world.has_two_usable_members() {
            return false;
        }
        if world.force_double_battle() {
            return true;
        }
        let chance = self.rules.double_battle_chance;
        chance != 0 && rng.below(100) + 1 < chance
    }

    fn passes_step_gate<R: RandomSource + ?Sized>(&self, step: Step, rng: &mut R) -> bool {
        if !step.entered_new_tile() {
            return true;
        }
        let passed = rng.below(100) < self.rules.step_gate_percent;
        if !passed {
            log::debug!("step gate failed entering {:?}", step.current);
        }
        passed
    }

    fn legendaries_block_water<W: MapView + FlagStore>(&self, world: &W) -> bool {
        self.rules
            .legendary_block_map
            .is_some_and(|map| map == world.current_map())
            && world.legendaries_active()
    }

    fn progression<W: FlagStore>(&self, world: &W) -> Progression {
        let badges = (0..self.rules.badge_count)
            .filter(|badge| world.has_badge(*badge))
            .count();
        Progression {
            badges: u8::try_from(badges).unwrap_or(u8::MAX),
            game_cleared: world.game_cleared(),
        }
    }
}

fn table_at<W: MapView + ?Sized>(world: &W, header: usize, kind: TableKind) -> Option<&EncounterTable> {
    world.wild_headers().get(header)?.table(kind)
}

/// With a repel active, the wild level must reach the first healthy non-egg member's level.
fn repel_allows<W: FlagStore + PartyStore + ?Sized>(world: &W, level: u8) -> bool {
    if world.repel_steps() == 0 {
        return true;
    }
    first_usable_level(world.party()).is_some_and(|ours| level >= ours)
}

/// Keen Eye and Intimidate leads scare off much weaker creatures half the time.
fn lead_allows<W, R>(world: &W, level: u8, rng: &mut R) -> bool
where
    W: PartyStore + ?Sized,
    R: RandomSource + ?Sized,
{
    let Some(lead) = world.lead() else {
        return true;
    };
    let scares = lead
        .active_ability()
        .is_some_and(|ability| ability.repels_weaker_wilds());
    !(scares
        && lead.level > SCARE_MIN_LEAD_LEVEL
        && level <= lead.level - SCARE_MIN_LEAD_LEVEL
        && rng.below(2) == 0)
}

fn place_single<W: PartyStore + ?Sized>(world: &mut W, creature: GeneratedCreature) {
    world.clear_opposing();
    world.set_opposing(0, creature);
}

fn launch<W: Overworld + ?Sized>(world: &mut W, kind: BattleKind) -> Option<BattleKind> {
    log::debug!("starting {kind:?} battle");
    world.start_battle(kind);
    Some(kind)
}
