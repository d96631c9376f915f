//! In-memory overworld for simulations and tests.
//!
//! Every collaborator trait is backed by a public field, and every side
//! effect the engine causes is recorded so callers can inspect it afterwards.
use crate::creature::GeneratedCreature;
use crate::nature::FlavorBlock;
use crate::outbreak::MassOutbreak;
use crate::party::PartyMember;
use crate::rng::RandomSource;
use crate::species::{
    Ability, ElementType, GenderRatio, Nature, SpeciesCatalog, SpeciesId, SpeciesInfo, SpeciesTable,
};
use crate::table::{EncounterTable, MapId, TableKind, WildHeader, WildHeaderSet, WildSlot};
use crate::world::{
    BattleKind, BattleLauncher, Facility, FieldEffects, FlagStore, FrontierFacilities, MapView,
    PartyStore, RoamerSighting, RoamerTracker, TileBehavior, Weather,
};

pub const PLAIN_TILE: TileBehavior = TileBehavior(0);
pub const GRASS_TILE: TileBehavior = TileBehavior(2);
pub const WATER_TILE: TileBehavior = TileBehavior(16);
pub const BRIDGE_TILE: TileBehavior = TileBehavior(112);

/// Map used by [`SandboxWorld::demo`].
pub const DEMO_MAP: MapId = MapId::new(0, 16);

/// A roamer that intercepts one in `one_in` qualifying encounters on its map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SandboxRoamer {
    pub species: SpeciesId,
    pub level: u8,
    pub map: MapId,
    pub one_in: u32,
}

#[derive(Debug, Clone, Default)]
pub struct SandboxWorld {
    pub map: MapId,
    pub facility: Facility,
    pub destination: TileBehavior,
    pub ahead: (i16, i16),
    pub surfing: bool,
    pub cycling: bool,
    pub weather: Weather,
    pub safari: bool,
    pub flavor: Option<FlavorBlock>,
    pub headers: WildHeaderSet,
    pub species: SpeciesTable,
    pub party: Vec<PartyMember>,
    pub opposing: [Option<GeneratedCreature>; 2],
    pub badges: u8,
    pub game_cleared: bool,
    pub legendaries_active: bool,
    pub encounter_up: bool,
    pub encounter_down: bool,
    pub force_double: bool,
    pub repel_steps: u16,
    pub alternate_set: u16,
    pub outbreak: Option<MassOutbreak>,
    pub roamer: Option<SandboxRoamer>,
    pub pike_table: Option<EncounterTable>,
    pub pyramid_table: Option<EncounterTable>,
    /// Whether the pike accepts a strictly finalized creature.
    pub pike_accepts: bool,
    pub battles: Vec<BattleKind>,
    pub fishing_catches: u32,
    pub angler_species: Option<SpeciesId>,
    pub repel_wore_off: u32,
    pub pyramid_finalized: u32,
}

impl SandboxWorld {
    #[must_use]
    pub fn new(species: SpeciesTable, headers: WildHeaderSet, map: MapId) -> Self {
        Self {
            map,
            species,
            headers,
            destination: GRASS_TILE,
            pike_accepts: true,
            ..Self::default()
        }
    }

    /// Small self-contained world: one map with every table kind and one berry tree.
    #[must_use]
    pub fn demo() -> Self {
        let species = demo_species();
        let mut header = WildHeader::empty(DEMO_MAP);
        header.land = demo_table(TableKind::Land, 20, &[1, 1, 2, 2, 1, 2, 3, 9, 1, 2, 3, 10]);
        header.water = demo_table(TableKind::Water, 4, &[5, 5, 6, 5]);
        header.rock_smash = demo_table(TableKind::RockSmash, 20, &[8, 8, 8, 10]);
        header.fishing = demo_table(TableKind::Fishing, 30, &[6, 5, 6, 5, 5, 6, 5, 5, 6, 6]);
        header.honey = demo_table(TableKind::Honey, 100, &[9, 9, 1, 9, 3, 2]);

        let mut berry = WildHeader::empty(DEMO_MAP);
        berry.land = demo_table(TableKind::Land, 20, &[9; 12]);

        let headers = WildHeaderSet {
            headers: vec![header],
            berry_trees: vec![berry],
        };
        let mut world = Self::new(species, headers, DEMO_MAP);
        world.party = vec![
            PartyMember::new(SpeciesId(1), 20, Ability::Other(0)).with_hp(40),
            PartyMember::new(SpeciesId(3), 18, Ability::Static).with_hp(35),
        ];
        world
    }

    /// Number of battles started so far.
    #[must_use]
    pub fn battle_count(&self) -> usize {
        self.battles.len()
    }

    #[must_use]
    pub fn last_battle(&self) -> Option<BattleKind> {
        self.battles.last().copied()
    }

    /// Forget recorded battles and the opposing party between simulated encounters.
    pub fn reset_outcomes(&mut self) {
        self.battles.clear();
        self.opposing = [None, None];
    }
}

fn demo_species() -> SpeciesTable {
    use ElementType::{Bug, Electric, Flying, Ground, Normal, Rock, Steel, Water};
    let rows: [(u16, &str, u16, [ElementType; 2], GenderRatio); 16] = [
        (1, "ZIGZAGOON", 240, [Normal, Normal], GenderRatio::Mixed(127)),
        (2, "WURMPLE", 195, [Bug, Bug], GenderRatio::Mixed(127)),
        (3, "PIKACHU", 320, [Electric, Electric], GenderRatio::Mixed(127)),
        (4, "MAGNEMITE", 325, [Electric, Steel], GenderRatio::Genderless),
        (5, "TENTACOOL", 335, [Water, Water], GenderRatio::Mixed(127)),
        (6, "MAGIKARP", 200, [Water, Water], GenderRatio::Mixed(127)),
        (7, "FEEBAS", 200, [Water, Water], GenderRatio::Mixed(127)),
        (8, "GEODUDE", 300, [Rock, Ground], GenderRatio::Mixed(127)),
        (9, "COMBEE", 244, [Bug, Flying], GenderRatio::Mixed(31)),
        (10, "MINIOR", 440, [Rock, Flying], GenderRatio::Genderless),
        (11, "MINIOR_METEOR_ORANGE", 440, [Rock, Flying], GenderRatio::Genderless),
        (12, "MINIOR_METEOR_YELLOW", 440, [Rock, Flying], GenderRatio::Genderless),
        (13, "MINIOR_METEOR_GREEN", 440, [Rock, Flying], GenderRatio::Genderless),
        (14, "MINIOR_METEOR_BLUE", 440, [Rock, Flying], GenderRatio::Genderless),
        (15, "MINIOR_METEOR_INDIGO", 440, [Rock, Flying], GenderRatio::Genderless),
        (16, "MINIOR_METEOR_VIOLET", 440, [Rock, Flying], GenderRatio::Genderless),
    ];
    let mut table = SpeciesTable::new();
    for (id, name, base_stat_total, types, gender_ratio) in rows {
        table.insert(
            SpeciesId(id),
            name,
            SpeciesInfo {
                base_stat_total,
                types,
                gender_ratio,
            },
        );
    }
    table
}

fn demo_table(kind: TableKind, rate: u8, species: &[u16]) -> Option<EncounterTable> {
    let slots = species
        .iter()
        .map(|id| WildSlot::new(SpeciesId(*id), 2, 5))
        .collect();
    EncounterTable::new(kind, rate, slots).ok()
}

impl MapView for SandboxWorld {
    fn current_map(&self) -> MapId {
        self.map
    }

    fn facility(&self) -> Facility {
        self.facility
    }

    fn destination_tile(&self) -> TileBehavior {
        self.destination
    }

    fn coords_in_front(&self) -> (i16, i16) {
        self.ahead
    }

    fn is_land_encounter_tile(&self, tile: TileBehavior) -> bool {
        tile == GRASS_TILE
    }

    fn is_water_encounter_tile(&self, tile: TileBehavior) -> bool {
        tile == WATER_TILE
    }

    fn is_bridge_tile(&self, tile: TileBehavior) -> bool {
        tile == BRIDGE_TILE
    }

    fn is_surfing(&self) -> bool {
        self.surfing
    }

    fn is_cycling(&self) -> bool {
        self.cycling
    }

    fn weather(&self) -> Weather {
        self.weather
    }

    fn in_safari_zone(&self) -> bool {
        self.safari
    }

    fn safari_flavor(&self) -> Option<FlavorBlock> {
        self.flavor
    }

    fn wild_headers(&self) -> &WildHeaderSet {
        &self.headers
    }
}

impl PartyStore for SandboxWorld {
    fn party(&self) -> &[PartyMember] {
        &self.party
    }

    fn clear_opposing(&mut self) {
        self.opposing = [None, None];
    }

    fn set_opposing(&mut self, slot: usize, creature: GeneratedCreature) {
        if let Some(entry) = self.opposing.get_mut(slot) {
            *entry = Some(creature);
        }
    }
}

impl FlagStore for SandboxWorld {
    fn has_badge(&self, index: u8) -> bool {
        index < self.badges
    }

    fn game_cleared(&self) -> bool {
        self.game_cleared
    }

    fn legendaries_active(&self) -> bool {
        self.legendaries_active
    }

    fn encounter_up_active(&self) -> bool {
        self.encounter_up
    }

    fn encounter_down_active(&self) -> bool {
        self.encounter_down
    }

    fn force_double_battle(&self) -> bool {
        self.force_double
    }

    fn repel_steps(&self) -> u16 {
        self.repel_steps
    }

    fn set_repel_steps(&mut self, steps: u16) {
        self.repel_steps = steps;
    }

    fn alternate_set(&self) -> u16 {
        self.alternate_set
    }

    fn mass_outbreak(&self) -> Option<MassOutbreak> {
        self.outbreak
    }
}

impl RoamerTracker for SandboxWorld {
    fn try_roamer_encounter<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Option<RoamerSighting> {
        let roamer = self.roamer.filter(|roamer| roamer.map == self.map)?;
        if rng.below(roamer.one_in) != 0 {
            return None;
        }
        self.clear_opposing();
        self.set_opposing(
            0,
            GeneratedCreature {
                species: roamer.species,
                level: roamer.level,
                nature: Nature::Hardy,
                gender: None,
                moves: None,
            },
        );
        Some(RoamerSighting {
            species: roamer.species,
            level: roamer.level,
        })
    }
}

impl FrontierFacilities for SandboxWorld {
    fn pike_land_table(&self) -> Option<&EncounterTable> {
        self.pike_table.as_ref()
    }

    fn pyramid_land_table(&self) -> Option<&EncounterTable> {
        self.pyramid_table.as_ref()
    }

    fn finalize_pike_creature(&mut self, strict: bool) -> bool {
        !strict || self.pike_accepts
    }

    fn finalize_pyramid_creature(&mut self) {
        self.pyramid_finalized += 1;
    }
}

impl BattleLauncher for SandboxWorld {
    fn start_battle(&mut self, kind: BattleKind) {
        self.battles.push(kind);
    }
}

impl FieldEffects for SandboxWorld {
    fn record_fishing_catch(&mut self) {
        self.fishing_catches += 1;
    }

    fn set_angler_species(&mut self, species: SpeciesId) {
        self.angler_species = Some(species);
    }

    fn run_repel_wore_off_script(&mut self) {
        self.repel_wore_off += 1;
    }
}

impl SpeciesCatalog for SandboxWorld {
    fn species_info(&self, species: SpeciesId) -> Option<SpeciesInfo> {
        self.species.species_info(species)
    }

    fn species_named(&self, name: &str) -> Option<SpeciesId> {
        self.species.species_named(name)
    }
}
