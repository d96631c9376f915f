use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use serde::Serialize;
use wild_encounter::sandbox::{GRASS_TILE, PLAIN_TILE, WATER_TILE};
use wild_encounter::{
    Ability, BattleKind, EncounterData, EncounterEngine, EncounterRng, EncounterSession,
    LevelBounds, MapId, PartyLevelSample, PartyMember, RebalanceMode, RodTier, SandboxWorld,
    SpeciesCatalog, SpeciesId, Step, TileBehavior,
};

/// Map with every table kind in the bundled assets.
pub const FIELD_MAP: MapId = MapId::new(0, 16);
/// Map holding the fishing window in the bundled assets.
pub const WINDOW_MAP: MapId = MapId::new(0, 34);
/// Facing coordinate whose row lands inside the window after the offset.
const WINDOW_COORDS: (i16, i16) = (18, 42);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    Land,
    Water,
    FishingOld,
    FishingGood,
    FishingSuper,
    FishingWindow,
    SweetScent,
    RockSmash,
    Honey,
    BerryTree,
}

impl Scenario {
    pub const ALL: [Self; 10] = [
        Self::Land,
        Self::Water,
        Self::FishingOld,
        Self::FishingGood,
        Self::FishingSuper,
        Self::FishingWindow,
        Self::SweetScent,
        Self::RockSmash,
        Self::Honey,
        Self::BerryTree,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Land => "land",
            Self::Water => "water",
            Self::FishingOld => "fishing-old",
            Self::FishingGood => "fishing-good",
            Self::FishingSuper => "fishing-super",
            Self::FishingWindow => "fishing-window",
            Self::SweetScent => "sweet-scent",
            Self::RockSmash => "rock-smash",
            Self::Honey => "honey",
            Self::BerryTree => "berry-tree",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Land => "Walk through tall grass, one standard check per step",
            Self::Water => "Surf across open water, one standard check per step",
            Self::FishingOld => "Cast an old rod at the field map",
            Self::FishingGood => "Cast a good rod at the field map",
            Self::FishingSuper => "Cast a super rod at the field map",
            Self::FishingWindow => "Fish the special window tiles",
            Self::SweetScent => "Force encounters from the grass",
            Self::RockSmash => "Smash rocks",
            Self::Honey => "Shake a honey tree",
            Self::BerryTree => "Disturb the first berry tree",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|scenario| scenario.key().eq_ignore_ascii_case(key))
    }

    const fn map(self) -> MapId {
        match self {
            Self::FishingWindow => WINDOW_MAP,
            _ => FIELD_MAP,
        }
    }

    const fn tile(self) -> TileBehavior {
        match self {
            Self::Water => WATER_TILE,
            _ => GRASS_TILE,
        }
    }
}

/// Knobs for one simulated run.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub seed: u64,
    pub attempts: usize,
    pub party_levels: Vec<u8>,
    pub lead_ability: Ability,
    pub rebalance: Option<RebalanceMode>,
}

impl SimulationConfig {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            attempts: 500,
            party_levels: vec![20, 18],
            lead_ability: Ability::Other(0),
            rebalance: None,
        }
    }

    #[must_use]
    pub fn with_attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts;
        self
    }

    fn party(&self) -> Vec<PartyMember> {
        self.party_levels
            .iter()
            .enumerate()
            .map(|(slot, level)| {
                let ability = if slot == 0 {
                    self.lead_ability
                } else {
                    Ability::Other(0)
                };
                PartyMember::new(SpeciesId(1), *level, ability).with_hp(30)
            })
            .collect()
    }
}

/// Outcome of one scenario under one seed.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub scenario: String,
    pub seed: u64,
    pub attempts: usize,
    pub encounters: usize,
    pub battles: BTreeMap<String, u32>,
    pub species: BTreeMap<String, u32>,
    pub levels: BTreeMap<u8, u32>,
    pub surfing_encounters: usize,
    pub draws: u64,
    pub duration: Duration,
    pub passed: bool,
    pub failures: Vec<String>,
}

impl ScenarioResult {
    #[allow(clippy::cast_precision_loss)]
    pub fn encounter_percent(&self) -> f64 {
        if self.attempts == 0 {
            return 0.0;
        }
        self.encounters as f64 / self.attempts as f64 * 100.0
    }
}

/// Run `scenario` against `data`, checking every launched battle as it happens.
pub fn run_scenario(data: &EncounterData, scenario: Scenario, config: &SimulationConfig) -> ScenarioResult {
    let started = Instant::now();
    let engine = match config.rebalance {
        Some(mode) => {
            let mut rules = data.engine.rules().clone();
            rules.rebalance.mode = mode;
            EncounterEngine::new(rules)
        }
        None => data.engine.clone(),
    };

    let mut world = data.sandbox(scenario.map());
    world.party = config.party();
    world.destination = scenario.tile();
    world.surfing = scenario == Scenario::Water;
    if scenario == Scenario::FishingWindow {
        world.ahead = WINDOW_COORDS;
    }
    let bounds = LevelBounds::from_median(PartyLevelSample::from_party(&world.party).median());

    let mut rng = EncounterRng::from_user_seed(config.seed);
    let mut session = EncounterSession::new();
    let mut tally = Tally::default();
    let mut previous = PLAIN_TILE;

    for attempt in 0..config.attempts {
        world.reset_outcomes();
        let outcome = match scenario {
            Scenario::Land | Scenario::Water => {
                let step = Step::new(previous, scenario.tile());
                previous = scenario.tile();
                engine.standard_encounter(&mut session, &mut world, step, &mut rng)
            }
            Scenario::FishingOld => engine.fishing(&mut session, &mut world, RodTier::Old, &mut rng),
            Scenario::FishingGood => engine.fishing(&mut session, &mut world, RodTier::Good, &mut rng),
            Scenario::FishingSuper | Scenario::FishingWindow => {
                engine.fishing(&mut session, &mut world, RodTier::Super, &mut rng)
            }
            Scenario::SweetScent => engine.sweet_scent(&mut session, &mut world, &mut rng),
            Scenario::RockSmash => engine.rock_smash(&mut session, &mut world, &mut rng),
            Scenario::Honey => engine.honey_tree(&mut session, &mut world, &mut rng),
            Scenario::BerryTree => engine.berry_tree(&mut session, &mut world, 0, &mut rng),
        };
        let Some(kind) = outcome else {
            continue;
        };
        // the battle screen takes the player off the tile
        previous = PLAIN_TILE;
        if session.last_was_surfing() {
            tally.surfing += 1;
        }
        tally.check(attempt, kind, &world, &engine, scenario, bounds);
    }

    log::info!(
        "{} seed {}: {} encounters in {} attempts",
        scenario.key(),
        config.seed,
        tally.encounters,
        config.attempts
    );

    ScenarioResult {
        scenario: scenario.key().to_string(),
        seed: config.seed,
        attempts: config.attempts,
        encounters: tally.encounters,
        battles: tally.battles,
        species: tally.species,
        levels: tally.levels,
        surfing_encounters: tally.surfing,
        draws: rng.draws(),
        duration: started.elapsed(),
        passed: tally.failures.is_empty(),
        failures: tally.failures,
    }
}

#[derive(Debug, Default)]
struct Tally {
    encounters: usize,
    surfing: usize,
    battles: BTreeMap<String, u32>,
    species: BTreeMap<String, u32>,
    levels: BTreeMap<u8, u32>,
    failures: Vec<String>,
}

impl Tally {
    fn check(
        &mut self,
        attempt: usize,
        kind: BattleKind,
        world: &SandboxWorld,
        engine: &EncounterEngine,
        scenario: Scenario,
        bounds: LevelBounds,
    ) {
        self.encounters += 1;
        *self.battles.entry(format!("{kind:?}")).or_default() += 1;

        if world.battle_count() != 1 {
            self.failures.push(format!(
                "attempt {attempt}: {} battles launched",
                world.battle_count()
            ));
        }
        let Some(wild) = world.opposing[0].as_ref() else {
            self.failures
                .push(format!("attempt {attempt}: {kind:?} battle without an opponent"));
            return;
        };

        let name = world
            .species
            .name_of(wild.species)
            .map_or_else(|| format!("#{}", wild.species.0), str::to_string);
        *self.species.entry(name).or_default() += 1;
        *self.levels.entry(wild.level).or_default() += 1;

        if world.species_info(wild.species).is_none() {
            self.failures
                .push(format!("attempt {attempt}: unknown species {:?}", wild.species));
        }
        if !bounds.contains(wild.level) {
            self.failures.push(format!(
                "attempt {attempt}: level {} outside {}..={}",
                wild.level, bounds.min, bounds.max
            ));
        }
        if scenario == Scenario::FishingWindow {
            // rebalancing may still swap the creature; the hooked species must not change
            let expected = engine.rules().fishing_window.as_ref().map(|window| window.species);
            if world.angler_species != expected {
                self.failures.push(format!(
                    "attempt {attempt}: window hooked {:?} instead of {expected:?}",
                    world.angler_species
                ));
            }
        }
        if kind == BattleKind::DoubleWild && world.opposing[1].is_none() {
            self.failures
                .push(format!("attempt {attempt}: double battle with one opponent"));
        }
    }
}
