use wild_encounter::sandbox::{DEMO_MAP, PLAIN_TILE, WATER_TILE};
use wild_encounter::{
    Ability, BattleKind, EncounterEngine, EncounterRules, EncounterSession, Facility,
    FishingWindow, LocalSighting, MapId, Nature, PartyMember, RodTier, SandboxWorld,
    ScriptedRolls, SpeciesId,
};

fn engine() -> EncounterEngine {
    EncounterEngine::new(EncounterRules::plain())
}

fn window_engine() -> EncounterEngine {
    let mut rules = EncounterRules::plain();
    rules.fishing_window = Some(FishingWindow {
        map: DEMO_MAP,
        offset: 7,
        rows: vec![35, 36],
        species: SpeciesId(7),
    });
    EncounterEngine::new(rules)
}

fn opposing_species(world: &SandboxWorld) -> Option<SpeciesId> {
    world.opposing[0].as_ref().map(|wild| wild.species)
}

#[test]
fn each_rod_reads_its_own_slots() {
    // (rod, draw, expected species) against [6, 5, 6, 5, 5, 6, 5, 5, 6, 6]
    let cases = [
        (RodTier::Old, 75, SpeciesId(5)),
        (RodTier::Good, 65, SpeciesId(5)),
        (RodTier::Super, 97, SpeciesId(6)),
    ];
    for (rod, draw, expected) in cases {
        let mut world = SandboxWorld::demo();
        let mut session = EncounterSession::new();
        let mut rolls = ScriptedRolls::new([draw, 0, 0]);
        assert_eq!(
            engine().fishing(&mut session, &mut world, rod, &mut rolls),
            Some(BattleKind::Wild),
            "{rod:?}"
        );
        assert_eq!(opposing_species(&world), Some(expected), "{rod:?}");
        assert_eq!(world.angler_species, Some(expected));
        assert_eq!(world.fishing_catches, 1);
        assert!(session.last_was_fishing());
        assert!(!session.last_was_surfing());
    }
}

#[test]
fn fishing_without_a_table_catches_nothing() {
    let mut world = SandboxWorld::demo();
    world.headers.headers[0].fishing = None;
    let mut session = EncounterSession::new();
    let mut rolls = ScriptedRolls::new([0, 0, 0]);
    assert_eq!(
        engine().fishing(&mut session, &mut world, RodTier::Super, &mut rolls),
        None
    );
    assert_eq!(rolls.consumed(), 0);
    assert_eq!(world.fishing_catches, 0);
    assert!(!session.last_was_fishing());
}

#[test]
fn fishing_window_overrides_the_table() {
    let mut world = SandboxWorld::demo();
    world.ahead = (10, 42);
    let mut session = EncounterSession::new();
    // level and nature only: no slot draw
    let mut rolls = ScriptedRolls::new([2, 1]);

    let outcome = window_engine().fishing(&mut session, &mut world, RodTier::Old, &mut rolls);

    assert_eq!(outcome, Some(BattleKind::Wild));
    assert_eq!(rolls.consumed(), 2);
    let wild = world.opposing[0].as_ref().unwrap();
    assert_eq!(wild.species, SpeciesId(7));
    assert_eq!(wild.level, 16);
    assert_eq!(wild.nature, Nature::Lonely);
    assert_eq!(world.angler_species, Some(SpeciesId(7)));
    assert_eq!(world.fishing_catches, 1);
}

#[test]
fn fishing_window_only_matches_its_rows() {
    let mut world = SandboxWorld::demo();
    world.ahead = (10, 41);
    let mut session = EncounterSession::new();
    let mut rolls = ScriptedRolls::new([75, 0, 0]);
    window_engine().fishing(&mut session, &mut world, RodTier::Old, &mut rolls);
    assert_eq!(opposing_species(&world), Some(SpeciesId(5)));

    world.ahead = (10, 43);
    world.map = MapId::new(0, 17);
    let mut rolls = ScriptedRolls::new([2, 1]);
    assert_eq!(
        window_engine().fishing(&mut session, &mut world, RodTier::Old, &mut rolls),
        None
    );
}

#[test]
fn has_fishing_table_is_a_pure_query() {
    let mut world = SandboxWorld::demo();
    let before = world.clone();
    assert!(engine().has_fishing_table(&world));
    assert!(engine().has_fishing_table(&world));
    assert_eq!(world.battles, before.battles);
    assert_eq!(world.opposing, before.opposing);

    world.headers.headers[0].fishing = None;
    assert!(!engine().has_fishing_table(&world));
    world.map = MapId::new(9, 9);
    assert!(!engine().has_fishing_table(&world));
}

#[test]
fn sweet_scent_skips_rate_and_filters() {
    let mut world = SandboxWorld::demo();
    world.repel_steps = 100;
    let mut session = EncounterSession::new();
    session.set_disabled(true);
    // slot, level, nature
    let mut rolls = ScriptedRolls::new([45, 3, 7]);

    let outcome = engine().sweet_scent(&mut session, &mut world, &mut rolls);

    assert_eq!(outcome, Some(BattleKind::Wild));
    assert_eq!(rolls.remaining(), 0);
    let wild = world.opposing[0].as_ref().unwrap();
    assert_eq!((wild.species, wild.level), (SpeciesId(2), 17));
}

#[test]
fn sweet_scent_on_water_leaves_surfing_unset() {
    let mut world = SandboxWorld::demo();
    world.destination = WATER_TILE;
    let mut session = EncounterSession::new();
    let mut rolls = ScriptedRolls::new([0, 0, 0]);
    assert_eq!(
        engine().sweet_scent(&mut session, &mut world, &mut rolls),
        Some(BattleKind::Wild)
    );
    assert_eq!(opposing_species(&world), Some(SpeciesId(5)));
    assert!(!session.last_was_surfing());

    world.reset_outcomes();
    world.destination = PLAIN_TILE;
    assert_eq!(
        engine().sweet_scent(&mut session, &mut world, &mut rolls),
        None
    );
}

#[test]
fn sweet_scent_keeps_the_pike_creature() {
    let mut world = SandboxWorld::demo();
    world.map = MapId::new(26, 1);
    world.facility = Facility::PikeWildRoom;
    world.pike_table = world.headers.headers[0].land.clone();
    world.pike_accepts = false;
    let mut session = EncounterSession::new();
    let mut rolls = ScriptedRolls::new([0, 0, 0]);
    assert_eq!(
        engine().sweet_scent(&mut session, &mut world, &mut rolls),
        Some(BattleKind::PikeWild)
    );
}

#[test]
fn rock_smash_ignores_lead_abilities() {
    let mut world = SandboxWorld::demo();
    world.party = vec![
        PartyMember::new(SpeciesId(9), 60, Ability::KeenEye),
        PartyMember::new(SpeciesId(1), 60, Ability::Other(0)),
    ];
    world.repel_steps = 10;
    let mut session = EncounterSession::new();
    let mut rolls = ScriptedRolls::new([0, 0, 0]);
    assert_eq!(
        engine().rock_smash(&mut session, &mut world, &mut rolls),
        Some(BattleKind::Wild)
    );
    assert_eq!(opposing_species(&world), Some(SpeciesId(8)));
    assert_eq!(rolls.remaining(), 0);
}

#[test]
fn honey_tree_uses_honey_breakpoints() {
    let mut world = SandboxWorld::demo();
    let mut session = EncounterSession::new();
    let mut rolls = ScriptedRolls::new([95, 0, 0]);
    assert_eq!(
        engine().honey_tree(&mut session, &mut world, &mut rolls),
        Some(BattleKind::Wild)
    );
    assert_eq!(opposing_species(&world), Some(SpeciesId(2)));

    world.headers.headers[0].honey = None;
    assert_eq!(
        engine().honey_tree(&mut session, &mut world, &mut rolls),
        None
    );
}

#[test]
fn berry_trees_are_looked_up_by_index() {
    let mut world = SandboxWorld::demo();
    let mut session = EncounterSession::new();
    let mut rolls = ScriptedRolls::new([0, 0, 0]);
    assert_eq!(
        engine().berry_tree(&mut session, &mut world, 0, &mut rolls),
        Some(BattleKind::Wild)
    );
    assert_eq!(opposing_species(&world), Some(SpeciesId(9)));

    let mut rolls = ScriptedRolls::default();
    assert_eq!(
        engine().berry_tree(&mut session, &mut world, 3, &mut rolls),
        None
    );
    assert_eq!(rolls.consumed(), 0);
}

#[test]
fn local_species_splits_between_land_and_water() {
    let mut world = SandboxWorld::demo();
    let mut rolls = ScriptedRolls::new([85, 0]);
    assert_eq!(
        engine().local_wild_species(&world, &mut rolls),
        Some(LocalSighting {
            species: SpeciesId(5),
            from_water: true
        })
    );
    let mut rolls = ScriptedRolls::new([10, 0]);
    assert_eq!(
        engine().local_wild_species(&world, &mut rolls),
        Some(LocalSighting {
            species: SpeciesId(1),
            from_water: false
        })
    );

    world.headers.headers[0].water = None;
    let mut rolls = ScriptedRolls::new([45]);
    assert_eq!(
        engine().local_wild_species(&world, &mut rolls).map(|sighting| sighting.species),
        Some(SpeciesId(2))
    );
    assert_eq!(rolls.consumed(), 1);
    assert_eq!(engine().local_water_species(&world, &mut rolls), None);
}

#[test]
fn local_water_species_reads_the_water_table() {
    let world = SandboxWorld::demo();
    let mut rolls = ScriptedRolls::new([60]);
    assert_eq!(
        engine().local_water_species(&world, &mut rolls),
        Some(SpeciesId(5))
    );
    let mut rolls = ScriptedRolls::new([90]);
    assert_eq!(
        engine().local_water_species(&world, &mut rolls),
        Some(SpeciesId(6))
    );
}

#[test]
fn rate_check_can_ignore_the_lead_ability() {
    let mut world = SandboxWorld::demo();
    world.party[0].ability = Ability::Illuminate;
    assert!(engine().rate_check(&world, 20, false, &mut ScriptedRolls::new([500])));
    assert!(!engine().rate_check(&world, 20, true, &mut ScriptedRolls::new([500])));
}

#[test]
fn repel_holds_inside_facilities() {
    let mut world = SandboxWorld::demo();
    world.repel_steps = 1;
    for facility in [Facility::Pike, Facility::PyramidFloor, Facility::UnionRoom] {
        world.facility = facility;
        assert!(!engine().tick_repel(&mut world));
        assert_eq!(world.repel_steps, 1);
    }
    world.facility = Facility::Field;
    assert!(engine().tick_repel(&mut world));
    assert_eq!(world.repel_wore_off, 1);
}
