use wild_encounter::sandbox::{
    BRIDGE_TILE, DEMO_MAP, GRASS_TILE, PLAIN_TILE, SandboxRoamer, WATER_TILE,
};
use wild_encounter::{
    Ability, BattleKind, EncounterEngine, EncounterRules, EncounterSession, Facility, MapId,
    MassOutbreak, MoveId, Nature, PartyMember, RebalanceMode, RebalanceRoster, RebalanceSettings,
    SandboxWorld, ScriptedRolls, SpecialForm, SpeciesId, Step, TableKind, WildHeader,
};

fn engine() -> EncounterEngine {
    EncounterEngine::new(EncounterRules::plain())
}

const fn grass() -> Step {
    Step::new(GRASS_TILE, GRASS_TILE)
}

#[test]
fn forced_rate_roll_dispatches_one_wild_battle() {
    let mut world = SandboxWorld::demo();
    let mut session = EncounterSession::new();
    // rate, slot, level, nature, double chance
    let mut rolls = ScriptedRolls::new([0, 45, 3, 7, 50]);

    let outcome = engine().standard_encounter(&mut session, &mut world, grass(), &mut rolls);

    assert_eq!(outcome, Some(BattleKind::Wild));
    assert_eq!(world.battles, vec![BattleKind::Wild]);
    let wild = world.opposing[0].as_ref().expect("opposing slot populated");
    assert_eq!(wild.species, SpeciesId(2));
    assert_eq!(wild.level, 17);
    assert_eq!(wild.nature, Nature::Relaxed);
    assert!(world.opposing[1].is_none());
    assert_eq!(rolls.remaining(), 0);
}

#[test]
fn failed_rate_roll_launches_nothing() {
    let mut world = SandboxWorld::demo();
    let mut session = EncounterSession::new();
    let mut rolls = ScriptedRolls::new([320]);
    assert_eq!(
        engine().standard_encounter(&mut session, &mut world, grass(), &mut rolls),
        None
    );
    assert_eq!(world.battle_count(), 0);
    assert_eq!(rolls.consumed(), 1);
}

#[test]
fn step_gate_rolls_only_when_entering_a_new_tile() {
    let mut world = SandboxWorld::demo();
    let mut session = EncounterSession::new();
    let fresh = Step::new(PLAIN_TILE, GRASS_TILE);

    let mut rolls = ScriptedRolls::new([60]);
    assert_eq!(
        engine().standard_encounter(&mut session, &mut world, fresh, &mut rolls),
        None
    );
    assert_eq!(rolls.consumed(), 1);

    let mut rolls = ScriptedRolls::new([59, 0, 45, 3, 7, 50]);
    assert_eq!(
        engine().standard_encounter(&mut session, &mut world, fresh, &mut rolls),
        Some(BattleKind::Wild)
    );
}

#[test]
fn disabled_session_short_circuits() {
    let mut world = SandboxWorld::demo();
    let mut session = EncounterSession::new();
    session.set_disabled(true);
    let mut rolls = ScriptedRolls::new([0]);
    assert_eq!(
        engine().standard_encounter(&mut session, &mut world, grass(), &mut rolls),
        None
    );
    assert_eq!(rolls.consumed(), 0);
}

#[test]
fn repel_turns_away_creatures_below_the_lead() {
    let mut world = SandboxWorld::demo();
    world.repel_steps = 100;
    world.party = vec![PartyMember::new(SpeciesId(1), 20, Ability::Other(0))];
    let mut session = EncounterSession::new();
    // levels roll in 14..=17, all below the level 20 lead
    let mut rolls = ScriptedRolls::new([0, 45, 3]);
    assert_eq!(
        engine().standard_encounter(&mut session, &mut world, grass(), &mut rolls),
        None
    );
    assert!(world.opposing[0].is_none());

    // a weak lead lets the median-scaled creature through
    world.party = vec![
        PartyMember::new(SpeciesId(1), 10, Ability::Other(0)),
        PartyMember::new(SpeciesId(3), 30, Ability::Other(0)),
    ];
    let mut rolls = ScriptedRolls::new([0, 45, 0, 0, 50]);
    assert_eq!(
        engine().standard_encounter(&mut session, &mut world, grass(), &mut rolls),
        Some(BattleKind::Wild)
    );
    assert_eq!(world.opposing[0].as_ref().map(|wild| wild.level), Some(24));
}

#[test]
fn keen_eye_lead_scares_off_weak_creatures() {
    let mut world = SandboxWorld::demo();
    world.party = vec![
        PartyMember::new(SpeciesId(9), 40, Ability::KeenEye),
        PartyMember::new(SpeciesId(1), 20, Ability::Other(0)),
    ];
    let mut session = EncounterSession::new();
    // median 40 puts the level at 34, close enough for the coin
    let mut rolls = ScriptedRolls::new([0, 45, 0, 0]);
    assert_eq!(
        engine().standard_encounter(&mut session, &mut world, grass(), &mut rolls),
        None
    );
    assert_eq!(rolls.consumed(), 4);
}

#[test]
fn surfing_encounter_sets_the_surfing_flag() {
    let mut world = SandboxWorld::demo();
    let mut session = EncounterSession::new();
    let water = Step::new(WATER_TILE, WATER_TILE);
    // rate 10 < 64, slot 95 -> 3, level, nature, no double
    let mut rolls = ScriptedRolls::new([10, 95, 1, 2, 99]);

    let outcome = engine().standard_encounter(&mut session, &mut world, water, &mut rolls);

    assert_eq!(outcome, Some(BattleKind::Wild));
    assert!(session.last_was_surfing());
    assert!(!session.last_was_fishing());
    let wild = world.opposing[0].as_ref().unwrap();
    assert_eq!(wild.species, SpeciesId(5));
    assert_eq!(wild.level, 15);
    assert_eq!(wild.nature, Nature::Brave);

    // the next attempt clears the flag even when it fails
    let mut rolls = ScriptedRolls::new([2000]);
    engine().standard_encounter(&mut session, &mut world, water, &mut rolls);
    assert!(!session.last_was_surfing());
}

#[test]
fn bridge_tiles_count_as_water_only_while_surfing() {
    let mut world = SandboxWorld::demo();
    let mut session = EncounterSession::new();
    let bridge = Step::new(BRIDGE_TILE, BRIDGE_TILE);

    let mut rolls = ScriptedRolls::new([]);
    assert_eq!(
        engine().standard_encounter(&mut session, &mut world, bridge, &mut rolls),
        None
    );
    assert_eq!(rolls.consumed(), 0);

    world.surfing = true;
    let mut rolls = ScriptedRolls::new([0, 0, 0, 0, 99]);
    assert_eq!(
        engine().standard_encounter(&mut session, &mut world, bridge, &mut rolls),
        Some(BattleKind::Wild)
    );
}

#[test]
fn legendary_event_blocks_water_on_its_map() {
    let mut rules = EncounterRules::plain();
    rules.legendary_block_map = Some(DEMO_MAP);
    let engine = EncounterEngine::new(rules);
    let mut world = SandboxWorld::demo();
    world.legendaries_active = true;
    let mut session = EncounterSession::new();
    let mut rolls = ScriptedRolls::new([0]);
    assert_eq!(
        engine.standard_encounter(
            &mut session,
            &mut world,
            Step::new(WATER_TILE, WATER_TILE),
            &mut rolls
        ),
        None
    );
    assert_eq!(rolls.consumed(), 0);
}

#[test]
fn forced_double_moves_first_creature_to_slot_one() {
    let mut world = SandboxWorld::demo();
    world.force_double = true;
    let mut session = EncounterSession::new();
    // rate, slot, level, nature for the first; slot, level, nature for the partner
    let mut rolls = ScriptedRolls::new([0, 0, 0, 0, 45, 1, 3]);

    let outcome = engine().standard_encounter(&mut session, &mut world, grass(), &mut rolls);

    assert_eq!(outcome, Some(BattleKind::DoubleWild));
    assert_eq!(world.battles, vec![BattleKind::DoubleWild]);
    let first = world.opposing[1].as_ref().unwrap();
    assert_eq!((first.species, first.level), (SpeciesId(1), 14));
    let partner = world.opposing[0].as_ref().unwrap();
    assert_eq!((partner.species, partner.level), (SpeciesId(2), 15));
    assert_eq!(partner.nature, Nature::Adamant);
}

#[test]
fn failed_partner_duplicates_the_first_creature() {
    let mut world = SandboxWorld::demo();
    world.force_double = true;
    world.party = vec![
        PartyMember::new(SpeciesId(9), 40, Ability::Intimidate),
        PartyMember::new(SpeciesId(1), 40, Ability::Other(0)),
    ];
    let mut session = EncounterSession::new();
    // first creature survives the coin (1), the partner does not (0)
    let mut rolls = ScriptedRolls::new([0, 0, 0, 1, 0, 0, 0, 0]);

    let outcome = engine().standard_encounter(&mut session, &mut world, grass(), &mut rolls);

    assert_eq!(outcome, Some(BattleKind::DoubleWild));
    assert_eq!(world.opposing[0], world.opposing[1]);
    assert_eq!(world.opposing[0].as_ref().map(|wild| wild.level), Some(34));
}

#[test]
fn chance_double_needs_two_usable_members_and_no_safari() {
    let mut world = SandboxWorld::demo();
    let mut session = EncounterSession::new();
    // double roll 8 -> 9 < 10
    let mut rolls = ScriptedRolls::new([0, 0, 0, 0, 8, 0, 0, 0]);
    assert_eq!(
        engine().standard_encounter(&mut session, &mut world, grass(), &mut rolls),
        Some(BattleKind::DoubleWild)
    );

    world.reset_outcomes();
    world.safari = true;
    // safari: the nature gate also rolls, and no double roll happens
    let mut rolls = ScriptedRolls::new([0, 0, 0, 90, 0]);
    assert_eq!(
        engine().standard_encounter(&mut session, &mut world, grass(), &mut rolls),
        Some(BattleKind::Wild)
    );
    assert_eq!(rolls.remaining(), 0);

    world.reset_outcomes();
    world.safari = false;
    world.party[1].hp = 0;
    let mut rolls = ScriptedRolls::new([0, 0, 0, 0]);
    assert_eq!(
        engine().standard_encounter(&mut session, &mut world, grass(), &mut rolls),
        Some(BattleKind::Wild)
    );
    assert_eq!(rolls.remaining(), 0);
}

#[test]
fn roamer_intercepts_before_the_table() {
    let mut world = SandboxWorld::demo();
    world.roamer = Some(SandboxRoamer {
        species: SpeciesId(4),
        level: 40,
        map: DEMO_MAP,
        one_in: 4,
    });
    let mut session = EncounterSession::new();
    let mut rolls = ScriptedRolls::new([0, 0]);
    assert_eq!(
        engine().standard_encounter(&mut session, &mut world, grass(), &mut rolls),
        Some(BattleKind::Roamer)
    );
    assert_eq!(world.opposing[0].as_ref().map(|c| c.species), Some(SpeciesId(4)));

    world.reset_outcomes();
    world.roamer = world.roamer.map(|roamer| SandboxRoamer { level: 5, ..roamer });
    world.repel_steps = 10;
    let mut rolls = ScriptedRolls::new([0, 0]);
    assert_eq!(
        engine().standard_encounter(&mut session, &mut world, grass(), &mut rolls),
        None
    );
    assert_eq!(world.battle_count(), 0);
}

#[test]
fn outbreak_overrides_the_land_table() {
    let mut world = SandboxWorld::demo();
    let moves = [MoveId(33), MoveId(39), MoveId(0), MoveId(0)];
    world.outbreak = Some(MassOutbreak {
        species: SpeciesId(9),
        level: 30,
        moves,
        map: DEMO_MAP,
        probability: 50,
    });
    let mut session = EncounterSession::new();
    // rate, outbreak roll, nature
    let mut rolls = ScriptedRolls::new([0, 49, 5]);

    let outcome = engine().standard_encounter(&mut session, &mut world, grass(), &mut rolls);

    assert_eq!(outcome, Some(BattleKind::Wild));
    let wild = world.opposing[0].as_ref().unwrap();
    assert_eq!((wild.species, wild.level), (SpeciesId(9), 30));
    assert_eq!(wild.moves, Some(moves));
    assert_eq!(wild.nature, Nature::Bold);
}

#[test]
fn repelled_outbreak_falls_back_to_the_table() {
    let mut world = SandboxWorld::demo();
    world.outbreak = Some(MassOutbreak {
        species: SpeciesId(9),
        level: 3,
        moves: [MoveId(1); 4],
        map: DEMO_MAP,
        probability: 100,
    });
    world.repel_steps = 10;
    world.party = vec![
        PartyMember::new(SpeciesId(1), 10, Ability::Other(0)),
        PartyMember::new(SpeciesId(3), 30, Ability::Other(0)),
    ];
    let mut session = EncounterSession::new();
    let mut rolls = ScriptedRolls::new([0, 0, 45, 0, 0, 50]);
    assert_eq!(
        engine().standard_encounter(&mut session, &mut world, grass(), &mut rolls),
        Some(BattleKind::Wild)
    );
    let wild = world.opposing[0].as_ref().unwrap();
    assert_eq!(wild.species, SpeciesId(2));
    assert_eq!(wild.moves, None);
}

#[test]
fn static_lead_steers_toward_electric_slots() {
    let mut world = SandboxWorld::demo();
    world.party = vec![
        PartyMember::new(SpeciesId(3), 18, Ability::Static),
        PartyMember::new(SpeciesId(1), 20, Ability::Other(0)),
    ];
    let mut session = EncounterSession::new();
    // rate, steering coin, electric pick, level, nature, double
    let mut rolls = ScriptedRolls::new([0, 0, 1, 0, 0, 50]);
    engine().standard_encounter(&mut session, &mut world, grass(), &mut rolls);
    assert_eq!(world.opposing[0].as_ref().map(|c| c.species), Some(SpeciesId(3)));
    assert_eq!(rolls.remaining(), 0);
}

#[test]
fn special_form_rolls_after_the_filters() {
    let mut rules = EncounterRules::plain();
    rules.special_form = Some(SpecialForm {
        base: SpeciesId(10),
        forms: [11, 12, 13, 14, 15, 16].map(SpeciesId),
    });
    let engine = EncounterEngine::new(rules);
    let mut world = SandboxWorld::demo();
    let mut session = EncounterSession::new();
    // slot 99 -> the last land slot
    let mut rolls = ScriptedRolls::new([0, 99, 0, 3, 0, 50]);
    engine.standard_encounter(&mut session, &mut world, grass(), &mut rolls);
    assert_eq!(world.opposing[0].as_ref().map(|c| c.species), Some(SpeciesId(13)));
}

#[test]
fn uniform_rebalance_swaps_within_the_window() {
    let mut rules = EncounterRules::plain();
    rules.rebalance = RebalanceSettings::new(
        RebalanceMode::UniformPool,
        RebalanceRoster::new(vec![SpeciesId(5), SpeciesId(6), SpeciesId(7)]),
    );
    let engine = EncounterEngine::new(rules);
    let mut world = SandboxWorld::demo();
    let mut session = EncounterSession::new();
    // WURMPLE (195) draws from {MAGIKARP, FEEBAS}
    let mut rolls = ScriptedRolls::new([0, 45, 3, 1, 0, 50]);
    engine.standard_encounter(&mut session, &mut world, grass(), &mut rolls);
    assert_eq!(world.opposing[0].as_ref().map(|c| c.species), Some(SpeciesId(7)));
}

#[test]
fn alternate_sets_shift_the_header() {
    let mut rules = EncounterRules::plain();
    rules.alternate_set = Some(wild_encounter::config::AlternateSetConfig {
        map: DEMO_MAP,
        max: 8,
    });
    let engine = EncounterEngine::new(rules);
    let mut world = SandboxWorld::demo();
    let mut alternate = WildHeader::empty(DEMO_MAP);
    alternate.land = world
        .headers
        .get(0)
        .and_then(|header| header.table(TableKind::Land))
        .cloned();
    world.headers.headers.push(alternate);

    world.alternate_set = 1;
    assert!(!engine.has_fishing_table(&world));
    world.alternate_set = 9;
    assert!(engine.has_fishing_table(&world));
}

#[test]
fn pike_room_runs_without_a_header() {
    let mut world = SandboxWorld::demo();
    world.map = MapId::new(26, 1);
    world.facility = Facility::PikeWildRoom;
    world.pike_table = world.headers.get(0).and_then(|header| header.land.clone());
    world.party[0].ability = Ability::KeenEye;
    world.party[0].level = 60;
    let mut session = EncounterSession::new();

    // keen eye is ignored in the pike room: no coin between level and nature
    let mut rolls = ScriptedRolls::new([0, 0, 0, 0]);
    assert_eq!(
        engine().standard_encounter(&mut session, &mut world, grass(), &mut rolls),
        Some(BattleKind::PikeWild)
    );

    world.reset_outcomes();
    world.pike_accepts = false;
    let mut rolls = ScriptedRolls::new([0, 0, 0, 0]);
    assert_eq!(
        engine().standard_encounter(&mut session, &mut world, grass(), &mut rolls),
        None
    );
    assert_eq!(world.battle_count(), 0);
}

#[test]
fn pyramid_floor_finalizes_and_starts_a_wild_battle() {
    let mut world = SandboxWorld::demo();
    world.map = MapId::new(26, 2);
    world.facility = Facility::PyramidFloor;
    world.pyramid_table = world.headers.get(0).and_then(|header| header.land.clone());
    let mut session = EncounterSession::new();
    let mut rolls = ScriptedRolls::new([0, 0, 0, 0]);
    assert_eq!(
        engine().standard_encounter(&mut session, &mut world, grass(), &mut rolls),
        Some(BattleKind::Wild)
    );
    assert_eq!(world.pyramid_finalized, 1);

    world.facility = Facility::Field;
    let mut rolls = ScriptedRolls::new([0]);
    assert_eq!(
        engine().standard_encounter(&mut session, &mut world, grass(), &mut rolls),
        None
    );
    assert_eq!(rolls.consumed(), 0);
}
