mod common;

use combat_core::{
    AreaAnchor, AreaCombat, AreaDescription, CastContext, Combat, CombatEnv, CombatConfig,
    CombatHook, CombatParam, CombatRejection, CombatType, CreatureId, DamageBounds,
    DistanceEffect, FormulaHook, FormulaType, HookKey, MagicEffect, PcgRng, Position,
    SoundEffect, TargetHook, TileFlags, TileHook, WorldType,
};

use common::{Effect, MemoryWorld, RecordingSink, StaticItems, StubScripts, monster, player};

const CASTER: Position = Position::new(100, 100, 7);

fn arena() -> MemoryWorld {
    MemoryWorld::new(WorldType::Pvp).with_floor(90, 115, 90, 115, 7)
}

fn fire_wave() -> Combat {
    let mut area = AreaCombat::new();
    area.setup_cone(3, 0).expect("cone should build");

    let mut combat = Combat::new();
    combat.set_area(area);
    combat.set_param(CombatParam::Type(CombatType::Fire));
    combat.set_param(CombatParam::Effect(MagicEffect::FIRE_AREA));
    combat.set_param(CombatParam::DistanceEffect(DistanceEffect::FIRE));
    combat
        .set_player_combat_values(FormulaType::Damage, -10.0, 0.0, -10.0, 0.0)
        .expect("finite coefficients");
    combat
}

/// A straight cone cast due east resolves the east-facing variant and hits
/// exactly the three tiles in front of the caster.
#[test]
fn east_cone_hits_the_three_tiles_in_front_of_the_caster() {
    common::init_tracing();
    let mut world = arena();
    world.spawn(player(1, CASTER));
    for (id, x) in [(10, 101), (11, 102), (12, 103), (13, 104)] {
        world.spawn(monster(id, Position::new(x, 100, 7)));
    }
    world.spawn(monster(14, Position::new(101, 101, 7)));

    let config = CombatConfig::new();
    let mut sink = RecordingSink::default();
    let combat = fire_wave();
    let target = Position::new(103, 100, 7);

    let outcome = {
        let env = CombatEnv::bare(&config);
        let mut ctx = CastContext::new(&mut world, &mut sink, env, 1);
        combat.execute_area_combat(&mut ctx, Some(CreatureId(1)), target)
    };

    assert_eq!(
        outcome.tiles,
        [
            Position::new(101, 100, 7),
            Position::new(102, 100, 7),
            Position::new(103, 100, 7),
        ]
    );
    let mut hit: Vec<_> = outcome.hits.iter().map(|h| h.target).collect();
    hit.sort();
    assert_eq!(hit, [CreatureId(10), CreatureId(11), CreatureId(12)]);
    assert!(outcome.rejections.is_empty());

    assert_eq!(world.health(CreatureId(10)), 990);
    assert_eq!(world.health(CreatureId(13)), 1_000);
    assert_eq!(world.health(CreatureId(14)), 1_000);

    assert_eq!(sink.magic_at(), outcome.tiles);
    assert_eq!(sink.count_distance(), 1);
    assert!(
        sink.effects
            .contains(&Effect::Distance(CASTER, target, DistanceEffect::FIRE))
    );
}

#[test]
fn aggressive_area_skips_protection_zone_tiles() {
    let mut world = arena();
    world.spawn(player(1, CASTER));
    world.spawn(monster(10, Position::new(101, 100, 7)));
    world.spawn(monster(11, Position::new(102, 100, 7)));
    world.flag(Position::new(102, 100, 7), TileFlags::PROTECTION_ZONE);

    let config = CombatConfig::new();
    let mut sink = RecordingSink::default();
    let outcome = {
        let mut ctx = CastContext::new(&mut world, &mut sink, CombatEnv::bare(&config), 1);
        fire_wave().execute_area_combat(&mut ctx, Some(CreatureId(1)), Position::new(103, 100, 7))
    };

    assert_eq!(
        outcome.tiles,
        [Position::new(101, 100, 7), Position::new(103, 100, 7)]
    );
    assert_eq!(outcome.rejections.len(), 1);
    assert_eq!(outcome.rejections[0].creature, None);
    assert_eq!(outcome.rejections[0].reason, CombatRejection::ProtectionZone);
    assert_eq!(world.health(CreatureId(11)), 1_000);
    assert_eq!(world.health(CreatureId(10)), 990);
}

#[test]
fn blocked_tiles_and_hidden_cells_are_not_affected() {
    let mut world = arena();
    world.spawn(player(1, CASTER));
    world.flag(Position::new(101, 100, 7), TileFlags::BLOCK_PROJECTILE);
    world.blocked_sight.insert(Position::new(103, 100, 7));

    let config = CombatConfig::new();
    let mut sink = RecordingSink::default();
    let outcome = {
        let mut ctx = CastContext::new(&mut world, &mut sink, CombatEnv::bare(&config), 1);
        fire_wave().execute_area_combat(&mut ctx, Some(CreatureId(1)), Position::new(103, 100, 7))
    };

    assert_eq!(outcome.tiles, [Position::new(102, 100, 7)]);
    assert_eq!(outcome.rejections[0].reason, CombatRejection::NotEnoughRoom);
}

/// Runes center the shape on the target position instead of the caster.
#[test]
fn target_anchor_centers_the_shape_on_the_position() {
    let mut area = AreaCombat::new();
    area.setup_circle(1).expect("circle should build");
    let mut combat = Combat::new();
    combat.set_area(area);
    combat.set_param(CombatParam::Anchor(AreaAnchor::Target));
    combat.set_param(CombatParam::Effect(MagicEffect::ENERGY_AREA));

    let mut world = arena();
    world.spawn(player(1, CASTER));
    let config = CombatConfig::new();
    let mut sink = RecordingSink::default();
    let center = Position::new(110, 110, 7);

    let outcome = {
        let mut ctx = CastContext::new(&mut world, &mut sink, CombatEnv::bare(&config), 1);
        combat.execute_area_combat(&mut ctx, Some(CreatureId(1)), center)
    };

    let mut tiles = outcome.tiles.clone();
    tiles.sort();
    let mut expected = vec![
        center,
        center.offset(-1, 0),
        center.offset(1, 0),
        center.offset(0, -1),
        center.offset(0, 1),
    ];
    expected.sort();
    assert_eq!(tiles, expected);
}

#[test]
fn cast_without_shape_affects_the_single_tile() {
    let mut combat = Combat::new();
    combat.set_param(CombatParam::Type(CombatType::Energy));
    combat
        .set_player_combat_values(FormulaType::Damage, -5.0, 0.0, -5.0, 0.0)
        .expect("finite coefficients");

    let mut world = arena();
    world.spawn(player(1, CASTER));
    world.spawn(monster(10, Position::new(105, 105, 7)));
    world.spawn(monster(11, Position::new(105, 105, 7)));

    let config = CombatConfig::new();
    let mut sink = RecordingSink::default();
    let outcome = {
        let mut ctx = CastContext::new(&mut world, &mut sink, CombatEnv::bare(&config), 1);
        combat.execute_area_combat(&mut ctx, Some(CreatureId(1)), Position::new(105, 105, 7))
    };

    assert_eq!(outcome.tiles, [Position::new(105, 105, 7)]);
    assert_eq!(outcome.hits.len(), 2);

    let mut sink = RecordingSink::default();
    let outcome = {
        let mut ctx = CastContext::new(&mut world, &mut sink, CombatEnv::bare(&config), 2);
        combat.execute_area_combat(&mut ctx, None, Position::new(105, 105, 16))
    };
    assert!(outcome.tiles.is_empty());
}

#[test]
fn damage_is_rolled_per_target_inside_shared_bounds() {
    let mut area = AreaCombat::new();
    area.setup_circle(2).expect("circle should build");
    let mut combat = Combat::new();
    combat.set_area(area);
    combat.set_param(CombatParam::Type(CombatType::Physical));
    combat
        .set_player_combat_values(FormulaType::Damage, -100.0, 0.0, -200.0, 0.0)
        .expect("finite coefficients");

    let mut world = arena();
    world.spawn(player(1, CASTER));
    let victims: Vec<_> = [(1, 0), (-1, 0), (0, 1), (0, -1), (1, 1), (2, 0)]
        .into_iter()
        .enumerate()
        .map(|(i, (dx, dy))| monster(10 + i as u32, CASTER.offset(dx, dy)))
        .collect();
    for victim in &victims {
        world.spawn(victim.clone());
    }

    let config = CombatConfig::new();
    let rng = PcgRng;
    let mut sink = RecordingSink::default();
    let outcome = {
        let env = CombatEnv::new(&config, None, None, Some(&rng)).with_seed(77);
        let mut ctx = CastContext::new(&mut world, &mut sink, env, 1);
        combat.execute_area_combat(&mut ctx, Some(CreatureId(1)), CASTER)
    };

    assert_eq!(outcome.hits.len(), victims.len());
    for hit in &outcome.hits {
        let value = hit.damage.expect("health effects carry damage").primary.value;
        assert!((-200..=-100).contains(&value), "{value}");
    }
    assert!(outcome.rejections.iter().all(|r| r.creature == Some(CreatureId(1))));
}

#[test]
fn missing_rng_rejects_targets_that_need_a_roll() {
    let mut area = AreaCombat::new();
    area.setup_circle(1).expect("circle should build");
    let mut combat = Combat::new();
    combat.set_area(area);
    combat.set_param(CombatParam::Type(CombatType::Physical));
    combat
        .set_player_combat_values(FormulaType::Damage, -1.0, 0.0, -9.0, 0.0)
        .expect("finite coefficients");

    let mut world = arena();
    world.spawn(player(1, CASTER));
    world.spawn(monster(10, CASTER.offset(1, 0)));
    let config = CombatConfig::new();
    let mut sink = RecordingSink::default();
    let outcome = {
        let mut ctx = CastContext::new(&mut world, &mut sink, CombatEnv::bare(&config), 1);
        combat.execute_area_combat(&mut ctx, Some(CreatureId(1)), CASTER)
    };

    assert!(matches!(
        outcome.rejection(CreatureId(10)),
        Some(CombatRejection::MissingOracle(_))
    ));
}

/// A broken formula deals no damage, a broken tile filter allows the tile,
/// and the cast carries on.
#[test]
fn failing_hooks_fall_back_and_the_cast_proceeds() {
    let mut combat = fire_wave();
    combat.set_callback(CombatHook::Formula(FormulaHook::new(HookKey(99))));
    combat.set_callback(CombatHook::Tile(TileHook::new(HookKey(98))));

    let mut world = arena();
    world.spawn(player(1, CASTER));
    world.spawn(monster(10, Position::new(101, 100, 7)));
    let config = CombatConfig::new();
    let scripts = StubScripts::default();
    let mut sink = RecordingSink::default();

    let outcome = {
        let env = CombatEnv::new(&config, None, Some(&scripts), None);
        let mut ctx = CastContext::new(&mut world, &mut sink, env, 1);
        combat.execute_area_combat(&mut ctx, Some(CreatureId(1)), Position::new(103, 100, 7))
    };

    assert_eq!(outcome.tiles.len(), 3);
    let hit = outcome.hit(CreatureId(10)).expect("monster should be hit");
    assert_eq!(hit.damage.map(|d| d.primary.value), Some(0));
    assert_eq!(world.health(CreatureId(10)), 1_000);
}

#[test]
fn script_filters_veto_tiles_and_targets() {
    let mut combat = fire_wave();
    combat.set_callback(CombatHook::Tile(TileHook::new(HookKey(1))));
    combat.set_callback(CombatHook::Target(TargetHook::new(HookKey(2))));

    let mut world = arena();
    world.spawn(player(1, CASTER));
    world.spawn(monster(10, Position::new(101, 100, 7)));
    world.spawn(monster(11, Position::new(102, 100, 7)));
    world.spawn(monster(12, Position::new(103, 100, 7)));

    let mut scripts = StubScripts::default();
    scripts.tile_keys.insert(HookKey(1));
    scripts.target_keys.insert(HookKey(2));
    scripts.denied_tiles.insert(Position::new(102, 100, 7));
    scripts.denied_targets.insert(CreatureId(12));

    let config = CombatConfig::new();
    let mut sink = RecordingSink::default();
    let outcome = {
        let env = CombatEnv::new(&config, None, Some(&scripts), None);
        let mut ctx = CastContext::new(&mut world, &mut sink, env, 1);
        combat.execute_area_combat(&mut ctx, Some(CreatureId(1)), Position::new(103, 100, 7))
    };

    assert_eq!(
        outcome.tiles,
        [Position::new(101, 100, 7), Position::new(103, 100, 7)]
    );
    assert!(outcome.hit(CreatureId(10)).is_some());
    assert!(outcome.hit(CreatureId(11)).is_none());
    assert_eq!(
        outcome.rejection(CreatureId(12)),
        Some(CombatRejection::VetoedByScript)
    );
}

#[test]
fn formula_hook_runs_once_per_area_cast() {
    let mut combat = fire_wave();
    combat.set_param(CombatParam::UseCharges(true));
    combat.set_callback(CombatHook::Formula(FormulaHook::new(HookKey(5))));

    let mut world = arena();
    world.spawn(player(1, CASTER));
    for (id, x) in [(10, 101), (11, 102), (12, 103)] {
        world.spawn(monster(id, Position::new(x, 100, 7)));
    }

    let mut scripts = StubScripts::default();
    scripts.formulas.insert(HookKey(5), DamageBounds::new(-30, -30));
    let config = CombatConfig::new();
    let mut sink = RecordingSink::default();
    let outcome = {
        let env = CombatEnv::new(&config, None, Some(&scripts), None);
        let mut ctx = CastContext::new(&mut world, &mut sink, env, 1);
        combat.execute_area_combat(&mut ctx, Some(CreatureId(1)), Position::new(103, 100, 7))
    };

    assert_eq!(outcome.hits.len(), 3);
    assert_eq!(*scripts.charges_used.lock().expect("lock"), 1);
    assert_eq!(world.health(CreatureId(12)), 970);
}

#[test]
fn top_most_only_hits_one_creature_per_tile() {
    let mut combat = fire_wave();
    combat.set_param(CombatParam::TargetCasterOrTopMost(true));

    let mut world = arena();
    world.spawn(player(1, CASTER));
    world.spawn(monster(10, Position::new(102, 100, 7)));
    world.spawn(monster(11, Position::new(102, 100, 7)));

    let config = CombatConfig::new();
    let mut sink = RecordingSink::default();
    let outcome = {
        let mut ctx = CastContext::new(&mut world, &mut sink, CombatEnv::bare(&config), 1);
        combat.execute_area_combat(&mut ctx, Some(CreatureId(1)), Position::new(103, 100, 7))
    };

    assert_eq!(outcome.hits.len(), 1);
    assert_eq!(outcome.hits[0].target, CreatureId(11));
}

#[test]
fn extended_shapes_resolve_diagonal_casts() {
    #[rustfmt::skip]
    let south = AreaDescription::new(3, vec![
        0, 3, 0,
        0, 1, 0,
        0, 1, 0,
    ]);
    #[rustfmt::skip]
    let south_east = AreaDescription::new(3, vec![
        3, 0, 0,
        0, 1, 0,
        0, 0, 1,
    ]);
    let mut area = AreaCombat::new();
    area.setup_area(&south).expect("south shape");
    area.setup_ext_area(&south_east).expect("diagonal shape");

    let mut combat = Combat::new();
    combat.set_area(area);
    combat.set_param(CombatParam::SoundEffect(SoundEffect(3)));

    let mut world = arena();
    world.spawn(player(1, CASTER));
    let config = CombatConfig::new();
    let mut sink = RecordingSink::default();
    let target = CASTER.offset(-3, -3);
    let outcome = {
        let mut ctx = CastContext::new(&mut world, &mut sink, CombatEnv::bare(&config), 1);
        combat.execute_area_combat(&mut ctx, Some(CreatureId(1)), target)
    };

    assert_eq!(
        outcome.tiles,
        [CASTER.offset(-2, -2), CASTER.offset(-1, -1), CASTER]
    );
    assert_eq!(sink.effects.last(), Some(&Effect::Sound(target, SoundEffect(3))));
}

#[test]
fn no_pvp_world_creates_the_no_pvp_field_variant() {
    let mut combat = fire_wave();
    combat.set_param(CombatParam::CreateItem(common::FIRE_FIELD));

    let mut world = MemoryWorld::new(WorldType::NoPvp).with_floor(90, 115, 90, 115, 7);
    world.spawn(player(1, CASTER));
    let config = CombatConfig::with_world_type(WorldType::NoPvp);
    let items = StaticItems;
    let mut sink = RecordingSink::default();
    {
        let env = CombatEnv::new(&config, Some(&items), None, None);
        let mut ctx = CastContext::new(&mut world, &mut sink, env, 1);
        combat.execute_area_combat(&mut ctx, Some(CreatureId(1)), Position::new(103, 100, 7));
    }

    assert_eq!(world.fields.len(), 3);
    assert!(
        world
            .fields
            .iter()
            .all(|&(_, item, owner)| item == common::FIRE_FIELD_NO_PVP
                && owner == Some(CreatureId(1)))
    );

    let mut pvp_world = arena();
    pvp_world.spawn(player(1, CASTER));
    {
        let env = CombatEnv::new(&config, Some(&items), None, None);
        let mut ctx = CastContext::new(&mut pvp_world, &mut sink, env, 2);
        combat.execute_area_combat(&mut ctx, Some(CreatureId(1)), Position::new(103, 100, 7));
    }
    assert!(pvp_world.fields.iter().all(|&(_, item, _)| item == common::FIRE_FIELD));
}
