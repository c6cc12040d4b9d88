//! Target and area resolution shared by [`Combat`](super::Combat) and the
//! free entry points used by weapons and runes.

use arrayvec::ArrayVec;
use tracing::{debug, trace, warn};

use super::validation::{
    can_do_target_combat, can_do_tile_combat, can_reach_target, can_target_creature,
    is_player_combat, is_target_valid,
};
use super::{AreaOutcome, CastContext, CombatRejection, Rejected, TargetOutcome};
use crate::area::AreaCombat;
use crate::config::CombatConfig;
use crate::damage::{CombatDamage, DamageBounds};
use crate::env::{Condition, CreatureView, EffectSink, TileFlags, TileView, WorldModel};
use crate::params::{AreaAnchor, CombatParams};
use crate::types::{
    CombatType, ConditionType, CreatureId, DistanceEffect, MAP_MAX_LAYERS, Position, WorldType,
};

/// What a cast does to each eligible creature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Mutation {
    Health,
    Mana,
    Condition,
    Dispel,
    /// Visual effects and hooks only.
    Effects,
}

impl Mutation {
    pub(crate) fn for_params(params: &CombatParams) -> Self {
        if params.combat_type != CombatType::None {
            if params.combat_type == CombatType::ManaDrain {
                Self::Mana
            } else {
                Self::Health
            }
        } else if !params.conditions.is_empty() {
            Self::Condition
        } else if params.dispel_type != ConditionType::None {
            Self::Dispel
        } else {
            Self::Effects
        }
    }

    pub(crate) fn changes_resource(self) -> bool {
        matches!(self, Self::Health | Self::Mana)
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) enum DamageSource {
    /// Rolled per target inside these bounds.
    Roll(DamageBounds),
    /// Precomputed by the caller.
    Fixed(CombatDamage),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Mode {
    Single,
    Area,
}

/// Runs every step for one creature: eligibility, target hook, damage,
/// effects (single target only), then the world mutation.
pub(crate) fn resolve_target(
    ctx: &mut CastContext<'_>,
    caster: Option<&CreatureView>,
    target: &CreatureView,
    params: &CombatParams,
    mutation: Mutation,
    source: DamageSource,
    mode: Mode,
) -> Result<TargetOutcome, CombatRejection> {
    let env = ctx.env;
    {
        let world: &dyn WorldModel = &*ctx.world;
        check_target(world, env.config(), caster, target, params, mode)?;
    }

    if let Some(hook) = params.hooks.target {
        if !hook.on_target(&env, caster, target).is_allowed() {
            return Err(CombatRejection::VetoedByScript);
        }
    }

    let damage = if mutation.changes_resource() {
        let mut damage = match source {
            DamageSource::Fixed(damage) => damage,
            DamageSource::Roll(bounds) => {
                let value = ctx.roll(bounds, target.id)?;
                let mut damage = CombatDamage::new(params.combat_type, value, params.origin);
                damage.blocked_by_armor = params.blocked_by_armor;
                damage.blocked_by_shield = params.blocked_by_shield;
                damage
            }
        };
        if !damage.is_healing() && caster.is_some_and(CreatureView::is_player) && target.is_player()
        {
            damage.scale(env.config().pvp_damage_percent);
        }
        Some(damage)
    } else {
        None
    };

    if mode == Mode::Single {
        if !params.impact_effect.is_none() {
            ctx.effects.magic_effect(target.position, params.impact_effect);
        }
        if let Some(caster) = caster {
            add_distance_effect(
                &mut *ctx.effects,
                caster.position,
                target.position,
                params.distance_effect,
            );
        }
        if !params.sound_effect.is_none() {
            ctx.effects.sound_effect(target.position, params.sound_effect);
        }
    }

    let caster_id = caster.map(|c| c.id);
    let mut outcome = TargetOutcome::new(target.id);
    outcome.damage = damage;

    let proceed = match (mutation, damage.as_ref()) {
        (Mutation::Health, Some(damage)) => ctx.world.change_health(caster_id, target.id, damage),
        (Mutation::Mana, Some(damage)) => ctx.world.change_mana(caster_id, target.id, damage),
        _ => true,
    };
    outcome.changed = proceed && mutation.changes_resource();
    if !proceed {
        return Ok(outcome);
    }

    if matches!(mutation, Mutation::Health | Mutation::Mana | Mutation::Condition) {
        outcome.conditions = params
            .conditions
            .iter()
            .filter(|condition| apply_condition(&mut *ctx.world, caster_id, target.id, condition))
            .count();
    }
    if matches!(mutation, Mutation::Health | Mutation::Mana | Mutation::Dispel)
        && params.dispel_type != ConditionType::None
    {
        outcome.dispelled = ctx.world.remove_condition(target.id, params.dispel_type);
    }

    Ok(outcome)
}

fn check_target(
    world: &dyn WorldModel,
    config: &CombatConfig,
    caster: Option<&CreatureView>,
    target: &CreatureView,
    params: &CombatParams,
    mode: Mode,
) -> Result<(), CombatRejection> {
    is_target_valid(caster, target, params)?;
    can_reach_target(world, caster, target)?;

    if !params.aggressive {
        return Ok(());
    }
    match caster {
        Some(caster) if caster.id == target.id => Err(CombatRejection::SelfTarget),
        Some(caster) if mode == Mode::Single && caster.is_player() => {
            can_target_creature(world, config, caster, target)
        }
        _ => can_do_target_combat(world, config, caster, target),
    }
}

/// Adds `condition` to `target` unless it is immune. Self-inflicted conditions
/// ignore immunity. The owner is recorded on the applied copy.
pub(crate) fn apply_condition(
    world: &mut dyn WorldModel,
    owner: Option<CreatureId>,
    target: CreatureId,
    condition: &Condition,
) -> bool {
    if owner != Some(target) && world.is_immune(target, condition.kind) {
        trace!(
            target: "combat::engine",
            creature = %target,
            condition = %condition.kind,
            "target is immune"
        );
        return false;
    }
    world.add_condition(target, condition.clone().with_owner(owner))
}

/// Resolves an area cast over a snapshot of the affected tiles.
pub(crate) fn resolve_area(
    ctx: &mut CastContext<'_>,
    caster: Option<CreatureId>,
    position: Position,
    area: Option<&AreaCombat>,
    params: &CombatParams,
    mutation: Mutation,
    bounds: DamageBounds,
) -> AreaOutcome {
    let caster = caster.and_then(|id| ctx.world.creature(id));
    let tiles = get_combat_area(
        &*ctx.world,
        caster.as_ref().map(|c| c.position),
        position,
        area,
        params.area_anchor,
    );

    let mut outcome = AreaOutcome::default();
    for tile in tiles {
        if let Err(reason) = can_do_tile_combat(caster.as_ref(), &tile, params.aggressive) {
            trace!(target: "combat::engine", position = %tile.position, %reason, "tile skipped");
            outcome.rejections.push(Rejected {
                position: tile.position,
                creature: None,
                reason,
            });
            continue;
        }

        let verdict = params
            .hooks
            .tile
            .map(|hook| hook.on_tile(&ctx.env, caster.as_ref(), &tile));
        if verdict.is_some_and(|v| !v.is_allowed()) {
            trace!(target: "combat::engine", position = %tile.position, "tile vetoed by script");
            outcome.rejections.push(Rejected {
                position: tile.position,
                creature: None,
                reason: CombatRejection::VetoedByScript,
            });
            continue;
        }

        combat_tile_effects(ctx, caster.as_ref(), &tile, params);
        outcome.tiles.push(tile.position);

        for id in targets_on(&tile, caster.as_ref(), params) {
            let result = match ctx.world.creature(id) {
                Some(target) => resolve_target(
                    ctx,
                    caster.as_ref(),
                    &target,
                    params,
                    mutation,
                    DamageSource::Roll(bounds),
                    Mode::Area,
                ),
                None => Err(CombatRejection::TargetGone(id)),
            };
            match result {
                Ok(hit) => outcome.hits.push(hit),
                Err(reason) => {
                    debug!(
                        target: "combat::engine",
                        caster = ?caster.as_ref().map(|c| c.id),
                        creature = %id,
                        %reason,
                        "target rejected"
                    );
                    outcome.rejections.push(Rejected {
                        position: tile.position,
                        creature: Some(id),
                        reason,
                    });
                }
            }
        }
    }

    post_combat_effects(&mut *ctx.effects, caster.as_ref(), position, params);
    outcome
}

fn targets_on(
    tile: &TileView,
    caster: Option<&CreatureView>,
    params: &CombatParams,
) -> ArrayVec<CreatureId, { CombatConfig::MAX_CREATURES_PER_TILE }> {
    if !params.target_caster_or_top_most {
        return tile.creatures.clone();
    }
    let mut targets = ArrayVec::new();
    let chosen = match caster {
        Some(caster) if tile.contains(caster.id) => Some(caster.id),
        _ => tile.top_creature(),
    };
    targets.extend(chosen);
    targets
}

/// Field creation and impact effect on an accepted tile.
fn combat_tile_effects(
    ctx: &mut CastContext<'_>,
    caster: Option<&CreatureView>,
    tile: &TileView,
    params: &CombatParams,
) {
    if params.item_id != 0 {
        let item_id = field_item_for(ctx, caster, tile, params.item_id);
        let owner = caster.map(|c| c.id);
        if !ctx.world.add_field(tile.position, item_id, owner) {
            trace!(target: "combat::engine", position = %tile.position, item_id, "field not placed");
        }
    }

    if !params.impact_effect.is_none() {
        ctx.effects.magic_effect(tile.position, params.impact_effect);
    }
}

/// Player-side casters create the no-PvP variant of a field in a no-PvP world
/// or zone.
fn field_item_for(
    ctx: &CastContext<'_>,
    caster: Option<&CreatureView>,
    tile: &TileView,
    item_id: u16,
) -> u16 {
    let Some(caster) = caster else {
        return item_id;
    };
    let world: &dyn WorldModel = &*ctx.world;
    let no_pvp = world.world_type() == WorldType::NoPvp || tile.has_flag(TileFlags::NO_PVP_ZONE);
    if !no_pvp || !is_player_combat(world, caster) {
        return item_id;
    }

    match ctx.env.items() {
        Ok(items) => items
            .field_type(item_id)
            .and_then(|field| field.no_pvp_variant)
            .unwrap_or(item_id),
        Err(error) => {
            warn!(target: "combat::engine", item_id, %error, "cannot resolve no-PvP field variant");
            item_id
        }
    }
}

/// Tiles an area cast affects.
///
/// With a shape, the facing follows `caster → position` and the shape is
/// anchored on the caster, or on `position` for [`AreaAnchor::Target`] or when
/// there is no caster. Without a shape, the single tile at `position`.
pub fn get_combat_area(
    world: &dyn WorldModel,
    caster: Option<Position>,
    position: Position,
    area: Option<&AreaCombat>,
    anchor: AreaAnchor,
) -> Vec<TileView> {
    if position.z >= MAP_MAX_LAYERS {
        return Vec::new();
    }

    match (area, anchor, caster) {
        (Some(area), AreaAnchor::Caster, Some(caster)) => area.get_list(caster, position, world),
        (Some(area), _, caster) => {
            area.get_list_anchored(caster.unwrap_or(position), position, position, world)
        }
        (None, ..) => vec![world.tile(position).unwrap_or_else(|| TileView::empty(position))],
    }
}

/// Area-level effects: projectile from the caster and sound at `position`.
pub fn post_combat_effects(
    effects: &mut dyn EffectSink,
    caster: Option<&CreatureView>,
    position: Position,
    params: &CombatParams,
) {
    if let Some(caster) = caster {
        add_distance_effect(effects, caster.position, position, params.distance_effect);
    }
    if !params.sound_effect.is_none() {
        effects.sound_effect(position, params.sound_effect);
    }
}

pub fn add_distance_effect(
    effects: &mut dyn EffectSink,
    from: Position,
    to: Position,
    effect: DistanceEffect,
) {
    if !effect.is_none() {
        effects.distance_effect(from, to, effect);
    }
}

fn resolve_single(
    ctx: &mut CastContext<'_>,
    caster: Option<CreatureId>,
    target: CreatureId,
    params: &CombatParams,
    mutation: Mutation,
    source: DamageSource,
) -> Result<TargetOutcome, CombatRejection> {
    let caster = caster.and_then(|id| ctx.world.creature(id));
    let Some(target) = ctx.world.creature(target) else {
        return Err(CombatRejection::TargetGone(target));
    };

    let result = resolve_target(ctx, caster.as_ref(), &target, params, mutation, source, Mode::Single);
    if let Err(reason) = &result {
        debug!(
            target: "combat::engine",
            caster = ?caster.as_ref().map(|c| c.id),
            creature = %target.id,
            %reason,
            "target rejected"
        );
    }
    result
}

pub(crate) fn resolve_target_by_id(
    ctx: &mut CastContext<'_>,
    caster: Option<CreatureId>,
    target: CreatureId,
    params: &CombatParams,
    bounds: DamageBounds,
) -> Result<TargetOutcome, CombatRejection> {
    resolve_single(
        ctx,
        caster,
        target,
        params,
        Mutation::for_params(params),
        DamageSource::Roll(bounds),
    )
}

/// Applies precomputed health damage to one creature.
pub fn do_combat_health_target(
    ctx: &mut CastContext<'_>,
    caster: Option<CreatureId>,
    target: CreatureId,
    damage: CombatDamage,
    params: &CombatParams,
) -> Result<TargetOutcome, CombatRejection> {
    resolve_single(ctx, caster, target, params, Mutation::Health, DamageSource::Fixed(damage))
}

/// Rolls health damage inside `bounds` for every creature in the area.
pub fn do_combat_health_area(
    ctx: &mut CastContext<'_>,
    caster: Option<CreatureId>,
    position: Position,
    area: Option<&AreaCombat>,
    bounds: DamageBounds,
    params: &CombatParams,
) -> AreaOutcome {
    resolve_area(ctx, caster, position, area, params, Mutation::Health, bounds)
}

/// Applies precomputed mana damage to one creature.
pub fn do_combat_mana_target(
    ctx: &mut CastContext<'_>,
    caster: Option<CreatureId>,
    target: CreatureId,
    damage: CombatDamage,
    params: &CombatParams,
) -> Result<TargetOutcome, CombatRejection> {
    resolve_single(ctx, caster, target, params, Mutation::Mana, DamageSource::Fixed(damage))
}

pub fn do_combat_mana_area(
    ctx: &mut CastContext<'_>,
    caster: Option<CreatureId>,
    position: Position,
    area: Option<&AreaCombat>,
    bounds: DamageBounds,
    params: &CombatParams,
) -> AreaOutcome {
    resolve_area(ctx, caster, position, area, params, Mutation::Mana, bounds)
}

pub fn do_combat_condition_target(
    ctx: &mut CastContext<'_>,
    caster: Option<CreatureId>,
    target: CreatureId,
    params: &CombatParams,
) -> Result<TargetOutcome, CombatRejection> {
    let source = DamageSource::Roll(DamageBounds::ZERO);
    resolve_single(ctx, caster, target, params, Mutation::Condition, source)
}

pub fn do_combat_condition_area(
    ctx: &mut CastContext<'_>,
    caster: Option<CreatureId>,
    position: Position,
    area: Option<&AreaCombat>,
    params: &CombatParams,
) -> AreaOutcome {
    let mutation = Mutation::Condition;
    resolve_area(ctx, caster, position, area, params, mutation, DamageBounds::ZERO)
}

pub fn do_combat_dispel_target(
    ctx: &mut CastContext<'_>,
    caster: Option<CreatureId>,
    target: CreatureId,
    params: &CombatParams,
) -> Result<TargetOutcome, CombatRejection> {
    let source = DamageSource::Roll(DamageBounds::ZERO);
    resolve_single(ctx, caster, target, params, Mutation::Dispel, source)
}

pub fn do_combat_dispel_area(
    ctx: &mut CastContext<'_>,
    caster: Option<CreatureId>,
    position: Position,
    area: Option<&AreaCombat>,
    params: &CombatParams,
) -> AreaOutcome {
    let mutation = Mutation::Dispel;
    resolve_area(ctx, caster, position, area, params, mutation, DamageBounds::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutation_follows_params_priority() {
        let mut params = CombatParams::default();
        assert_eq!(Mutation::for_params(&params), Mutation::Effects);

        params.dispel_type = ConditionType::Paralyze;
        assert_eq!(Mutation::for_params(&params), Mutation::Dispel);

        params.conditions.push(Condition::new(ConditionType::Haste, 1_000));
        assert_eq!(Mutation::for_params(&params), Mutation::Condition);

        params.combat_type = CombatType::Fire;
        assert_eq!(Mutation::for_params(&params), Mutation::Health);

        params.combat_type = CombatType::ManaDrain;
        assert_eq!(Mutation::for_params(&params), Mutation::Mana);
    }

    #[test]
    fn top_most_prefers_the_caster_tile() {
        let caster = CreatureView::player(CreatureId(1), Position::new(5, 5, 7));
        let tile = TileView::empty(caster.position)
            .with_creature(CreatureId(9))
            .with_creature(CreatureId(1));
        let params = CombatParams {
            target_caster_or_top_most: true,
            ..CombatParams::default()
        };

        assert_eq!(targets_on(&tile, Some(&caster), &params).as_slice(), [CreatureId(1)]);
        assert_eq!(targets_on(&tile, None, &params).as_slice(), [CreatureId(9)]);
        assert_eq!(
            targets_on(&tile, None, &CombatParams::default()).as_slice(),
            [CreatureId(9), CreatureId(1)]
        );
    }
}
