//! Targeting rules. Pure reads, evaluated fresh for every tile and creature.

use super::CombatRejection;
use crate::config::CombatConfig;
use crate::env::{CreatureView, PlayerFlags, TileFlags, TileView, WorldModel, zone_at};
use crate::params::{CombatParams, TargetKinds};
use crate::types::{Skull, WorldType, Zone};

/// Whether `tile` can be affected by a cast from `caster`.
pub fn can_do_tile_combat(
    caster: Option<&CreatureView>,
    tile: &TileView,
    aggressive: bool,
) -> Result<(), CombatRejection> {
    if tile
        .flags
        .intersects(TileFlags::BLOCK_PROJECTILE | TileFlags::FLOOR_CHANGE | TileFlags::TELEPORT)
    {
        return Err(CombatRejection::NotEnoughRoom);
    }

    if let Some(caster) = caster {
        let (caster_z, tile_z) = (caster.position.z, tile.position.z);
        if caster_z < tile_z {
            return Err(CombatRejection::FirstGoDownstairs);
        }
        if caster_z > tile_z {
            return Err(CombatRejection::FirstGoUpstairs);
        }
        if caster.has_flag(PlayerFlags::IGNORE_PROTECTION_ZONE) {
            return Ok(());
        }
    }

    if aggressive && tile.has_flag(TileFlags::PROTECTION_ZONE) {
        return Err(CombatRejection::ProtectionZone);
    }
    Ok(())
}

/// Liveness and `valid_targets` filter.
pub fn is_target_valid(
    caster: Option<&CreatureView>,
    target: &CreatureView,
    params: &CombatParams,
) -> Result<(), CombatRejection> {
    if target.removed || target.is_dead() {
        return Err(CombatRejection::TargetGone(target.id));
    }

    let allowed = if caster.is_some_and(|c| c.id == target.id) {
        params.valid_targets.contains(TargetKinds::CASTER)
    } else {
        params.valid_targets.allows(target.kind)
    };
    if allowed {
        Ok(())
    } else {
        Err(CombatRejection::InvalidTargetKind)
    }
}

/// Effects from another creature never reach a target standing in a protection
/// zone, unless the caster ignores protection zones.
pub fn can_reach_target(
    world: &dyn WorldModel,
    caster: Option<&CreatureView>,
    target: &CreatureView,
) -> Result<(), CombatRejection> {
    let Some(caster) = caster else {
        return Ok(());
    };
    if caster.id == target.id || caster.has_flag(PlayerFlags::IGNORE_PROTECTION_ZONE) {
        return Ok(());
    }
    if zone_at(world, target.position) == Zone::Protection {
        return Err(CombatRejection::ProtectionZone);
    }
    Ok(())
}

/// Whether either player is shielded from PvP by level, vocation, or skull.
pub fn is_protected(
    world: &dyn WorldModel,
    config: &CombatConfig,
    attacker: &CreatureView,
    target: &CreatureView,
) -> bool {
    if attacker.level < config.protection_level || target.level < config.protection_level {
        return true;
    }
    if !attacker.vocation_allows_pvp || !target.vocation_allows_pvp {
        return true;
    }
    attacker.skull == Skull::Black && world.skull_client(attacker.id, target.id) == Skull::None
}

/// Players and creatures summoned by players.
pub fn is_player_combat(world: &dyn WorldModel, creature: &CreatureView) -> bool {
    creature.is_player() || player_master(world, creature).is_some()
}

/// Both creatures stand in a PvP zone.
pub fn is_in_pvp_zone(world: &dyn WorldModel, a: &CreatureView, b: &CreatureView) -> bool {
    zone_at(world, a.position) == Zone::Pvp && zone_at(world, b.position) == Zone::Pvp
}

/// Relationship rules between an aggressive caster and its target.
pub fn can_do_target_combat(
    world: &dyn WorldModel,
    config: &CombatConfig,
    attacker: Option<&CreatureView>,
    target: &CreatureView,
) -> Result<(), CombatRejection> {
    let Some(attacker) = attacker else {
        return Ok(());
    };

    if attacker.master == Some(target.id) {
        return Err(CombatRejection::OwnMaster);
    }

    if target.is_player() {
        if target.has_flag(PlayerFlags::CANNOT_BE_ATTACKED) {
            return Err(CombatRejection::CannotAttackPlayer);
        }

        if attacker.is_player() {
            if attacker.has_flag(PlayerFlags::CANNOT_ATTACK_PLAYER)
                || is_protected(world, config, attacker, target)
            {
                return Err(CombatRejection::CannotAttackPlayer);
            }
            check_alliance(config, attacker, target)?;

            let target_zone = zone_at(world, target.position);
            if target_zone == Zone::NoPvp {
                return Err(CombatRejection::NoPvpZone);
            }
            if zone_at(world, attacker.position) == Zone::NoPvp
                && !matches!(target_zone, Zone::NoPvp | Zone::Protection)
            {
                return Err(CombatRejection::NoPvpZone);
            }
        }

        if let Some(master) = player_master(world, attacker) {
            if master.has_flag(PlayerFlags::CANNOT_ATTACK_PLAYER) {
                return Err(CombatRejection::CannotAttackPlayer);
            }
            if zone_at(world, target.position) == Zone::NoPvp {
                return Err(CombatRejection::NoPvpZone);
            }
            if is_protected(world, config, &master, target) {
                return Err(CombatRejection::CannotAttackPlayer);
            }
            check_alliance(config, &master, target)?;
        }
    } else if target.is_monster() {
        if attacker.is_player() {
            if attacker.has_flag(PlayerFlags::CANNOT_ATTACK_MONSTER) {
                return Err(CombatRejection::CannotAttackCreature);
            }
            if player_master(world, target).is_some()
                && zone_at(world, target.position) == Zone::NoPvp
            {
                return Err(CombatRejection::NoPvpZone);
            }
        } else if attacker.is_monster()
            && player_master(world, target).is_none()
            && player_master(world, attacker).is_none()
        {
            return Err(CombatRejection::CannotAttackCreature);
        }
    }

    if world.world_type() == WorldType::NoPvp && is_player_combat(world, attacker) {
        let in_pvp_zone = is_in_pvp_zone(world, attacker, target);
        if target.is_player() && !in_pvp_zone {
            return Err(CombatRejection::CannotAttackPlayer);
        }
        if player_master(world, target).is_some() && !in_pvp_zone {
            return Err(CombatRejection::CannotAttackCreature);
        }
    }

    Ok(())
}

/// Rules for a player deliberately choosing `target`: zones, combat
/// permission, secure mode, then [`can_do_target_combat`].
pub fn can_target_creature(
    world: &dyn WorldModel,
    config: &CombatConfig,
    player: &CreatureView,
    target: &CreatureView,
) -> Result<(), CombatRejection> {
    if player.id == target.id {
        return Err(CombatRejection::SelfTarget);
    }

    if !player.has_flag(PlayerFlags::IGNORE_PROTECTION_ZONE) {
        let player_zone = zone_at(world, player.position);
        let target_zone = zone_at(world, target.position);
        if player_zone == Zone::Protection {
            return Err(CombatRejection::CasterInProtectionZone);
        }
        if target_zone == Zone::Protection {
            return Err(CombatRejection::ProtectionZone);
        }
        if is_player_combat(world, target)
            && (player_zone == Zone::NoPvp || target_zone == Zone::NoPvp)
        {
            return Err(CombatRejection::NoPvpZone);
        }
    }

    if player.has_flag(PlayerFlags::CANNOT_USE_COMBAT) || !target.attackable {
        return Err(if target.is_player() {
            CombatRejection::CannotAttackPlayer
        } else {
            CombatRejection::CannotAttackCreature
        });
    }

    if target.is_player() {
        if is_protected(world, config, player, target) {
            return Err(CombatRejection::CannotAttackPlayer);
        }
        if player.secure_mode
            && !is_in_pvp_zone(world, player, target)
            && world.skull_client(player.id, target.id) == Skull::None
        {
            return Err(CombatRejection::SecureMode);
        }
    }

    can_do_target_combat(world, config, Some(player), target)
}

fn player_master(world: &dyn WorldModel, creature: &CreatureView) -> Option<CreatureView> {
    creature
        .master
        .and_then(|id| world.creature(id))
        .filter(CreatureView::is_player)
}

fn check_alliance(
    config: &CombatConfig,
    attacker: &CreatureView,
    target: &CreatureView,
) -> Result<(), CombatRejection> {
    let same = |a: Option<u32>, b: Option<u32>| a.is_some() && a == b;
    if config.alliance.party && same(attacker.party, target.party) {
        return Err(CombatRejection::Ally);
    }
    if config.alliance.guild && same(attacker.guild, target.guild) {
        return Err(CombatRejection::Ally);
    }
    Ok(())
}
