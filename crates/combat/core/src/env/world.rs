//! Live world access: tiles, creatures, and the mutations a cast performs.

use arrayvec::ArrayVec;
use bitflags::bitflags;

use crate::config::CombatConfig;
use crate::damage::CombatDamage;
use crate::types::{ConditionType, CreatureId, CreatureKind, Position, Skull, WorldType, Zone};

bitflags! {
    /// Static and dynamic properties of a tile relevant to combat.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct TileFlags: u8 {
        const PROTECTION_ZONE  = 1 << 0;
        const NO_PVP_ZONE      = 1 << 1;
        const PVP_ZONE         = 1 << 2;
        const BLOCK_PROJECTILE = 1 << 3;
        const FLOOR_CHANGE     = 1 << 4;
        const TELEPORT         = 1 << 5;
    }
}

bitflags! {
    /// Per-account permission flags of a player.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct PlayerFlags: u8 {
        const CANNOT_BE_ATTACKED     = 1 << 0;
        const CANNOT_ATTACK_PLAYER   = 1 << 1;
        const CANNOT_ATTACK_MONSTER  = 1 << 2;
        const CANNOT_USE_COMBAT      = 1 << 3;
        const IGNORE_PROTECTION_ZONE = 1 << 4;
    }
}

/// Creature stack of a tile, topmost first.
pub type TileCreatures = ArrayVec<CreatureId, { CombatConfig::MAX_CREATURES_PER_TILE }>;

/// Snapshot of one tile taken when an area is resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileView {
    pub position: Position,
    pub flags: TileFlags,
    pub creatures: TileCreatures,
}

impl TileView {
    pub fn new(position: Position, flags: TileFlags) -> Self {
        Self {
            position,
            flags,
            creatures: ArrayVec::new(),
        }
    }

    /// Placeholder for a position the world stores no tile for.
    pub fn empty(position: Position) -> Self {
        Self::new(position, TileFlags::empty())
    }

    /// Adds a creature at the bottom of the stack. Ignored once the stack is full.
    #[must_use]
    pub fn with_creature(mut self, id: CreatureId) -> Self {
        let _ = self.creatures.try_push(id);
        self
    }

    pub fn has_flag(&self, flag: TileFlags) -> bool {
        self.flags.contains(flag)
    }

    pub fn zone(&self) -> Zone {
        if self.flags.contains(TileFlags::PROTECTION_ZONE) {
            Zone::Protection
        } else if self.flags.contains(TileFlags::NO_PVP_ZONE) {
            Zone::NoPvp
        } else if self.flags.contains(TileFlags::PVP_ZONE) {
            Zone::Pvp
        } else {
            Zone::Normal
        }
    }

    pub fn top_creature(&self) -> Option<CreatureId> {
        self.creatures.first().copied()
    }

    pub fn contains(&self, id: CreatureId) -> bool {
        self.creatures.contains(&id)
    }
}

/// Snapshot of the creature attributes combat rules read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatureView {
    pub id: CreatureId,
    pub kind: CreatureKind,
    pub position: Position,
    pub health: i32,
    pub max_health: i32,
    pub mana: i32,
    pub level: u32,
    pub magic_level: u32,
    /// Skill of the equipped weapon's fighting style.
    pub skill: u32,
    /// Attack value of the equipped weapon.
    pub attack: u32,
    /// Owner of a summoned or convinced creature.
    pub master: Option<CreatureId>,
    pub party: Option<u32>,
    pub guild: Option<u32>,
    pub skull: Skull,
    pub flags: PlayerFlags,
    pub secure_mode: bool,
    pub vocation_allows_pvp: bool,
    pub attackable: bool,
    /// Set once the creature has left the world.
    pub removed: bool,
}

impl CreatureView {
    pub fn new(id: CreatureId, kind: CreatureKind, position: Position) -> Self {
        Self {
            id,
            kind,
            position,
            health: 100,
            max_health: 100,
            mana: 0,
            level: 1,
            magic_level: 0,
            skill: 10,
            attack: 0,
            master: None,
            party: None,
            guild: None,
            skull: Skull::None,
            flags: PlayerFlags::empty(),
            secure_mode: false,
            vocation_allows_pvp: true,
            attackable: true,
            removed: false,
        }
    }

    pub fn player(id: CreatureId, position: Position) -> Self {
        Self::new(id, CreatureKind::Player, position)
    }

    pub fn monster(id: CreatureId, position: Position) -> Self {
        Self::new(id, CreatureKind::Monster, position)
    }

    pub fn npc(id: CreatureId, position: Position) -> Self {
        Self {
            attackable: false,
            ..Self::new(id, CreatureKind::Npc, position)
        }
    }

    pub fn is_player(&self) -> bool {
        self.kind == CreatureKind::Player
    }

    pub fn is_monster(&self) -> bool {
        self.kind == CreatureKind::Monster
    }

    pub fn is_summon(&self) -> bool {
        self.master.is_some()
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Account flags only apply to players.
    pub fn has_flag(&self, flag: PlayerFlags) -> bool {
        self.is_player() && self.flags.contains(flag)
    }
}

/// A timed status effect carried by a creature.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Condition {
    pub kind: ConditionType,
    /// Duration in milliseconds. Negative means permanent.
    pub ticks: i32,
    /// Total damage dealt over the duration by damage-over-time conditions.
    #[cfg_attr(feature = "serde", serde(default))]
    pub total_damage: i32,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub owner: Option<CreatureId>,
}

impl Condition {
    pub fn new(kind: ConditionType, ticks: i32) -> Self {
        Self {
            kind,
            ticks,
            total_damage: 0,
            owner: None,
        }
    }

    #[must_use]
    pub fn with_damage(mut self, total_damage: i32) -> Self {
        self.total_damage = total_damage;
        self
    }

    #[must_use]
    pub fn with_owner(mut self, owner: Option<CreatureId>) -> Self {
        self.owner = owner;
        self
    }
}

/// Mutable access to the live world.
///
/// Reads return snapshots; a cast resolves an area once and does not observe
/// later population changes. Mutations report whether the world accepted them.
pub trait WorldModel {
    fn world_type(&self) -> WorldType;

    fn tile(&self, position: Position) -> Option<TileView>;

    fn creature(&self, id: CreatureId) -> Option<CreatureView>;

    fn is_sight_clear(&self, _from: Position, _to: Position) -> bool {
        true
    }

    /// Skull of `target` as shown to `viewer`.
    fn skull_client(&self, _viewer: CreatureId, target: CreatureId) -> Skull {
        self.creature(target).map_or(Skull::None, |c| c.skull)
    }

    fn is_immune(&self, id: CreatureId, kind: ConditionType) -> bool;

    fn change_health(
        &mut self,
        caster: Option<CreatureId>,
        target: CreatureId,
        damage: &CombatDamage,
    ) -> bool;

    fn change_mana(
        &mut self,
        caster: Option<CreatureId>,
        target: CreatureId,
        damage: &CombatDamage,
    ) -> bool;

    fn add_condition(&mut self, target: CreatureId, condition: Condition) -> bool;

    /// Removes every condition of `kind`. Returns whether any was removed.
    fn remove_condition(&mut self, target: CreatureId, kind: ConditionType) -> bool;

    fn add_field(&mut self, position: Position, item_id: u16, owner: Option<CreatureId>) -> bool;
}

/// Zone of a position, `Normal` where the world has no tile.
pub fn zone_at<W>(world: &W, position: Position) -> Zone
where
    W: WorldModel + ?Sized,
{
    world.tile(position).map_or(Zone::Normal, |tile| tile.zone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protection_zone_wins_over_other_zone_flags() {
        let tile = TileView::new(
            Position::new(1, 1, 7),
            TileFlags::PROTECTION_ZONE | TileFlags::PVP_ZONE,
        );
        assert_eq!(tile.zone(), Zone::Protection);
        assert_eq!(TileView::empty(Position::default()).zone(), Zone::Normal);
    }

    #[test]
    fn creature_stack_is_bounded() {
        let mut tile = TileView::empty(Position::default());
        for id in 0..20 {
            tile = tile.with_creature(CreatureId(id));
        }
        assert_eq!(tile.creatures.len(), CombatConfig::MAX_CREATURES_PER_TILE);
        assert_eq!(tile.top_creature(), Some(CreatureId(0)));
    }

    #[test]
    fn monster_flags_are_ignored() {
        let mut monster = CreatureView::monster(CreatureId(1), Position::default());
        monster.flags = PlayerFlags::CANNOT_BE_ATTACKED;
        assert!(!monster.has_flag(PlayerFlags::CANNOT_BE_ATTACKED));
    }
}
