//! Static description of what a combat does to each target.

use bitflags::bitflags;

use crate::env::Condition;
use crate::hooks::CombatHooks;
use crate::types::{
    CombatOrigin, CombatType, ConditionType, CreatureKind, DistanceEffect, MagicEffect,
    SoundEffect,
};

bitflags! {
    /// Creature kinds an effect may land on.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct TargetKinds: u8 {
        const CASTER   = 1 << 0;
        const PLAYERS  = 1 << 1;
        const MONSTERS = 1 << 2;
        const NPCS     = 1 << 3;
    }
}

impl TargetKinds {
    pub fn allows(self, kind: CreatureKind) -> bool {
        match kind {
            CreatureKind::Player => self.contains(Self::PLAYERS),
            CreatureKind::Monster => self.contains(Self::MONSTERS),
            CreatureKind::Npc => self.contains(Self::NPCS),
        }
    }
}

impl Default for TargetKinds {
    fn default() -> Self {
        Self::CASTER | Self::PLAYERS | Self::MONSTERS
    }
}

/// Where an area shape's center is placed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AreaAnchor {
    /// On the caster, facing the target position (waves, beams).
    #[default]
    Caster,
    /// On the target position (runes, explosions).
    Target,
}

/// A single parameter assignment accepted by [`crate::Combat::set_param`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CombatParam {
    Type(CombatType),
    Effect(MagicEffect),
    DistanceEffect(DistanceEffect),
    SoundEffect(SoundEffect),
    BlockArmor(bool),
    BlockShield(bool),
    TargetCasterOrTopMost(bool),
    CreateItem(u16),
    Aggressive(bool),
    Dispel(ConditionType),
    UseCharges(bool),
    ValidTargets(TargetKinds),
    Anchor(AreaAnchor),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombatParams {
    pub conditions: Vec<Condition>,
    pub combat_type: CombatType,
    pub origin: CombatOrigin,
    pub dispel_type: ConditionType,
    pub impact_effect: MagicEffect,
    pub distance_effect: DistanceEffect,
    pub sound_effect: SoundEffect,
    /// Field item created on every affected tile, `0` for none.
    pub item_id: u16,
    pub blocked_by_armor: bool,
    pub blocked_by_shield: bool,
    pub aggressive: bool,
    pub use_charges: bool,
    /// Hit only the caster (on its own tile) or the topmost creature of a tile.
    pub target_caster_or_top_most: bool,
    pub valid_targets: TargetKinds,
    pub area_anchor: AreaAnchor,
    pub hooks: CombatHooks,
}

impl Default for CombatParams {
    fn default() -> Self {
        Self {
            conditions: Vec::new(),
            combat_type: CombatType::None,
            origin: CombatOrigin::Spell,
            dispel_type: ConditionType::None,
            impact_effect: MagicEffect::NONE,
            distance_effect: DistanceEffect::NONE,
            sound_effect: SoundEffect::NONE,
            item_id: 0,
            blocked_by_armor: false,
            blocked_by_shield: false,
            aggressive: true,
            use_charges: false,
            target_caster_or_top_most: false,
            valid_targets: TargetKinds::default(),
            area_anchor: AreaAnchor::Caster,
            hooks: CombatHooks::default(),
        }
    }
}

impl CombatParams {
    /// Applies `param`, returning whether the stored value changed.
    pub fn apply(&mut self, param: CombatParam) -> bool {
        fn store<T: PartialEq>(slot: &mut T, value: T) -> bool {
            if *slot == value {
                return false;
            }
            *slot = value;
            true
        }

        match param {
            CombatParam::Type(value) => store(&mut self.combat_type, value),
            CombatParam::Effect(value) => store(&mut self.impact_effect, value),
            CombatParam::DistanceEffect(value) => store(&mut self.distance_effect, value),
            CombatParam::SoundEffect(value) => store(&mut self.sound_effect, value),
            CombatParam::BlockArmor(value) => store(&mut self.blocked_by_armor, value),
            CombatParam::BlockShield(value) => store(&mut self.blocked_by_shield, value),
            CombatParam::TargetCasterOrTopMost(value) => {
                store(&mut self.target_caster_or_top_most, value)
            }
            CombatParam::CreateItem(value) => store(&mut self.item_id, value),
            CombatParam::Aggressive(value) => store(&mut self.aggressive, value),
            CombatParam::Dispel(value) => store(&mut self.dispel_type, value),
            CombatParam::UseCharges(value) => store(&mut self.use_charges, value),
            CombatParam::ValidTargets(value) => store(&mut self.valid_targets, value),
            CombatParam::Anchor(value) => store(&mut self.area_anchor, value),
        }
    }
}
