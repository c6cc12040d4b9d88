//! Shared value types: positions, creature ids, combat and condition kinds,
//! client effect identifiers.

use std::fmt;

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Number of floors a world holds. Positions on `z >= MAP_MAX_LAYERS` are never
/// resolved into tiles.
pub const MAP_MAX_LAYERS: u8 = 16;

/// Absolute world position. `y` grows southward, `z` is the floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: u8,
}

impl Position {
    pub const fn new(x: i32, y: i32, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Returns this position shifted on the same floor.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z,
        }
    }

    /// Horizontal offset from `origin` to `self`.
    pub const fn offset_x(self, origin: Position) -> i32 {
        self.x - origin.x
    }

    /// Vertical offset from `origin` to `self`.
    pub const fn offset_y(self, origin: Position) -> i32 {
        self.y - origin.y
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Unique identifier for a creature in the world model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreatureId(pub u32);

impl fmt::Display for CreatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Broad creature classification used by targeting rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CreatureKind {
    Player,
    Monster,
    Npc,
}

/// Damage/heal classification of an effect.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CombatType {
    #[default]
    None,
    Physical,
    Energy,
    Earth,
    Fire,
    Undefined,
    LifeDrain,
    ManaDrain,
    Healing,
    Drown,
    Ice,
    Holy,
    Death,
}

impl CombatType {
    /// Healing is the only type whose positive values are not damage.
    pub const fn is_healing(self) -> bool {
        matches!(self, Self::Healing)
    }
}

/// What caused an effect; consumed by resistance and immunity rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CombatOrigin {
    None,
    Condition,
    #[default]
    Spell,
    Melee,
    Ranged,
}

/// Condition category. Also the dispel selector.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ConditionType {
    #[default]
    None,
    Poison,
    Fire,
    Energy,
    Bleeding,
    Haste,
    Paralyze,
    Outfit,
    Invisible,
    Light,
    ManaShield,
    InFight,
    Drunk,
    Regeneration,
    Drown,
    Muted,
    Freezing,
    Dazzled,
    Cursed,
}

/// Maps a damage-over-time condition to the damage type it deals.
pub const fn condition_to_damage_type(kind: ConditionType) -> CombatType {
    match kind {
        ConditionType::Fire => CombatType::Fire,
        ConditionType::Energy => CombatType::Energy,
        ConditionType::Bleeding => CombatType::Physical,
        ConditionType::Drown => CombatType::Drown,
        ConditionType::Poison => CombatType::Earth,
        ConditionType::Freezing => CombatType::Ice,
        ConditionType::Dazzled => CombatType::Holy,
        ConditionType::Cursed => CombatType::Death,
        _ => CombatType::None,
    }
}

/// Maps a damage type to the damage-over-time condition of the same element.
pub const fn damage_to_condition_type(kind: CombatType) -> ConditionType {
    match kind {
        CombatType::Fire => ConditionType::Fire,
        CombatType::Energy => ConditionType::Energy,
        CombatType::Drown => ConditionType::Drown,
        CombatType::Earth => ConditionType::Poison,
        CombatType::Ice => ConditionType::Freezing,
        CombatType::Holy => ConditionType::Dazzled,
        CombatType::Death => ConditionType::Cursed,
        CombatType::Physical => ConditionType::Bleeding,
        _ => ConditionType::None,
    }
}

/// Client-side magic effect drawn on a tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MagicEffect(pub u8);

impl MagicEffect {
    pub const NONE: Self = Self(0);
    pub const DRAW_BLOOD: Self = Self(1);
    pub const FIRE_AREA: Self = Self(7);
    pub const ENERGY_AREA: Self = Self(12);
    pub const POISON_AREA: Self = Self(21);

    pub const fn is_none(self) -> bool {
        self.0 == Self::NONE.0
    }
}

/// Client-side projectile drawn between two positions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceEffect(pub u8);

impl DistanceEffect {
    pub const NONE: Self = Self(0);
    pub const FIRE: Self = Self(4);
    pub const ENERGY: Self = Self(5);

    pub const fn is_none(self) -> bool {
        self.0 == Self::NONE.0
    }
}

/// Client-side sound played at a position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SoundEffect(pub u16);

impl SoundEffect {
    pub const NONE: Self = Self(0);

    pub const fn is_none(self) -> bool {
        self.0 == Self::NONE.0
    }
}

/// PvP marking of a player as seen by another player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Skull {
    #[default]
    None,
    Yellow,
    Green,
    White,
    Red,
    Black,
    Orange,
}

/// Server-wide PvP ruleset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[strum(serialize_all = "kebab-case")]
pub enum WorldType {
    #[default]
    Pvp,
    NoPvp,
    PvpEnforced,
}

/// Zone a creature currently stands in, derived from its tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Zone {
    #[default]
    Normal,
    Protection,
    NoPvp,
    Pvp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn element_conditions_round_trip_through_damage_types() {
        for kind in ConditionType::iter() {
            let damage = condition_to_damage_type(kind);
            if damage != CombatType::None {
                assert_eq!(damage_to_condition_type(damage), kind, "{kind}");
            }
        }
    }

    #[test]
    fn combat_type_parses_from_snake_case() {
        assert_eq!("mana_drain".parse::<CombatType>(), Ok(CombatType::ManaDrain));
        assert_eq!(CombatType::LifeDrain.to_string(), "life_drain");
    }
}
