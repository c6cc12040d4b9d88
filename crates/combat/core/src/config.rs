use crate::types::WorldType;

/// Which social relationships shield players from each other's aggressive effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AllianceRules {
    /// Members of the same party cannot harm each other.
    pub party: bool,
    /// Members of the same guild cannot harm each other.
    pub guild: bool,
}

impl Default for AllianceRules {
    fn default() -> Self {
        Self {
            party: true,
            guild: true,
        }
    }
}

/// Combat rules and tunable parameters shared by every cast on a server.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Server-wide PvP ruleset.
    pub world_type: WorldType,

    /// Players below this level can neither attack nor be attacked by players.
    pub protection_level: u32,

    /// Percentage of damage kept when a player damages another player.
    pub pvp_damage_percent: u32,

    /// Party/guild protection for aggressive effects.
    pub alliance: AllianceRules,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// Upper bound on creatures stacked on a single tile.
    pub const MAX_CREATURES_PER_TILE: usize = 10;

    // ===== content limits =====
    /// Longest cone a shape may describe, in tiles.
    pub const MAX_CONE_LENGTH: i32 = 32;
    /// Largest circle radius a shape may describe, in tiles.
    pub const MAX_CIRCLE_RADIUS: i32 = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_PROTECTION_LEVEL: u32 = 1;
    pub const DEFAULT_PVP_DAMAGE_PERCENT: u32 = 50;

    pub fn new() -> Self {
        Self {
            world_type: WorldType::default(),
            protection_level: Self::DEFAULT_PROTECTION_LEVEL,
            pvp_damage_percent: Self::DEFAULT_PVP_DAMAGE_PERCENT,
            alliance: AllianceRules::default(),
        }
    }

    pub fn with_world_type(world_type: WorldType) -> Self {
        Self {
            world_type,
            ..Self::new()
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
