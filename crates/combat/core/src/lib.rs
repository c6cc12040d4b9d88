//! Area-of-effect and single-target combat resolution for a tile world.
//!
//! `combat-core` turns authored shapes into directional tile sets, decides which
//! tiles and creatures an effect may reach, rolls damage, and routes every
//! mutation through the [`env::WorldModel`] supplied by the server. Definitions
//! are built once ([`Combat`]) and shared read-only across casts.
pub mod area;
pub mod config;
pub mod damage;
pub mod engine;
pub mod env;
pub mod error;
pub mod field;
pub mod hooks;
pub mod params;
pub mod types;

pub use area::{AreaCombat, AreaDescription, AreaError, CellKind, Direction, MatrixArea, MatrixOperation};
pub use config::{AllianceRules, CombatConfig};
pub use damage::{
    CombatDamage, ConfigError, DamageBounds, DamageComponent, FormulaType, LinearFormula,
};
pub use engine::{
    AreaOutcome, CastContext, Combat, CombatHandle, CombatRegistry, CombatRejection,
    RegistryError, Rejected, Released, SharedCombat, TargetOutcome, add_distance_effect,
    do_combat_condition_area, do_combat_condition_target, do_combat_dispel_area,
    do_combat_dispel_target, do_combat_health_area, do_combat_health_target, do_combat_mana_area,
    do_combat_mana_target, get_combat_area, post_combat_effects,
};
pub use env::{
    CombatEnv, Condition, CreatureView, EffectSink, FieldType, ItemTypeOracle, NullEffects,
    OracleError, PcgRng, PlayerFlags, RngOracle, ScriptError, ScriptHost, TileFlags, TileView,
    WorldModel,
};
pub use error::{CombatError, ErrorSeverity};
pub use field::MagicField;
pub use hooks::{CombatHook, CombatHooks, FormulaHook, HookKey, HookVerdict, TargetHook, TileHook};
pub use params::{AreaAnchor, CombatParam, CombatParams, TargetKinds};
pub use types::{
    CombatOrigin, CombatType, ConditionType, CreatureId, CreatureKind, DistanceEffect,
    MAP_MAX_LAYERS, MagicEffect, Position, Skull, SoundEffect, WorldType, Zone,
    condition_to_damage_type, damage_to_condition_type,
};
