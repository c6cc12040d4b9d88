//! Lingering fields left on tiles by area effects.

use tracing::debug;

use crate::engine::validation::{is_player_combat, is_protected};
use crate::engine::{CastContext, apply_condition};
use crate::env::{CombatEnv, FieldType, OracleError, WorldModel, zone_at};
use crate::types::{CombatType, CreatureId, WorldType, Zone};

/// A field item on a tile. Everything but identity and ownership comes from
/// the item type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MagicField {
    item_id: u16,
    created_at: u64,
    owner: Option<CreatureId>,
}

impl MagicField {
    /// How long after creation the owner is credited for the field's damage.
    pub const OWNERSHIP_WINDOW_MS: u64 = 5_000;

    pub const fn new(item_id: u16, created_at: u64) -> Self {
        Self {
            item_id,
            created_at,
            owner: None,
        }
    }

    #[must_use]
    pub const fn with_owner(mut self, owner: Option<CreatureId>) -> Self {
        self.owner = owner;
        self
    }

    pub const fn item_id(&self) -> u16 {
        self.item_id
    }

    pub const fn created_at(&self) -> u64 {
        self.created_at
    }

    pub const fn owner(&self) -> Option<CreatureId> {
        self.owner
    }

    pub fn field_type(&self, env: &CombatEnv<'_>) -> Result<Option<FieldType>, OracleError> {
        Ok(env.items()?.field_type(self.item_id))
    }

    /// Unknown item types are replaceable.
    pub fn is_replaceable(&self, env: &CombatEnv<'_>) -> Result<bool, OracleError> {
        Ok(self.field_type(env)?.is_none_or(|field| field.replaceable))
    }

    pub fn combat_type(&self, env: &CombatEnv<'_>) -> Result<CombatType, OracleError> {
        Ok(self
            .field_type(env)?
            .map_or(CombatType::None, |field| field.combat_type))
    }

    /// Total damage of the field's condition, `0` without one.
    pub fn damage(&self, env: &CombatEnv<'_>) -> Result<i32, OracleError> {
        Ok(self
            .field_type(env)?
            .and_then(|field| field.condition)
            .map_or(0, |condition| condition.total_damage))
    }

    /// Applies the field's condition to `creature`, which just stepped onto
    /// the field at time `now`. Returns whether a condition was added.
    pub fn on_step_in_field(
        &self,
        ctx: &mut CastContext<'_>,
        creature: CreatureId,
        now: u64,
    ) -> Result<bool, OracleError> {
        let Some(condition) = self.field_type(&ctx.env)?.and_then(|field| field.condition) else {
            return Ok(false);
        };
        let Some(target) = ctx.world.creature(creature) else {
            return Ok(false);
        };

        let mut credited = None;
        if let Some(owner_id) = self.owner.filter(|&id| id != target.id) {
            let world: &dyn WorldModel = &*ctx.world;
            let owner = world.creature(owner_id);

            let no_pvp = world.world_type() == WorldType::NoPvp
                || zone_at(world, target.position) == Zone::NoPvp;
            let player_side_owner = owner.as_ref().is_some_and(|o| is_player_combat(world, o));
            let shielded = (no_pvp && player_side_owner && is_player_combat(world, &target))
                || owner.as_ref().is_some_and(|o| {
                    o.is_player()
                        && target.is_player()
                        && is_protected(world, ctx.env.config(), o, &target)
                });
            if shielded {
                debug!(
                    target: "combat::field",
                    item_id = self.item_id,
                    owner = %owner_id,
                    creature = %target.id,
                    "field is harmless to this creature"
                );
                return Ok(false);
            }

            if now.saturating_sub(self.created_at) <= Self::OWNERSHIP_WINDOW_MS {
                credited = Some(owner_id);
            }
        }

        Ok(apply_condition(&mut *ctx.world, credited, target.id, &condition))
    }
}
