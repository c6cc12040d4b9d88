//! Combat definitions and their execution.
//!
//! A [`Combat`] is built once at load time (parameters, shape, formula, hooks)
//! and then shared read-only. Every cast borrows the world and effect sink
//! through a [`CastContext`]; the definition itself is never mutated by a cast.

mod outcome;
mod pipeline;
mod registry;
pub mod validation;

pub use outcome::{AreaOutcome, CombatRejection, Rejected, TargetOutcome};
pub use pipeline::{
    add_distance_effect, do_combat_condition_area, do_combat_condition_target,
    do_combat_dispel_area, do_combat_dispel_target, do_combat_health_area,
    do_combat_health_target, do_combat_mana_area, do_combat_mana_target, get_combat_area,
    post_combat_effects,
};
pub use registry::{CombatHandle, CombatRegistry, RegistryError, Released};

use std::sync::Arc;

use tracing::debug;

use crate::area::AreaCombat;
use crate::damage::{ConfigError, DamageBounds, FormulaType, LinearFormula};
use crate::env::{
    CombatEnv, Condition, CreatureView, EffectSink, OracleError, WorldModel, compute_seed,
};
use crate::hooks::CombatHook;
use crate::params::{CombatParam, CombatParams};
use crate::types::{CombatOrigin, CreatureId, Position};

pub(crate) use pipeline::apply_condition;
use pipeline::Mutation;

/// Definition shared by spell tables and script handles.
pub type SharedCombat = Arc<Combat>;

/// Everything a single cast borrows.
pub struct CastContext<'a> {
    pub world: &'a mut dyn WorldModel,
    pub effects: &'a mut dyn EffectSink,
    pub env: CombatEnv<'a>,
    /// Cast sequence number mixed into every roll.
    pub nonce: u64,
    rolls: u32,
}

impl<'a> CastContext<'a> {
    pub fn new(
        world: &'a mut dyn WorldModel,
        effects: &'a mut dyn EffectSink,
        env: CombatEnv<'a>,
        nonce: u64,
    ) -> Self {
        Self {
            world,
            effects,
            env,
            nonce,
            rolls: 0,
        }
    }

    /// Rolls inside `bounds` for `subject`. A degenerate range needs no rng.
    pub(crate) fn roll(
        &mut self,
        bounds: DamageBounds,
        subject: CreatureId,
    ) -> Result<i32, OracleError> {
        let bounds = bounds.ordered();
        if bounds.min == bounds.max {
            return Ok(bounds.min);
        }
        let rng = self.env.rng()?;
        let seed = compute_seed(self.env.seed(), self.nonce, subject.0, self.rolls);
        self.rolls = self.rolls.wrapping_add(1);
        Ok(bounds.roll(rng, seed))
    }
}

/// A configured combat effect: what it does, where, and how much.
#[derive(Debug, Default)]
pub struct Combat {
    params: CombatParams,
    area: Option<AreaCombat>,
    formula: LinearFormula,
}

impl Combat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn params(&self) -> &CombatParams {
        &self.params
    }

    /// Returns whether the stored value changed.
    pub fn set_param(&mut self, param: CombatParam) -> bool {
        self.params.apply(param)
    }

    /// Installs `hook` in its slot, returning the hook it replaced.
    pub fn set_callback(&mut self, hook: CombatHook) -> Option<CombatHook> {
        self.params.hooks.set(hook)
    }

    pub fn add_condition(&mut self, condition: Condition) {
        self.params.conditions.push(condition);
    }

    pub fn clear_conditions(&mut self) {
        self.params.conditions.clear();
    }

    pub fn set_origin(&mut self, origin: CombatOrigin) {
        self.params.origin = origin;
    }

    pub fn set_area(&mut self, area: AreaCombat) {
        self.area = Some(area);
    }

    pub fn has_area(&self) -> bool {
        self.area.is_some()
    }

    pub fn area(&self) -> Option<&AreaCombat> {
        self.area.as_ref()
    }

    /// # Errors
    ///
    /// Returns `ConfigError::NonFiniteCoefficient` if any coefficient is NaN or
    /// infinite; the previous formula is kept.
    pub fn set_player_combat_values(
        &mut self,
        kind: FormulaType,
        mina: f64,
        minb: f64,
        maxa: f64,
        maxb: f64,
    ) -> Result<(), ConfigError> {
        self.formula = LinearFormula::new(kind, mina, minb, maxa, maxb)?;
        Ok(())
    }

    pub fn formula(&self) -> &LinearFormula {
        &self.formula
    }

    /// Bounds for one cast: the formula hook if set, else the linear formula.
    pub fn damage_bounds(&self, env: &CombatEnv<'_>, caster: Option<&CreatureView>) -> DamageBounds {
        match self.params.hooks.formula {
            Some(hook) => hook.min_max_values(env, caster, self.params.use_charges),
            None => self.formula.bounds(caster),
        }
    }

    /// Applies this effect to a single creature.
    pub fn execute_target_combat(
        &self,
        ctx: &mut CastContext<'_>,
        caster: Option<CreatureId>,
        target: CreatureId,
    ) -> Result<TargetOutcome, CombatRejection> {
        let bounds = self.cast_bounds(ctx, caster);
        pipeline::resolve_target_by_id(ctx, caster, target, &self.params, bounds)
    }

    /// Applies this effect to every tile and creature of the shape cast
    /// towards `position`, or to the tile at `position` without a shape.
    pub fn execute_area_combat(
        &self,
        ctx: &mut CastContext<'_>,
        caster: Option<CreatureId>,
        position: Position,
    ) -> AreaOutcome {
        let bounds = self.cast_bounds(ctx, caster);
        let outcome = pipeline::resolve_area(
            ctx,
            caster,
            position,
            self.area.as_ref(),
            &self.params,
            Mutation::for_params(&self.params),
            bounds,
        );
        debug!(
            target: "combat::engine",
            caster = ?caster,
            %position,
            tiles = outcome.tiles.len(),
            hits = outcome.hits.len(),
            rejections = outcome.rejections.len(),
            "area combat resolved"
        );
        outcome
    }

    fn cast_bounds(&self, ctx: &CastContext<'_>, caster: Option<CreatureId>) -> DamageBounds {
        if !Mutation::for_params(&self.params).changes_resource() {
            return DamageBounds::ZERO;
        }
        let caster = caster.and_then(|id| ctx.world.creature(id));
        self.damage_bounds(&ctx.env, caster.as_ref())
    }
}
