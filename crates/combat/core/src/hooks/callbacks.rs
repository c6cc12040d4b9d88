use tracing::warn;

use super::{HookKey, HookVerdict};
use crate::damage::DamageBounds;
use crate::env::{CombatEnv, CreatureView, ScriptError, ScriptHost, TileView};

fn host<'a>(env: &CombatEnv<'a>) -> Result<&'a dyn ScriptHost, ScriptError> {
    env.scripts().map_err(|_| ScriptError::HostUnavailable)
}

/// Script-computed damage bounds, replacing the linear formula.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FormulaHook {
    key: HookKey,
}

impl FormulaHook {
    pub const fn new(key: HookKey) -> Self {
        Self { key }
    }

    pub const fn key(&self) -> HookKey {
        self.key
    }

    /// Evaluates the formula. A failure deals no damage.
    pub fn min_max_values(
        &self,
        env: &CombatEnv<'_>,
        caster: Option<&CreatureView>,
        use_charges: bool,
    ) -> DamageBounds {
        let result = host(env).and_then(|host| host.min_max_values(self.key, caster, use_charges));
        match result {
            Ok(bounds) => bounds,
            Err(error) => {
                warn!(
                    target: "combat::hooks",
                    key = %self.key,
                    caster = ?caster.map(|c| c.id),
                    %error,
                    "formula hook failed, dealing no damage"
                );
                DamageBounds::ZERO
            }
        }
    }
}

/// Per-tile filter run before a tile is affected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileHook {
    key: HookKey,
}

impl TileHook {
    pub const fn new(key: HookKey) -> Self {
        Self { key }
    }

    pub const fn key(&self) -> HookKey {
        self.key
    }

    /// Asks the script about `tile`. A failure allows the tile.
    pub fn on_tile(
        &self,
        env: &CombatEnv<'_>,
        caster: Option<&CreatureView>,
        tile: &TileView,
    ) -> HookVerdict {
        let result = host(env).and_then(|host| host.on_tile_combat(self.key, caster, tile));
        match result {
            Ok(verdict) => verdict,
            Err(error) => {
                warn!(
                    target: "combat::hooks",
                    key = %self.key,
                    caster = ?caster.map(|c| c.id),
                    position = %tile.position,
                    %error,
                    "tile hook failed, allowing tile"
                );
                HookVerdict::Allow
            }
        }
    }
}

/// Per-target filter run after the built-in eligibility checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TargetHook {
    key: HookKey,
}

impl TargetHook {
    pub const fn new(key: HookKey) -> Self {
        Self { key }
    }

    pub const fn key(&self) -> HookKey {
        self.key
    }

    /// Asks the script about `target`. A failure allows the target.
    pub fn on_target(
        &self,
        env: &CombatEnv<'_>,
        caster: Option<&CreatureView>,
        target: &CreatureView,
    ) -> HookVerdict {
        let result = host(env).and_then(|host| host.on_target_combat(self.key, caster, target));
        match result {
            Ok(verdict) => verdict,
            Err(error) => {
                warn!(
                    target: "combat::hooks",
                    key = %self.key,
                    caster = ?caster.map(|c| c.id),
                    creature = %target.id,
                    %error,
                    "target hook failed, allowing target"
                );
                HookVerdict::Allow
            }
        }
    }
}
