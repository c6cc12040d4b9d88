//! Script callbacks attached to a combat definition.
//!
//! A definition holds at most one hook of each kind. Hooks are plain keys into
//! the [`ScriptHost`](crate::env::ScriptHost); a failing or missing host is
//! logged and the cast continues with the built-in behavior.

mod callbacks;

pub use callbacks::{FormulaHook, TargetHook, TileHook};

use std::fmt;

/// Opaque registration key of a script callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HookKey(pub u32);

impl fmt::Display for HookKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hook#{}", self.0)
    }
}

/// Outcome of a tile or target filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HookVerdict {
    #[default]
    Allow,
    Deny,
}

impl HookVerdict {
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Any one of the callbacks a definition can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CombatHook {
    Formula(FormulaHook),
    Tile(TileHook),
    Target(TargetHook),
}

/// The callback slots of a definition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CombatHooks {
    pub formula: Option<FormulaHook>,
    pub tile: Option<TileHook>,
    pub target: Option<TargetHook>,
}

impl CombatHooks {
    /// Stores `hook` in its slot and returns the hook it replaced.
    pub fn set(&mut self, hook: CombatHook) -> Option<CombatHook> {
        match hook {
            CombatHook::Formula(hook) => self.formula.replace(hook).map(CombatHook::Formula),
            CombatHook::Tile(hook) => self.tile.replace(hook).map(CombatHook::Tile),
            CombatHook::Target(hook) => self.target.replace(hook).map(CombatHook::Target),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.formula.is_none() && self.tile.is_none() && self.target.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_kind_has_a_single_slot() {
        let mut hooks = CombatHooks::default();
        assert!(hooks.is_empty());

        assert_eq!(hooks.set(CombatHook::Tile(TileHook::new(HookKey(1)))), None);
        assert_eq!(hooks.set(CombatHook::Target(TargetHook::new(HookKey(2)))), None);

        let replaced = hooks.set(CombatHook::Tile(TileHook::new(HookKey(3))));
        assert_eq!(replaced, Some(CombatHook::Tile(TileHook::new(HookKey(1)))));
        assert_eq!(hooks.tile.map(|h| h.key()), Some(HookKey(3)));
        assert_eq!(hooks.target.map(|h| h.key()), Some(HookKey(2)));
        assert!(hooks.formula.is_none());
    }
}
