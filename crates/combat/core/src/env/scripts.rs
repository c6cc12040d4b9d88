//! Boundary to the embedded scripting runtime.

use super::{CreatureView, TileView};
use crate::damage::DamageBounds;
use crate::error::{CombatError, ErrorSeverity};
use crate::hooks::{HookKey, HookVerdict};

/// Invokes script callbacks registered under a [`HookKey`].
///
/// Implementations own whatever interpreter state they need; calls may have
/// script-side effects of their own.
pub trait ScriptHost: Send + Sync {
    /// Evaluates a damage formula. `use_charges` is set once per cast so the
    /// script can consume rune or ammunition charges.
    fn min_max_values(
        &self,
        key: HookKey,
        caster: Option<&CreatureView>,
        use_charges: bool,
    ) -> Result<DamageBounds, ScriptError>;

    fn on_tile_combat(
        &self,
        key: HookKey,
        caster: Option<&CreatureView>,
        tile: &TileView,
    ) -> Result<HookVerdict, ScriptError>;

    fn on_target_combat(
        &self,
        key: HookKey,
        caster: Option<&CreatureView>,
        target: &CreatureView,
    ) -> Result<HookVerdict, ScriptError>;
}

/// Failure reported by a script callback.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("no script host is available")]
    HostUnavailable,

    #[error("no callback registered under {0}")]
    UnknownKey(HookKey),

    #[error("callback {key} failed: {message}")]
    Runtime { key: HookKey, message: String },

    #[error("callback {key} returned an unusable value: {message}")]
    BadReturn { key: HookKey, message: String },
}

impl CombatError for ScriptError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::HostUnavailable => "SCRIPT_HOST_UNAVAILABLE",
            Self::UnknownKey(_) => "SCRIPT_UNKNOWN_KEY",
            Self::Runtime { .. } => "SCRIPT_RUNTIME",
            Self::BadReturn { .. } => "SCRIPT_BAD_RETURN",
        }
    }
}
