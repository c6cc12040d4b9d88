//! Oracle access errors.

use crate::error::{CombatError, ErrorSeverity};

/// A read-only oracle required by the cast is missing from the [`super::CombatEnv`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("ItemTypeOracle not available")]
    ItemsNotAvailable,

    #[error("ScriptHost not available")]
    ScriptsNotAvailable,

    #[error("RngOracle not available")]
    RngNotAvailable,
}

impl CombatError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ItemsNotAvailable => "ORACLE_ITEMS_NOT_AVAILABLE",
            Self::ScriptsNotAvailable => "ORACLE_SCRIPTS_NOT_AVAILABLE",
            Self::RngNotAvailable => "ORACLE_RNG_NOT_AVAILABLE",
        }
    }
}
