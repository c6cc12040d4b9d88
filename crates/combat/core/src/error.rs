//! Common error infrastructure for combat-core.
//!
//! This module provides shared types and traits used across all error types in combat-core.
//! Domain-specific errors (e.g., `AreaError`, `CombatRejection`) are defined in their
//! respective modules alongside the operations that produce them.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each stage has its own error type with specific variants
//! - **Severity Classification**: Errors are categorized for recovery strategies
//! - **Rejections are not failures**: an ineligible target is a normal outcome,
//!   classified as [`ErrorSeverity::Validation`] and never logged as an error

/// Severity level of an error, used for categorization and recovery strategies.
///
/// Errors are classified by their recoverability and expected handling:
/// - **Recoverable**: Temporary conditions that may succeed on a later cast
/// - **Validation**: Invalid input or ineligible target, rejected without retry
/// - **Internal**: Unexpected state inconsistencies that require investigation
/// - **Fatal**: Unrecoverable errors (allocation failure)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - the caller may re-issue a new cast.
    ///
    /// Examples: script hook failed, oracle temporarily missing
    Recoverable,

    /// Validation error - invalid input or ineligible target.
    ///
    /// Examples: malformed shape description, target in protection zone
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: stale registry handle
    Internal,

    /// Fatal error - cannot continue.
    ///
    /// Examples: grid storage allocation failure
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug or a dead process.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all combat-core errors.
///
/// This trait provides a uniform interface for error classification across all
/// error types in the crate.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// This is useful for error categorization, metrics, and testing.
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
