//! Area shapes: packed grids, directional variants, and tile extraction.
//!
//! A single authored shape (south-facing, or south-east-facing for the
//! diagonal set) is turned into every facing by grid transforms. At cast time
//! the caster→target offset picks the facing and the chosen grid is projected
//! onto world positions.

mod direction;
mod matrix;
mod shape;

pub use direction::Direction;
pub use matrix::{MatrixArea, MatrixOperation};
pub use shape::{AreaCombat, AreaDescription, CellKind};

use crate::config::CombatConfig;
use crate::error::{CombatError, ErrorSeverity};

/// Errors raised while building or addressing area grids.
///
/// Everything except [`AreaError::Allocation`] is a content defect detected at
/// load time, before the owning combat is shared.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AreaError {
    #[error("grid of {rows}x{cols} has no cells")]
    EmptyGrid { rows: u32, cols: u32 },

    #[error("failed to allocate storage for a {rows}x{cols} grid")]
    Allocation { rows: u32, cols: u32 },

    #[error("grid is not initialized")]
    Uninitialized,

    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: u32,
        col: u32,
        rows: u32,
        cols: u32,
    },

    #[error("shape description is empty")]
    EmptyDescription,

    #[error("shape description of {len} cells does not split into {rows} rows")]
    RaggedDescription { len: usize, rows: u32 },

    #[error("invalid cell value {value} at ({row}, {col})")]
    InvalidCell { value: u32, row: u32, col: u32 },

    #[error("shape description has no caster center")]
    MissingCenter,

    #[error("shape description has {count} caster centers")]
    MultipleCenters { count: usize },

    #[error("diagonal shape set before the cardinal shape")]
    MissingCardinals,

    #[error("cone length must be in 1..={max}, got {0}", max = CombatConfig::MAX_CONE_LENGTH)]
    InvalidLength(i32),

    #[error("cone spread must not be negative, got {0}")]
    InvalidSpread(i32),

    #[error("radius must be in 0..={max}, got {0}", max = CombatConfig::MAX_CIRCLE_RADIUS)]
    InvalidRadius(i32),
}

impl CombatError for AreaError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Allocation { .. } => ErrorSeverity::Fatal,
            Self::Uninitialized | Self::OutOfBounds { .. } => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyGrid { .. } => "AREA_EMPTY_GRID",
            Self::Allocation { .. } => "AREA_ALLOCATION",
            Self::Uninitialized => "AREA_UNINITIALIZED",
            Self::OutOfBounds { .. } => "AREA_OUT_OF_BOUNDS",
            Self::EmptyDescription => "AREA_EMPTY_DESCRIPTION",
            Self::RaggedDescription { .. } => "AREA_RAGGED_DESCRIPTION",
            Self::InvalidCell { .. } => "AREA_INVALID_CELL",
            Self::MissingCenter => "AREA_MISSING_CENTER",
            Self::MultipleCenters { .. } => "AREA_MULTIPLE_CENTERS",
            Self::MissingCardinals => "AREA_MISSING_CARDINALS",
            Self::InvalidLength(_) => "AREA_INVALID_LENGTH",
            Self::InvalidSpread(_) => "AREA_INVALID_SPREAD",
            Self::InvalidRadius(_) => "AREA_INVALID_RADIUS",
        }
    }
}
