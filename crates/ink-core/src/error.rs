//! Level generation errors
//!
//! Every fatal condition aborts the whole generation call. Callers are
//! expected to retry with another seed rather than repair a level in place.

use thiserror::Error;

use crate::level::Side;

/// Errors raised by the graph, the pathfinder and the level generator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// Coordinate outside the grid. Always a caller error.
    #[error("position ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfRange {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },

    #[error("no valid path to exit: {reason}")]
    NoValidPath { reason: String },

    #[error("no valid key location in section {section}")]
    NoValidKeyLocation { section: usize },

    /// Path reconstruction walked more parent links than the graph has nodes.
    #[error("internal inconsistency: path reconstruction took {steps} steps (limit {limit})")]
    InternalInconsistency { steps: usize, limit: usize },

    #[error("invalid level template: {reason}")]
    InvalidTemplate { reason: String },

    #[error("invalid shape template: {reason}")]
    InvalidShape { reason: String },

    #[error("no shape template available for side {side}")]
    NoShapeForSide { side: Side },
}

impl GenerationError {
    /// Whether regenerating with a different seed can succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerationError::NoValidPath { .. } | GenerationError::NoValidKeyLocation { .. }
        )
    }
}

/// Result alias used throughout the crate
pub type Result<T> = core::result::Result<T, GenerationError>;
