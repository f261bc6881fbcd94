//! # Structure Error Types
//!
//! Placement itself never fails: a rejected cell or an exhausted search is
//! an ordinary `false`/`None`. Errors only come out of configuration.

use thiserror::Error;

/// Errors raised while building a structure configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    /// A cell would have no room left to draw a candidate from.
    #[error("invalid spacing: distance {distance} must exceed step offset {step_offset}")]
    InvalidSpacing {
        /// Cell edge length in chunks.
        distance: i32,
        /// Chunks excluded at the far edge of each cell.
        step_offset: i32,
    },

    /// A numeric option is below its allowed minimum.
    #[error("{option} = {value} is below the minimum of {minimum}")]
    BelowMinimum {
        /// Name of the option.
        option: &'static str,
        /// The rejected value.
        value: i64,
        /// Smallest accepted value.
        minimum: i64,
    },

    /// The configuration text could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file could not be read.
    #[error("cannot read {path}: {reason}")]
    ConfigRead {
        /// Path that was read.
        path: String,
        /// Underlying I/O failure.
        reason: String,
    },
}

/// Result type for structure configuration.
pub type StructureResult<T> = Result<T, StructureError>;
