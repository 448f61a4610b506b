use std::result::Result as StdResult;

use thiserror::Error;

/// Convenient result type for the core crate.
pub type Result<T> = StdResult<T, CoreError>;

/// Errors raised by validated constructors at the engine boundary.
///
/// Zero-sized grids and screens would make every downstream division
/// meaningless, so they are rejected here and cannot reach the geometry
/// functions. Callers treat these as programming errors, not runtime
/// conditions to recover from.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Grid dimensions with zero rows or columns.
    #[error("grid dimensions must be at least 1x1, got {rows}x{cols}")]
    EmptyDims {
        /// Requested row count.
        rows: u16,
        /// Requested column count.
        cols: u16,
    },

    /// Screen dimensions with zero width or height.
    #[error("screen size must be non-zero, got {width}x{height}")]
    EmptyScreen {
        /// Requested pixel width.
        width: u32,
        /// Requested pixel height.
        height: u32,
    },
}
