//! Error type for the tester binary.

use std::{io, path::PathBuf, result::Result as StdResult};

use thiserror::Error;

/// Convenient result type for the tester.
pub type Result<T> = StdResult<T, Error>;

/// Unified error type for homegrid-tester.
#[derive(Debug, Error)]
pub enum Error {
    /// Scenario file could not be read.
    #[error("failed to read scenario '{path}': {source}")]
    ScenarioRead {
        /// Path passed on the command line.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Scenario file could not be parsed as RON.
    #[error("failed to parse scenario '{path}': {source}")]
    ScenarioParse {
        /// Path passed on the command line.
        path: PathBuf,
        /// RON parse error with position info.
        source: ron::error::SpannedError,
    },

    /// Scenario declared invalid dimensions.
    #[error(transparent)]
    Core(#[from] homegrid_core::CoreError),

    /// Engine rejected an operation.
    #[error(transparent)]
    Engine(#[from] homegrid_engine::Error),

    /// World service failure.
    #[error(transparent)]
    World(#[from] homegrid_world::WorldError),

    /// JSON serialization of the report failed.
    #[error("failed to serialize report: {0}")]
    Report(#[from] serde_json::Error),
}
