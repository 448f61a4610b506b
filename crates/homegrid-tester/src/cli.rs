//! Command-line interface definitions for homegrid-tester.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use logging::LogArgs;

/// Command-line interface for the `homegrid-tester` binary.
#[derive(Parser, Debug)]
#[command(
    name = "homegrid-tester",
    about = "Scenario-driven diagnostics for the homegrid placement engine",
    version
)]
pub struct Cli {
    /// Logging controls shared across homegrid binaries.
    #[command(flatten)]
    pub log: LogArgs,

    /// Which diagnostic to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level tester commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a gesture scenario against a fresh engine and report the
    /// resulting layout.
    Run(RunArgs),
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Path to a scenario file in RON syntax.
    #[arg(value_name = "SCENARIO")]
    pub scenario: PathBuf,

    /// Emit the final layout as JSON instead of the text grid.
    #[arg(long)]
    pub json: bool,
}
