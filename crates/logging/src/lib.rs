#![warn(missing_docs)]

//! Shared logging helpers and CLI argument definitions for the homegrid
//! workspace.
//!
//! Binaries flatten [`LogArgs`] into their clap command, then call
//! [`init`] once at startup. Filter precedence mirrors what the flags
//! promise: an explicit directive beats level shorthands, which beat
//! `RUST_LOG`, which beats the crate-scoped `info` default.

use std::env;

use clap::Args;
use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

/// Logging controls for CLI apps.
#[derive(Debug, Clone, Args)]
pub struct LogArgs {
    /// Set global log level to trace (our crates only)
    #[arg(long, conflicts_with_all = ["debug", "log_level", "log_filter"])]
    pub trace: bool,

    /// Set global log level to debug (our crates only)
    #[arg(long, conflicts_with_all = ["trace", "log_level", "log_filter"])]
    pub debug: bool,

    /// Set a single global log level for our crates (error|warn|info|debug|trace)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Set an explicit tracing filter directive (overrides other flags)
    /// e.g. "homegrid_engine=trace,homegrid_world=debug"
    #[arg(long)]
    pub log_filter: Option<String>,
}

/// List of crate targets that constitute "our" logs.
pub fn our_crates() -> &'static [&'static str] {
    &[
        "homegrid_core",
        "homegrid_place",
        "homegrid_world",
        "homegrid_engine",
        "homegrid_tester",
        "logging",
    ]
}

/// Build a filter directive string that sets the same `level` for all of
/// our crates.
pub fn level_spec_for(level: &str) -> String {
    let lvl = level.to_ascii_lowercase();
    let parts: Vec<String> = our_crates().iter().map(|t| format!("{t}={lvl}")).collect();
    parts.join(",")
}

/// Compute the final filter spec string with precedence:
/// - `log_filter`
/// - `trace`/`debug`/`log_level` (crate-scoped)
/// - `RUST_LOG` env
/// - default to crate-scoped `info`
pub fn compute_spec(
    trace: bool,
    debug: bool,
    log_level: Option<&str>,
    log_filter: Option<&str>,
) -> String {
    if let Some(spec) = log_filter {
        return spec.to_string();
    }
    if trace {
        return level_spec_for("trace");
    }
    if debug {
        return level_spec_for("debug");
    }
    if let Some(lvl) = log_level {
        return level_spec_for(lvl);
    }
    if let Ok(spec) = env::var("RUST_LOG") {
        return spec;
    }
    level_spec_for("info")
}

/// Guard ensuring the subscriber is installed at most once.
static INIT: OnceCell<()> = OnceCell::new();

/// Install the global tracing subscriber from parsed [`LogArgs`].
///
/// Safe to call more than once; later calls are no-ops.
pub fn init(args: &LogArgs) {
    let spec = compute_spec(
        args.trace,
        args.debug,
        args.log_level.as_deref(),
        args.log_filter.as_deref(),
    );
    let _ = INIT.get_or_init(|| {
        let filter = EnvFilter::try_new(&spec).unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins() {
        let spec = compute_spec(true, false, Some("warn"), Some("homegrid_engine=trace"));
        assert_eq!(spec, "homegrid_engine=trace");
    }

    #[test]
    fn level_shorthand_scopes_to_our_crates() {
        let spec = compute_spec(false, true, None, None);
        assert!(spec.contains("homegrid_engine=debug"));
        assert!(spec.contains("homegrid_world=debug"));
    }

    #[test]
    fn level_spec_lowercases() {
        assert!(level_spec_for("WARN").contains("homegrid_place=warn"));
    }
}
