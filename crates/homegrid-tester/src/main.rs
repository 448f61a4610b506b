#![warn(missing_docs)]

//! Entry point for the `homegrid-tester` binary.

mod cli;
mod error;
mod report;
mod scenario;

use std::{process, sync::Arc};

use clap::Parser;
use homegrid_core::{ItemId, ItemPayload, Surface};
use homegrid_engine::{DimsConfig, Engine, PassOutcome};
use homegrid_world::{GridWorld, MemStorage, WorldCfg};
use tracing::{error, info};

use crate::{
    cli::{Cli, Commands, RunArgs},
    error::Result,
    report::Report,
    scenario::{Scenario, Step},
};

fn main() {
    let Cli { log, command } = Cli::parse();
    logging::init(&log);
    if let Err(err) = run(command) {
        error!("{err}");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

/// Dispatch the chosen subcommand on a fresh runtime.
fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Run(args) => {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            runtime.block_on(run_scenario(&args))
        }
    }
}

/// Replay one scenario and print the resulting layout.
async fn run_scenario(args: &RunArgs) -> Result<()> {
    let scenario = Scenario::load(&args.scenario)?;
    let dims = DimsConfig {
        grid: scenario.grid_dims()?,
        dock: scenario.dock_dims()?,
    };
    let screen = scenario.screen_size()?;

    let storage = Arc::new(MemStorage::seeded(scenario.seed_items()));
    let world = GridWorld::spawn(storage, WorldCfg::default()).await?;
    let engine = Engine::new(world, dims).await?;

    for (idx, step) in scenario.steps.iter().enumerate() {
        apply_step(&engine, step, screen, idx).await?;
    }

    let snapshot = engine.world().snapshot().await?;
    if args.json {
        let report = Report::new(&snapshot);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for layout in engine.world().pages(Surface::Grid).await? {
            println!("grid page {}:", layout.page);
            print!("{}", report::render_page(&layout, dims.grid));
        }
        for layout in engine.world().pages(Surface::Dock).await? {
            println!("dock:");
            print!("{}", report::render_page(&layout, dims.dock));
        }
    }
    Ok(())
}

/// Apply one scripted gesture and log its outcome.
async fn apply_step(
    engine: &Engine,
    step: &Step,
    screen: homegrid_core::ScreenSize,
    idx: usize,
) -> Result<()> {
    match step {
        Step::Add { page, x, y, label } => {
            let id = engine
                .add(
                    Surface::Grid,
                    *page,
                    *x,
                    *y,
                    screen,
                    ItemPayload::App {
                        bundle: label.clone(),
                    },
                )
                .await?;
            info!(step = idx, %id, "added");
        }
        Step::Move {
            id,
            page,
            x,
            y,
            w,
            h,
        } => {
            let drag = homegrid_core::PxRect::new(*x, *y, *w, *h);
            let outcome = engine
                .move_item(Surface::Grid, *page, ItemId(*id), *x, *y, screen, drag)
                .await?;
            log_outcome(idx, "move", *id, &outcome);
        }
        Step::Resize { id, page, w, h } => {
            let outcome = engine
                .resize(Surface::Grid, *page, ItemId(*id), *w, *h, screen)
                .await?;
            log_outcome(idx, "resize", *id, &outcome);
        }
    }
    Ok(())
}

/// One line per step so scenario runs read as a timeline.
fn log_outcome(idx: usize, op: &str, id: u64, outcome: &PassOutcome) {
    match outcome {
        PassOutcome::Committed {
            relocated,
            unplaced,
        } => info!(
            step = idx,
            op,
            id,
            relocated = relocated.len(),
            unplaced = unplaced.len(),
            "committed"
        ),
        PassOutcome::OutOfBounds => info!(step = idx, op, id, "out of bounds; no-op"),
        PassOutcome::Superseded => info!(step = idx, op, id, "superseded"),
    }
}
