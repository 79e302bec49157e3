//! Headless tactics simulator.
//!
//! Composition root that assembles the content registry, the game context
//! and the overworld, then fights every battle with both teams on the AI.
//!
//! # Examples
//!
//! ```bash
//! # Fixed seed, short battles, log file next to the binary
//! SIM_SEED=3 SIM_MAX_TURNS=8 SIM_LOG_DIR=logs cargo run -p tactics-sim
//! ```
mod campaign;
mod config;
mod logging;
mod presentation;

use std::sync::Arc;

use anyhow::{Context, Result};
use tactics_content::{ConfigLoader, UnitRegistry};
use tactics_runtime::GameContext;

use config::SimConfig;
use presentation::LogAudio;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let sim = SimConfig::from_env();
    let _guard = logging::setup_logging(sim.log_dir.as_deref())?;

    let game_config = match &sim.game_config {
        Some(path) => ConfigLoader::load(path)
            .with_context(|| format!("loading game config from {}", path.display()))?,
        None => ConfigLoader::bundled()?,
    };
    tracing::info!(seed = sim.seed, max_turns = sim.max_turns, "Starting simulation");
    tracing::debug!(?game_config, "game config");

    let registry = UnitRegistry::standard();
    tracing::debug!(units = registry.len(), "unit registry ready");

    let mut ctx = GameContext::new(Arc::new(registry), game_config).with_audio(Box::new(LogAudio));
    campaign::recruit_party(&mut ctx);

    let world = campaign::demo_world()?;
    let records = campaign::run(&mut ctx, &world, &sim)?;

    for record in &records {
        tracing::info!(
            node = %record.node,
            outcome = %record.outcome,
            turns = record.turns,
            "battle finished"
        );
    }
    let cleared = world
        .reachable(ctx.flags())
        .iter()
        .filter(|id| world.is_completed(id, ctx.flags()))
        .count();
    tracing::info!(battles = records.len(), cleared, "Simulation complete");

    Ok(())
}
