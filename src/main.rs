//! Strictly Stakes - command-line replay of staked sessions.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use serde_json::json;
use std::path::PathBuf;
use strictly_stakes::{Arena, Event, GameView, MemoryWallet, Script, StepReport, TableConfig};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Replay {
            config,
            script,
            refuse,
        } => run_replay(config, script, refuse),
        Command::Config => print_config(),
        Command::Schema => print_schema(),
    }
}

/// Replays a script against a fresh arena.
#[instrument]
fn run_replay(config: Option<PathBuf>, script: PathBuf, refuse: Vec<String>) -> Result<()> {
    let config = match config {
        Some(path) => TableConfig::from_file(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TableConfig::default(),
    };
    let script = Script::from_file(&script)
        .with_context(|| format!("loading script {}", script.display()))?;

    let mut wallet = MemoryWallet::new();
    for identity in refuse {
        wallet.refuse(identity);
    }

    let mut arena = Arena::new();
    arena.open_session(script.session.clone(), config)?;
    info!(session = %script.session, steps = script.steps.len(), "Replaying script");

    let reports = script.run(&mut arena, &mut wallet);
    let view = arena.view(&script.session)?;

    let output = json!({
        "steps": reports,
        "view": view,
        "delivered": wallet.total_delivered(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_config() -> Result<()> {
    print!("{}", TableConfig::default().to_toml()?);
    Ok(())
}

fn print_schema() -> Result<()> {
    let output = json!({
        "view": schemars::schema_for!(GameView),
        "event": schemars::schema_for!(Event),
        "step_report": schemars::schema_for!(StepReport),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
