//! Command-line interface for strictly_stakes.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strictly Stakes - stake-backed tic-tac-toe with escrowed payouts
#[derive(Parser, Debug)]
#[command(name = "strictly_stakes")]
#[command(about = "Replay stake-backed tic-tac-toe sessions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a scripted sequence of calls and print the observations as JSON
    Replay {
        /// Table configuration (TOML). Defaults apply when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Script of calls to replay (TOML)
        #[arg(short, long)]
        script: PathBuf,

        /// Identities whose incoming transfers fail
        #[arg(long)]
        refuse: Vec<String>,
    },

    /// Print the default table configuration as TOML
    Config,

    /// Print the JSON schema of views, events and replay reports
    Schema,
}
