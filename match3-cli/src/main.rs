//! Monster Munch CLI - headless driver for the match-three engine
//!
//! Commands:
//! - show: Print a freshly settled board
//! - simulate: Play one game with the automatic player
//! - batch: Play many seeded games in parallel

mod batch;
mod player;
mod simulate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use match3_core::{EngineConfig, Session};

#[derive(Parser)]
#[command(name = "match3")]
#[command(about = "Monster Munch match-three engine")]
struct Cli {
    /// Random seed for reproducibility
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Engine config JSON file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a freshly settled board
    Show {
        /// Output the board snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Play one game with the automatic player
    Simulate(simulate::SimulateArgs),
    /// Play many seeded games in parallel
    Batch(batch::BatchArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.seed)?;

    match cli.command {
        Commands::Show { json } => show(config, json),
        Commands::Simulate(args) => simulate::run(args, config),
        Commands::Batch(args) => batch::run(args, config),
    }
}

/// Config file (or defaults), with command-line flags taking precedence
fn load_config(path: Option<&Path>, seed: Option<u64>) -> Result<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => EngineConfig::default(),
    };
    Ok(match seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    })
}

fn show(config: EngineConfig, json: bool) -> Result<()> {
    let session = Session::seeded(config);
    if json {
        println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
    } else {
        print!("{}", session.board());
    }
    Ok(())
}
