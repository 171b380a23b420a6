//! Simulate command - play one seeded game with the automatic player
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_game(), report_results()
//! - Level 3: per-move lines
//! - Level 4: formatting utilities

use anyhow::Result;
use clap::Args;

use match3_core::{EngineConfig, SwapOutcome};

use crate::player::{play_game, GameRecord, MoveRecord};

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct SimulateArgs {
    /// Maximum number of swaps to play
    #[arg(long, default_value = "20")]
    pub moves: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run simulate command
pub fn run(args: SimulateArgs, config: EngineConfig) -> Result<()> {
    tracing::info!(
        "Simulating {} moves (seed={:?}, colors={})",
        args.moves,
        config.seed,
        config.color_count
    );

    let record = play_game(&config, args.moves);

    report_results(&record, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn report_results(record: &GameRecord, args: &SimulateArgs) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(record)?);
    } else {
        print_text_results(record);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3/4 - FORMATTING
// ============================================================================

fn print_text_results(record: &GameRecord) {
    println!("\n=== Simulation ===");
    if let Some(seed) = record.seed {
        println!("Seed: {}", seed);
    }
    for mv in &record.moves {
        println!("{}", format_move(mv));
    }
    if record.deadlocked {
        println!("No moves left after {} swaps", record.moves.len());
    }
    println!("\nFinal score: {}", record.final_score);
    println!();
    for row in &record.final_board {
        println!("  {}", row);
    }
}

fn format_move(mv: &MoveRecord) -> String {
    let what = match mv.outcome {
        SwapOutcome::Combo { kind, cleared } => format!("combo {:?} ({} cleared)", kind, cleared),
        SwapOutcome::Accepted => "match".to_string(),
        SwapOutcome::Reverted => "reverted".to_string(),
    };
    format!(
        "Move {:>3}: {} <-> {}  {:<28} +{:<5} steps={:<2} score={}",
        mv.number, mv.a, mv.b, what, mv.score_gained, mv.cascade_steps, mv.score
    )
}
