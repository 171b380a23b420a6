//! Batch command - many seeded games in parallel
//!
//! Game `i` is seeded with `base_seed + i`, so a batch is reproducible
//! from its base seed regardless of thread scheduling.

use anyhow::Result;
use clap::Args;
use rayon::prelude::*;
use serde::Serialize;

use match3_core::EngineConfig;

use crate::player::{play_game, GameRecord};

#[derive(Args)]
pub struct BatchArgs {
    /// Number of games to play
    #[arg(long, default_value = "100")]
    pub games: usize,

    /// Maximum swaps per game
    #[arg(long, default_value = "30")]
    pub moves: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Aggregated batch statistics
#[derive(Clone, Debug, Default, Serialize)]
pub struct BatchSummary {
    pub games: usize,
    pub base_seed: u64,
    pub mean_score: f64,
    pub min_score: u64,
    pub max_score: u64,
    pub deadlocks: usize,
    pub mean_moves: f64,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

pub fn run(args: BatchArgs, config: EngineConfig) -> Result<()> {
    let base_seed = config.seed.unwrap_or(42);
    tracing::info!(
        "Running {} games of {} moves (base seed {})",
        args.games,
        args.moves,
        base_seed
    );

    let records = play_games(&config, base_seed, args.games, args.moves);
    let summary = summarize(&records, base_seed);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_text_summary(&summary);
    }
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play games in parallel using rayon
fn play_games(config: &EngineConfig, base_seed: u64, games: usize, moves: usize) -> Vec<GameRecord> {
    (0..games)
        .into_par_iter()
        .map(|i| {
            let game_config = config.clone().with_seed(base_seed.wrapping_add(i as u64));
            play_game(&game_config, moves)
        })
        .collect()
}

fn summarize(records: &[GameRecord], base_seed: u64) -> BatchSummary {
    if records.is_empty() {
        return BatchSummary {
            base_seed,
            ..BatchSummary::default()
        };
    }

    let n = records.len();
    let total: u64 = records.iter().map(|r| r.final_score).sum();
    let total_moves: usize = records.iter().map(|r| r.moves.len()).sum();

    BatchSummary {
        games: n,
        base_seed,
        mean_score: total as f64 / n as f64,
        min_score: records.iter().map(|r| r.final_score).min().unwrap_or(0),
        max_score: records.iter().map(|r| r.final_score).max().unwrap_or(0),
        deadlocks: records.iter().filter(|r| r.deadlocked).count(),
        mean_moves: total_moves as f64 / n as f64,
    }
}

// ============================================================================
// LEVEL 4 - FORMATTING
// ============================================================================

fn print_text_summary(summary: &BatchSummary) {
    println!("\n=== Batch Results ===");
    println!("Games:      {}", summary.games);
    println!("Base seed:  {}", summary.base_seed);
    println!("Mean score: {:.1}", summary.mean_score);
    println!("Min score:  {}", summary.min_score);
    println!("Max score:  {}", summary.max_score);
    println!("Mean moves: {:.1}", summary.mean_moves);
    println!(
        "Deadlocks:  {} ({:.1}%)",
        summary.deadlocks,
        if summary.games > 0 {
            summary.deadlocks as f64 / summary.games as f64 * 100.0
        } else {
            0.0
        }
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_is_reproducible() {
        let config = EngineConfig::default();
        let a = summarize(&play_games(&config, 7, 4, 5), 7);
        let b = summarize(&play_games(&config, 7, 4, 5), 7);
        assert_eq!(a.games, 4);
        assert_eq!(a.min_score, b.min_score);
        assert_eq!(a.max_score, b.max_score);
        assert_eq!(a.deadlocks, b.deadlocks);
        assert!(a.min_score <= a.max_score);
    }

    #[test]
    fn test_empty_batch() {
        let summary = summarize(&[], 3);
        assert_eq!(summary.games, 0);
        assert_eq!(summary.base_seed, 3);
        assert_eq!(summary.mean_score, 0.0);
    }
}
