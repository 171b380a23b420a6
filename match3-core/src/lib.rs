//! Monster Munch core - match-three board engine
//!
//! This crate provides the game rules for an 8x8 match-three board:
//! - Board grid, tiles and the text notation used by fixtures
//! - Match detection with special-tile spawning
//! - Resolution: clears, chain reactions, gravity and refill
//! - Special tile triggers and combos
//! - A session that owns a game and steps its cascades
//!
//! Randomness comes in through [`TileSource`], so every game can be
//! replayed from a seed:
//!
//! ```
//! use match3_core::{EngineConfig, Pos, Session};
//!
//! let mut session = Session::seeded(EngineConfig::default().with_seed(1));
//! let _ = session.play(Pos::new(0, 0), Pos::new(0, 1));
//! assert!(!session.is_busy());
//! ```

pub mod board;
pub mod tiles;
pub mod source;
pub mod detect;
pub mod special;
pub mod resolve;
pub mod combo;
pub mod events;
pub mod config;
pub mod session;

// Re-exports for convenient access
pub use board::{Board, BoardParseError, Pos, BOARD_SIZE, CELL_COUNT};
pub use tiles::{Color, Special, Tile, COLORS, MAX_COLORS};
pub use source::{ScriptedSource, SeededSource, TileSource};
pub use detect::{find_matches, find_swaps, has_match, MatchGroup, Spawn};
pub use special::{trigger, trigger_area};
pub use resolve::{collapse, resolve, Fired, Resolution};
pub use combo::{combo, is_combo, ComboKind, ComboOutcome};
pub use events::EngineEvent;
pub use config::EngineConfig;
pub use session::{
    BoardSnapshot, CascadeReport, Phase, Session, StepReport, SwapOutcome, SwapRejected,
    TurnReport,
};
