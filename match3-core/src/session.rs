//! Game session: owns the board and drives the swap -> cascade loop.
//!
//! A session is a small state machine. It is `Idle` while waiting for input
//! and `Resolving` while a cascade is under way; swaps requested during a
//! cascade are rejected. Cascades advance one detect/resolve step at a time
//! so a renderer can animate between steps, or all at once through
//! [`Session::run_to_stable`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{is_adjacent, Board, Pos};
use crate::combo::{combo, is_combo, ComboKind};
use crate::config::EngineConfig;
use crate::detect::{creates_run_at, find_matches};
use crate::events::EngineEvent;
use crate::resolve::{collapse, resolve, Fired};
use crate::source::{SeededSource, TileSource};

// ============================================================================
// TYPES
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    Resolving,
}

/// Why a swap request was refused. The session is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SwapRejected {
    #[error("a cascade is still resolving")]
    Busy,
    #[error("position {0} is off the board")]
    OutOfBounds(Pos),
    #[error("no tile at {0}")]
    EmptyCell(Pos),
    #[error("{0} and {1} are not adjacent")]
    NotAdjacent(Pos, Pos),
}

/// What an allowed swap did
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapOutcome {
    /// Two specials (or a color bomb) went off together
    Combo { kind: ComboKind, cleared: usize },
    /// The swap made at least one match; the cascade is pending
    Accepted,
    /// Nothing matched, the tiles went back
    Reverted,
}

impl SwapOutcome {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, SwapOutcome::Reverted)
    }
}

/// One detect/resolve step
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub groups: usize,
    pub cleared: usize,
    pub score_delta: u64,
    /// True when detection found nothing and the session went idle
    pub stable: bool,
}

/// Totals for a run of steps
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeReport {
    /// Resolution steps that cleared something
    pub steps: usize,
    pub cleared: usize,
    pub score_gained: u64,
    /// The cascade was cut off by `max_cascade_steps`
    pub hit_limit: bool,
}

/// Result of [`Session::play`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    pub outcome: SwapOutcome,
    pub cascade: CascadeReport,
    /// Everything the turn scored, combo included
    pub score_gained: u64,
}

/// Serializable view of a session for renderers
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// One string per row in board notation
    pub rows: Vec<String>,
    pub score: u64,
    pub busy: bool,
}

// ============================================================================
// SESSION
// ============================================================================

#[derive(Clone, Debug)]
pub struct Session<S: TileSource = SeededSource> {
    board: Board,
    score: u64,
    phase: Phase,
    config: EngineConfig,
    source: S,
    events: Vec<EngineEvent>,
}

impl Session<SeededSource> {
    /// Session drawing from a `SeededSource` built from the config
    pub fn seeded(config: EngineConfig) -> Self {
        let config = config.normalized();
        let source = match config.seed {
            Some(seed) => SeededSource::new(seed, config.color_count),
            None => SeededSource::from_entropy(config.color_count),
        };
        Self::new(config, source)
    }
}

impl<S: TileSource> Session<S> {
    /// Start a game on a random board, settled so that play begins stable.
    ///
    /// Matches present in the initial fill are cascaded away without
    /// scoring or publishing events.
    pub fn new(config: EngineConfig, mut source: S) -> Self {
        let board = Board::random(&mut source);
        let mut session = Self::with_board(board, config, source);
        session.settle();
        session
    }

    /// Start a game on the given board as-is
    pub fn with_board(board: Board, config: EngineConfig, source: S) -> Self {
        Self {
            board,
            score: 0,
            phase: Phase::Idle,
            config: config.normalized(),
            source,
            events: Vec::new(),
        }
    }

    fn settle(&mut self) {
        self.phase = Phase::Resolving;
        let report = self.run_to_stable();
        tracing::debug!(steps = report.steps, "initial board settled");
        self.score = 0;
        self.events.clear();
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase == Phase::Resolving
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Take all events published since the last drain
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            rows: self.board.to_string().lines().map(str::to_string).collect(),
            score: self.score,
            busy: self.is_busy(),
        }
    }

    // ========================================================================
    // SWAPS
    // ========================================================================

    /// Ask to swap the tiles at `a` and `b`.
    ///
    /// Combos resolve immediately (their clear and collapse is the first
    /// step of the cascade). An ordinary swap is kept only if one of the two
    /// moved tiles ends up in a run; the cascade itself runs through
    /// [`step`](Self::step).
    pub fn request_swap(&mut self, a: Pos, b: Pos) -> Result<SwapOutcome, SwapRejected> {
        if self.is_busy() {
            return Err(SwapRejected::Busy);
        }
        for pos in [a, b] {
            if !pos.is_valid() {
                return Err(SwapRejected::OutOfBounds(pos));
            }
        }
        let ta = self.board.get(a).ok_or(SwapRejected::EmptyCell(a))?;
        let tb = self.board.get(b).ok_or(SwapRejected::EmptyCell(b))?;
        if !is_adjacent(a, b) {
            return Err(SwapRejected::NotAdjacent(a, b));
        }

        let mut swapped = self.board.clone();
        swapped.swap(a, b);

        if is_combo(ta, tb) {
            if let Some(outcome) = combo(&swapped, a, b, &mut self.source) {
                let cleared = outcome.cleared.len();
                let amount = cleared as u64 * self.config.per_tile_score;
                self.events.push(EngineEvent::ComboFired {
                    kind: outcome.kind,
                    a,
                    b,
                });
                self.publish_triggered(&outcome.triggered);
                self.events.push(EngineEvent::ScoreDelta { amount, cleared });
                self.score += amount;
                self.board = collapse(&outcome.board, &mut self.source);
                self.phase = Phase::Resolving;
                return Ok(SwapOutcome::Combo {
                    kind: outcome.kind,
                    cleared,
                });
            }
        }

        if !(creates_run_at(&swapped, a) || creates_run_at(&swapped, b)) {
            tracing::trace!(%a, %b, "swap reverted");
            return Ok(SwapOutcome::Reverted);
        }

        tracing::debug!(%a, %b, "swap accepted");
        self.board = swapped;
        self.phase = Phase::Resolving;
        self.events.push(EngineEvent::SwapAccepted { a, b });
        Ok(SwapOutcome::Accepted)
    }

    // ========================================================================
    // CASCADE
    // ========================================================================

    /// Run one detect/resolve step. `None` when the session is idle.
    pub fn step(&mut self) -> Option<StepReport> {
        if !self.is_busy() {
            return None;
        }

        let groups = find_matches(&self.board);
        if groups.is_empty() {
            self.release();
            return Some(StepReport {
                stable: true,
                ..StepReport::default()
            });
        }
        for group in &groups {
            tracing::trace!(len = group.len(), spawn = ?group.spawn_kind(), "group");
        }

        let res = resolve(
            &self.board,
            &groups,
            &mut self.source,
            self.config.per_tile_score,
        );
        debug_assert!(res.board.is_full());

        for spawn in &res.created {
            self.events.push(EngineEvent::SpecialCreated {
                pos: spawn.pos,
                kind: spawn.kind,
            });
        }
        self.publish_triggered(&res.triggered);
        self.events.push(EngineEvent::ScoreDelta {
            amount: res.score_delta,
            cleared: res.cleared.len(),
        });
        self.score += res.score_delta;
        self.board = res.board;

        Some(StepReport {
            groups: groups.len(),
            cleared: res.cleared.len(),
            score_delta: res.score_delta,
            stable: false,
        })
    }

    /// Step until the board is stable or the step bound is reached
    pub fn run_to_stable(&mut self) -> CascadeReport {
        let mut report = CascadeReport::default();
        while self.is_busy() {
            if report.steps >= self.config.max_cascade_steps {
                tracing::warn!(
                    steps = report.steps,
                    "cascade step limit reached, releasing board"
                );
                report.hit_limit = true;
                self.release();
                break;
            }
            let Some(step) = self.step() else { break };
            if !step.stable {
                report.steps += 1;
                report.cleared += step.cleared;
                report.score_gained += step.score_delta;
            }
        }
        report
    }

    /// Swap and, if the swap is kept, cascade to stability
    pub fn play(&mut self, a: Pos, b: Pos) -> Result<TurnReport, SwapRejected> {
        let before = self.score;
        let outcome = self.request_swap(a, b)?;
        let cascade = if outcome.is_accepted() {
            self.run_to_stable()
        } else {
            CascadeReport::default()
        };
        Ok(TurnReport {
            outcome,
            cascade,
            score_gained: self.score - before,
        })
    }

    fn release(&mut self) {
        self.phase = Phase::Idle;
        self.events.push(EngineEvent::BoardStable { score: self.score });
        tracing::debug!(score = self.score, "board stable");
    }

    fn publish_triggered(&mut self, triggered: &[Fired]) {
        self.events
            .extend(triggered.iter().map(|f| EngineEvent::SpecialTriggered {
                pos: f.pos,
                kind: f.kind,
            }));
    }
}
