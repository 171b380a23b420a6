//! Resolution: clearing matched cells, chain reactions, gravity and refill

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Pos, BOARD_SIZE};
use crate::detect::{MatchGroup, Spawn};
use crate::source::TileSource;
use crate::special::{normalize, trigger_area};
use crate::tiles::{Special, Tile};

/// Points per cleared cell unless configured otherwise
pub const DEFAULT_PER_TILE_SCORE: u64 = 10;

/// A special tile that fired during a step
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fired {
    pub pos: Pos,
    pub kind: Special,
}

/// Outcome of one resolution step
#[derive(Clone, Debug)]
pub struct Resolution {
    /// Fully populated board after gravity and refill
    pub board: Board,
    /// Cells emptied this step, row-major
    pub cleared: Vec<Pos>,
    pub score_delta: u64,
    /// Specials left behind by match groups
    pub created: Vec<Spawn>,
    /// Specials that fired, in firing order
    pub triggered: Vec<Fired>,
}

// ============================================================================
// CLEAR SET
// ============================================================================

/// Cells emptied by one step, with the specials they set off
#[derive(Clone, Debug)]
pub struct Cleared {
    /// Input board with the cleared cells emptied (no gravity)
    pub board: Board,
    pub cleared: Vec<Pos>,
    pub triggered: Vec<Fired>,
}

/// Clear-set builder with chain reactions.
///
/// Every special tile that ends up in the set fires exactly once and adds
/// its own area. Protected cells are never cleared.
pub struct ClearSet<'a> {
    board: &'a Board,
    protected: FxHashSet<Pos>,
    cleared: FxHashSet<Pos>,
    fired: FxHashSet<Pos>,
    triggered: Vec<Fired>,
    queue: VecDeque<Pos>,
}

impl<'a> ClearSet<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            protected: FxHashSet::default(),
            cleared: FxHashSet::default(),
            fired: FxHashSet::default(),
            triggered: Vec::new(),
            queue: VecDeque::new(),
        }
    }

    /// Keep a cell out of the set no matter what reaches it
    pub fn protect(&mut self, pos: Pos) {
        self.protected.insert(pos);
    }

    /// Queue a cell for clearing
    pub fn add(&mut self, pos: Pos) {
        self.queue.push_back(pos);
    }

    pub fn add_all(&mut self, cells: impl IntoIterator<Item = Pos>) {
        self.queue.extend(cells);
    }

    /// Record a `kind` special at `pos` as fired and queue `area`.
    ///
    /// Used when the firing tile is not the one on the board, e.g. a color
    /// bomb whose area is decided by the tile it was swapped with.
    pub fn fire_with(&mut self, pos: Pos, kind: Special, area: Vec<Pos>) {
        if self.fired.insert(pos) {
            self.triggered.push(Fired { pos, kind });
            self.queue.extend(area);
        }
    }

    /// Mark a special as already spent so reaching it only clears it
    pub fn spend(&mut self, pos: Pos) {
        self.fired.insert(pos);
    }

    /// Drain the queue, firing specials as they are reached
    pub fn finish(mut self) -> Cleared {
        while let Some(pos) = self.queue.pop_front() {
            if self.protected.contains(&pos) || self.cleared.contains(&pos) {
                continue;
            }
            let Some(tile) = self.board.get(pos) else {
                continue;
            };
            self.cleared.insert(pos);
            if tile.is_special() && self.fired.insert(pos) {
                tracing::trace!(%pos, kind = ?tile.special, "chain fire");
                self.triggered.push(Fired {
                    pos,
                    kind: tile.special,
                });
                self.queue.extend(trigger_area(self.board, pos));
            }
        }

        let cleared = normalize(self.cleared.into_iter().collect());
        let mut board = self.board.clone();
        for &pos in &cleared {
            board.set(pos, None);
        }
        Cleared {
            board,
            cleared,
            triggered: self.triggered,
        }
    }
}

// ============================================================================
// RESOLVER
// ============================================================================

/// Resolve one set of match groups.
///
/// Groups are applied in the order given (the detector's largest-first
/// order); the first group to spawn on a cell decides its special. Spawn
/// cells survive, every other matched cell is cleared along with whatever
/// the specials among them blow up, then the board collapses and refills.
///
/// A spawn cell that already holds a special takes no new one: it clears
/// with its group and its special fires.
pub fn resolve(
    board: &Board,
    groups: &[MatchGroup],
    source: &mut dyn TileSource,
    per_tile: u64,
) -> Resolution {
    let mut spawned = board.clone();
    let mut created = Vec::new();
    let mut claimed = FxHashSet::default();

    for spawn in groups.iter().filter_map(|g| g.spawn) {
        if !claimed.insert(spawn.pos) {
            continue;
        }
        match board.get(spawn.pos) {
            Some(tile) if !tile.is_special() => {
                spawned.set(spawn.pos, Some(tile.into_special(spawn.kind)));
                created.push(spawn);
            }
            _ => tracing::trace!(pos = %spawn.pos, "spawn cell already special"),
        }
    }

    let mut clear = ClearSet::new(&spawned);
    for spawn in &created {
        clear.protect(spawn.pos);
    }
    for group in groups {
        clear.add_all(group.cells.iter().copied());
    }
    let cleared = clear.finish();

    let score_delta = cleared.cleared.len() as u64 * per_tile;
    tracing::debug!(
        groups = groups.len(),
        cleared = cleared.cleared.len(),
        created = created.len(),
        fired = cleared.triggered.len(),
        score_delta,
        "resolve"
    );

    Resolution {
        board: collapse(&cleared.board, source),
        cleared: cleared.cleared,
        score_delta,
        created,
        triggered: cleared.triggered,
    }
}

/// Column-wise gravity followed by refill.
///
/// Each column keeps the relative order of its tiles and slides them down;
/// vacated cells are refilled from the source column by column, left to
/// right, top to bottom. The result is fully populated.
pub fn collapse(board: &Board, source: &mut dyn TileSource) -> Board {
    let mut out = Board::empty();
    for col in 0..BOARD_SIZE {
        let column: Vec<Tile> = (0..BOARD_SIZE)
            .filter_map(|row| board.get(Pos::new(row, col)))
            .collect();
        let gap = BOARD_SIZE - column.len();
        for row in 0..gap {
            out.set(Pos::new(row, col), Some(source.draw()));
        }
        for (i, tile) in column.into_iter().enumerate() {
            out.set(Pos::new(gap + i, col), Some(tile));
        }
    }
    debug_assert!(out.is_full());
    out
}
