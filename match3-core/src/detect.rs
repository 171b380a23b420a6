//! Match detection: runs, plus shapes and spawn assignment

use std::cmp::Reverse;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::board::{is_adjacent, positions, Board, Pos, BOARD_SIZE, CELL_COUNT};
use crate::combo::is_combo;
use crate::tiles::{Color, Special};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Shortest run that clears
pub const MIN_RUN: usize = 3;

/// Smallest plus shape that spawns a wrapped tile
pub const MIN_PLUS: usize = 5;

/// Orthogonal unit steps (up, down, left, right)
const PLUS_ARMS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

// ============================================================================
// TYPES
// ============================================================================

/// Special tile a group leaves behind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Spawn {
    pub pos: Pos,
    pub kind: Special,
}

/// A set of cells cleared together, possibly leaving one special behind.
///
/// `cells` is sorted row-major and holds no duplicates; `spawn.pos` is
/// always one of `cells`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchGroup {
    pub cells: Vec<Pos>,
    pub spawn: Option<Spawn>,
}

impl MatchGroup {
    fn new(mut cells: Vec<Pos>, spawn: Option<Spawn>) -> Self {
        cells.sort_unstable();
        cells.dedup();
        debug_assert!(cells.len() >= MIN_RUN);
        debug_assert!(spawn.map_or(true, |s| cells.contains(&s.pos)));
        Self { cells, spawn }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn spawn_kind(&self) -> Special {
        self.spawn.map_or(Special::None, |s| s.kind)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Maximal same-color line segment
#[derive(Clone, Copy, Debug)]
struct Run {
    start: Pos,
    len: usize,
    axis: Axis,
}

impl Run {
    fn cell(&self, i: usize) -> Pos {
        match self.axis {
            Axis::Horizontal => Pos::new(self.start.row, self.start.col + i),
            Axis::Vertical => Pos::new(self.start.row + i, self.start.col),
        }
    }

    fn cells(&self) -> Vec<Pos> {
        (0..self.len).map(|i| self.cell(i)).collect()
    }

    /// Special earned by the run's length alone
    fn spawn_kind(&self) -> Special {
        match (self.len, self.axis) {
            (4, Axis::Horizontal) => Special::StripedRow,
            (4, Axis::Vertical) => Special::StripedColumn,
            (n, _) if n >= 5 => Special::ColorBomb,
            _ => Special::None,
        }
    }

    fn to_group(self) -> MatchGroup {
        let kind = self.spawn_kind();
        let spawn = kind.is_special().then(|| Spawn {
            pos: self.cell(self.len / 2),
            kind,
        });
        MatchGroup::new(self.cells(), spawn)
    }
}

// ============================================================================
// DETECTION
// ============================================================================

/// Find every match group on the board.
///
/// Groups come back sorted by size (largest first, discovery order breaking
/// ties: horizontal runs, vertical runs, then plus shapes). When several
/// groups want to spawn on the same cell the first one in that order keeps
/// it and the others only clear. An empty result means the board is stable.
pub fn find_matches(board: &Board) -> Vec<MatchGroup> {
    let h_runs = scan_runs(board, Axis::Horizontal);
    let v_runs = scan_runs(board, Axis::Vertical);

    let mut found: Vec<MatchGroup> = Vec::with_capacity(h_runs.len() + v_runs.len());
    found.extend(h_runs.iter().map(|run| run.to_group()));
    found.extend(v_runs.iter().map(|run| run.to_group()));
    found.extend(plus_groups(board, &h_runs, &v_runs));

    assign_spawns(found)
}

/// Fast check for any run of three or more
pub fn has_match(board: &Board) -> bool {
    !scan_runs(board, Axis::Horizontal).is_empty() || !scan_runs(board, Axis::Vertical).is_empty()
}

/// Every adjacent swap that the session would accept: combos and swaps that
/// create at least one run. Pairs are `(a, b)` with `a` before `b` row-major.
pub fn find_swaps(board: &Board) -> Vec<(Pos, Pos)> {
    let mut swaps = Vec::new();
    for a in positions() {
        for b in [a.offset(0, 1), a.offset(1, 0)].into_iter().flatten() {
            debug_assert!(is_adjacent(a, b));
            let (Some(ta), Some(tb)) = (board.get(a), board.get(b)) else {
                continue;
            };
            if is_combo(ta, tb) {
                swaps.push((a, b));
                continue;
            }
            if ta.color == tb.color {
                continue;
            }
            let mut swapped = board.clone();
            swapped.swap(a, b);
            if creates_run_at(&swapped, a) || creates_run_at(&swapped, b) {
                swaps.push((a, b));
            }
        }
    }
    swaps
}

/// Collect maximal runs of at least [`MIN_RUN`] along one axis
fn scan_runs(board: &Board, axis: Axis) -> Vec<Run> {
    let mut runs = Vec::new();
    for line in 0..BOARD_SIZE {
        let at = |i: usize| match axis {
            Axis::Horizontal => Pos::new(line, i),
            Axis::Vertical => Pos::new(i, line),
        };

        let mut i = 0;
        while i < BOARD_SIZE {
            let Some(tile) = board.get(at(i)) else {
                i += 1;
                continue;
            };
            let mut end = i + 1;
            while end < BOARD_SIZE && color_at(board, at(end)) == Some(tile.color) {
                end += 1;
            }
            if end - i >= MIN_RUN {
                runs.push(Run {
                    start: at(i),
                    len: end - i,
                    axis,
                });
            }
            i = end;
        }
    }
    runs
}

/// Wrapped groups grown from cells shared by a horizontal and a vertical run.
///
/// Every such cell is a center of its own; a shape with several crossings
/// yields one group per crossing.
fn plus_groups(board: &Board, h_runs: &[Run], v_runs: &[Run]) -> Vec<MatchGroup> {
    let mut in_h = [false; CELL_COUNT];
    let mut in_v = [false; CELL_COUNT];
    for run in h_runs {
        for pos in run.cells() {
            in_h[pos.index()] = true;
        }
    }
    for run in v_runs {
        for pos in run.cells() {
            in_v[pos.index()] = true;
        }
    }

    let mut groups = Vec::new();
    for center in positions() {
        let i = center.index();
        if !(in_h[i] && in_v[i]) {
            continue;
        }
        let region = plus_region(board, center);
        if region.len() < MIN_PLUS {
            continue;
        }
        tracing::trace!(%center, cells = region.len(), "plus shape");
        groups.push(MatchGroup::new(
            region,
            Some(Spawn {
                pos: center,
                kind: Special::Wrapped,
            }),
        ));
    }
    groups
}

/// Center plus every same-colored cell reachable in a straight line
fn plus_region(board: &Board, center: Pos) -> Vec<Pos> {
    let Some(color) = color_at(board, center) else {
        return Vec::new();
    };
    let mut region = vec![center];
    for (dr, dc) in PLUS_ARMS {
        let mut current = center;
        while let Some(next) = current.offset(dr, dc) {
            if color_at(board, next) != Some(color) {
                break;
            }
            region.push(next);
            current = next;
        }
    }
    region
}

/// Order groups and hand each contested spawn cell to the first claimant
fn assign_spawns(found: Vec<MatchGroup>) -> Vec<MatchGroup> {
    let mut ordered = found;
    // stable: equal sizes keep discovery order
    ordered.sort_by_key(|g| Reverse(g.len()));

    let mut seen: FxHashSet<Vec<Pos>> = FxHashSet::default();
    let mut claimed: FxHashSet<Pos> = FxHashSet::default();
    let mut groups = Vec::with_capacity(ordered.len());

    for mut group in ordered {
        if !seen.insert(group.cells.clone()) {
            continue;
        }
        if let Some(spawn) = group.spawn {
            if !claimed.insert(spawn.pos) {
                tracing::trace!(pos = %spawn.pos, kind = ?spawn.kind, "spawn cell already claimed");
                group.spawn = None;
            }
        }
        groups.push(group);
    }
    groups
}

/// Does the cell sit in a run of at least three in either direction?
pub(crate) fn creates_run_at(board: &Board, pos: Pos) -> bool {
    let Some(color) = color_at(board, pos) else {
        return false;
    };
    let arm = |dr: i32, dc: i32| {
        let mut n = 0;
        let mut current = pos;
        while let Some(next) = current.offset(dr, dc) {
            if color_at(board, next) != Some(color) {
                break;
            }
            n += 1;
            current = next;
        }
        n
    };
    1 + arm(0, -1) + arm(0, 1) >= MIN_RUN || 1 + arm(-1, 0) + arm(1, 0) >= MIN_RUN
}

fn color_at(board: &Board, pos: Pos) -> Option<Color> {
    board.get(pos).map(|t| t.color)
}

// ============================================================================
// TESTS
// ============================================================================
