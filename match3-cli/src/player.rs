//! Automatic player used by `simulate` and `batch`
//!
//! Greedy: among all swaps the engine would accept, take the one that
//! clears the most cells right away. Ties go to the earliest swap in
//! row-major order. Cascades are not looked ahead.

use serde::Serialize;

use match3_core::{
    combo, find_matches, find_swaps, resolve, Board, EngineConfig, Pos, ScriptedSource, Session,
    SwapOutcome,
};

/// One move played by the automatic player
#[derive(Clone, Debug, Serialize)]
pub struct MoveRecord {
    pub number: usize,
    pub a: Pos,
    pub b: Pos,
    pub outcome: SwapOutcome,
    pub score_gained: u64,
    pub cascade_steps: usize,
    pub score: u64,
}

/// A finished automatic game
#[derive(Clone, Debug, Serialize)]
pub struct GameRecord {
    pub seed: Option<u64>,
    pub moves: Vec<MoveRecord>,
    pub final_score: u64,
    /// Stopped because no accepted swap was left
    pub deadlocked: bool,
    pub final_board: Vec<String>,
}

/// Play up to `max_moves` swaps on a fresh session
pub fn play_game(config: &EngineConfig, max_moves: usize) -> GameRecord {
    let mut session = Session::seeded(config.clone());
    let mut moves = Vec::with_capacity(max_moves);
    let mut deadlocked = false;

    for number in 1..=max_moves {
        let Some((a, b)) = choose_swap(session.board()) else {
            deadlocked = true;
            tracing::debug!(number, "no moves left");
            break;
        };
        let turn = match session.play(a, b) {
            Ok(turn) => turn,
            Err(err) => {
                tracing::warn!(%a, %b, %err, "player picked a rejected swap");
                break;
            }
        };
        moves.push(MoveRecord {
            number,
            a,
            b,
            outcome: turn.outcome,
            score_gained: turn.score_gained,
            cascade_steps: turn.cascade.steps,
            score: session.score(),
        });
        session.drain_events();
    }

    GameRecord {
        seed: config.seed,
        moves,
        final_score: session.score(),
        deadlocked,
        final_board: session.snapshot().rows,
    }
}

/// Best accepted swap by immediate clear count
pub fn choose_swap(board: &Board) -> Option<(Pos, Pos)> {
    let mut best: Option<((Pos, Pos), usize)> = None;
    for (a, b) in find_swaps(board) {
        let gain = immediate_clear(board, a, b);
        if best.map_or(true, |(_, top)| gain > top) {
            best = Some(((a, b), gain));
        }
    }
    best.map(|(swap, _)| swap)
}

/// Cells the first resolution step of a swap would clear
pub fn immediate_clear(board: &Board, a: Pos, b: Pos) -> usize {
    let mut swapped = board.clone();
    swapped.swap(a, b);
    // refill colors do not affect what the first step clears
    let mut scratch = ScriptedSource::from_symbols("B");
    if let Some(outcome) = combo(&swapped, a, b, &mut scratch) {
        return outcome.cleared.len();
    }
    let groups = find_matches(&swapped);
    if groups.is_empty() {
        return 0;
    }
    resolve(&swapped, &groups, &mut scratch, 0).cleared.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STABLE: [&str; 8] = [
        "BGYBGYBG",
        "GYBGYBGY",
        "YBGYBGYB",
        "BGYBGYBG",
        "GYBGYBGY",
        "YBGYBGYB",
        "BGYBGYBG",
        "GYBGYBGY",
    ];

    #[test]
    fn test_no_swaps_on_dead_board() {
        let board = Board::from_rows(&STABLE).unwrap();
        assert_eq!(choose_swap(&board), None);
    }

    #[test]
    fn test_prefers_bigger_clear() {
        let mut rows = STABLE;
        // (0,2)<->(0,3) makes three pinks; (4,2)<->(5,2) makes five purples
        rows[0] = "PPBPGYBG";
        rows[4] = "UUGUUBGY";
        rows[5] = "YBUYBGYB";
        let board = Board::from_rows(&rows).unwrap();
        assert_eq!(immediate_clear(&board, Pos::new(0, 2), Pos::new(0, 3)), 3);
        // the color bomb cell survives
        assert_eq!(immediate_clear(&board, Pos::new(4, 2), Pos::new(5, 2)), 4);
        let best = choose_swap(&board).unwrap();
        assert_eq!(best, (Pos::new(4, 2), Pos::new(5, 2)));
    }

    #[test]
    fn test_game_is_reproducible() {
        let config = EngineConfig::default().with_seed(5);
        let first = play_game(&config, 10);
        let second = play_game(&config, 10);
        assert_eq!(first.final_score, second.final_score);
        assert_eq!(first.final_board, second.final_board);
        assert_eq!(first.moves.len(), second.moves.len());
    }
}
