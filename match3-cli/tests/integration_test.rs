//! Integration tests for the match-three engine
//!
//! Drives the public API end to end: sessions, cascades, combos, events

use match3_core::{
    combo, find_matches, find_swaps, Board, Color, ComboKind, EngineConfig, EngineEvent, Phase,
    Pos, ScriptedSource, SeededSource, Session, Special, SwapOutcome, SwapRejected, Tile,
    BOARD_SIZE, CELL_COUNT,
};
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

/// Board with no runs and no accepted swaps
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

/// Refill sequence that never lines up three of a kind
fn refill() -> ScriptedSource {
    ScriptedSource::from_symbols("BGYUP")
}

fn session_from(rows: [&str; 8]) -> Session<ScriptedSource> {
    let board = Board::from_rows(&rows).unwrap();
    Session::with_board(board, EngineConfig::default(), refill())
}

fn with_specials(specials: &[(Pos, Special)]) -> Board {
    let mut board = Board::from_rows(&STABLE).unwrap();
    for &(pos, special) in specials {
        let tile = board.get(pos).unwrap().into_special(special);
        board.set(pos, Some(tile));
    }
    board
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_horizontal_three_scores_thirty() {
    let mut rows = STABLE;
    rows[0] = "PPBPGYBG";
    let mut session = session_from(rows);

    let mut swapped = session.board().clone();
    swapped.swap(Pos::new(0, 2), Pos::new(0, 3));
    let groups = find_matches(&swapped);
    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0].cells,
        vec![Pos::new(0, 0), Pos::new(0, 1), Pos::new(0, 2)]
    );
    assert!(groups[0].spawn.is_none());

    let turn = session.play(Pos::new(0, 2), Pos::new(0, 3)).unwrap();
    assert_eq!(turn.outcome, SwapOutcome::Accepted);
    assert_eq!(turn.score_gained, 30);
    assert_eq!(turn.cascade.steps, 1);
    assert_eq!(session.score(), 30);
    assert_eq!(session.phase(), Phase::Idle);
}

#[test]
fn test_horizontal_four_leaves_striped_at_index_two() {
    let mut rows = STABLE;
    rows[0] = "PPBPGYBG";
    rows[1] = "GYPGYBGY";
    let mut session = session_from(rows);

    let turn = session.play(Pos::new(0, 2), Pos::new(1, 2)).unwrap();

    assert_eq!(turn.score_gained, 30);
    assert_eq!(
        session.board().get(Pos::new(0, 2)),
        Some(Tile::with_special(Color::Pink, Special::StripedRow))
    );
    let events = session.drain_events();
    assert!(events.contains(&EngineEvent::SpecialCreated {
        pos: Pos::new(0, 2),
        kind: Special::StripedRow,
    }));
    assert_eq!(events.last(), Some(&EngineEvent::BoardStable { score: 30 }));
}

#[test]
fn test_bomb_bomb_clears_board() {
    let board = with_specials(&[
        (Pos::new(3, 3), Special::ColorBomb),
        (Pos::new(3, 4), Special::ColorBomb),
    ]);
    let mut session = Session::with_board(board, EngineConfig::default(), refill());

    let turn = session.play(Pos::new(3, 3), Pos::new(3, 4)).unwrap();

    assert_eq!(
        turn.outcome,
        SwapOutcome::Combo {
            kind: ComboKind::DoubleBomb,
            cleared: CELL_COUNT
        }
    );
    assert_eq!(turn.score_gained, 640);
    assert_eq!(session.source().drawn(), CELL_COUNT);
    assert!(session.board().is_full());
    assert_eq!(session.board().special_count(), 0);
}

// ============================================================================
// COMBOS
// ============================================================================

#[test]
fn test_double_striped_clears_exactly_rows_and_columns() {
    let (a, b) = (Pos::new(5, 1), Pos::new(6, 1));
    let board = with_specials(&[(a, Special::StripedRow), (b, Special::StripedColumn)]);
    let out = combo(&board, a, b, &mut refill()).unwrap();

    let mut expected: Vec<Pos> = (0..BOARD_SIZE)
        .flat_map(|i| {
            [
                Pos::new(a.row, i),
                Pos::new(b.row, i),
                Pos::new(i, a.col),
                Pos::new(i, b.col),
            ]
        })
        .collect();
    expected.sort();
    expected.dedup();
    assert_eq!(out.cleared, expected);
}

#[test]
fn test_combo_swap_is_offered_as_a_move() {
    let (a, b) = (Pos::new(6, 6), Pos::new(6, 7));
    let board = with_specials(&[(a, Special::Wrapped), (b, Special::StripedRow)]);
    assert!(find_swaps(&board).contains(&(a, b)));
}

// ============================================================================
// SESSION RULES
// ============================================================================

#[test]
fn test_busy_session_rejects_and_keeps_state() {
    let mut rows = STABLE;
    rows[0] = "PPBPGYBG";
    let mut session = session_from(rows);
    session.request_swap(Pos::new(0, 2), Pos::new(0, 3)).unwrap();

    let before = session.snapshot();
    let err = session
        .request_swap(Pos::new(7, 6), Pos::new(7, 7))
        .unwrap_err();
    assert_eq!(err, SwapRejected::Busy);
    assert_eq!(session.snapshot(), before);

    session.run_to_stable();
    assert!(!session.is_busy());
}

#[test]
fn test_same_seed_same_game() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    for _ in 0..5 {
        let seed: u64 = rng.gen();
        let config = EngineConfig::default().with_seed(seed);
        let a = Session::seeded(config.clone());
        let b = Session::seeded(config);
        assert_eq!(a.board(), b.board());
    }
}

#[test]
fn test_settled_board_has_no_runs() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    for _ in 0..20 {
        let source = SeededSource::new(rng.gen(), 4);
        let session = Session::new(EngineConfig::default().with_colors(4), source);
        assert!(find_matches(session.board()).is_empty());
        assert_eq!(session.score(), 0);
    }
}

// ============================================================================
// PROPERTIES
// ============================================================================

fn any_swap() -> impl Strategy<Value = (Pos, Pos)> {
    (0..BOARD_SIZE, 0..BOARD_SIZE, any::<bool>()).prop_filter_map(
        "swap must stay on the board",
        |(row, col, down)| {
            let a = Pos::new(row, col);
            let b = if down { a.offset(1, 0)? } else { a.offset(0, 1)? };
            Some((a, b))
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn reverted_swaps_leave_board_identical(seed in any::<u64>(), (a, b) in any_swap()) {
        let mut session = Session::seeded(EngineConfig::default().with_seed(seed));
        let before = session.board().clone();
        let outcome = session.request_swap(a, b).unwrap();
        if outcome == SwapOutcome::Reverted {
            prop_assert_eq!(session.board(), &before);
            prop_assert!(!session.is_busy());
        } else {
            prop_assert!(session.is_busy());
        }
    }

    #[test]
    fn cascades_terminate_with_full_board(seed in any::<u64>(), colors in 3usize..=5, turns in 1usize..8) {
        let config = EngineConfig::default().with_seed(seed).with_colors(colors);
        let mut session = Session::seeded(config);
        for _ in 0..turns {
            let Some(&(a, b)) = find_swaps(session.board()).first() else {
                break;
            };
            let turn = session.play(a, b).unwrap();
            prop_assert!(turn.outcome.is_accepted());
            prop_assert!(!turn.cascade.hit_limit);
            prop_assert!(session.board().is_full());
            prop_assert!(!session.is_busy());
            prop_assert!(find_matches(session.board()).is_empty());
        }
    }

    #[test]
    fn refill_draws_match_cleared_cells(seed in any::<u64>()) {
        let mut source = SeededSource::new(seed, 5);
        let board = Board::random(&mut source);
        let mut session = Session::with_board(board, EngineConfig::default(), refill());
        let mut cleared = 0;
        if let Some(&(a, b)) = find_swaps(session.board()).first() {
            if let Ok(turn) = session.play(a, b) {
                cleared = turn.cascade.cleared;
                if let SwapOutcome::Combo { cleared: c, .. } = turn.outcome {
                    cleared += c;
                }
            }
        }
        prop_assert_eq!(session.source().drawn(), cleared);
    }
}
