//! Special tile effects and the clear-area geometry they share

use crate::board::{col_positions, positions, row_positions, Board, Pos, BOARD_SIZE};
use crate::tiles::Special;

/// Radius of the wrapped tile's first blast (3x3)
pub const WRAPPED_INNER_RADIUS: i32 = 1;

/// Radius of the wrapped tile's second blast (5x5)
pub const WRAPPED_OUTER_RADIUS: i32 = 2;

// ============================================================================
// GEOMETRY
// ============================================================================

pub fn row_cells(row: usize) -> Vec<Pos> {
    row_positions(row).collect()
}

pub fn col_cells(col: usize) -> Vec<Pos> {
    col_positions(col).collect()
}

/// Square of side `2 * radius + 1` around `center`, clipped to the board
pub fn square(center: Pos, radius: i32) -> Vec<Pos> {
    let mut cells = Vec::new();
    for dr in -radius..=radius {
        for dc in -radius..=radius {
            if let Some(pos) = center.offset(dr, dc) {
                cells.push(pos);
            }
        }
    }
    cells
}

/// Three full rows and three full columns centered on `center`.
///
/// Bands that would fall off the board are skipped.
pub fn band_cross(center: Pos) -> Vec<Pos> {
    let mut cells = Vec::new();
    for d in -1..=1 {
        let row = center.row as i32 + d;
        if (0..BOARD_SIZE as i32).contains(&row) {
            cells.extend(row_positions(row as usize));
        }
        let col = center.col as i32 + d;
        if (0..BOARD_SIZE as i32).contains(&col) {
            cells.extend(col_positions(col as usize));
        }
    }
    normalize(cells)
}

/// Wrapped explosion: the 3x3 pass followed by the 5x5 pass
pub fn wrapped_blast(center: Pos) -> Vec<Pos> {
    let mut cells = square(center, WRAPPED_INNER_RADIUS);
    cells.extend(square(center, WRAPPED_OUTER_RADIUS));
    normalize(cells)
}

/// Sort row-major and drop repeats
pub(crate) fn normalize(mut cells: Vec<Pos>) -> Vec<Pos> {
    cells.sort_unstable();
    cells.dedup();
    cells
}

// ============================================================================
// TRIGGER
// ============================================================================

/// Cells cleared when the special tile at `pos` fires.
///
/// Empty for plain tiles and empty cells. The triggering cell itself is
/// always part of a non-empty area.
pub fn trigger_area(board: &Board, pos: Pos) -> Vec<Pos> {
    let Some(tile) = board.get(pos) else {
        return Vec::new();
    };
    match tile.special {
        Special::None => Vec::new(),
        Special::StripedRow => row_cells(pos.row),
        Special::StripedColumn => col_cells(pos.col),
        Special::Wrapped => wrapped_blast(pos),
        Special::ColorBomb => {
            let mut cells: Vec<Pos> = positions()
                .filter(|&p| board.get(p).is_some_and(|t| t.color == tile.color))
                .collect();
            cells.push(pos);
            normalize(cells)
        }
    }
}

/// Fire the special at `pos` and return the board with its area emptied.
///
/// No gravity is applied; that is the resolver's job.
pub fn trigger(board: &Board, pos: Pos) -> Board {
    let mut out = board.clone();
    for cell in trigger_area(board, pos) {
        out.set(cell, None);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::Color;

    fn board_with(pos: Pos, special: Special) -> Board {
        let mut board = Board::from_rows(&[
            "BGYBGYBG",
            "GYBGYBGY",
            "YBGYBGYB",
            "BGYBGYBG",
            "GYBGYBGY",
            "YBGYBGYB",
            "BGYBGYBG",
            "GYBGYBGY",
        ])
        .unwrap();
        let tile = board.get(pos).unwrap().into_special(special);
        board.set(pos, Some(tile));
        board
    }

    #[test]
    fn test_striped_row_clears_row() {
        let pos = Pos::new(4, 2);
        let board = board_with(pos, Special::StripedRow);
        let out = trigger(&board, pos);
        assert_eq!(out.empty_count(), BOARD_SIZE);
        assert!(row_positions(4).all(|p| out.get(p).is_none()));
    }

    #[test]
    fn test_striped_column_clears_column() {
        let pos = Pos::new(0, 6);
        let board = board_with(pos, Special::StripedColumn);
        let out = trigger(&board, pos);
        assert_eq!(out.empty_count(), BOARD_SIZE);
        assert!(col_positions(6).all(|p| out.get(p).is_none()));
    }

    #[test]
    fn test_wrapped_center_is_five_by_five() {
        let pos = Pos::new(3, 3);
        let board = board_with(pos, Special::Wrapped);
        assert_eq!(trigger_area(&board, pos).len(), 25);
    }

    #[test]
    fn test_wrapped_corner_is_clipped() {
        let pos = Pos::new(0, 0);
        let board = board_with(pos, Special::Wrapped);
        let area = trigger_area(&board, pos);
        assert_eq!(area.len(), 9);
        assert!(area.iter().all(|p| p.row <= 2 && p.col <= 2));
    }

    #[test]
    fn test_color_bomb_clears_its_color() {
        let pos = Pos::new(0, 0); // blue
        let board = board_with(pos, Special::ColorBomb);
        let area = trigger_area(&board, pos);
        let blues = board.positions_of(Color::Blue);
        assert_eq!(area, blues);
        let out = trigger(&board, pos);
        assert!(out.tiles().all(|(_, t)| t.color != Color::Blue));
    }

    #[test]
    fn test_plain_tile_does_nothing() {
        let pos = Pos::new(5, 5);
        let board = board_with(pos, Special::None);
        assert!(trigger_area(&board, pos).is_empty());
        assert_eq!(trigger(&board, pos), board);
        assert!(trigger_area(&Board::empty(), pos).is_empty());
    }

    #[test]
    fn test_band_cross_interior_and_edge() {
        // 3 rows + 3 cols minus the 9 shared cells
        assert_eq!(band_cross(Pos::new(4, 4)).len(), 3 * 8 + 3 * 8 - 9);
        // corner: 2 rows + 2 cols minus 4 shared
        assert_eq!(band_cross(Pos::new(0, 0)).len(), 2 * 8 + 2 * 8 - 4);
    }

    #[test]
    fn test_square_clips() {
        assert_eq!(square(Pos::new(7, 7), 1).len(), 4);
        assert_eq!(square(Pos::new(4, 4), 0), vec![Pos::new(4, 4)]);
    }
}
