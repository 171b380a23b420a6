//! Square board geometry and cell storage

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::source::TileSource;
use crate::tiles::{Color, Special, Tile};

/// Board side length
pub const BOARD_SIZE: usize = 8;

/// Total cell count
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Row-major index for a (row, col) pair
pub const fn index(row: usize, col: usize) -> usize {
    row * BOARD_SIZE + col
}

/// Check whether signed coordinates fall on the board
pub fn in_bounds(row: i32, col: i32) -> bool {
    row >= 0 && col >= 0 && (row as usize) < BOARD_SIZE && (col as usize) < BOARD_SIZE
}

/// True iff the two positions are one orthogonal step apart
pub fn is_adjacent(a: Pos, b: Pos) -> bool {
    a.row.abs_diff(b.row) + a.col.abs_diff(b.col) == 1
}

/// Board position; row 0 is the top row
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn from_index(i: usize) -> Self {
        Self::new(i / BOARD_SIZE, i % BOARD_SIZE)
    }

    pub fn index(&self) -> usize {
        index(self.row, self.col)
    }

    pub fn is_valid(&self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    /// Step by a signed offset, `None` when it leaves the board
    pub fn offset(&self, dr: i32, dc: i32) -> Option<Pos> {
        let row = self.row as i32 + dr;
        let col = self.col as i32 + dc;
        in_bounds(row, col).then(|| Pos::new(row as usize, col as usize))
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Error from the text board parser
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardParseError {
    #[error("expected {BOARD_SIZE} rows, got {0}")]
    RowCount(usize),

    #[error("row {row}: expected {BOARD_SIZE} cells, got {count}")]
    ColumnCount { row: usize, count: usize },

    #[error("row {row}: unknown cell token {token:?}")]
    UnknownToken { row: usize, token: String },
}

/// Game board (clone to mutate)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Tile>; CELL_COUNT],
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Board with every cell empty
    pub fn empty() -> Self {
        Self {
            cells: [None; CELL_COUNT],
        }
    }

    /// Board filled cell by cell (row-major) from a tile source
    pub fn random(source: &mut dyn TileSource) -> Self {
        let mut board = Self::empty();
        for cell in board.cells.iter_mut() {
            *cell = Some(source.draw());
        }
        board
    }

    /// Parse the text notation produced by `Display`.
    ///
    /// Rows without whitespace are read one character per cell; rows with
    /// whitespace are read as tokens, where a token is a color symbol
    /// optionally followed by a special modifier (`h`, `v`, `w`, `c`).
    /// `.` marks an empty cell.
    pub fn from_rows(rows: &[&str]) -> Result<Self, BoardParseError> {
        if rows.len() != BOARD_SIZE {
            return Err(BoardParseError::RowCount(rows.len()));
        }

        let mut board = Self::empty();
        for (r, line) in rows.iter().enumerate() {
            let tokens: Vec<String> = if line.contains(char::is_whitespace) {
                line.split_whitespace().map(str::to_string).collect()
            } else {
                line.chars().map(String::from).collect()
            };
            if tokens.len() != BOARD_SIZE {
                return Err(BoardParseError::ColumnCount {
                    row: r,
                    count: tokens.len(),
                });
            }
            for (c, token) in tokens.iter().enumerate() {
                let cell = parse_token(token).ok_or_else(|| BoardParseError::UnknownToken {
                    row: r,
                    token: token.clone(),
                })?;
                board.cells[index(r, c)] = cell;
            }
        }
        Ok(board)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// Tile at a position (`None` for empty or off-board)
    pub fn get(&self, pos: Pos) -> Option<Tile> {
        if !pos.is_valid() {
            return None;
        }
        self.cells[pos.index()]
    }

    /// Write a cell. Off-board positions are ignored.
    pub fn set(&mut self, pos: Pos, tile: Option<Tile>) {
        debug_assert!(pos.is_valid(), "set off the board at {pos}");
        if pos.is_valid() {
            self.cells[pos.index()] = tile;
        }
    }

    /// Empty a cell, returning what was there (`None` off the board)
    pub fn take(&mut self, pos: Pos) -> Option<Tile> {
        debug_assert!(pos.is_valid(), "take off the board at {pos}");
        if !pos.is_valid() {
            return None;
        }
        self.cells[pos.index()].take()
    }

    /// Exchange two cells. Does nothing if either is off the board.
    pub fn swap(&mut self, a: Pos, b: Pos) {
        debug_assert!(a.is_valid() && b.is_valid(), "swap off the board: {a} {b}");
        if a.is_valid() && b.is_valid() {
            self.cells.swap(a.index(), b.index());
        }
    }

    /// Every cell occupied
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// Iterate `(pos, cell)` in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Pos, Option<Tile>)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &cell)| (Pos::from_index(i), cell))
    }

    /// Iterate occupied cells in row-major order
    pub fn tiles(&self) -> impl Iterator<Item = (Pos, Tile)> + '_ {
        self.iter().filter_map(|(pos, cell)| cell.map(|t| (pos, t)))
    }

    /// Positions holding a tile of the given color
    pub fn positions_of(&self, color: Color) -> Vec<Pos> {
        self.tiles()
            .filter(|(_, t)| t.color == color)
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Count special tiles currently on the board
    pub fn special_count(&self) -> usize {
        self.tiles().filter(|(_, t)| t.is_special()).count()
    }
}

/// All board positions in row-major order
pub fn positions() -> impl Iterator<Item = Pos> {
    (0..CELL_COUNT).map(Pos::from_index)
}

pub fn row_positions(row: usize) -> impl Iterator<Item = Pos> {
    (0..BOARD_SIZE).map(move |col| Pos::new(row, col))
}

pub fn col_positions(col: usize) -> impl Iterator<Item = Pos> {
    (0..BOARD_SIZE).map(move |row| Pos::new(row, col))
}

fn parse_token(token: &str) -> Option<Option<Tile>> {
    let mut chars = token.chars();
    let first = chars.next()?;
    if first == '.' {
        return chars.next().is_none().then_some(None);
    }
    let color = Color::from_symbol(first)?;
    let special = match chars.next() {
        None => Special::None,
        Some(m) => Special::from_modifier(m)?,
    };
    if chars.next().is_some() {
        return None;
    }
    Some(Some(Tile::with_special(color, special)))
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_SIZE {
            let line: Vec<String> = row_positions(row)
                .map(|pos| match self.get(pos) {
                    None => ". ".to_string(),
                    Some(tile) => {
                        let mut s = String::new();
                        s.push(tile.color.symbol());
                        s.push(tile.special.modifier().unwrap_or(' '));
                        s
                    }
                })
                .collect();
            writeln!(f, "{}", line.join(" ").trim_end())?;
        }
        Ok(())
    }
}
