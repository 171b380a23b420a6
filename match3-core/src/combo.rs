//! Combos: what happens when two specials (or a color bomb and anything)
//! are swapped into each other

use serde::{Deserialize, Serialize};

use crate::board::{positions, Board, Pos};
use crate::resolve::{ClearSet, Fired};
use crate::source::TileSource;
use crate::special::{band_cross, col_cells, row_cells, square, WRAPPED_OUTER_RADIUS};
use crate::tiles::{Special, Tile};

/// Combo classification, in precedence order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComboKind {
    DoubleBomb,
    BombPlain,
    BombStriped,
    BombWrapped,
    DoubleStriped,
    DoubleWrapped,
    StripedWrapped,
}

/// Result of a combo (cells emptied, no gravity yet)
#[derive(Clone, Debug)]
pub struct ComboOutcome {
    pub kind: ComboKind,
    pub board: Board,
    pub cleared: Vec<Pos>,
    pub triggered: Vec<Fired>,
    /// Tiles turned into specials by a color bomb before firing
    pub converted: Vec<Pos>,
}

/// Does swapping these two tiles set off a combo?
///
/// A color bomb combos with anything; otherwise both tiles must be special.
pub fn is_combo(a: Tile, b: Tile) -> bool {
    a.is_color_bomb() || b.is_color_bomb() || (a.is_special() && b.is_special())
}

/// Classify a pair of swapped tiles
pub fn classify(a: Tile, b: Tile) -> Option<ComboKind> {
    use Special as S;

    if !is_combo(a, b) {
        return None;
    }
    let kind = match (a.special, b.special) {
        (S::ColorBomb, S::ColorBomb) => ComboKind::DoubleBomb,
        (S::ColorBomb, S::None) | (S::None, S::ColorBomb) => ComboKind::BombPlain,
        (S::ColorBomb, S::StripedRow | S::StripedColumn)
        | (S::StripedRow | S::StripedColumn, S::ColorBomb) => ComboKind::BombStriped,
        (S::ColorBomb, S::Wrapped) | (S::Wrapped, S::ColorBomb) => ComboKind::BombWrapped,
        (S::StripedRow | S::StripedColumn, S::StripedRow | S::StripedColumn) => {
            ComboKind::DoubleStriped
        }
        (S::Wrapped, S::Wrapped) => ComboKind::DoubleWrapped,
        _ => ComboKind::StripedWrapped,
    };
    Some(kind)
}

/// Resolve a combo on a board where `a` and `b` have already been swapped.
///
/// Returns `None` when the two tiles do not form a combo. Specials caught in
/// the combined area go off as well.
pub fn combo(
    board: &Board,
    a: Pos,
    b: Pos,
    source: &mut dyn TileSource,
) -> Option<ComboOutcome> {
    let ta = board.get(a)?;
    let tb = board.get(b)?;
    let kind = classify(ta, tb)?;

    let mut work = board.clone();
    let mut converted = Vec::new();

    // color-bomb combos: figure out which side is the bomb
    let (bomb, other_pos, other) = if ta.is_color_bomb() {
        (a, b, tb)
    } else {
        (b, a, ta)
    };

    match kind {
        ComboKind::BombStriped | ComboKind::BombWrapped => {
            for pos in board.positions_of(other.color) {
                if pos == bomb {
                    continue;
                }
                let special = match kind {
                    ComboKind::BombStriped => source.orientation(),
                    _ => Special::Wrapped,
                };
                if let Some(tile) = work.get(pos) {
                    work.set(pos, Some(tile.into_special(special)));
                    converted.push(pos);
                }
            }
        }
        _ => {}
    }

    let mut clear = ClearSet::new(&work);
    match kind {
        ComboKind::DoubleBomb => {
            clear.fire_with(a, Special::ColorBomb, positions().collect());
            clear.fire_with(b, Special::ColorBomb, Vec::new());
        }
        ComboKind::BombPlain => {
            let mut area = board.positions_of(other.color);
            area.push(bomb);
            clear.fire_with(bomb, Special::ColorBomb, area);
            clear.add(other_pos);
        }
        ComboKind::BombStriped | ComboKind::BombWrapped => {
            // the bomb itself only vanishes; the converted tiles do the work
            clear.fire_with(bomb, Special::ColorBomb, vec![bomb]);
            clear.add(other_pos);
            clear.add_all(converted.iter().copied());
        }
        ComboKind::DoubleStriped => {
            for (pos, tile) in [(a, ta), (b, tb)] {
                let mut area = row_cells(pos.row);
                area.extend(col_cells(pos.col));
                clear.fire_with(pos, tile.special, area);
            }
        }
        ComboKind::DoubleWrapped => {
            for (pos, tile) in [(a, ta), (b, tb)] {
                clear.fire_with(pos, tile.special, square(pos, WRAPPED_OUTER_RADIUS));
            }
        }
        ComboKind::StripedWrapped => {
            for (pos, tile) in [(a, ta), (b, tb)] {
                clear.fire_with(pos, tile.special, band_cross(pos));
            }
        }
    }
    let cleared = clear.finish();

    tracing::debug!(
        ?kind,
        %a,
        %b,
        cleared = cleared.cleared.len(),
        converted = converted.len(),
        fired = cleared.triggered.len(),
        "combo"
    );

    Some(ComboOutcome {
        kind,
        board: cleared.board,
        cleared: cleared.cleared,
        triggered: cleared.triggered,
        converted,
    })
}
