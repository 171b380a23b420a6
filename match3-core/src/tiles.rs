//! Tile kinds: colors, special kinds and the tile value itself

use serde::{Deserialize, Serialize};

/// Number of color kinds the game ships with
pub const MAX_COLORS: usize = 5;

/// Tile color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    Blue = 0,
    Pink = 1,
    Green = 2,
    Yellow = 3,
    Purple = 4,
}

/// All colors in id order
pub const COLORS: [Color; MAX_COLORS] = [
    Color::Blue,
    Color::Pink,
    Color::Green,
    Color::Yellow,
    Color::Purple,
];

impl Color {
    /// Color for a numeric id (wraps modulo [`MAX_COLORS`])
    pub fn from_id(id: usize) -> Self {
        COLORS[id % MAX_COLORS]
    }

    pub fn id(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Blue => "blue",
            Color::Pink => "pink",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Purple => "purple",
        }
    }

    /// Single uppercase letter used by board text notation
    pub fn symbol(self) -> char {
        match self {
            Color::Blue => 'B',
            Color::Pink => 'P',
            Color::Green => 'G',
            Color::Yellow => 'Y',
            Color::Purple => 'U',
        }
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        COLORS.iter().copied().find(|color| color.symbol() == c)
    }

    /// Image asset for renderers
    pub fn asset_path(self) -> &'static str {
        match self {
            Color::Blue => "/monsters/blue.png",
            Color::Pink => "/monsters/pink.png",
            Color::Green => "/monsters/green.png",
            Color::Yellow => "/monsters/yellow.png",
            Color::Purple => "/monsters/purple.png",
        }
    }
}

/// Special tile kinds
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Special {
    #[default]
    None,
    StripedRow,    // clears its row
    StripedColumn, // clears its column
    Wrapped,       // 3x3 then 5x5 blast
    ColorBomb,     // clears every tile of its color
}

impl Special {
    pub fn is_special(self) -> bool {
        self != Special::None
    }

    pub fn is_striped(self) -> bool {
        matches!(self, Special::StripedRow | Special::StripedColumn)
    }

    /// Lowercase modifier appended to the color symbol in board notation
    pub fn modifier(self) -> Option<char> {
        match self {
            Special::None => None,
            Special::StripedRow => Some('h'),
            Special::StripedColumn => Some('v'),
            Special::Wrapped => Some('w'),
            Special::ColorBomb => Some('c'),
        }
    }

    pub fn from_modifier(c: char) -> Option<Self> {
        match c {
            'h' => Some(Special::StripedRow),
            'v' => Some(Special::StripedColumn),
            'w' => Some(Special::Wrapped),
            'c' => Some(Special::ColorBomb),
            _ => None,
        }
    }
}

/// A tile on the board.
///
/// Tiles are plain values: changing a tile means writing a new one into the
/// cell. A tile's color never changes once drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub color: Color,
    pub special: Special,
}

impl Tile {
    pub const fn plain(color: Color) -> Self {
        Self {
            color,
            special: Special::None,
        }
    }

    pub const fn with_special(color: Color, special: Special) -> Self {
        Self { color, special }
    }

    /// Same color, different special kind
    pub fn into_special(self, special: Special) -> Self {
        Self {
            color: self.color,
            special,
        }
    }

    pub fn is_special(&self) -> bool {
        self.special.is_special()
    }

    pub fn is_color_bomb(&self) -> bool {
        self.special == Special::ColorBomb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_round_trip() {
        for color in COLORS {
            assert_eq!(Color::from_symbol(color.symbol()), Some(color));
        }
        assert_eq!(Color::from_symbol('x'), None);
    }

    #[test]
    fn test_into_special_keeps_color() {
        let tile = Tile::plain(Color::Green).into_special(Special::Wrapped);
        assert_eq!(tile.color, Color::Green);
        assert_eq!(tile.special, Special::Wrapped);
        assert!(tile.is_special());
        assert!(!tile.is_color_bomb());
    }

    #[test]
    fn test_striped_kinds() {
        assert!(Special::StripedRow.is_striped());
        assert!(Special::StripedColumn.is_striped());
        assert!(!Special::Wrapped.is_striped());
        assert!(!Special::None.is_special());
    }
}
