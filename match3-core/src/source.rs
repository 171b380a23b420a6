//! Tile sources - where fresh tiles come from.
//!
//! The engine never touches an ambient random generator. Everything random
//! (refill draws, striped orientation in color-bomb combos) goes through a
//! [`TileSource`], so a game is fully reproducible from its seed.
//!
//! ```
//! use match3_core::{SeededSource, TileSource};
//!
//! let mut a = SeededSource::new(42, 5);
//! let mut b = SeededSource::new(42, 5);
//! assert_eq!(a.draw(), b.draw());
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::tiles::{Color, Special, Tile, MAX_COLORS};

/// Supplier of fresh tiles and random choices
pub trait TileSource {
    /// Draw one plain tile of a uniformly chosen color
    fn draw(&mut self) -> Tile;

    /// Pick a striped orientation (`StripedRow` or `StripedColumn`)
    fn orientation(&mut self) -> Special;
}

impl<T: TileSource + ?Sized> TileSource for &mut T {
    fn draw(&mut self) -> Tile {
        (**self).draw()
    }

    fn orientation(&mut self) -> Special {
        (**self).orientation()
    }
}

// ============================================================================
// SEEDED SOURCE
// ============================================================================

/// ChaCha8-backed source, deterministic per seed
#[derive(Clone, Debug)]
pub struct SeededSource {
    rng: ChaCha8Rng,
    seed: u64,
    color_count: usize,
}

impl SeededSource {
    /// Create a source drawing from the first `color_count` colors
    /// (clamped to `1..=MAX_COLORS`)
    pub fn new(seed: u64, color_count: usize) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            color_count: color_count.clamp(1, MAX_COLORS),
        }
    }

    /// Source seeded from OS entropy
    pub fn from_entropy(color_count: usize) -> Self {
        let seed = rand::thread_rng().gen();
        Self::new(seed, color_count)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn color_count(&self) -> usize {
        self.color_count
    }
}

impl TileSource for SeededSource {
    fn draw(&mut self) -> Tile {
        Tile::plain(Color::from_id(self.rng.gen_range(0..self.color_count)))
    }

    fn orientation(&mut self) -> Special {
        if self.rng.gen_bool(0.5) {
            Special::StripedRow
        } else {
            Special::StripedColumn
        }
    }
}

// ============================================================================
// SCRIPTED SOURCE
// ============================================================================

/// Plays back a fixed color sequence, cycling when exhausted.
///
/// Used for fixtures where the exact refill matters.
#[derive(Clone, Debug)]
pub struct ScriptedSource {
    colors: Vec<Color>,
    next: usize,
    orientations: Vec<Special>,
    next_orientation: usize,
    drawn: usize,
}

impl ScriptedSource {
    pub fn new(colors: Vec<Color>) -> Self {
        assert!(!colors.is_empty(), "scripted source needs at least one color");
        Self {
            colors,
            next: 0,
            orientations: vec![Special::StripedRow],
            next_orientation: 0,
            drawn: 0,
        }
    }

    /// Parse colors from board symbols, e.g. `"BGYUP"`; unknown symbols are skipped
    pub fn from_symbols(symbols: &str) -> Self {
        Self::new(symbols.chars().filter_map(Color::from_symbol).collect())
    }

    /// Replace the orientation script (cycled like colors)
    pub fn with_orientations(mut self, orientations: Vec<Special>) -> Self {
        assert!(orientations.iter().all(|s| s.is_striped()));
        if !orientations.is_empty() {
            self.orientations = orientations;
        }
        self
    }

    /// Number of tiles drawn so far
    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

impl TileSource for ScriptedSource {
    fn draw(&mut self) -> Tile {
        let color = self.colors[self.next % self.colors.len()];
        self.next += 1;
        self.drawn += 1;
        Tile::plain(color)
    }

    fn orientation(&mut self) -> Special {
        let o = self.orientations[self.next_orientation % self.orientations.len()];
        self.next_orientation += 1;
        o
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_determinism() {
        let mut a = SeededSource::new(7, 5);
        let mut b = SeededSource::new(7, 5);
        for _ in 0..100 {
            assert_eq!(a.draw(), b.draw());
            assert_eq!(a.orientation(), b.orientation());
        }
    }

    #[test]
    fn test_seeded_respects_color_count() {
        let mut source = SeededSource::new(1, 3);
        for _ in 0..500 {
            let tile = source.draw();
            assert!(tile.color.id() < 3);
            assert!(!tile.is_special());
        }
        assert_eq!(SeededSource::new(1, 99).color_count(), MAX_COLORS);
    }

    #[test]
    fn test_seeded_orientation_is_striped() {
        let mut source = SeededSource::new(3, 5);
        for _ in 0..50 {
            assert!(source.orientation().is_striped());
        }
    }

    #[test]
    fn test_scripted_cycles() {
        let mut source = ScriptedSource::from_symbols("BG");
        assert_eq!(source.draw().color, Color::Blue);
        assert_eq!(source.draw().color, Color::Green);
        assert_eq!(source.draw().color, Color::Blue);
        assert_eq!(source.drawn(), 3);
    }

    #[test]
    fn test_scripted_orientations() {
        let mut source = ScriptedSource::from_symbols("B")
            .with_orientations(vec![Special::StripedColumn, Special::StripedRow]);
        assert_eq!(source.orientation(), Special::StripedColumn);
        assert_eq!(source.orientation(), Special::StripedRow);
        assert_eq!(source.orientation(), Special::StripedColumn);
    }
}
