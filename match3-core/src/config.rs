//! Engine configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::resolve::DEFAULT_PER_TILE_SCORE;
use crate::tiles::MAX_COLORS;

/// Fewest colors that still make a playable board
pub const MIN_COLORS: usize = 3;

/// Per-session engine settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of tile colors drawn (3..=5)
    pub color_count: usize,
    /// Points per cleared cell
    pub per_tile_score: u64,
    /// Safety bound on detect/resolve steps in one cascade
    pub max_cascade_steps: usize,
    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            color_count: MAX_COLORS,
            per_tile_score: DEFAULT_PER_TILE_SCORE,
            max_cascade_steps: 100,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set color count (clamped to the playable range)
    pub fn with_colors(mut self, color_count: usize) -> Self {
        self.color_count = color_count;
        self.normalized()
    }

    /// Clamp out-of-range values
    pub fn normalized(mut self) -> Self {
        self.color_count = self.color_count.clamp(MIN_COLORS, MAX_COLORS);
        self.max_cascade_steps = self.max_cascade_steps.max(1);
        self
    }

    /// Load from JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        Ok(config.normalized())
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
