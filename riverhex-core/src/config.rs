//! MatchConfig - settings for a new match

use crate::board::Side;
use crate::game::{Level, PlayerKind};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Board sizes offered to players
pub const SUPPORTED_SIZES: [i32; 3] = [7, 9, 11];

/// Match settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub size: i32,
    pub red: PlayerKind,
    pub blue: PlayerKind,
    pub level: Level,
    pub first: Side,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            size: 7,
            red: PlayerKind::Human,
            blue: PlayerKind::Computer,
            level: Level::Easy,
            first: Side::Red,
        }
    }
}

impl MatchConfig {
    /// Computer against computer
    pub fn self_play(size: i32, level: Level) -> Self {
        Self {
            size,
            red: PlayerKind::Computer,
            blue: PlayerKind::Computer,
            level,
            ..Default::default()
        }
    }

    /// Reject board sizes not offered
    pub fn validate(&self) -> anyhow::Result<()> {
        if !SUPPORTED_SIZES.contains(&self.size) {
            anyhow::bail!(
                "Unsupported board size {} (expected one of {:?})",
                self.size,
                SUPPORTED_SIZES
            );
        }
        Ok(())
    }

    /// One-player mode toggles the level; two-player mode keeps it
    pub fn next_level(&self) -> Level {
        if self.red == PlayerKind::Computer || self.blue == PlayerKind::Computer {
            self.level.next()
        } else {
            self.level
        }
    }

    /// Swap who plays which colour; between two humans, swap who starts instead
    pub fn swapped(&self) -> Self {
        if self.red == PlayerKind::Human && self.blue == PlayerKind::Human {
            Self {
                first: self.first.opponent(),
                ..self.clone()
            }
        } else {
            Self {
                red: self.blue,
                blue: self.red,
                ..self.clone()
            }
        }
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read match config: {}", path.display()))?;
        let config: MatchConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse match config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write match config: {}", path.display()))?;
        Ok(())
    }
}
