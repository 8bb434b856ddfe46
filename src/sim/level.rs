//! Levels built from declarative brick lists

use std::collections::HashSet;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::brick::{Brick, BrickKind};
use crate::config::ConfigError;

fn default_health() -> f32 {
    1.0
}

/// One brick in a level file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrickConfig {
    pub col: i32,
    pub row: i32,
    #[serde(default)]
    pub kind: BrickKind,
    #[serde(default = "default_health")]
    pub base_health: f32,
    /// Color override (0xRRGGBB)
    #[serde(default)]
    pub color: Option<u32>,
}

impl BrickConfig {
    pub fn new(col: i32, row: i32, kind: BrickKind, base_health: f32) -> Self {
        Self {
            col,
            row,
            kind,
            base_health,
            color: None,
        }
    }
}

/// Declarative level description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    #[serde(default)]
    pub name: String,
    pub bricks: Vec<BrickConfig>,
}

impl LevelConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: LevelConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        log::info!("Loaded level '{}' ({} bricks) from {}", config.name, config.bricks.len(), path.display());
        Ok(config)
    }

    /// A level with nothing to destroy can never complete
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.bricks.iter().any(|b| !b.kind.is_indestructible()) {
            return Err(ConfigError::Invalid(format!(
                "level '{}' has no destructible bricks",
                self.name
            )));
        }
        Ok(())
    }

    /// Built-in mixed layout used when no level files are given
    pub fn demo() -> Self {
        let mut bricks = Vec::new();
        for col in 0..12 {
            bricks.push(BrickConfig::new(col, 0, BrickKind::Healthy, 1.0));
            bricks.push(BrickConfig::new(col, 2, BrickKind::Normal, 1.0));
            bricks.push(BrickConfig::new(col, 3, BrickKind::Normal, 1.0));
        }
        let row1 = [
            BrickKind::OffensiveFalling,
            BrickKind::Normal,
            BrickKind::OffensiveExploding,
            BrickKind::Indestructible,
            BrickKind::OffensiveHoming,
            BrickKind::Normal,
            BrickKind::Normal,
            BrickKind::OffensiveSplitting,
            BrickKind::Indestructible,
            BrickKind::OffensiveLaser,
            BrickKind::OffensiveDynamite,
            BrickKind::OffensiveBomb,
        ];
        for (col, kind) in row1.into_iter().enumerate() {
            bricks.push(BrickConfig::new(col as i32, 1, kind, 1.0));
        }
        Self {
            name: "Demo".to_string(),
            bricks,
        }
    }

    /// Rectangular block of one brick kind
    pub fn grid(name: &str, cols: i32, rows: i32, kind: BrickKind, base_health: f32) -> Self {
        let bricks = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| BrickConfig::new(col, row, kind, base_health)))
            .collect();
        Self {
            name: name.to_string(),
            bricks,
        }
    }
}

/// A loaded level: the live brick set
#[derive(Debug, Clone, Default)]
pub struct Level {
    pub number: u32,
    pub name: String,
    /// Destroyed bricks stay in place (flagged by health) until the next load
    pub bricks: Vec<Brick>,
}

impl Level {
    /// Instantiate bricks; ids are drawn from `next_id`
    ///
    /// Two bricks on the same cell would overlap, so later duplicates are
    /// dropped with a warning.
    pub fn from_config(number: u32, config: &LevelConfig, next_id: &mut u32) -> Self {
        let mut seen = HashSet::new();
        let mut bricks = Vec::with_capacity(config.bricks.len());
        for entry in &config.bricks {
            if !seen.insert((entry.col, entry.row)) {
                log::warn!("Level {}: duplicate brick at ({}, {}) ignored", number, entry.col, entry.row);
                continue;
            }
            let id = *next_id;
            *next_id += 1;
            bricks.push(Brick::new(id, entry.col, entry.row, entry.kind, entry.base_health).with_color(entry.color));
        }
        log::info!("Level {} '{}' loaded with {} bricks", number, config.name, bricks.len());
        Self {
            number,
            name: config.name.clone(),
            bricks,
        }
    }

    /// True once every destructible brick is destroyed
    pub fn is_complete(&self) -> bool {
        self.bricks
            .iter()
            .filter(|b| b.counts_for_clear())
            .all(|b| b.is_destroyed())
    }

    /// Destructible bricks still standing
    pub fn remaining(&self) -> usize {
        self.bricks
            .iter()
            .filter(|b| b.counts_for_clear() && !b.is_destroyed())
            .count()
    }

    pub fn brick(&self, id: u32) -> Option<&Brick> {
        self.bricks.iter().find(|b| b.id == id)
    }

    /// Launch point under the first living boss, if any
    pub fn boss_launch_point(&self) -> Option<Vec2> {
        self.bricks
            .iter()
            .find(|b| b.kind == BrickKind::Boss1 && !b.is_destroyed())
            .map(|b| Vec2::new(b.center().x, b.rect.bottom()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_defaults() {
        let json = r#"{
            "name": "first",
            "bricks": [
                {"col": 0, "row": 0},
                {"col": 1, "row": 0, "kind": "Healthy", "base_health": 2.0},
                {"col": 2, "row": 0, "kind": "Indestructible", "color": 255}
            ]
        }"#;
        let config = LevelConfig::from_json_str(json).unwrap();
        assert_eq!(config.bricks[0].kind, BrickKind::Normal);
        assert_eq!(config.bricks[0].base_health, 1.0);
        assert_eq!(config.bricks[2].color, Some(255));

        let mut next_id = 10;
        let level = Level::from_config(1, &config, &mut next_id);
        assert_eq!(next_id, 13);
        assert_eq!(level.bricks[1].max_health(), 6.0);
        assert_eq!(level.bricks[0].color(), BrickKind::Normal.default_color());
        assert_eq!(level.bricks[2].color(), 255);
        assert_eq!(level.remaining(), 2);
    }

    #[test]
    fn test_only_indestructible_rejected() {
        let json = r#"{"bricks": [{"col": 0, "row": 0, "kind": "Indestructible"}]}"#;
        assert!(matches!(LevelConfig::from_json_str(json), Err(ConfigError::Invalid(_))));
        assert!(matches!(LevelConfig::from_json_str("{"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_duplicate_cells_dropped() {
        let config = LevelConfig {
            name: "dup".into(),
            bricks: vec![
                BrickConfig::new(0, 0, BrickKind::Normal, 1.0),
                BrickConfig::new(0, 0, BrickKind::Healthy, 1.0),
            ],
        };
        let level = Level::from_config(1, &config, &mut 1);
        assert_eq!(level.bricks.len(), 1);
        assert_eq!(level.bricks[0].kind, BrickKind::Normal);
    }

    #[test]
    fn test_complete_ignores_indestructible() {
        let mut config = LevelConfig::grid("g", 2, 1, BrickKind::Normal, 1.0);
        config.bricks.push(BrickConfig::new(5, 0, BrickKind::Indestructible, 1.0));
        let mut level = Level::from_config(1, &config, &mut 1);
        assert!(!level.is_complete());
        for brick in level.bricks.iter_mut() {
            brick.take_damage(1.0);
        }
        assert!(level.is_complete());
        assert_eq!(level.remaining(), 0);
    }

    #[test]
    fn test_boss_launch_point() {
        let mut config = LevelConfig::grid("boss", 1, 1, BrickKind::Normal, 1.0);
        config.bricks.push(BrickConfig::new(4, 0, BrickKind::Boss1, 1.0));
        let mut level = Level::from_config(1, &config, &mut 1);
        let at = level.boss_launch_point().unwrap();
        assert_eq!(at.y, level.bricks[1].rect.bottom());
        level.bricks[1].take_damage(100.0);
        assert!(level.boss_launch_point().is_none());
    }
}
