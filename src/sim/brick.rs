//! Bricks: grid placement, health model and damage transitions

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::*;

/// Brick types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BrickKind {
    #[default]
    Normal,
    /// Triple health
    Healthy,
    /// Cannot be destroyed, doesn't count for level clear
    Indestructible,
    /// Drops a falling brick when destroyed
    OffensiveFalling,
    /// Bursts into debris when destroyed
    OffensiveExploding,
    /// Charges and fires a vertical laser when destroyed
    OffensiveLaser,
    /// Launches a homing missile when destroyed
    OffensiveHoming,
    /// Splits into four diagonal fragments when destroyed
    OffensiveSplitting,
    /// Drops a lit dynamite stick when destroyed
    OffensiveDynamite,
    /// Drops a bomb when destroyed
    OffensiveBomb,
    /// Level boss, periodically attacks while alive
    Boss1,
}

impl BrickKind {
    /// Health multiplier applied to the configured base health
    pub fn health_multiplier(&self) -> f32 {
        match self {
            BrickKind::Normal => 1.0,
            BrickKind::Healthy => 3.0,
            BrickKind::Indestructible => f32::INFINITY,
            BrickKind::Boss1 => 25.0,
            _ => 1.0,
        }
    }

    pub fn is_offensive(&self) -> bool {
        matches!(
            self,
            BrickKind::OffensiveFalling
                | BrickKind::OffensiveExploding
                | BrickKind::OffensiveLaser
                | BrickKind::OffensiveHoming
                | BrickKind::OffensiveSplitting
                | BrickKind::OffensiveDynamite
                | BrickKind::OffensiveBomb
        )
    }

    pub fn is_indestructible(&self) -> bool {
        *self == BrickKind::Indestructible
    }

    /// Default color (0xRRGGBB) when no override is configured
    pub fn default_color(&self) -> u32 {
        match self {
            BrickKind::Normal => 0x3FA7D6,
            BrickKind::Healthy => 0x59CD90,
            BrickKind::Indestructible => 0x8D8D8D,
            BrickKind::OffensiveFalling => 0xEE6352,
            BrickKind::OffensiveExploding => 0xF79D84,
            BrickKind::OffensiveLaser => 0xFF3366,
            BrickKind::OffensiveHoming => 0xFAC05E,
            BrickKind::OffensiveSplitting => 0xB084CC,
            BrickKind::OffensiveDynamite => 0xD7263D,
            BrickKind::OffensiveBomb => 0x1B1B1E,
            BrickKind::Boss1 => 0x8E3B46,
        }
    }

    /// Score awarded on destruction
    pub fn score_value(&self) -> u64 {
        match self {
            BrickKind::Normal => 10,
            BrickKind::Healthy => 25,
            BrickKind::Indestructible => 0,
            BrickKind::Boss1 => 500,
            _ => 40,
        }
    }
}

/// Result of applying damage to a brick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DamageOutcome {
    /// Health actually removed (0 for indestructible or already destroyed bricks)
    pub applied: f32,
    /// True only on the call that crossed the destruction threshold
    pub just_destroyed: bool,
}

/// A brick entity
#[derive(Debug, Clone, PartialEq)]
pub struct Brick {
    pub id: u32,
    pub kind: BrickKind,
    pub col: i32,
    pub row: i32,
    pub rect: Rect,
    health: f32,
    max_health: f32,
    /// Optional color override (0xRRGGBB)
    pub color: Option<u32>,
}

impl Brick {
    /// Create a brick at a grid cell; pixel position derives from the grid layout
    pub fn new(id: u32, col: i32, row: i32, kind: BrickKind, base_health: f32) -> Self {
        let x = BRICK_OFFSET_X + col as f32 * (BRICK_WIDTH + BRICK_PADDING);
        let y = BRICK_OFFSET_Y + row as f32 * (BRICK_HEIGHT + BRICK_PADDING);
        Self::with_rect(id, kind, base_health, Rect::new(x, y, BRICK_WIDTH, BRICK_HEIGHT))
            .at_cell(col, row)
    }

    /// Create a brick with explicit pixel bounds
    pub fn with_rect(id: u32, kind: BrickKind, base_health: f32, rect: Rect) -> Self {
        let base = if base_health.is_finite() {
            base_health.max(0.0)
        } else {
            1.0
        };
        let max_health = if kind.is_indestructible() {
            f32::INFINITY
        } else {
            base * kind.health_multiplier()
        };
        Self {
            id,
            kind,
            col: 0,
            row: 0,
            rect,
            health: max_health,
            max_health,
            color: None,
        }
    }

    fn at_cell(mut self, col: i32, row: i32) -> Self {
        self.col = col;
        self.row = row;
        self
    }

    pub fn with_color(mut self, color: Option<u32>) -> Self {
        self.color = color;
        self
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }

    pub fn color(&self) -> u32 {
        self.color.unwrap_or_else(|| self.kind.default_color())
    }

    pub fn is_indestructible(&self) -> bool {
        self.kind.is_indestructible()
    }

    /// Destroyed ⇔ health ≤ 0; indestructible bricks never are
    pub fn is_destroyed(&self) -> bool {
        self.health <= 0.0
    }

    /// Returns true if this brick must be destroyed to clear the level
    pub fn counts_for_clear(&self) -> bool {
        !self.is_indestructible()
    }

    /// Apply damage, clamping health at zero
    ///
    /// Indestructible bricks absorb everything. The destroyed transition is
    /// reported exactly once; later calls on a dead brick are no-ops.
    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if self.is_indestructible() || self.is_destroyed() {
            return DamageOutcome::default();
        }
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        let before = self.health;
        self.health = (self.health - amount).max(0.0);
        DamageOutcome {
            applied: before - self.health,
            just_destroyed: self.health <= 0.0,
        }
    }

    /// Set health directly, clamped to [0, max]
    pub fn set_health(&mut self, health: f32) {
        if self.is_indestructible() {
            return;
        }
        let health = if health.is_nan() { 0.0 } else { health };
        self.health = health.clamp(0.0, self.max_health);
    }

    /// Health text shown on the brick (empty for indestructible bricks)
    pub fn display_health(&self) -> String {
        if self.is_indestructible() {
            String::new()
        } else {
            format!("{}", self.health.ceil() as u32)
        }
    }
}
