//! The player's bat

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::config::GameConfig;

/// Result of damaging the bat
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BatDamage {
    /// Pixels of width removed
    pub lost: f32,
    /// True only on the hit that brought the width to zero
    pub just_destroyed: bool,
}

/// The player's bat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bat {
    /// Top-left corner
    pub pos: Vec2,
    /// Current width; shrinks under damage, never below 0
    pub width: f32,
    /// Width at level load (damage baseline)
    pub original_width: f32,
    pub height: f32,
    /// Pixels per second
    pub speed: f32,
    /// Horizontal movement range for the bat's left edge .. right edge
    pub min_x: f32,
    pub max_x: f32,
    /// Vertical range for the bat's top edge
    pub min_y: f32,
    pub max_y: f32,
    /// Number of laser turrets mounted
    pub turrets: u32,
}

impl Bat {
    /// Create a bat centered at the bottom of the playfield
    pub fn new(config: &GameConfig, width_multiplier: f32) -> Self {
        let rest_y = config.canvas_height - config.bat_bottom_margin - config.bat_height;
        let mut bat = Self {
            pos: Vec2::ZERO,
            width: 0.0,
            original_width: 0.0,
            height: config.bat_height,
            speed: config.bat_speed,
            min_x: 0.0,
            max_x: config.canvas_width,
            min_y: (rest_y - config.bat_vertical_range).max(0.0),
            max_y: rest_y,
            turrets: 0,
        };
        bat.reset(config.bat_width, width_multiplier);
        bat
    }

    /// Restore full width (upgrade-adjusted) and re-center at rest height
    pub fn reset(&mut self, base_width: f32, width_multiplier: f32) {
        let field_width = (self.max_x - self.min_x).max(0.0);
        let width = (base_width * crate::finite_or(width_multiplier, 1.0)).clamp(0.0, field_width);
        self.original_width = width;
        self.width = width;
        self.pos = Vec2::new(self.min_x + (field_width - width) / 2.0, self.max_y);
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn is_destroyed(&self) -> bool {
        self.width <= 0.0
    }

    /// Move along `dir` (each axis in [-1, 1]) within the movement bounds
    pub fn move_by(&mut self, dir: Vec2, dt: f32) {
        let dir = dir.clamp(Vec2::splat(-1.0), Vec2::splat(1.0));
        self.pos += dir * self.speed * dt;
        self.clamp_to_bounds();
    }

    /// Slide toward a target center x, limited by bat speed
    pub fn move_toward(&mut self, target_x: f32, dt: f32) {
        if !target_x.is_finite() {
            return;
        }
        let delta = target_x - self.center().x;
        let max_delta = self.speed * dt;
        self.pos.x += delta.clamp(-max_delta, max_delta);
        self.clamp_to_bounds();
    }

    fn clamp_to_bounds(&mut self) {
        let right_limit = (self.max_x - self.width).max(self.min_x);
        self.pos.x = self.pos.x.clamp(self.min_x, right_limit);
        self.pos.y = self.pos.y.clamp(self.min_y, self.max_y.max(self.min_y));
    }

    /// Shrink by `percent` of the original width, keeping the center fixed
    pub fn take_damage_percent(&mut self, percent: f32) -> BatDamage {
        if self.is_destroyed() {
            return BatDamage::default();
        }
        let percent = crate::finite_or(percent, 0.0).max(0.0);
        let center_x = self.center().x;
        let before = self.width;
        self.width = (self.width - percent * self.original_width).max(0.0);
        self.pos.x = center_x - self.width / 2.0;
        BatDamage {
            lost: before - self.width,
            just_destroyed: self.width <= 0.0,
        }
    }

    /// Laser muzzle positions, spread evenly across the bat's top edge
    pub fn turret_positions(&self) -> Vec<Vec2> {
        let top = self.pos.y;
        match self.turrets {
            0 => Vec::new(),
            1 => vec![Vec2::new(self.center().x, top)],
            n => (0..n)
                .map(|i| {
                    let t = i as f32 / (n - 1) as f32;
                    Vec2::new(self.pos.x + 4.0 + t * (self.width - 8.0).max(0.0), top)
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_bat_centered() {
        let config = GameConfig::default();
        let bat = Bat::new(&config, 1.0);
        assert!((bat.center().x - config.canvas_width / 2.0).abs() < 0.001);
        assert_eq!(bat.width, config.bat_width);
        assert_eq!(bat.original_width, config.bat_width);
    }

    #[test]
    fn test_width_multiplier() {
        let config = GameConfig::default();
        let bat = Bat::new(&config, 1.2);
        assert!((bat.original_width - config.bat_width * 1.2).abs() < 0.001);
    }

    #[test]
    fn test_damage_percent_of_original() {
        let config = GameConfig {
            bat_width: 150.0,
            ..GameConfig::default()
        };
        let mut bat = Bat::new(&config, 1.0);
        let center = bat.center().x;
        bat.take_damage_percent(0.10);
        bat.take_damage_percent(0.10);
        assert!((bat.width - 120.0).abs() < 0.001);
        assert!((bat.center().x - center).abs() < 0.001);
        assert!(!bat.is_destroyed());
    }

    #[test]
    fn test_destroyed_once_at_zero() {
        let config = GameConfig::default();
        let mut bat = Bat::new(&config, 1.0);
        let hit = bat.take_damage_percent(0.6);
        assert!(!hit.just_destroyed);
        let hit = bat.take_damage_percent(0.6);
        assert!(hit.just_destroyed);
        assert_eq!(bat.width, 0.0);
        assert!(bat.is_destroyed());
        assert_eq!(bat.take_damage_percent(0.6), BatDamage::default());
    }

    #[test]
    fn test_movement_clamped() {
        let config = GameConfig::default();
        let mut bat = Bat::new(&config, 1.0);
        bat.move_by(Vec2::new(-1.0, -1.0), 100.0);
        assert_eq!(bat.pos.x, 0.0);
        assert_eq!(bat.pos.y, bat.min_y);
        bat.move_by(Vec2::new(1.0, 1.0), 100.0);
        assert_eq!(bat.rect().right(), config.canvas_width);
        assert_eq!(bat.pos.y, bat.max_y);
    }

    #[test]
    fn test_turret_positions() {
        let config = GameConfig::default();
        let mut bat = Bat::new(&config, 1.0);
        assert!(bat.turret_positions().is_empty());
        bat.turrets = 2;
        let muzzles = bat.turret_positions();
        assert_eq!(muzzles.len(), 2);
        assert!(muzzles[0].x < muzzles[1].x);
    }

    proptest! {
        #[test]
        fn prop_width_stays_in_range(hits in prop::collection::vec(0.0f32..0.5, 0..30)) {
            let config = GameConfig::default();
            let mut bat = Bat::new(&config, 1.0);
            for pct in hits {
                bat.take_damage_percent(pct);
                prop_assert!(bat.width >= 0.0);
                prop_assert!(bat.width <= bat.original_width);
            }
        }
    }
}
