//! Upgrade levels and the combat modifiers derived from them
//!
//! All modifier queries are pure functions of the level table. Random rolls
//! against these values happen in the combat core, never here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Purchasable upgrades
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UpgradeId {
    /// +25% ball damage per level
    BallDamage,
    /// Unlocks critical hits (10% base chance)
    CriticalHits,
    /// +10% critical chance per level
    CriticalChance,
    /// +10% critical chance and +0.1x critical multiplier per level
    CriticalDamage,
    /// +10% chance per level that a bat bounce starts piercing
    Piercing,
    /// +0.5s piercing duration per level
    PiercingDuration,
    /// Unlocks splash damage on ball hits
    Explosions,
    /// +20% explosion radius per level
    ExplosionRadius,
    /// +10% of ball damage dealt as splash per level
    ExplosionDamage,
    /// +10% bat width per level
    BatWidth,
    /// One laser turret per level
    Turrets,
    /// -15% ball acceleration per level
    SlowBall,
    /// One extra life at the start of each level per level
    ExtraLife,
}

impl UpgradeId {
    pub const ALL: [UpgradeId; 13] = [
        UpgradeId::BallDamage,
        UpgradeId::CriticalHits,
        UpgradeId::CriticalChance,
        UpgradeId::CriticalDamage,
        UpgradeId::Piercing,
        UpgradeId::PiercingDuration,
        UpgradeId::Explosions,
        UpgradeId::ExplosionRadius,
        UpgradeId::ExplosionDamage,
        UpgradeId::BatWidth,
        UpgradeId::Turrets,
        UpgradeId::SlowBall,
        UpgradeId::ExtraLife,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UpgradeId::BallDamage => "ball_damage",
            UpgradeId::CriticalHits => "critical_hits",
            UpgradeId::CriticalChance => "critical_chance",
            UpgradeId::CriticalDamage => "critical_damage",
            UpgradeId::Piercing => "piercing",
            UpgradeId::PiercingDuration => "piercing_duration",
            UpgradeId::Explosions => "explosions",
            UpgradeId::ExplosionRadius => "explosion_radius",
            UpgradeId::ExplosionDamage => "explosion_damage",
            UpgradeId::BatWidth => "bat_width",
            UpgradeId::Turrets => "turrets",
            UpgradeId::SlowBall => "slow_ball",
            UpgradeId::ExtraLife => "extra_life",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == s)
    }

    /// Highest purchasable level
    pub fn max_level(&self) -> u32 {
        match self {
            UpgradeId::CriticalHits | UpgradeId::Explosions => 1,
            UpgradeId::Turrets => 2,
            UpgradeId::ExtraLife => 3,
            UpgradeId::SlowBall => 4,
            _ => 5,
        }
    }

    /// Cost in points of buying the next level when at `current` level
    pub fn cost(&self, current: u32) -> u32 {
        let base = match self {
            UpgradeId::CriticalHits | UpgradeId::Explosions => 15,
            UpgradeId::Turrets => 20,
            UpgradeId::ExtraLife => 12,
            UpgradeId::BallDamage => 8,
            _ => 5,
        };
        base * (current + 1)
    }
}

/// Why a purchase was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpgradeError {
    #[error("{0:?} is already at max level {1}")]
    MaxLevel(UpgradeId, u32),
    #[error("{id:?} costs {cost} points but only {available} are available")]
    InsufficientPoints { id: UpgradeId, cost: u32, available: u32 },
}

/// Mapping from upgrade to owned level (missing = 0)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpgradeState {
    levels: BTreeMap<UpgradeId, u32>,
}

impl UpgradeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from explicit levels (clamped to each upgrade's max)
    pub fn with_levels(levels: &[(UpgradeId, u32)]) -> Self {
        let mut state = Self::new();
        for &(id, level) in levels {
            state.set_level(id, level);
        }
        state
    }

    pub fn level(&self, id: UpgradeId) -> u32 {
        self.levels.get(&id).copied().unwrap_or(0)
    }

    pub fn owns(&self, id: UpgradeId) -> bool {
        self.level(id) > 0
    }

    pub fn set_level(&mut self, id: UpgradeId, level: u32) {
        let level = level.min(id.max_level());
        if level == 0 {
            self.levels.remove(&id);
        } else {
            self.levels.insert(id, level);
        }
    }

    /// Buy the next level of `id`, deducting its cost from `points`
    ///
    /// Returns the new level.
    pub fn purchase(&mut self, id: UpgradeId, points: &mut u32) -> Result<u32, UpgradeError> {
        let current = self.level(id);
        if current >= id.max_level() {
            return Err(UpgradeError::MaxLevel(id, id.max_level()));
        }
        let cost = id.cost(current);
        if *points < cost {
            return Err(UpgradeError::InsufficientPoints {
                id,
                cost,
                available: *points,
            });
        }
        *points -= cost;
        self.set_level(id, current + 1);
        log::info!("Purchased {} level {} for {} points", id.as_str(), current + 1, cost);
        Ok(current + 1)
    }

    /// Ball damage multiplier
    pub fn damage_bonus(&self) -> f32 {
        1.0 + 0.25 * self.level(UpgradeId::BallDamage) as f32
    }

    /// Probability that a bat bounce activates piercing
    pub fn piercing_chance(&self) -> f32 {
        (0.10 * self.level(UpgradeId::Piercing) as f32).min(1.0)
    }

    /// Extra piercing seconds on top of the base duration
    pub fn piercing_duration_bonus(&self) -> f32 {
        0.5 * self.level(UpgradeId::PiercingDuration) as f32
    }

    /// Total critical-hit probability; zero unless critical hits are owned
    pub fn critical_chance(&self) -> f32 {
        if !self.owns(UpgradeId::CriticalHits) {
            return 0.0;
        }
        let chance = 0.10
            + 0.10 * self.level(UpgradeId::CriticalChance) as f32
            + 0.10 * self.level(UpgradeId::CriticalDamage) as f32;
        chance.min(1.0)
    }

    /// Damage multiplier applied on a critical hit
    pub fn critical_multiplier(&self) -> f32 {
        2.0 + 0.1 * self.level(UpgradeId::CriticalDamage) as f32
    }

    pub fn explosions_enabled(&self) -> bool {
        self.owns(UpgradeId::Explosions)
    }

    /// Fraction of ball damage dealt as splash
    pub fn explosion_damage_multiplier(&self) -> f32 {
        0.10 + 0.10 * self.level(UpgradeId::ExplosionDamage) as f32
    }

    /// Multiplier on the base explosion radius
    pub fn explosion_radius_multiplier(&self) -> f32 {
        1.0 + 0.20 * self.level(UpgradeId::ExplosionRadius) as f32
    }

    /// Multiplier on how fast the ball speeds up over time
    pub fn acceleration_multiplier(&self) -> f32 {
        (1.0 - 0.15 * self.level(UpgradeId::SlowBall) as f32).max(0.25)
    }

    /// Multiplier on the bat's base width at level load
    pub fn bat_width_multiplier(&self) -> f32 {
        1.0 + 0.10 * self.level(UpgradeId::BatWidth) as f32
    }

    pub fn turret_count(&self) -> u32 {
        self.level(UpgradeId::Turrets)
    }

    pub fn extra_lives(&self) -> u32 {
        self.level(UpgradeId::ExtraLife)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_neutral() {
        let u = UpgradeState::new();
        assert_eq!(u.damage_bonus(), 1.0);
        assert_eq!(u.critical_chance(), 0.0);
        assert_eq!(u.piercing_chance(), 0.0);
        assert!(!u.explosions_enabled());
        assert_eq!(u.explosion_radius_multiplier(), 1.0);
        assert_eq!(u.acceleration_multiplier(), 1.0);
    }

    #[test]
    fn test_critical_chance_requires_unlock() {
        let u = UpgradeState::with_levels(&[(UpgradeId::CriticalChance, 3)]);
        assert_eq!(u.critical_chance(), 0.0);

        let u = UpgradeState::with_levels(&[
            (UpgradeId::CriticalHits, 1),
            (UpgradeId::CriticalChance, 2),
            (UpgradeId::CriticalDamage, 1),
        ]);
        assert!((u.critical_chance() - 0.4).abs() < 1e-6);
        assert!((u.critical_multiplier() - 2.1).abs() < 1e-6);
    }

    #[test]
    fn test_critical_chance_capped() {
        let u = UpgradeState::with_levels(&[
            (UpgradeId::CriticalHits, 1),
            (UpgradeId::CriticalChance, 5),
            (UpgradeId::CriticalDamage, 5),
        ]);
        assert_eq!(u.critical_chance(), 1.0);
    }

    #[test]
    fn test_explosion_modifiers() {
        let u = UpgradeState::with_levels(&[
            (UpgradeId::Explosions, 1),
            (UpgradeId::ExplosionRadius, 2),
            (UpgradeId::ExplosionDamage, 3),
        ]);
        assert!(u.explosions_enabled());
        assert!((u.explosion_radius_multiplier() - 1.4).abs() < 1e-6);
        assert!((u.explosion_damage_multiplier() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_levels_clamped_to_max() {
        let u = UpgradeState::with_levels(&[(UpgradeId::Turrets, 9)]);
        assert_eq!(u.turret_count(), 2);
    }

    #[test]
    fn test_purchase() {
        let mut u = UpgradeState::new();
        let mut points = 12;
        assert_eq!(u.purchase(UpgradeId::BallDamage, &mut points), Ok(1));
        assert_eq!(points, 4);
        assert_eq!(
            u.purchase(UpgradeId::BallDamage, &mut points),
            Err(UpgradeError::InsufficientPoints {
                id: UpgradeId::BallDamage,
                cost: 16,
                available: 4
            })
        );

        let mut points = 100;
        u.purchase(UpgradeId::CriticalHits, &mut points).unwrap();
        assert_eq!(
            u.purchase(UpgradeId::CriticalHits, &mut points),
            Err(UpgradeError::MaxLevel(UpgradeId::CriticalHits, 1))
        );
    }

    #[test]
    fn test_id_round_trip_names() {
        for id in UpgradeId::ALL {
            assert_eq!(UpgradeId::from_name(id.as_str()), Some(id));
        }
    }
}
