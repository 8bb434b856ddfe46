//! Game state and phase machine
//!
//! One mutable struct owns every entity and subsystem; the tick borrows the
//! pieces it needs and hands them to the collision core.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::bat::Bat;
use super::combat::CollisionCore;
use super::events::{EventBus, EventSubscriber};
use super::geometry::Rect;
use super::laser::Laser;
use super::level::{Level, LevelConfig};
use super::rng::SimRng;
use super::spawner::OffensiveManager;
use super::upgrades::{UpgradeError, UpgradeId, UpgradeState};
use crate::config::GameConfig;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the first launch
    Intro,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Level cleared; world keeps running (slow-motion) until the delay ends
    LevelComplete,
    /// Between levels: spend points, launch to continue
    Upgrade,
    /// Run ended
    GameOver,
}

/// Complete game state
#[derive(Debug)]
pub struct GameState {
    pub config: GameConfig,
    pub rng: SimRng,
    pub phase: GamePhase,
    pub lives: u8,
    pub score: u64,
    /// Upgrade currency
    pub points: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub ball: Ball,
    pub bat: Bat,
    pub level: Level,
    /// Level rotation; level `n` uses `levels[(n - 1) % len]`
    pub levels: Vec<LevelConfig>,
    pub lasers: Vec<Laser>,
    pub offensive: OffensiveManager,
    pub core: CollisionCore,
    pub bus: EventBus,
    pub upgrades: UpgradeState,
    /// Seconds until the turrets may fire again
    pub laser_cooldown: f32,
    /// Real seconds of slow-motion left
    pub slow_motion: f32,
    /// Real seconds left in `LevelComplete`
    pub level_complete_timer: f32,
    next_id: u32,
}

impl GameState {
    /// Create a new run and load its first level
    pub fn new(seed: u64, config: GameConfig, levels: Vec<LevelConfig>) -> Self {
        let levels = if levels.is_empty() {
            vec![LevelConfig::demo()]
        } else {
            levels
        };
        let bat = Bat::new(&config, 1.0);
        let mut state = Self {
            rng: SimRng::new(seed),
            phase: GamePhase::Intro,
            lives: config.starting_lives,
            score: 0,
            points: 0,
            time_ticks: 0,
            ball: Ball::new(&config),
            bat,
            level: Level::default(),
            levels,
            lasers: Vec::new(),
            offensive: OffensiveManager::new(),
            core: CollisionCore::new(&config),
            bus: EventBus::new(),
            upgrades: UpgradeState::new(),
            laser_cooldown: 0.0,
            slow_motion: 0.0,
            level_complete_timer: 0.0,
            next_id: 1,
            config,
        };
        state.load_level(1);
        state
    }

    /// Default tuning and the built-in level
    pub fn with_seed(seed: u64) -> Self {
        Self::new(seed, GameConfig::default(), Vec::new())
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn subscribe(&mut self, subscriber: impl EventSubscriber + 'static) {
        self.bus.subscribe(subscriber);
    }

    /// Playfield bounds
    pub fn field(&self) -> Rect {
        Rect::new(0.0, 0.0, self.config.canvas_width, self.config.canvas_height)
    }

    /// Build level `number` and reset per-level entities
    pub fn load_level(&mut self, number: u32) {
        self.teardown_level();
        let number = number.max(1);
        let index = (number as usize - 1) % self.levels.len();
        let mut next_id = self.next_id;
        self.level = Level::from_config(number, &self.levels[index], &mut next_id);
        self.next_id = next_id;
        self.core.rebuild(&self.level.bricks);

        self.bat = Bat::new(&self.config, self.upgrades.bat_width_multiplier());
        self.bat.turrets = self.upgrades.turret_count();
        self.ball = Ball::new(&self.config);
        self.ball.set_acceleration_multiplier(self.upgrades.acceleration_multiplier());
        self.ball.reset(&self.bat);

        let extra = self.upgrades.extra_lives().min(u8::MAX as u32) as u8;
        self.lives = self.lives.saturating_add(extra);
    }

    /// Drop lasers and offensive entities; safe to call repeatedly
    pub fn teardown_level(&mut self) {
        self.lasers.clear();
        self.offensive.clear();
        self.laser_cooldown = 0.0;
        self.slow_motion = 0.0;
    }

    /// Scale applied to physics dt
    pub fn time_scale(&self) -> f32 {
        if self.slow_motion > 0.0 {
            self.config.slow_motion_scale
        } else {
            1.0
        }
    }

    /// Remove a life; returns true when the run is over
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        log::info!("Life lost, {} remaining", self.lives);
        if self.lives == 0 {
            self.teardown_level();
            self.set_phase(GamePhase::GameOver);
            log::info!("Game over with score {}", self.score);
            return true;
        }
        false
    }

    /// Rebuild the bat at full width and seat the ball on it
    pub fn reset_bat(&mut self) {
        self.bat
            .reset(self.config.bat_width, self.upgrades.bat_width_multiplier());
        self.ball.reset(&self.bat);
    }

    /// Buy an upgrade with the current points
    pub fn purchase(&mut self, id: UpgradeId) -> Result<u32, UpgradeError> {
        self.upgrades.purchase(id, &mut self.points)
    }

    /// Set the phase, logging transitions
    pub fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::info!("Phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    /// Homing target
    pub fn bat_center(&self) -> Vec2 {
        self.bat.center()
    }
}
