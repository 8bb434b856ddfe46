//! Brick Assault - A brick-breaking arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, combat, offensive bricks)
//! - `config`: Data-driven game tuning loaded from JSON

pub mod config;
pub mod sim;

pub use config::{ConfigError, GameConfig};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions (pixels, y grows downward)
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    pub const BALL_BASE_SPEED: f32 = 300.0;
    /// Speed gained per second of play (pixels/s²)
    pub const BALL_ACCELERATION: f32 = 4.0;
    pub const BALL_MAX_SPEED: f32 = 800.0;
    pub const BALL_DAMAGE: f32 = 1.0;
    /// Maximum bounce deflection from vertical (60°)
    pub const BALL_MAX_BOUNCE_ANGLE: f32 = std::f32::consts::FRAC_PI_3;
    /// Seconds a piercing roll keeps the ball piercing
    pub const PIERCING_DURATION: f32 = 2.0;

    /// Bat defaults
    pub const BAT_WIDTH: f32 = 150.0;
    pub const BAT_HEIGHT: f32 = 15.0;
    pub const BAT_SPEED: f32 = 600.0;
    /// Distance from the bottom of the canvas to the bat's resting top edge
    pub const BAT_BOTTOM_MARGIN: f32 = 40.0;
    /// How far the bat may rise above its resting position
    pub const BAT_VERTICAL_RANGE: f32 = 120.0;

    /// Brick grid
    pub const BRICK_WIDTH: f32 = 60.0;
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICK_PADDING: f32 = 4.0;
    pub const BRICK_OFFSET_X: f32 = 16.0;
    pub const BRICK_OFFSET_Y: f32 = 60.0;

    /// Player lasers
    pub const LASER_WIDTH: f32 = 4.0;
    pub const LASER_HEIGHT: f32 = 14.0;
    pub const LASER_SPEED: f32 = 700.0;
    pub const LASER_DAMAGE: f32 = 1.0;
    pub const LASER_COOLDOWN: f32 = 0.35;

    /// Offensive entities
    pub const GRAVITY: f32 = 400.0;
    pub const HOMING_SPEED: f32 = 180.0;
    pub const FRAGMENT_SPEED: f32 = 160.0;
    pub const DEBRIS_COUNT: usize = 5;
    pub const BRICK_LASER_CHARGE_TIME: f32 = 1.0;
    pub const BRICK_LASER_FIRE_TIME: f32 = 0.6;
    /// Terminal fall speed of dynamite sticks and bombs
    pub const FUSED_FALL_SPEED: f32 = 80.0;
    pub const DYNAMITE_FUSE: f32 = 2.5;
    pub const BOMB_FUSE: f32 = 3.5;
    /// Visual-only period after a detonation before the entity is pruned
    pub const EXPLOSION_GRACE: f32 = 0.4;
    pub const DYNAMITE_RADIUS: f32 = 90.0;
    pub const DYNAMITE_DAMAGE: f32 = 2.0;
    pub const BOMB_RADIUS: f32 = 130.0;
    pub const BOMB_DAMAGE: f32 = 3.0;
    pub const BOSS_ATTACK_INTERVAL: f32 = 4.0;

    /// Upgrade-driven explosions
    pub const EXPLOSION_BASE_RADIUS: f32 = 70.0;

    /// Player
    pub const STARTING_LIVES: u8 = 3;
    pub const LEVEL_COMPLETE_DELAY: f32 = 2.0;
    pub const SLOW_MOTION_SCALE: f32 = 0.3;
    pub const SLOW_MOTION_DURATION: f32 = 1.0;
}

/// Returns `v` if finite, otherwise `fallback`
#[inline]
pub fn finite_or(v: f32, fallback: f32) -> f32 {
    if v.is_finite() { v } else { fallback }
}

/// True when both components are finite
#[inline]
pub fn is_finite_vec(v: Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}

/// Unit direction rotated `angle` radians from straight up (screen space, y down)
#[inline]
pub fn direction_from_vertical(angle: f32) -> Vec2 {
    Vec2::new(angle.sin(), -angle.cos())
}
