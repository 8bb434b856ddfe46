//! Game tuning configuration
//!
//! Every number the simulation consumes lives here, defaulted from
//! [`crate::consts`]. Loaded from JSON; invalid values are clamped with a
//! warning instead of failing, so a bad file never stops a run.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Configuration and level-file errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Game tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Playfield ===
    pub canvas_width: f32,
    pub canvas_height: f32,

    // === Ball ===
    pub ball_radius: f32,
    pub ball_base_speed: f32,
    /// Speed gained per second of play
    pub ball_acceleration: f32,
    pub ball_max_speed: f32,
    pub ball_damage: f32,
    /// Base seconds of piercing after a successful roll
    pub piercing_duration: f32,

    // === Bat ===
    pub bat_width: f32,
    pub bat_height: f32,
    pub bat_speed: f32,
    pub bat_bottom_margin: f32,
    pub bat_vertical_range: f32,

    // === Bricks ===
    /// Spatial index cell size (defaults to brick pitch)
    pub cell_width: f32,
    pub cell_height: f32,

    // === Player lasers ===
    pub laser_speed: f32,
    pub laser_damage: f32,
    pub laser_cooldown: f32,

    // === Offensive entities ===
    pub gravity: f32,
    pub homing_speed: f32,
    pub fragment_speed: f32,
    pub debris_count: usize,
    pub brick_laser_charge_time: f32,
    pub brick_laser_fire_time: f32,
    pub fused_fall_speed: f32,
    pub dynamite_fuse: f32,
    pub bomb_fuse: f32,
    pub explosion_grace: f32,
    pub dynamite_radius: f32,
    pub dynamite_damage: f32,
    pub bomb_radius: f32,
    pub bomb_damage: f32,
    pub boss_attack_interval: f32,

    // === Upgrades ===
    pub explosion_base_radius: f32,

    // === Flow ===
    pub starting_lives: u8,
    pub level_complete_delay: f32,
    pub slow_motion_scale: f32,
    pub slow_motion_duration: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,

            ball_radius: BALL_RADIUS,
            ball_base_speed: BALL_BASE_SPEED,
            ball_acceleration: BALL_ACCELERATION,
            ball_max_speed: BALL_MAX_SPEED,
            ball_damage: BALL_DAMAGE,
            piercing_duration: PIERCING_DURATION,

            bat_width: BAT_WIDTH,
            bat_height: BAT_HEIGHT,
            bat_speed: BAT_SPEED,
            bat_bottom_margin: BAT_BOTTOM_MARGIN,
            bat_vertical_range: BAT_VERTICAL_RANGE,

            cell_width: BRICK_WIDTH + BRICK_PADDING,
            cell_height: BRICK_HEIGHT + BRICK_PADDING,

            laser_speed: LASER_SPEED,
            laser_damage: LASER_DAMAGE,
            laser_cooldown: LASER_COOLDOWN,

            gravity: GRAVITY,
            homing_speed: HOMING_SPEED,
            fragment_speed: FRAGMENT_SPEED,
            debris_count: DEBRIS_COUNT,
            brick_laser_charge_time: BRICK_LASER_CHARGE_TIME,
            brick_laser_fire_time: BRICK_LASER_FIRE_TIME,
            fused_fall_speed: FUSED_FALL_SPEED,
            dynamite_fuse: DYNAMITE_FUSE,
            bomb_fuse: BOMB_FUSE,
            explosion_grace: EXPLOSION_GRACE,
            dynamite_radius: DYNAMITE_RADIUS,
            dynamite_damage: DYNAMITE_DAMAGE,
            bomb_radius: BOMB_RADIUS,
            bomb_damage: BOMB_DAMAGE,
            boss_attack_interval: BOSS_ATTACK_INTERVAL,

            explosion_base_radius: EXPLOSION_BASE_RADIUS,

            starting_lives: STARTING_LIVES,
            level_complete_delay: LEVEL_COMPLETE_DELAY,
            slow_motion_scale: SLOW_MOTION_SCALE,
            slow_motion_duration: SLOW_MOTION_DURATION,
        }
    }
}

impl GameConfig {
    /// Parse from a JSON string; missing fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Load from a JSON file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Replace non-finite or non-positive values with defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        fn positive(name: &str, value: &mut f32, fallback: f32) {
            if !value.is_finite() || *value <= 0.0 {
                log::warn!("Config {} = {} is invalid, using {}", name, value, fallback);
                *value = fallback;
            }
        }

        fn non_negative(name: &str, value: &mut f32, fallback: f32) {
            if !value.is_finite() || *value < 0.0 {
                log::warn!("Config {} = {} is invalid, using {}", name, value, fallback);
                *value = fallback;
            }
        }

        positive("canvas_width", &mut self.canvas_width, defaults.canvas_width);
        positive("canvas_height", &mut self.canvas_height, defaults.canvas_height);
        positive("ball_radius", &mut self.ball_radius, defaults.ball_radius);
        positive("ball_base_speed", &mut self.ball_base_speed, defaults.ball_base_speed);
        non_negative("ball_acceleration", &mut self.ball_acceleration, defaults.ball_acceleration);
        positive("ball_max_speed", &mut self.ball_max_speed, defaults.ball_max_speed);
        non_negative("ball_damage", &mut self.ball_damage, defaults.ball_damage);
        non_negative("piercing_duration", &mut self.piercing_duration, defaults.piercing_duration);
        positive("bat_width", &mut self.bat_width, defaults.bat_width);
        positive("bat_height", &mut self.bat_height, defaults.bat_height);
        positive("bat_speed", &mut self.bat_speed, defaults.bat_speed);
        non_negative("bat_bottom_margin", &mut self.bat_bottom_margin, defaults.bat_bottom_margin);
        non_negative("bat_vertical_range", &mut self.bat_vertical_range, defaults.bat_vertical_range);
        positive("cell_width", &mut self.cell_width, defaults.cell_width);
        positive("cell_height", &mut self.cell_height, defaults.cell_height);
        positive("laser_speed", &mut self.laser_speed, defaults.laser_speed);
        non_negative("laser_damage", &mut self.laser_damage, defaults.laser_damage);
        non_negative("laser_cooldown", &mut self.laser_cooldown, defaults.laser_cooldown);
        non_negative("gravity", &mut self.gravity, defaults.gravity);
        positive("homing_speed", &mut self.homing_speed, defaults.homing_speed);
        positive("fragment_speed", &mut self.fragment_speed, defaults.fragment_speed);
        positive("brick_laser_charge_time", &mut self.brick_laser_charge_time, defaults.brick_laser_charge_time);
        positive("brick_laser_fire_time", &mut self.brick_laser_fire_time, defaults.brick_laser_fire_time);
        non_negative("fused_fall_speed", &mut self.fused_fall_speed, defaults.fused_fall_speed);
        positive("dynamite_fuse", &mut self.dynamite_fuse, defaults.dynamite_fuse);
        positive("bomb_fuse", &mut self.bomb_fuse, defaults.bomb_fuse);
        non_negative("explosion_grace", &mut self.explosion_grace, defaults.explosion_grace);
        non_negative("dynamite_radius", &mut self.dynamite_radius, defaults.dynamite_radius);
        non_negative("dynamite_damage", &mut self.dynamite_damage, defaults.dynamite_damage);
        non_negative("bomb_radius", &mut self.bomb_radius, defaults.bomb_radius);
        non_negative("bomb_damage", &mut self.bomb_damage, defaults.bomb_damage);
        positive("boss_attack_interval", &mut self.boss_attack_interval, defaults.boss_attack_interval);
        non_negative("explosion_base_radius", &mut self.explosion_base_radius, defaults.explosion_base_radius);
        non_negative("level_complete_delay", &mut self.level_complete_delay, defaults.level_complete_delay);
        positive("slow_motion_scale", &mut self.slow_motion_scale, defaults.slow_motion_scale);
        non_negative("slow_motion_duration", &mut self.slow_motion_duration, defaults.slow_motion_duration);

        if self.ball_max_speed < self.ball_base_speed {
            log::warn!(
                "Config ball_max_speed {} below ball_base_speed {}, raising",
                self.ball_max_speed,
                self.ball_base_speed
            );
            self.ball_max_speed = self.ball_base_speed;
        }
        if self.slow_motion_scale > 1.0 {
            log::warn!("Config slow_motion_scale {} above 1.0, clamping", self.slow_motion_scale);
            self.slow_motion_scale = 1.0;
        }
        if self.starting_lives == 0 {
            log::warn!("Config starting_lives is 0, using {}", defaults.starting_lives);
            self.starting_lives = defaults.starting_lives;
        }

        self
    }
}
