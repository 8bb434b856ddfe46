//! The ball: speed ramp, sticky launch, grey and piercing states

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bat::Bat;
use super::geometry::Rect;
use crate::config::GameConfig;
use crate::direction_from_vertical;

/// Ball state - attached to bat or free-moving
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BallState {
    /// Ball rides the bat at `offset` from its center, waiting for launch
    Sticky { offset: f32, launch_angle: f32 },
    /// Ball is free-moving
    Free,
}

/// Which playfield boundary the ball touched this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallContact {
    None,
    Side,
    Top,
    /// Back wall behind the bat: a miss
    Bottom,
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub state: BallState,
    base_speed: f32,
    max_speed: f32,
    /// Speed gained per second of free flight
    acceleration: f32,
    /// Upgrade-provided scale on `acceleration`
    acceleration_multiplier: f32,
    /// Seconds of free flight since the last reset
    play_time: f32,
    /// Damage dealt per brick hit before upgrades
    pub damage: f32,
    /// Piercing mode (passes through bricks without reflecting)
    pub piercing: bool,
    pub piercing_remaining: f32,
    /// Post-miss state: passes through the bat until a brick or side/top wall is touched
    pub grey: bool,
    /// Bricks the piercing ball is currently inside (damaged on entry only)
    #[serde(default)]
    pub pierced: Vec<u32>,
}

impl Ball {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: config.ball_radius,
            state: BallState::Sticky {
                offset: 0.0,
                launch_angle: 0.0,
            },
            base_speed: config.ball_base_speed,
            max_speed: config.ball_max_speed,
            acceleration: config.ball_acceleration,
            acceleration_multiplier: 1.0,
            play_time: 0.0,
            damage: config.ball_damage,
            piercing: false,
            piercing_remaining: 0.0,
            grey: false,
            pierced: Vec::new(),
        }
    }

    /// Free ball at `pos` heading along `dir` (tests and tooling)
    pub fn free_at(config: &GameConfig, pos: Vec2, dir: Vec2) -> Self {
        let mut ball = Self::new(config);
        ball.pos = pos;
        ball.state = BallState::Free;
        ball.vel = dir.normalize_or_zero() * ball.current_speed();
        ball
    }

    pub fn base_speed(&self) -> f32 {
        self.base_speed
    }

    pub fn play_time(&self) -> f32 {
        self.play_time
    }

    /// Current speed: base plus accumulated acceleration, capped at max
    ///
    /// Derived from play time; never stored.
    pub fn current_speed(&self) -> f32 {
        let ramp = self.play_time * self.acceleration * self.acceleration_multiplier;
        (self.base_speed + ramp).min(self.max_speed.max(self.base_speed))
    }

    pub fn set_acceleration_multiplier(&mut self, multiplier: f32) {
        self.acceleration_multiplier = crate::finite_or(multiplier, 1.0).max(0.0);
    }

    pub fn is_sticky(&self) -> bool {
        matches!(self.state, BallState::Sticky { .. })
    }

    /// Reposition onto the bat and reset speed (miss/level reset)
    pub fn reset(&mut self, bat: &Bat) {
        self.state = BallState::Sticky {
            offset: 0.0,
            launch_angle: 0.0,
        };
        self.vel = Vec2::ZERO;
        self.play_time = 0.0;
        self.piercing = false;
        self.piercing_remaining = 0.0;
        self.grey = false;
        self.pierced.clear();
        self.update_attached(bat);
    }

    /// Keep a sticky ball seated on top of the bat
    pub fn update_attached(&mut self, bat: &Bat) {
        if let BallState::Sticky { offset, .. } = self.state {
            let half = bat.width / 2.0;
            let x = bat.center().x + offset.clamp(-half, half);
            self.pos = Vec2::new(x, bat.rect().top() - self.radius - 1.0);
        }
    }

    /// Aim a sticky ball (radians from vertical, clamped to ±60°)
    pub fn set_launch_angle(&mut self, angle: f32) {
        if let BallState::Sticky { offset, .. } = self.state {
            let max = crate::consts::BALL_MAX_BOUNCE_ANGLE;
            self.state = BallState::Sticky {
                offset,
                launch_angle: crate::finite_or(angle, 0.0).clamp(-max, max),
            };
        }
    }

    /// Launch the ball from the bat at its stored angle
    pub fn launch(&mut self) {
        if let BallState::Sticky { launch_angle, .. } = self.state {
            self.vel = direction_from_vertical(launch_angle) * self.current_speed();
            self.state = BallState::Free;
        }
    }

    /// Start (or extend) piercing for `duration` seconds
    pub fn activate_piercing(&mut self, duration: f32) {
        if duration > 0.0 {
            self.piercing = true;
            self.piercing_remaining = self.piercing_remaining.max(duration);
        }
    }

    /// Count down piercing; runs every tick regardless of collisions
    pub fn update_piercing(&mut self, dt: f32) {
        if !self.piercing {
            return;
        }
        self.piercing_remaining -= dt;
        if self.piercing_remaining <= 0.0 {
            self.piercing_remaining = 0.0;
            self.piercing = false;
            self.pierced.clear();
        }
    }

    /// Advance one physics step and bounce off the playfield walls
    ///
    /// Sticky balls ignore velocity integration and only follow the bat.
    pub fn update(&mut self, dt: f32, bat: &Bat, field: &Rect) -> WallContact {
        if self.is_sticky() {
            self.update_attached(bat);
            return WallContact::None;
        }

        self.play_time += dt;
        let speed = self.current_speed();
        let dir = self.vel.normalize_or_zero();
        // A zero velocity would stall forever; send it upward
        let dir = if dir == Vec2::ZERO { Vec2::NEG_Y } else { dir };
        self.vel = dir * speed;
        self.pos += self.vel * dt;

        let mut contact = WallContact::None;
        if self.pos.x - self.radius < field.left() {
            self.pos.x = field.left() + self.radius;
            self.vel.x = self.vel.x.abs();
            contact = WallContact::Side;
        } else if self.pos.x + self.radius > field.right() {
            self.pos.x = field.right() - self.radius;
            self.vel.x = -self.vel.x.abs();
            contact = WallContact::Side;
        }

        if self.pos.y - self.radius < field.top() {
            self.pos.y = field.top() + self.radius;
            self.vel.y = self.vel.y.abs();
            contact = WallContact::Top;
        } else if self.pos.y + self.radius > field.bottom() {
            self.pos.y = field.bottom() - self.radius;
            self.vel.y = -self.vel.y.abs();
            contact = WallContact::Bottom;
        }

        match contact {
            WallContact::Side | WallContact::Top => self.grey = false,
            WallContact::Bottom => self.grey = true,
            WallContact::None => {}
        }

        contact
    }
}
