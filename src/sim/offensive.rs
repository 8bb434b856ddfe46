//! Offensive entities: hazards spawned by enemy bricks that can damage the bat
//!
//! One closed set of kinds sharing position/velocity/active fields, with
//! kind-specific payload. Lifecycle per kind:
//!
//! | Kind | States |
//! |---|---|
//! | FallingBrick, Debris, SplittingFragment | falling → offscreen |
//! | HomingMissile | seeking → hit bat / offscreen |
//! | BrickLaser | charging → firing → done |
//! | Dynamite, Bomb | armed → bat contact / fuse expiry → exploded (grace) → done |

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::circle_rect_collision;
use super::geometry::Rect;
use crate::config::GameConfig;

/// Hazard categories for the bat-damage table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HazardType {
    FallingBrick,
    Debris,
    BrickLaser,
    HomingMissile,
    SplittingFragment,
    DynamiteDirectHit,
    BombDirectHit,
}

/// Fraction of the bat's original width removed per contact
const BAT_DAMAGE_TABLE: [(HazardType, f32); 7] = [
    (HazardType::FallingBrick, 0.10),
    (HazardType::Debris, 0.05),
    (HazardType::BrickLaser, 0.15),
    (HazardType::HomingMissile, 0.20),
    (HazardType::SplittingFragment, 0.08),
    (HazardType::DynamiteDirectHit, 0.25),
    (HazardType::BombDirectHit, 0.30),
];

impl HazardType {
    pub fn bat_damage_percent(&self) -> f32 {
        BAT_DAMAGE_TABLE
            .iter()
            .find(|(t, _)| t == self)
            .map(|(_, pct)| *pct)
            .unwrap_or(0.0)
    }
}

/// Brick laser phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeamPhase {
    Charging,
    Firing,
}

/// Fuse state for dynamite and bombs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Fuse {
    Armed { remaining: f32 },
    /// Detonated; kept around for the explosion visual only
    Exploded { grace: f32 },
}

/// Kind-specific payload
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OffensiveKind {
    FallingBrick,
    Debris,
    HomingMissile,
    SplittingFragment,
    BrickLaser { phase: BeamPhase, timer: f32 },
    Dynamite { fuse: Fuse },
    Bomb { fuse: Fuse },
}

impl OffensiveKind {
    pub fn hazard_type(&self) -> HazardType {
        match self {
            OffensiveKind::FallingBrick => HazardType::FallingBrick,
            OffensiveKind::Debris => HazardType::Debris,
            OffensiveKind::HomingMissile => HazardType::HomingMissile,
            OffensiveKind::SplittingFragment => HazardType::SplittingFragment,
            OffensiveKind::BrickLaser { .. } => HazardType::BrickLaser,
            OffensiveKind::Dynamite { .. } => HazardType::DynamiteDirectHit,
            OffensiveKind::Bomb { .. } => HazardType::BombDirectHit,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OffensiveKind::FallingBrick => "falling_brick",
            OffensiveKind::Debris => "debris",
            OffensiveKind::HomingMissile => "homing_missile",
            OffensiveKind::SplittingFragment => "splitting_fragment",
            OffensiveKind::BrickLaser { .. } => "brick_laser",
            OffensiveKind::Dynamite { .. } => "dynamite",
            OffensiveKind::Bomb { .. } => "bomb",
        }
    }
}

/// Radius damage released by a fused entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detonation {
    pub pos: Vec2,
    pub radius: f32,
    pub damage: f32,
}

/// Collision shape for bat tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Rect(Rect),
    Circle { center: Vec2, radius: f32 },
}

impl Shape {
    pub fn overlaps_rect(&self, rect: &Rect) -> bool {
        match self {
            Shape::Rect(r) => r.overlaps(rect),
            Shape::Circle { center, radius } => circle_rect_collision(*center, *radius, rect).hit,
        }
    }
}

/// An offensive entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffensiveEntity {
    pub id: u32,
    /// Center position
    pub pos: Vec2,
    pub vel: Vec2,
    /// Bounding size
    pub size: Vec2,
    pub active: bool,
    pub kind: OffensiveKind,
    /// Radius and damage released on detonation (fused kinds only)
    pub blast_radius: f32,
    pub blast_damage: f32,
}

impl OffensiveEntity {
    fn base(id: u32, pos: Vec2, vel: Vec2, size: Vec2, kind: OffensiveKind) -> Self {
        Self {
            id,
            pos,
            vel,
            size,
            active: true,
            kind,
            blast_radius: 0.0,
            blast_damage: 0.0,
        }
    }

    pub fn falling_brick(id: u32, pos: Vec2, size: Vec2) -> Self {
        Self::base(id, pos, Vec2::ZERO, size, OffensiveKind::FallingBrick)
    }

    pub fn debris(id: u32, pos: Vec2, vel: Vec2) -> Self {
        Self::base(id, pos, vel, Vec2::splat(8.0), OffensiveKind::Debris)
    }

    pub fn homing_missile(id: u32, pos: Vec2) -> Self {
        Self::base(id, pos, Vec2::ZERO, Vec2::splat(14.0), OffensiveKind::HomingMissile)
    }

    pub fn splitting_fragment(id: u32, pos: Vec2, vel: Vec2) -> Self {
        Self::base(id, pos, vel, Vec2::new(14.0, 10.0), OffensiveKind::SplittingFragment)
    }

    pub fn brick_laser(id: u32, pos: Vec2, config: &GameConfig) -> Self {
        Self::base(
            id,
            pos,
            Vec2::ZERO,
            Vec2::new(10.0, 0.0),
            OffensiveKind::BrickLaser {
                phase: BeamPhase::Charging,
                timer: config.brick_laser_charge_time,
            },
        )
    }

    pub fn dynamite(id: u32, pos: Vec2, config: &GameConfig) -> Self {
        let mut e = Self::base(
            id,
            pos,
            Vec2::ZERO,
            Vec2::new(8.0, 22.0),
            OffensiveKind::Dynamite {
                fuse: Fuse::Armed {
                    remaining: config.dynamite_fuse,
                },
            },
        );
        e.blast_radius = config.dynamite_radius;
        e.blast_damage = config.dynamite_damage;
        e
    }

    pub fn bomb(id: u32, pos: Vec2, config: &GameConfig) -> Self {
        let mut e = Self::base(
            id,
            pos,
            Vec2::ZERO,
            Vec2::splat(20.0),
            OffensiveKind::Bomb {
                fuse: Fuse::Armed {
                    remaining: config.bomb_fuse,
                },
            },
        );
        e.blast_radius = config.bomb_radius;
        e.blast_damage = config.bomb_damage;
        e
    }

    pub fn hazard_type(&self) -> HazardType {
        self.kind.hazard_type()
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    fn fuse(&self) -> Option<Fuse> {
        match self.kind {
            OffensiveKind::Dynamite { fuse } | OffensiveKind::Bomb { fuse } => Some(fuse),
            _ => None,
        }
    }

    fn set_fuse(&mut self, new_fuse: Fuse) {
        match &mut self.kind {
            OffensiveKind::Dynamite { fuse } | OffensiveKind::Bomb { fuse } => *fuse = new_fuse,
            _ => {}
        }
    }

    pub fn is_exploded(&self) -> bool {
        matches!(self.fuse(), Some(Fuse::Exploded { .. }))
    }

    /// Shape that can hit the bat right now, if any
    ///
    /// Inactive entities, charging lasers and exploded fuses never collide.
    pub fn bat_shape(&self, canvas_height: f32) -> Option<Shape> {
        if !self.active {
            return None;
        }
        match self.kind {
            OffensiveKind::BrickLaser { phase, .. } => match phase {
                BeamPhase::Charging => None,
                BeamPhase::Firing => {
                    let half = self.size.x / 2.0;
                    Some(Shape::Rect(Rect::new(
                        self.pos.x - half,
                        self.pos.y,
                        self.size.x,
                        (canvas_height - self.pos.y).max(0.0),
                    )))
                }
            },
            OffensiveKind::Dynamite { fuse: Fuse::Exploded { .. } }
            | OffensiveKind::Bomb { fuse: Fuse::Exploded { .. } } => None,
            OffensiveKind::HomingMissile | OffensiveKind::Bomb { .. } => Some(Shape::Circle {
                center: self.pos,
                radius: self.size.x / 2.0,
            }),
            _ => Some(Shape::Rect(self.bounds())),
        }
    }

    /// Set off an armed fuse on bat contact; returns false if there was none
    ///
    /// Only the bat is hurt. Brick radius damage belongs to fuse expiry in
    /// [`update`](Self::update).
    pub fn burst_on_bat(&mut self, config: &GameConfig) -> bool {
        match self.fuse() {
            Some(Fuse::Armed { .. }) => {
                self.set_fuse(Fuse::Exploded {
                    grace: config.explosion_grace,
                });
                self.vel = Vec2::ZERO;
                true
            }
            _ => false,
        }
    }

    /// Advance one physics step
    ///
    /// Returns a detonation when a fuse expires this step.
    pub fn update(&mut self, dt: f32, bat_center: Vec2, config: &GameConfig) -> Option<Detonation> {
        if !self.active {
            return None;
        }
        if !crate::is_finite_vec(self.pos) || !crate::is_finite_vec(self.vel) {
            log::warn!("Deactivating {} #{} with non-finite state", self.kind.name(), self.id);
            self.active = false;
            return None;
        }

        let mut detonation = None;
        match &mut self.kind {
            OffensiveKind::FallingBrick | OffensiveKind::Debris | OffensiveKind::SplittingFragment => {
                self.vel.y += config.gravity * dt;
                self.pos += self.vel * dt;
            }
            OffensiveKind::HomingMissile => {
                self.vel = (bat_center - self.pos).normalize_or_zero() * config.homing_speed;
                self.pos += self.vel * dt;
            }
            OffensiveKind::BrickLaser { phase, timer } => {
                *timer -= dt;
                if *timer <= 0.0 {
                    match phase {
                        BeamPhase::Charging => {
                            *phase = BeamPhase::Firing;
                            *timer = config.brick_laser_fire_time;
                        }
                        BeamPhase::Firing => self.active = false,
                    }
                }
            }
            OffensiveKind::Dynamite { fuse } | OffensiveKind::Bomb { fuse } => match fuse {
                Fuse::Armed { remaining } => {
                    self.vel.y = (self.vel.y + config.gravity * dt).min(config.fused_fall_speed);
                    self.pos += self.vel * dt;
                    *remaining -= dt;
                    if *remaining <= 0.0 {
                        *fuse = Fuse::Exploded {
                            grace: config.explosion_grace,
                        };
                        self.vel = Vec2::ZERO;
                        detonation = Some(Detonation {
                            pos: self.pos,
                            radius: self.blast_radius,
                            damage: self.blast_damage,
                        });
                    }
                }
                Fuse::Exploded { grace } => {
                    *grace -= dt;
                    if *grace <= 0.0 {
                        self.active = false;
                    }
                }
            },
        }

        if self.is_offscreen(config) {
            self.active = false;
        }

        detonation
    }

    fn is_offscreen(&self, config: &GameConfig) -> bool {
        if !crate::is_finite_vec(self.pos) {
            return true;
        }
        let b = self.bounds();
        b.top() > config.canvas_height
            || b.right() < -config.canvas_width * 0.5
            || b.left() > config.canvas_width * 1.5
            || b.bottom() < -config.canvas_height * 0.5
    }
}
