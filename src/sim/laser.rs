//! Player lasers fired from bat turrets

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::{LASER_HEIGHT, LASER_WIDTH};

/// A laser bolt travelling straight up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Laser {
    pub id: u32,
    /// Center of the bolt
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: f32,
    pub active: bool,
}

impl Laser {
    pub fn new(id: u32, muzzle: Vec2, speed: f32, damage: f32) -> Self {
        Self {
            id,
            pos: muzzle - Vec2::new(0.0, LASER_HEIGHT / 2.0),
            vel: Vec2::new(0.0, -speed.abs()),
            damage,
            active: true,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::new(LASER_WIDTH, LASER_HEIGHT))
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Move; deactivates once fully above the playfield
    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.pos += self.vel * dt;
        if !crate::is_finite_vec(self.pos) || self.rect().bottom() < 0.0 {
            self.active = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_laser_moves_up_and_expires() {
        let mut laser = Laser::new(1, Vec2::new(100.0, 50.0), 700.0, 1.0);
        laser.update(0.01);
        assert!(laser.pos.y < 50.0);
        assert!(laser.active);
        laser.update(1.0);
        assert!(!laser.active);
    }
}
