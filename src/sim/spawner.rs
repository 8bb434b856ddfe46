//! Offensive-entity manager
//!
//! Decides what a destroyed offensive brick releases, runs the boss attack
//! timer and owns the live entity list. It never applies combat damage;
//! that is the collision core's job.

use glam::Vec2;

use super::brick::{Brick, BrickKind};
use super::events::{EventBus, GameEvent};
use super::offensive::{Detonation, OffensiveEntity};
use super::rng::RandomSource;
use crate::config::GameConfig;

/// Next attack the boss will launch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BossAttack {
    Bomb,
    Missile,
}

/// Owns spawned hazards and their lifecycle
#[derive(Debug, Clone)]
pub struct OffensiveManager {
    entities: Vec<OffensiveEntity>,
    next_id: u32,
    boss_timer: f32,
    boss_next: BossAttack,
}

impl Default for OffensiveManager {
    fn default() -> Self {
        Self::new()
    }
}

impl OffensiveManager {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
            boss_timer: 0.0,
            boss_next: BossAttack::Bomb,
        }
    }

    pub fn entities(&self) -> &[OffensiveEntity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [OffensiveEntity] {
        &mut self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    fn alloc_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    fn spawn(&mut self, entity: OffensiveEntity, bus: &mut EventBus) {
        log::debug!(
            "Spawned {} #{} at ({:.0}, {:.0})",
            entity.kind.name(),
            entity.id,
            entity.pos.x,
            entity.pos.y
        );
        bus.publish(GameEvent::OffensiveSpawned {
            kind: entity.kind.name(),
            x: entity.pos.x,
            y: entity.pos.y,
        });
        self.entities.push(entity);
    }

    /// Spawn whatever `brick` releases on destruction; returns how many entities appeared
    pub fn on_brick_destroyed(
        &mut self,
        brick: &Brick,
        config: &GameConfig,
        rng: &mut dyn RandomSource,
        bus: &mut EventBus,
    ) -> usize {
        let at = brick.center();
        let before = self.entities.len();
        match brick.kind {
            BrickKind::OffensiveFalling => {
                let id = self.alloc_id();
                self.spawn(OffensiveEntity::falling_brick(id, at, brick.rect.size), bus);
            }
            BrickKind::OffensiveExploding => {
                for _ in 0..config.debris_count {
                    let vel = Vec2::new(rng.range(-120.0, 120.0), rng.range(-180.0, -40.0));
                    let id = self.alloc_id();
                    self.spawn(OffensiveEntity::debris(id, at, vel), bus);
                }
            }
            BrickKind::OffensiveHoming => {
                let id = self.alloc_id();
                self.spawn(OffensiveEntity::homing_missile(id, at), bus);
            }
            BrickKind::OffensiveSplitting => {
                let diagonal = std::f32::consts::FRAC_1_SQRT_2 * config.fragment_speed;
                for (sx, sy) in [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)] {
                    let id = self.alloc_id();
                    let vel = Vec2::new(sx * diagonal, sy * diagonal);
                    self.spawn(OffensiveEntity::splitting_fragment(id, at, vel), bus);
                }
            }
            BrickKind::OffensiveLaser => {
                let id = self.alloc_id();
                let muzzle = Vec2::new(at.x, brick.rect.bottom());
                self.spawn(OffensiveEntity::brick_laser(id, muzzle, config), bus);
            }
            BrickKind::OffensiveDynamite => {
                let id = self.alloc_id();
                self.spawn(OffensiveEntity::dynamite(id, at, config), bus);
            }
            BrickKind::OffensiveBomb => {
                let id = self.alloc_id();
                self.spawn(OffensiveEntity::bomb(id, at, config), bus);
            }
            BrickKind::Normal | BrickKind::Healthy | BrickKind::Indestructible | BrickKind::Boss1 => {}
        }
        self.entities.len() - before
    }

    /// Run the boss attack timer
    ///
    /// `boss` is the launch point of a living boss, or `None` when there is
    /// none (which also resets the timer).
    pub fn update_boss(&mut self, dt: f32, boss: Option<Vec2>, config: &GameConfig, bus: &mut EventBus) {
        let Some(at) = boss else {
            self.boss_timer = 0.0;
            self.boss_next = BossAttack::Bomb;
            return;
        };
        self.boss_timer += dt;
        if self.boss_timer < config.boss_attack_interval {
            return;
        }
        self.boss_timer -= config.boss_attack_interval;
        let id = self.alloc_id();
        let entity = match self.boss_next {
            BossAttack::Bomb => {
                self.boss_next = BossAttack::Missile;
                OffensiveEntity::bomb(id, at, config)
            }
            BossAttack::Missile => {
                self.boss_next = BossAttack::Bomb;
                OffensiveEntity::homing_missile(id, at)
            }
        };
        self.spawn(entity, bus);
    }

    /// Advance every live entity; returns fuse detonations from this step
    pub fn update(&mut self, dt: f32, bat_center: Vec2, config: &GameConfig) -> Vec<Detonation> {
        self.prune();
        self.entities
            .iter_mut()
            .filter_map(|e| e.update(dt, bat_center, config))
            .collect()
    }

    /// Drop inactive entities
    pub fn prune(&mut self) {
        self.entities.retain(|e| e.active);
    }

    /// Level teardown; safe on an empty manager
    pub fn clear(&mut self) {
        if !self.entities.is_empty() {
            log::debug!("Clearing {} offensive entities", self.entities.len());
        }
        self.entities.clear();
        self.boss_timer = 0.0;
        self.boss_next = BossAttack::Bomb;
    }
}
