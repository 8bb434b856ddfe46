//! Collision & combat resolution
//!
//! Each frame the core resolves, in order:
//! 1. piercing countdown on the ball
//! 2. ball vs bat (skipped while the ball is grey)
//! 3. ball vs bricks, with crits, explosion splash and piercing
//! 4. player lasers vs bricks
//! 5. offensive entities vs bat
//! 6. fuse detonations vs bricks
//!
//! The core owns nothing but the spatial index. Entities are borrowed for the
//! frame and every outcome is published on the [`EventBus`].

use glam::Vec2;

use super::ball::Ball;
use super::bat::Bat;
use super::brick::Brick;
use super::collision::{CollisionResult, bounce, circle_rect_collision, rect_rect_collision};
use super::events::{BounceSurface, BrickRef, EventBus, GameEvent};
use super::laser::Laser;
use super::offensive::{Detonation, OffensiveEntity};
use super::rng::RandomSource;
use super::spatial::SpatialIndex;
use super::upgrades::UpgradeState;
use crate::config::GameConfig;
use crate::direction_from_vertical;

/// Extra separation after pushing the ball out of a surface
const SEPARATION: f32 = 0.5;

/// Everything the core touches in one frame
pub struct CombatWorld<'a> {
    pub ball: &'a mut Ball,
    pub bat: &'a mut Bat,
    pub bricks: &'a mut [Brick],
    pub lasers: &'a mut [Laser],
    pub offensive: &'a mut [OffensiveEntity],
    pub upgrades: &'a UpgradeState,
}

/// Summary of one resolution pass (details go out as events)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CombatReport {
    pub bat_bounce: bool,
    /// Bricks damaged directly by the ball
    pub ball_hits: u32,
    pub bricks_destroyed: u32,
    pub bat_destroyed: bool,
}

/// The collision & combat resolver
#[derive(Debug, Clone)]
pub struct CollisionCore {
    index: SpatialIndex,
}

impl CollisionCore {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            index: SpatialIndex::new(config.cell_width, config.cell_height),
        }
    }

    /// Re-index bricks after a level load
    pub fn rebuild(&mut self, bricks: &[Brick]) {
        self.index.rebuild(bricks);
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    /// Run the full per-frame sequence
    ///
    /// `fuse_detonations` are the detonations the offensive manager reported
    /// for this step. Bat contact never damages bricks.
    pub fn resolve(
        &mut self,
        world: CombatWorld<'_>,
        fuse_detonations: &[Detonation],
        dt: f32,
        config: &GameConfig,
        rng: &mut dyn RandomSource,
        bus: &mut EventBus,
    ) -> CombatReport {
        let CombatWorld {
            ball,
            bat,
            bricks,
            lasers,
            offensive,
            upgrades,
        } = world;
        let mut report = CombatReport::default();

        ball.update_piercing(dt);

        report.bat_bounce = self.resolve_ball_bat(ball, bat, upgrades, config, rng, bus);

        let (hits, destroyed) = self.resolve_ball_bricks(ball, bricks, upgrades, config, rng, bus);
        report.ball_hits = hits;
        report.bricks_destroyed += destroyed;

        report.bricks_destroyed += self.resolve_lasers(lasers, bricks, upgrades, rng, bus);

        report.bat_destroyed = self.resolve_offensive_bat(offensive, bat, config, bus);

        for detonation in fuse_detonations {
            report.bricks_destroyed += self.apply_detonation(detonation, bricks, bus);
        }

        report
    }

    /// Ball vs bat; returns true when the ball bounced
    ///
    /// The bounce angle comes from where the ball struck along the bat:
    /// offset in [-1, 1] maps to ±60° from vertical. Balls striking the lower
    /// half are sent downward.
    pub fn resolve_ball_bat(
        &self,
        ball: &mut Ball,
        bat: &Bat,
        upgrades: &UpgradeState,
        config: &GameConfig,
        rng: &mut dyn RandomSource,
        bus: &mut EventBus,
    ) -> bool {
        if ball.grey || ball.is_sticky() || bat.is_destroyed() {
            return false;
        }
        let rect = bat.rect();
        let contact = circle_rect_collision(ball.pos, ball.radius, &rect);
        if !contact.hit {
            return false;
        }

        let half = (bat.width / 2.0).max(f32::EPSILON);
        let offset = ((ball.pos.x - rect.center().x) / half).clamp(-1.0, 1.0);
        let angle = offset * crate::consts::BALL_MAX_BOUNCE_ANGLE;
        let mut dir = direction_from_vertical(angle);

        let from_above = ball.pos.y <= rect.center().y;
        if from_above {
            ball.pos.y = rect.top() - ball.radius - SEPARATION;
        } else {
            dir.y = -dir.y;
            ball.pos.y = rect.bottom() + ball.radius + SEPARATION;
        }
        ball.vel = dir * ball.current_speed();
        log::trace!("ball/bat bounce offset={:.2} from_above={}", offset, from_above);
        bus.publish(GameEvent::BallBounced {
            surface: BounceSurface::Bat,
        });

        let chance = upgrades.piercing_chance();
        if chance > 0.0 && rng.chance(chance) {
            let duration = config.piercing_duration + upgrades.piercing_duration_bonus();
            ball.activate_piercing(duration);
            ball.pierced.clear();
            bus.publish(GameEvent::PiercingActivated { duration });
        }
        true
    }

    /// Ball vs bricks; returns (bricks damaged, bricks destroyed)
    pub fn resolve_ball_bricks(
        &mut self,
        ball: &mut Ball,
        bricks: &mut [Brick],
        upgrades: &UpgradeState,
        config: &GameConfig,
        rng: &mut dyn RandomSource,
        bus: &mut EventBus,
    ) -> (u32, u32) {
        if ball.is_sticky() {
            return (0, 0);
        }

        let contacts: Vec<(usize, CollisionResult)> = self
            .index
            .query_circle(ball.pos, ball.radius)
            .into_iter()
            .filter(|&i| i < bricks.len() && !bricks[i].is_destroyed())
            .filter_map(|i| {
                let contact = circle_rect_collision(ball.pos, ball.radius, &bricks[i].rect);
                contact.hit.then_some((i, contact))
            })
            .collect();

        // Bricks the ball has fully left can be pierced again
        if ball.piercing {
            ball.pierced
                .retain(|id| contacts.iter().any(|(i, _)| bricks[*i].id == *id));
        } else {
            ball.pierced.clear();
        }

        let mut hits = 0;
        let mut destroyed = 0;
        for (i, contact) in contacts {
            // Splash from an earlier contact may have finished this one
            if bricks[i].is_destroyed() {
                continue;
            }
            let brick_id = bricks[i].id;
            let indestructible = bricks[i].is_indestructible();
            if ball.piercing && !indestructible && ball.pierced.contains(&brick_id) {
                continue;
            }
            ball.grey = false;

            if indestructible {
                publish_hit(bus, &bricks[i], 0.0, false, contact.point);
            } else {
                let base = ball.damage * upgrades.damage_bonus();
                let (damage, critical) = roll_critical(base, upgrades, rng);
                hits += 1;
                if self.strike(i, damage, critical, contact.point, bricks, bus) {
                    destroyed += 1;
                }
                if upgrades.explosions_enabled() {
                    let radius = config.explosion_base_radius * upgrades.explosion_radius_multiplier();
                    let splash = base * upgrades.explosion_damage_multiplier();
                    bus.publish(GameEvent::Explosion {
                        x: contact.point.x,
                        y: contact.point.y,
                        radius,
                    });
                    destroyed += self.splash(contact.point, radius, splash, Some(i), bricks, bus);
                }
                if ball.piercing {
                    ball.pierced.push(brick_id);
                    continue;
                }
            }

            // Non-piercing balls (and any ball meeting an indestructible brick) stop here
            ball.vel = bounce(ball.vel, contact.normal, ball.current_speed());
            ball.pos += contact.normal * (contact.penetration + SEPARATION);
            bus.publish(GameEvent::BallBounced {
                surface: BounceSurface::Brick,
            });
            break;
        }
        (hits, destroyed)
    }

    /// Player lasers vs bricks; returns bricks destroyed
    ///
    /// Lasers stop on the first brick they touch and never splash or pierce.
    pub fn resolve_lasers(
        &mut self,
        lasers: &mut [Laser],
        bricks: &mut [Brick],
        upgrades: &UpgradeState,
        rng: &mut dyn RandomSource,
        bus: &mut EventBus,
    ) -> u32 {
        let mut destroyed = 0;
        for laser in lasers.iter_mut().filter(|l| l.active) {
            let rect = laser.rect();
            let target = self
                .index
                .query(&rect)
                .into_iter()
                .find(|&i| i < bricks.len() && !bricks[i].is_destroyed() && rect_rect_collision(&rect, &bricks[i].rect));
            let Some(i) = target else { continue };

            laser.deactivate();
            let point = Vec2::new(laser.pos.x, bricks[i].rect.bottom());
            if bricks[i].is_indestructible() {
                publish_hit(bus, &bricks[i], 0.0, false, point);
                continue;
            }
            let (damage, critical) = roll_critical(laser.damage * upgrades.damage_bonus(), upgrades, rng);
            if self.strike(i, damage, critical, point, bricks, bus) {
                destroyed += 1;
            }
        }
        destroyed
    }

    /// Offensive entities vs bat; returns true if the bat was destroyed
    ///
    /// Fused entities touching the bat go off on it (direct-hit damage only)
    /// and linger in their grace period; everything else is spent.
    pub fn resolve_offensive_bat(
        &self,
        offensive: &mut [OffensiveEntity],
        bat: &mut Bat,
        config: &GameConfig,
        bus: &mut EventBus,
    ) -> bool {
        let mut bat_destroyed = false;
        for entity in offensive.iter_mut() {
            if bat.is_destroyed() {
                break;
            }
            let Some(shape) = entity.bat_shape(config.canvas_height) else {
                continue;
            };
            if !shape.overlaps_rect(&bat.rect()) {
                continue;
            }

            let source = entity.hazard_type();
            let damage_percent = source.bat_damage_percent();
            let result = bat.take_damage_percent(damage_percent);
            log::debug!(
                "{} #{} hit bat: -{:.1}px (width {:.1})",
                entity.kind.name(),
                entity.id,
                result.lost,
                bat.width
            );
            if !entity.burst_on_bat(config) {
                entity.deactivate();
            }
            bus.publish(GameEvent::BatDamaged {
                damage_percent,
                source,
            });
            if result.just_destroyed {
                bus.publish(GameEvent::BatDestroyed);
                bat_destroyed = true;
            }
        }
        bat_destroyed
    }

    /// Radius damage from a dynamite stick or bomb; returns bricks destroyed
    pub fn apply_detonation(&mut self, detonation: &Detonation, bricks: &mut [Brick], bus: &mut EventBus) -> u32 {
        log::debug!(
            "Detonation at ({:.0}, {:.0}) r={:.0} dmg={:.1}",
            detonation.pos.x,
            detonation.pos.y,
            detonation.radius,
            detonation.damage
        );
        bus.publish(GameEvent::Explosion {
            x: detonation.pos.x,
            y: detonation.pos.y,
            radius: detonation.radius,
        });
        self.splash(detonation.pos, detonation.radius, detonation.damage, None, bricks, bus)
    }

    /// Damage every live, destructible brick whose center is within `radius`
    /// of `center` (inclusive). `skip` excludes the brick that was struck directly.
    fn splash(
        &mut self,
        center: Vec2,
        radius: f32,
        damage: f32,
        skip: Option<usize>,
        bricks: &mut [Brick],
        bus: &mut EventBus,
    ) -> u32 {
        if !(radius >= 0.0) || !crate::is_finite_vec(center) {
            return 0;
        }
        let radius_sq = radius * radius;
        let mut destroyed = 0;
        for (i, brick) in bricks.iter_mut().enumerate() {
            if Some(i) == skip || brick.is_indestructible() || brick.is_destroyed() {
                continue;
            }
            if (brick.center() - center).length_squared() > radius_sq {
                continue;
            }
            let outcome = brick.take_damage(damage);
            let c = brick.center();
            bus.publish(GameEvent::ExplosionDamage {
                brick: BrickRef::from(&*brick),
                damage: outcome.applied,
                x: c.x,
                y: c.y,
            });
            if outcome.just_destroyed {
                bus.publish(GameEvent::BrickDestroyed {
                    brick: BrickRef::from(&*brick),
                    x: c.x,
                    y: c.y,
                    is_critical: false,
                });
                self.index.remove(brick.id);
                destroyed += 1;
            }
        }
        destroyed
    }

    /// Apply a direct hit; returns true if it destroyed the brick
    fn strike(
        &mut self,
        i: usize,
        damage: f32,
        critical: bool,
        point: Vec2,
        bricks: &mut [Brick],
        bus: &mut EventBus,
    ) -> bool {
        let brick = &mut bricks[i];
        let outcome = brick.take_damage(damage);
        log::trace!(
            "brick #{} hit for {:.2}{} -> {:.2}",
            brick.id,
            damage,
            if critical { " (crit)" } else { "" },
            brick.health()
        );
        publish_hit(bus, brick, damage, critical, point);
        if outcome.just_destroyed {
            let c = brick.center();
            bus.publish(GameEvent::BrickDestroyed {
                brick: BrickRef::from(&*brick),
                x: c.x,
                y: c.y,
                is_critical: critical,
            });
            self.index.remove(brick.id);
        }
        outcome.just_destroyed
    }
}

fn publish_hit(bus: &mut EventBus, brick: &Brick, damage: f32, is_critical: bool, point: Vec2) {
    bus.publish(GameEvent::BrickHit {
        brick: BrickRef::from(brick),
        damage,
        is_critical,
        x: point.x,
        y: point.y,
    });
}

/// Roll for a critical hit; the source is only consulted when crits are possible
fn roll_critical(damage: f32, upgrades: &UpgradeState, rng: &mut dyn RandomSource) -> (f32, bool) {
    let chance = upgrades.critical_chance();
    if chance > 0.0 && rng.chance(chance) {
        (damage * upgrades.critical_multiplier(), true)
    } else {
        (damage, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::brick::BrickKind;
    use crate::sim::geometry::Rect;
    use crate::sim::offensive::HazardType;
    use crate::sim::rng::FixedRandom;
    use crate::sim::upgrades::UpgradeId;

    struct Fixture {
        config: GameConfig,
        core: CollisionCore,
        bus: EventBus,
        bat: Bat,
        bricks: Vec<Brick>,
    }

    impl Fixture {
        fn new(bricks: Vec<Brick>) -> Self {
            let config = GameConfig::default();
            let mut core = CollisionCore::new(&config);
            core.rebuild(&bricks);
            Self {
                bat: Bat::new(&config, 1.0),
                config,
                core,
                bus: EventBus::new(),
                bricks,
            }
        }

        fn ball_at(&self, pos: Vec2, dir: Vec2) -> Ball {
            Ball::free_at(&self.config, pos, dir)
        }

        fn resolve(&mut self, ball: &mut Ball, upgrades: &UpgradeState, rng: &mut dyn RandomSource) -> CombatReport {
            self.core.resolve(
                CombatWorld {
                    ball,
                    bat: &mut self.bat,
                    bricks: &mut self.bricks,
                    lasers: &mut [],
                    offensive: &mut [],
                    upgrades,
                },
                &[],
                0.0,
                &self.config,
                rng,
                &mut self.bus,
            )
        }

        fn events(&mut self) -> Vec<GameEvent> {
            self.bus.dispatch()
        }
    }

    /// Three thin bricks stacked so a ball at (400, 107) touches all of them
    fn stack() -> Vec<Brick> {
        (0..3)
            .map(|k| Brick::with_rect(k + 1, BrickKind::Normal, 5.0, Rect::new(390.0, 100.0 + 5.0 * k as f32, 20.0, 4.0)))
            .collect()
    }

    #[test]
    fn test_bat_bounce_uses_current_speed() {
        let mut fx = Fixture::new(Vec::new());
        let top = fx.bat.rect().top();
        let mut ball = fx.ball_at(Vec2::new(fx.bat.center().x + 30.0, top - 4.0), Vec2::Y);
        ball.vel = Vec2::new(0.0, 50.0);
        let report = fx.resolve(&mut ball, &UpgradeState::new(), &mut FixedRandom(0.5));
        assert!(report.bat_bounce);
        assert!(ball.vel.y < 0.0);
        assert!(ball.vel.x > 0.0);
        assert!((ball.vel.length() - ball.current_speed()).abs() < 1e-3);
        assert!(ball.pos.y + ball.radius < top);
    }

    #[test]
    fn test_bat_bounce_angle_capped() {
        let mut fx = Fixture::new(Vec::new());
        let r = fx.bat.rect();
        let mut ball = fx.ball_at(Vec2::new(r.right() + 2.0, r.top() + 1.0), Vec2::Y);
        fx.resolve(&mut ball, &UpgradeState::new(), &mut FixedRandom(0.5));
        let angle = ball.vel.x.atan2(-ball.vel.y);
        assert!((angle - crate::consts::BALL_MAX_BOUNCE_ANGLE).abs() < 1e-4);
    }

    #[test]
    fn test_bottom_hit_sends_ball_down() {
        let mut fx = Fixture::new(Vec::new());
        let r = fx.bat.rect();
        let mut ball = fx.ball_at(Vec2::new(r.center().x, r.bottom() + 3.0), Vec2::NEG_Y);
        fx.resolve(&mut ball, &UpgradeState::new(), &mut FixedRandom(0.5));
        assert!(ball.vel.y > 0.0);
        assert!(ball.pos.y - ball.radius > r.bottom());
    }

    #[test]
    fn test_grey_ball_passes_through_bat() {
        let mut fx = Fixture::new(Vec::new());
        let mut ball = fx.ball_at(fx.bat.center(), Vec2::Y);
        ball.grey = true;
        let before = ball.clone();
        let report = fx.resolve(&mut ball, &UpgradeState::new(), &mut FixedRandom(0.0));
        assert!(!report.bat_bounce);
        assert_eq!(ball.pos, before.pos);
        assert_eq!(ball.vel, before.vel);
        assert!(ball.grey);
        assert!(fx.events().is_empty());
    }

    #[test]
    fn test_piercing_rolled_on_bat_bounce() {
        let mut fx = Fixture::new(Vec::new());
        let top = fx.bat.rect().top();
        let mut ball = fx.ball_at(Vec2::new(fx.bat.center().x, top - 4.0), Vec2::Y);
        let upgrades = UpgradeState::with_levels(&[(UpgradeId::Piercing, 2)]);
        fx.resolve(&mut ball, &upgrades, &mut FixedRandom(0.1));
        assert!(ball.piercing);
        assert!(fx
            .events()
            .iter()
            .any(|e| matches!(e, GameEvent::PiercingActivated { .. })));
    }

    #[test]
    fn test_non_piercing_hits_one_and_reflects() {
        let mut fx = Fixture::new(stack());
        let mut ball = fx.ball_at(Vec2::new(400.0, 107.0), Vec2::NEG_Y);
        let report = fx.resolve(&mut ball, &UpgradeState::new(), &mut FixedRandom(0.5));
        assert_eq!(report.ball_hits, 1);
        let damaged = fx.bricks.iter().filter(|b| b.health() < b.max_health()).count();
        assert_eq!(damaged, 1);
        assert!(ball.vel.y > 0.0);
    }

    #[test]
    fn test_piercing_damages_all_without_turning() {
        let mut fx = Fixture::new(stack());
        let mut ball = fx.ball_at(Vec2::new(400.0, 107.0), Vec2::NEG_Y);
        ball.activate_piercing(5.0);
        let dir = ball.vel.normalize();
        let report = fx.resolve(&mut ball, &UpgradeState::new(), &mut FixedRandom(0.5));
        assert_eq!(report.ball_hits, 3);
        assert!(fx.bricks.iter().all(|b| b.health() == 4.0));
        assert!(ball.vel.normalize().dot(dir) > 0.9999);

        // Still inside the same bricks next frame: no double damage
        fx.resolve(&mut ball, &UpgradeState::new(), &mut FixedRandom(0.5));
        assert!(fx.bricks.iter().all(|b| b.health() == 4.0));
    }

    #[test]
    fn test_indestructible_clangs_and_reflects_even_when_piercing() {
        let bricks = vec![Brick::with_rect(1, BrickKind::Indestructible, 1.0, Rect::new(390.0, 100.0, 20.0, 10.0))];
        let mut fx = Fixture::new(bricks);
        let mut ball = fx.ball_at(Vec2::new(400.0, 115.0), Vec2::NEG_Y);
        ball.activate_piercing(5.0);
        ball.grey = true;
        fx.resolve(&mut ball, &UpgradeState::with_levels(&[(UpgradeId::CriticalHits, 1)]), &mut FixedRandom(0.0));
        assert!(ball.vel.y > 0.0);
        assert!(!ball.grey);
        assert_eq!(fx.bricks[0].health(), f32::INFINITY);
        let events = fx.events();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::BrickHit { damage, is_critical: false, .. } if *damage == 0.0
        )));
    }

    #[test]
    fn test_critical_hit_multiplies_damage() {
        let bricks = vec![Brick::with_rect(1, BrickKind::Boss1, 1.0, Rect::new(390.0, 100.0, 20.0, 10.0))];
        let mut fx = Fixture::new(bricks);
        let mut ball = fx.ball_at(Vec2::new(400.0, 115.0), Vec2::NEG_Y);
        let upgrades = UpgradeState::with_levels(&[(UpgradeId::CriticalHits, 1)]);
        fx.resolve(&mut ball, &upgrades, &mut FixedRandom(0.05));
        let expected = ball.damage * upgrades.critical_multiplier();
        assert!((fx.bricks[0].max_health() - fx.bricks[0].health() - expected).abs() < 1e-4);
        let events = fx.events();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::BrickHit { is_critical: true, damage, .. } if (*damage - expected).abs() < 1e-4
        )));
    }

    #[test]
    fn test_explosion_upgrade_splashes_neighbours() {
        let bricks = vec![
            Brick::with_rect(1, BrickKind::Normal, 1.0, Rect::new(390.0, 100.0, 20.0, 10.0)),
            Brick::with_rect(2, BrickKind::Normal, 1.0, Rect::new(420.0, 100.0, 20.0, 10.0)),
            Brick::with_rect(3, BrickKind::Indestructible, 1.0, Rect::new(360.0, 100.0, 20.0, 10.0)),
            Brick::with_rect(4, BrickKind::Normal, 1.0, Rect::new(700.0, 100.0, 20.0, 10.0)),
        ];
        let mut fx = Fixture::new(bricks);
        let mut ball = fx.ball_at(Vec2::new(400.0, 115.0), Vec2::NEG_Y);
        let upgrades = UpgradeState::with_levels(&[(UpgradeId::Explosions, 1)]);
        fx.resolve(&mut ball, &upgrades, &mut FixedRandom(0.5));

        let splash = ball.damage * upgrades.explosion_damage_multiplier();
        assert!(fx.bricks[0].is_destroyed());
        assert!((fx.bricks[1].health() - (1.0 - splash)).abs() < 1e-5);
        assert_eq!(fx.bricks[2].health(), f32::INFINITY);
        assert_eq!(fx.bricks[3].health(), 1.0);
        let events = fx.events();
        let splashed: Vec<u32> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::ExplosionDamage { brick, .. } => Some(brick.id),
                _ => None,
            })
            .collect();
        assert_eq!(splashed, vec![2]);
    }

    #[test]
    fn test_destroyed_brick_leaves_index() {
        let bricks = vec![Brick::with_rect(1, BrickKind::Normal, 1.0, Rect::new(390.0, 100.0, 20.0, 10.0))];
        let mut fx = Fixture::new(bricks);
        let mut ball = fx.ball_at(Vec2::new(400.0, 115.0), Vec2::NEG_Y);
        fx.resolve(&mut ball, &UpgradeState::new(), &mut FixedRandom(0.5));
        assert!(fx.core.index().is_empty());
        let destroyed = fx
            .events()
            .iter()
            .filter(|e| matches!(e, GameEvent::BrickDestroyed { .. }))
            .count();
        assert_eq!(destroyed, 1);

        // Ball back inside the dead brick: nothing happens
        let mut ball = fx.ball_at(Vec2::new(400.0, 105.0), Vec2::NEG_Y);
        let report = fx.resolve(&mut ball, &UpgradeState::new(), &mut FixedRandom(0.5));
        assert_eq!(report.ball_hits, 0);
        assert!(fx.events().is_empty());
    }

    #[test]
    fn test_laser_stops_on_first_brick() {
        let bricks = vec![
            Brick::with_rect(1, BrickKind::Normal, 3.0, Rect::new(390.0, 100.0, 20.0, 10.0)),
            Brick::with_rect(2, BrickKind::Normal, 3.0, Rect::new(390.0, 60.0, 20.0, 10.0)),
        ];
        let mut fx = Fixture::new(bricks);
        let mut lasers = vec![Laser::new(1, Vec2::new(400.0, 112.0), 700.0, 1.0)];
        let destroyed = fx
            .core
            .resolve_lasers(&mut lasers, &mut fx.bricks, &UpgradeState::new(), &mut FixedRandom(0.5), &mut fx.bus);
        assert_eq!(destroyed, 0);
        assert!(!lasers[0].active);
        assert_eq!(fx.bricks[0].health(), 2.0);
        assert_eq!(fx.bricks[1].health(), 3.0);
    }

    #[test]
    fn test_falling_brick_damages_bat() {
        let mut fx = Fixture::new(Vec::new());
        let mut hazards = vec![OffensiveEntity::falling_brick(1, fx.bat.center(), Vec2::new(60.0, 20.0))];
        let destroyed = fx
            .core
            .resolve_offensive_bat(&mut hazards, &mut fx.bat, &fx.config, &mut fx.bus);
        assert!(!destroyed);
        assert!(!hazards[0].active);
        assert!((fx.bat.width - 135.0).abs() < 1e-3);
        assert_eq!(
            fx.events(),
            vec![GameEvent::BatDamaged {
                damage_percent: 0.10,
                source: HazardType::FallingBrick
            }]
        );
    }

    #[test]
    fn test_bomb_contact_bursts_on_bat() {
        let mut fx = Fixture::new(Vec::new());
        let mut hazards = vec![OffensiveEntity::bomb(1, fx.bat.center(), &fx.config)];
        fx.core
            .resolve_offensive_bat(&mut hazards, &mut fx.bat, &fx.config, &mut fx.bus);
        assert!(hazards[0].is_exploded());
        assert!(hazards[0].active);
        assert!((fx.bat.width - 150.0 * 0.70).abs() < 1e-3);
    }

    #[test]
    fn test_bat_contact_leaves_bricks_alone() {
        let mut fx = Fixture::new(Vec::new());
        let above = fx.bat.center() - Vec2::new(0.0, 60.0);
        fx.bricks = vec![Brick::with_rect(1, BrickKind::Normal, 10.0, Rect::from_center(above, Vec2::new(40.0, 20.0)))];
        fx.core.rebuild(&fx.bricks);
        let mut hazards = vec![
            OffensiveEntity::bomb(1, fx.bat.center(), &fx.config),
            OffensiveEntity::dynamite(2, fx.bat.center(), &fx.config),
        ];
        let mut ball = fx.ball_at(Vec2::new(700.0, 100.0), Vec2::NEG_Y);
        let report = fx.core.resolve(
            CombatWorld {
                ball: &mut ball,
                bat: &mut fx.bat,
                bricks: &mut fx.bricks,
                lasers: &mut [],
                offensive: &mut hazards,
                upgrades: &UpgradeState::new(),
            },
            &[],
            0.0,
            &fx.config,
            &mut FixedRandom(0.5),
            &mut fx.bus,
        );
        assert!(hazards.iter().all(|h| h.is_exploded()));
        assert_eq!(fx.bricks[0].health(), 10.0);
        assert_eq!(report.bricks_destroyed, 0);
        let events = fx.events();
        assert_eq!(events.iter().filter(|e| matches!(e, GameEvent::BatDamaged { .. })).count(), 2);
        assert!(!events.iter().any(|e| matches!(
            e,
            GameEvent::Explosion { .. } | GameEvent::ExplosionDamage { .. }
        )));
    }

    #[test]
    fn test_piercing_splash_kill_is_not_struck_again() {
        // Both bricks touch the ball; brick 1's splash finishes brick 2 first
        let bricks = vec![
            Brick::with_rect(1, BrickKind::Normal, 5.0, Rect::new(390.0, 100.0, 20.0, 4.0)),
            Brick::with_rect(2, BrickKind::Normal, 0.1, Rect::new(390.0, 110.0, 20.0, 4.0)),
        ];
        let mut fx = Fixture::new(bricks);
        let mut ball = fx.ball_at(Vec2::new(400.0, 107.0), Vec2::NEG_Y);
        ball.activate_piercing(5.0);
        let upgrades = UpgradeState::with_levels(&[(UpgradeId::Explosions, 1)]);
        let report = fx.resolve(&mut ball, &upgrades, &mut FixedRandom(0.5));

        assert_eq!(report.ball_hits, 1);
        assert_eq!(report.bricks_destroyed, 1);
        assert!(fx.bricks[1].is_destroyed());
        assert_eq!(fx.bricks[0].health(), 4.0);
        let events = fx.events();
        let direct: Vec<u32> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::BrickHit { brick, .. } => Some(brick.id),
                _ => None,
            })
            .collect();
        assert_eq!(direct, vec![1]);
        assert_eq!(events.iter().filter(|e| matches!(e, GameEvent::Explosion { .. })).count(), 1);
        assert_eq!(events.iter().filter(|e| matches!(e, GameEvent::BrickDestroyed { .. })).count(), 1);
    }

    #[test]
    fn test_detonation_radius_inclusive() {
        let p = Vec2::new(400.0, 300.0);
        let bricks = vec![
            Brick::with_rect(1, BrickKind::Normal, 10.0, Rect::new(490.0, 295.0, 20.0, 10.0)),
            Brick::with_rect(2, BrickKind::Normal, 10.0, Rect::new(491.0, 295.0, 20.0, 10.0)),
        ];
        let mut fx = Fixture::new(bricks);
        let detonation = Detonation {
            pos: p,
            radius: 100.0,
            damage: 3.0,
        };
        fx.core.apply_detonation(&detonation, &mut fx.bricks, &mut fx.bus);
        assert_eq!(fx.bricks[0].health(), 7.0);
        assert_eq!(fx.bricks[1].health(), 10.0);
    }
}
