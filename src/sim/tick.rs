//! Fixed timestep simulation tick
//!
//! Advances the phase machine and, while the world is live, runs one physics
//! step, hands the frame to the collision core and reacts to what it reported.

use glam::Vec2;

use super::ball::WallContact;
use super::combat::CombatWorld;
use super::events::{BounceSurface, BrickRef, GameEvent};
use super::laser::Laser;
use super::state::{GamePhase, GameState};
use super::upgrades::UpgradeId;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Keyboard bat movement, each axis in [-1, 1]
    pub move_dir: Vec2,
    /// Pointer target for the bat's center x (overrides `move_dir.x`)
    pub target_x: Option<f32>,
    /// Launch angle for a sticky ball, radians from vertical
    pub aim: Option<f32>,
    /// Launch ball / start run / continue after upgrades
    pub launch: bool,
    /// Fire turret lasers
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Upgrade to buy (upgrade phase only)
    pub purchase: Option<UpgradeId>,
}

/// Advance the game state by one fixed timestep
///
/// `dt` is real time. Physics receives `dt` scaled by the current time
/// dilation; phase timers use it unscaled.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        match state.phase {
            GamePhase::Playing => state.set_phase(GamePhase::Paused),
            GamePhase::Paused => state.set_phase(GamePhase::Playing),
            _ => {}
        }
    }

    match state.phase {
        GamePhase::Paused | GamePhase::GameOver => {}
        GamePhase::Intro => {
            move_bat(state, input, dt);
            state.ball.update_attached(&state.bat);
            if let Some(angle) = input.aim {
                state.ball.set_launch_angle(angle);
            }
            if input.launch {
                state.set_phase(GamePhase::Playing);
                state.ball.launch();
            }
        }
        GamePhase::Playing => {
            state.time_ticks += 1;
            step_world(state, input, dt, true);
            if state.phase == GamePhase::Playing && state.level.is_complete() {
                begin_level_complete(state);
            }
        }
        GamePhase::LevelComplete => {
            state.time_ticks += 1;
            step_world(state, input, dt, false);
            state.level_complete_timer -= dt;
            if state.level_complete_timer <= 0.0 {
                state.teardown_level();
                state.set_phase(GamePhase::Upgrade);
            }
        }
        GamePhase::Upgrade => {
            if let Some(id) = input.purchase {
                if let Err(err) = state.purchase(id) {
                    log::warn!("Purchase refused: {}", err);
                }
            }
            if input.launch {
                let next = state.level.number + 1;
                state.load_level(next);
                state.set_phase(GamePhase::Playing);
            }
        }
    }

    state.bus.dispatch();
}

fn move_bat(state: &mut GameState, input: &TickInput, dt: f32) {
    match input.target_x {
        Some(x) => {
            state.bat.move_toward(x, dt);
            state.bat.move_by(Vec2::new(0.0, input.move_dir.y), dt);
        }
        None => state.bat.move_by(input.move_dir, dt),
    }
}

/// One physics step plus combat resolution
///
/// With `lives_at_stake` false (level already cleared) misses and bat
/// destruction cost nothing.
fn step_world(state: &mut GameState, input: &TickInput, dt: f32, lives_at_stake: bool) {
    let pdt = dt * state.time_scale();
    state.slow_motion = (state.slow_motion - dt).max(0.0);

    move_bat(state, input, dt);

    if state.ball.is_sticky() {
        if let Some(angle) = input.aim {
            state.ball.set_launch_angle(angle);
        }
        if input.launch && lives_at_stake {
            state.ball.launch();
        }
    }

    state.laser_cooldown = (state.laser_cooldown - pdt).max(0.0);
    if input.fire {
        fire_lasers(state);
    }

    let field = state.field();
    let mut missed = false;
    match state.ball.update(pdt, &state.bat, &field) {
        WallContact::Bottom => {
            missed = true;
            state.bus.publish(GameEvent::BallMissed);
        }
        WallContact::Side | WallContact::Top => state.bus.publish(GameEvent::BallBounced {
            surface: BounceSurface::Wall,
        }),
        WallContact::None => {}
    }

    for laser in state.lasers.iter_mut() {
        laser.update(pdt);
    }
    state.lasers.retain(|l| l.active);

    let detonations = state.offensive.update(pdt, state.bat.center(), &state.config);
    let boss = state.level.boss_launch_point();
    state
        .offensive
        .update_boss(pdt, boss, &state.config, &mut state.bus);

    let report = state.core.resolve(
        CombatWorld {
            ball: &mut state.ball,
            bat: &mut state.bat,
            bricks: &mut state.level.bricks,
            lasers: &mut state.lasers,
            offensive: state.offensive.entities_mut(),
            upgrades: &state.upgrades,
        },
        &detonations,
        pdt,
        &state.config,
        &mut state.rng,
        &mut state.bus,
    );
    state.lasers.retain(|l| l.active);
    state.offensive.prune();

    let destroyed: Vec<BrickRef> = state
        .bus
        .pending()
        .filter_map(|e| match e {
            GameEvent::BrickDestroyed { brick, .. } => Some(*brick),
            _ => None,
        })
        .collect();
    for brick in destroyed {
        let value = brick.kind.score_value();
        state.score += value;
        state.points += (value / 10) as u32;
        if brick.kind.is_offensive() {
            if let Some(b) = state.level.brick(brick.id) {
                state
                    .offensive
                    .on_brick_destroyed(b, &state.config, &mut state.rng, &mut state.bus);
            }
        }
    }

    if missed && lives_at_stake {
        state.lose_life();
    }
    if report.bat_destroyed {
        let over = lives_at_stake && state.lose_life();
        if !over {
            state.reset_bat();
        }
    }
}

fn fire_lasers(state: &mut GameState) {
    if state.laser_cooldown > 0.0 || state.bat.turrets == 0 || state.bat.is_destroyed() {
        return;
    }
    let muzzles = state.bat.turret_positions();
    let count = muzzles.len() as u32;
    for muzzle in muzzles {
        let id = state.next_entity_id();
        state.lasers.push(Laser::new(
            id,
            muzzle,
            state.config.laser_speed,
            state.config.laser_damage,
        ));
    }
    state.laser_cooldown = state.config.laser_cooldown;
    state.bus.publish(GameEvent::LaserFired { count });
}

fn begin_level_complete(state: &mut GameState) {
    log::info!(
        "Level {} complete, score {}, points {}",
        state.level.number,
        state.score,
        state.points
    );
    state.slow_motion = state.config.slow_motion_duration;
    state.level_complete_timer = state.config.level_complete_delay;
    state.bus.publish(GameEvent::LevelComplete {
        level: state.level.number,
    });
    state.set_phase(GamePhase::LevelComplete);
}
