//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Injected random source only
//! - Stable iteration order (brick slice order, entity spawn order)
//! - No rendering, audio or platform dependencies

pub mod ball;
pub mod bat;
pub mod brick;
pub mod collision;
pub mod combat;
pub mod events;
pub mod geometry;
pub mod laser;
pub mod level;
pub mod offensive;
pub mod rng;
pub mod spatial;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod upgrades;

pub use ball::{Ball, BallState, WallContact};
pub use bat::{Bat, BatDamage};
pub use brick::{Brick, BrickKind, DamageOutcome};
pub use collision::{CollisionResult, bounce, circle_circle_collision, circle_rect_collision, reflect_velocity};
pub use combat::{CollisionCore, CombatReport, CombatWorld};
pub use events::{BounceSurface, BrickRef, EventBus, EventSubscriber, FnSubscriber, GameEvent, LoggingSubscriber};
pub use geometry::Rect;
pub use laser::Laser;
pub use level::{BrickConfig, Level, LevelConfig};
pub use offensive::{BeamPhase, Detonation, Fuse, HazardType, OffensiveEntity, OffensiveKind};
pub use rng::{FixedRandom, RandomSource, SequenceRandom, SimRng};
pub use spatial::SpatialIndex;
pub use spawner::OffensiveManager;
pub use state::{GamePhase, GameState};
pub use tick::{TickInput, tick};
pub use upgrades::{UpgradeError, UpgradeId, UpgradeState};
