//! Typed game events and the publish/subscribe bus
//!
//! The combat core only publishes; audio, particles, achievements and UI
//! subscribe. Events queue during a tick and are delivered in publish order
//! by [`EventBus::dispatch`].

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::brick::{Brick, BrickKind};
use super::offensive::HazardType;

/// Snapshot identifying a brick in an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrickRef {
    pub id: u32,
    pub kind: BrickKind,
}

impl From<&Brick> for BrickRef {
    fn from(brick: &Brick) -> Self {
        Self {
            id: brick.id,
            kind: brick.kind,
        }
    }
}

/// Surfaces the ball can bounce off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BounceSurface {
    Bat,
    Brick,
    Wall,
}

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    /// Direct hit by ball or laser (damage 0 for indestructible bricks)
    BrickHit {
        brick: BrickRef,
        damage: f32,
        is_critical: bool,
        x: f32,
        y: f32,
    },
    BrickDestroyed {
        brick: BrickRef,
        x: f32,
        y: f32,
        is_critical: bool,
    },
    /// Splash damage from an upgrade explosion or a detonation
    ExplosionDamage {
        brick: BrickRef,
        damage: f32,
        x: f32,
        y: f32,
    },
    /// Visual/audio cue for a blast
    Explosion { x: f32, y: f32, radius: f32 },
    BatDamaged {
        damage_percent: f32,
        source: HazardType,
    },
    BatDestroyed,
    BallBounced { surface: BounceSurface },
    BallMissed,
    PiercingActivated { duration: f32 },
    LaserFired { count: u32 },
    OffensiveSpawned { kind: &'static str, x: f32, y: f32 },
    LevelComplete { level: u32 },
}

impl GameEvent {
    /// Stable short name (log keys, tallies)
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::BrickHit { .. } => "brick_hit",
            GameEvent::BrickDestroyed { .. } => "brick_destroyed",
            GameEvent::ExplosionDamage { .. } => "explosion_damage",
            GameEvent::Explosion { .. } => "explosion",
            GameEvent::BatDamaged { .. } => "bat_damaged",
            GameEvent::BatDestroyed => "bat_destroyed",
            GameEvent::BallBounced { .. } => "ball_bounced",
            GameEvent::BallMissed => "ball_missed",
            GameEvent::PiercingActivated { .. } => "piercing_activated",
            GameEvent::LaserFired { .. } => "laser_fired",
            GameEvent::OffensiveSpawned { .. } => "offensive_spawned",
            GameEvent::LevelComplete { .. } => "level_complete",
        }
    }
}

/// Receives dispatched events
pub trait EventSubscriber {
    fn on_event(&mut self, event: &GameEvent);

    fn name(&self) -> &'static str {
        "subscriber"
    }
}

/// Adapter turning a closure into a subscriber
pub struct FnSubscriber<F: FnMut(&GameEvent)> {
    name: &'static str,
    f: F,
}

impl<F: FnMut(&GameEvent)> FnSubscriber<F> {
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }
}

impl<F: FnMut(&GameEvent)> EventSubscriber for FnSubscriber<F> {
    fn on_event(&mut self, event: &GameEvent) {
        (self.f)(event)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// Logs every event at debug level
#[derive(Debug, Default)]
pub struct LoggingSubscriber;

impl EventSubscriber for LoggingSubscriber {
    fn on_event(&mut self, event: &GameEvent) {
        log::debug!("event: {:?}", event);
    }

    fn name(&self) -> &'static str {
        "logging"
    }
}

/// Queue + fan-out of game events
pub struct EventBus {
    pending: VecDeque<GameEvent>,
    subscribers: Vec<Box<dyn EventSubscriber>>,
    /// Most recent dispatched events, oldest first
    journal: VecDeque<GameEvent>,
    journal_capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_journal_capacity(256)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.subscribers.iter().map(|s| s.name()).collect();
        f.debug_struct("EventBus")
            .field("pending", &self.pending.len())
            .field("subscribers", &names)
            .field("journal", &self.journal.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_journal_capacity(cap: usize) -> Self {
        Self {
            pending: VecDeque::new(),
            subscribers: Vec::new(),
            journal: VecDeque::with_capacity(cap),
            journal_capacity: cap,
        }
    }

    pub fn subscribe(&mut self, subscriber: impl EventSubscriber + 'static) {
        log::debug!("Event subscriber registered: {}", subscriber.name());
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn publish(&mut self, event: GameEvent) {
        log::trace!("publish {:?}", event);
        self.pending.push_back(event);
    }

    /// Events published but not yet dispatched
    pub fn pending(&self) -> impl Iterator<Item = &GameEvent> {
        self.pending.iter()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Deliver every pending event to all subscribers, in publish order
    ///
    /// Returns the delivered events so the orchestrator can react too.
    pub fn dispatch(&mut self) -> Vec<GameEvent> {
        let drained: Vec<GameEvent> = self.pending.drain(..).collect();
        for event in &drained {
            for subscriber in self.subscribers.iter_mut() {
                subscriber.on_event(event);
            }
            if self.journal_capacity > 0 {
                if self.journal.len() == self.journal_capacity {
                    self.journal.pop_front();
                }
                self.journal.push_back(event.clone());
            }
        }
        drained
    }

    /// Discard pending events without delivering them
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn journal(&self) -> impl DoubleEndedIterator<Item = &GameEvent> {
        self.journal.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_dispatch_in_publish_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut bus = EventBus::new();
        bus.subscribe(FnSubscriber::new("recorder", move |e: &GameEvent| {
            sink.borrow_mut().push(e.clone())
        }));

        bus.publish(GameEvent::BallMissed);
        bus.publish(GameEvent::BatDestroyed);
        assert_eq!(bus.pending_len(), 2);
        assert!(seen.borrow().is_empty());

        let delivered = bus.dispatch();
        assert_eq!(delivered, vec![GameEvent::BallMissed, GameEvent::BatDestroyed]);
        assert_eq!(*seen.borrow(), delivered);
        assert_eq!(bus.pending_len(), 0);
    }

    #[test]
    fn test_every_subscriber_sees_every_event() {
        let count = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();
        for _ in 0..3 {
            let c = count.clone();
            bus.subscribe(FnSubscriber::new("counter", move |_: &GameEvent| *c.borrow_mut() += 1));
        }
        bus.publish(GameEvent::BallMissed);
        bus.dispatch();
        assert_eq!(*count.borrow(), 3);
    }

    #[test]
    fn test_journal_capacity() {
        let mut bus = EventBus::with_journal_capacity(2);
        for level in 0..5 {
            bus.publish(GameEvent::LevelComplete { level });
        }
        bus.dispatch();
        let journal: Vec<_> = bus.journal().cloned().collect();
        assert_eq!(
            journal,
            vec![GameEvent::LevelComplete { level: 3 }, GameEvent::LevelComplete { level: 4 }]
        );
    }

    #[test]
    fn test_dispatch_empty_is_noop() {
        let mut bus = EventBus::new();
        assert!(bus.dispatch().is_empty());
    }
}
