#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-order simulation step that wires the world to its systems.
//!
//! A [`Simulation`] owns the authoritative [`World`] and one instance of each
//! pure system. Every call to [`Simulation::step`] advances the clock once and
//! runs the spawner, piloting, projectile, trigger and enemy passes in that
//! order, feeding each system the events produced so far.

mod config;

use std::time::Duration;

use aether_core::{Command, EntityId, Event, Health, SimMode};
use aether_system_bootstrap::{Bootstrap, LayoutError, TileLayout};
use aether_system_enemy_ai::EnemyAi;
use aether_system_piloting::{PilotIntent, Piloting};
use aether_system_spawning::Spawning;
use aether_world::{self as world, query, World};
use tracing::{debug, info};

pub use config::{ConfigError, SimulationConfig, DEFAULT_TICK_RATE};

/// Per-step context supplied by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimulationContext {
    /// Whether the simulation runs or is held by a dialog or quiz.
    pub mode: SimMode,
}

impl SimulationContext {
    /// Creates a context for the provided mode.
    #[must_use]
    pub const fn new(mode: SimMode) -> Self {
        Self { mode }
    }
}

/// Receives combat notifications after each step.
///
/// Every method defaults to doing nothing.
pub trait CombatObserver {
    /// An enemy's health reached zero.
    fn enemy_killed(&mut self, _enemy: EntityId) {}

    /// The player lost health.
    fn player_damaged(&mut self, _amount: u32, _remaining: Health) {}

    /// The player's health reached zero.
    fn player_defeated(&mut self, _player: EntityId) {}

    /// A trigger zone fired.
    fn trigger_activated(&mut self, _trigger: EntityId) {}
}

/// Observer that ignores every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl CombatObserver for NullObserver {}

/// Outcome of a single [`Simulation::step`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepReport {
    /// Every event emitted during the step, in emission order.
    pub events: Vec<Event>,
    /// True when the context held the simulation and nothing ran.
    pub paused: bool,
}

/// Authoritative world plus the systems that drive it.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    world: World,
    spawning: Spawning,
    piloting: Piloting,
    enemy_ai: EnemyAi,
    commands: Vec<Command>,
}

impl Simulation {
    /// Creates an empty world and seeds every system from the configuration.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        info!(
            spawner_seed = config.spawner.rng_seed,
            piloting_seed = config.piloting.rng_seed,
            chunk_size = config.world.chunk_size,
            "simulation created"
        );
        Self {
            config,
            world: World::new(config.world),
            spawning: Spawning::new(config.spawner),
            piloting: Piloting::new(config.piloting),
            enemy_ai: EnemyAi::new(),
            commands: Vec::new(),
        }
    }

    /// Configuration the simulation was built from.
    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Read-only access to the world for [`query`] calls.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Applies a host command outside the step sequence.
    pub fn apply(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        events
    }

    /// Places every body described by a tile layout.
    pub fn populate(&mut self, layout: &TileLayout<'_>) -> Result<Vec<Event>, LayoutError> {
        let placements = Bootstrap.placements(layout)?;
        let mut events = Vec::with_capacity(placements.len());
        for command in placements {
            world::apply(&mut self.world, command, &mut events);
        }
        info!(entities = query::entity_count(&self.world), "world populated");
        Ok(events)
    }

    /// Runs one simulation step of `dt`.
    pub fn step(
        &mut self,
        context: &SimulationContext,
        intent: &PilotIntent,
        dt: Duration,
        observer: &mut dyn CombatObserver,
    ) -> StepReport {
        let mode = context.mode;
        if !mode.is_running() {
            debug!(?mode, "step skipped while paused");
            return StepReport {
                events: Vec::new(),
                paused: true,
            };
        }

        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt }, &mut events);

        let player = query::player(&self.world);
        self.spawning.handle(
            &events,
            mode,
            player.as_ref(),
            query::enemy_view(&self.world).living(),
            &mut self.commands,
        );
        self.flush(&mut events);

        let player_tuning = query::config(&self.world).player;
        self.piloting.handle(
            &events,
            mode,
            intent,
            player.as_ref(),
            &player_tuning,
            &mut self.commands,
        );
        self.flush(&mut events);

        world::apply(&mut self.world, Command::AdvanceProjectiles, &mut events);
        world::apply(&mut self.world, Command::ResolveTriggers, &mut events);

        let enemies = query::enemy_view(&self.world);
        let player = query::player(&self.world);
        let enemy_tuning = query::config(&self.world).enemy;
        self.enemy_ai.handle(
            &events,
            mode,
            &enemies,
            player.as_ref(),
            &enemy_tuning,
            &mut self.commands,
        );
        self.flush(&mut events);

        self.notify(&events, observer);
        StepReport {
            events,
            paused: false,
        }
    }

    fn flush(&mut self, events: &mut Vec<Event>) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, events);
        }
    }

    fn notify(&self, events: &[Event], observer: &mut dyn CombatObserver) {
        let player = query::player(&self.world).map(|player| player.id);
        for event in events {
            match *event {
                Event::EnemyKilled { enemy } => observer.enemy_killed(enemy),
                Event::EntityDamaged {
                    entity,
                    amount,
                    remaining,
                } if Some(entity) == player => observer.player_damaged(amount, remaining),
                Event::PlayerDefeated { player } => observer.player_defeated(player),
                Event::TriggerActivated { trigger } => observer.trigger_activated(trigger),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paused_context_leaves_clock_untouched() {
        let mut simulation = Simulation::new(SimulationConfig::default());
        let report = simulation.step(
            &SimulationContext::new(SimMode::Dialog),
            &PilotIntent::default(),
            Duration::from_millis(16),
            &mut NullObserver,
        );

        assert!(report.paused);
        assert!(report.events.is_empty());
        assert_eq!(query::clock(simulation.world()), Duration::ZERO);
        assert_eq!(query::tick_index(simulation.world()), 0);
    }

    #[test]
    fn running_step_starts_with_time_advance() {
        let mut simulation = Simulation::new(SimulationConfig::default());
        let report = simulation.step(
            &SimulationContext::default(),
            &PilotIntent::default(),
            Duration::from_millis(16),
            &mut NullObserver,
        );

        assert!(!report.paused);
        assert_eq!(
            report.events.first(),
            Some(&Event::TimeAdvanced {
                dt: Duration::from_millis(16),
                now: Duration::from_millis(16),
            })
        );
    }
}
