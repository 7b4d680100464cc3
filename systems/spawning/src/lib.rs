#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting enemy spawn commands.
//!
//! Enemies appear on a ring around the player at a seeded random angle,
//! gated by a spawn interval and a population cap.

use std::time::Duration;

use aether_core::{heading_vector, Command, Event, PlayerSnapshot, SimMode};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Minimum time between spawn attempts, in milliseconds.
    pub interval_ms: u64,
    /// Population cap counted over the active neighborhood.
    pub max_enemies: usize,
    /// Radius of the spawn ring around the player.
    pub spawn_distance: f32,
    /// Seed of the angle generator.
    pub rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided cadence, cap, ring and seed.
    #[must_use]
    pub const fn new(interval: Duration, max_enemies: usize, spawn_distance: f32, rng_seed: u64) -> Self {
        Self {
            interval_ms: interval.as_millis() as u64,
            max_enemies,
            spawn_distance,
            rng_seed,
        }
    }

    /// Spawn interval as a duration.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Duration::from_millis(5000), 10, 600.0, 0x5eed_a37e_12c0_ffee)
    }
}

/// Pure system that emits enemy spawn commands while the game is running.
#[derive(Debug)]
pub struct Spawning {
    config: Config,
    last_spawn: Duration,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            last_spawn: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Clock value of the last spawn attempt.
    #[must_use]
    pub const fn last_spawn(&self) -> Duration {
        self.last_spawn
    }

    /// Consumes events and immutable views to emit spawn commands.
    ///
    /// At most one enemy is requested per call. The world rejects points
    /// outside its bounds; the attempt resets the spawn timer either way.
    pub fn handle(
        &mut self,
        events: &[Event],
        mode: SimMode,
        player: Option<&PlayerSnapshot>,
        living_enemies: usize,
        out: &mut Vec<Command>,
    ) {
        if !mode.is_running() {
            return;
        }

        let Some(now) = events.iter().rev().find_map(|event| match event {
            Event::TimeAdvanced { now, .. } => Some(*now),
            _ => None,
        }) else {
            return;
        };

        let Some(player) = player.filter(|player| player.is_alive()) else {
            return;
        };

        if now.saturating_sub(self.last_spawn) < self.config.interval()
            || living_enemies >= self.config.max_enemies
        {
            return;
        }

        let angle: f32 = self.rng.gen_range(0.0..360.0);
        let position = player.position + heading_vector(angle) * self.config.spawn_distance;
        self.last_spawn = now;
        debug!(x = position.x, y = position.y, "enemy spawn requested");
        out.push(Command::SpawnEnemy {
            position,
            shape: None,
        });
    }
}
