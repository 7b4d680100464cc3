#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns player intent into craft commands.

use std::time::Duration;

use aether_core::{
    angle_towards, cooldown_elapsed, heading_vector, Command, Event, PlayerSnapshot, PlayerTuning,
    SimMode,
};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Control signals sampled from the input device for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PilotIntent {
    /// Accelerate along the heading.
    pub thrust: bool,
    /// Rotate counter-clockwise on screen.
    pub turn_left: bool,
    /// Rotate clockwise on screen.
    pub turn_right: bool,
    /// Pull the trigger.
    pub fire: bool,
    /// Aim point in world coordinates; volleys follow the heading when absent.
    pub aim: Option<Vec2>,
    /// Use the trigger zone the craft is standing in.
    pub interact: bool,
}

/// Configuration parameters required to construct the piloting system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed of the volley spread generator.
    pub rng_seed: u64,
}

impl Config {
    /// Creates a configuration with the provided spread seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(0x0a11_ce5e_edf1_2e00)
    }
}

/// Heading and speed of the craft after one tick of steering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Kinematics {
    /// Facing angle in degrees.
    pub heading_degrees: f32,
    /// Speed in pixels per tick.
    pub speed: f32,
}

/// Applies one tick of turning, thrust and friction.
#[must_use]
pub fn steer(player: &PlayerSnapshot, intent: &PilotIntent, tuning: &PlayerTuning) -> Kinematics {
    let mut heading_degrees = player.facing_degrees;
    if intent.turn_left {
        heading_degrees -= tuning.turn_rate_degrees;
    }
    if intent.turn_right {
        heading_degrees += tuning.turn_rate_degrees;
    }

    let speed = if intent.thrust {
        (player.speed + tuning.acceleration).min(player.max_speed)
    } else {
        let coasting = player.speed * tuning.friction;
        if coasting < tuning.stop_threshold {
            0.0
        } else {
            coasting
        }
    };

    Kinematics {
        heading_degrees,
        speed,
    }
}

/// Piloting system that emits steering, movement, volley and interaction commands.
#[derive(Debug)]
pub struct Piloting {
    rng: ChaCha8Rng,
}

impl Piloting {
    /// Creates a new piloting system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes events, the player snapshot and intent to emit craft commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        mode: SimMode,
        intent: &PilotIntent,
        player: Option<&PlayerSnapshot>,
        tuning: &PlayerTuning,
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

        let kinematics = steer(player, intent, tuning);
        out.push(Command::SteerPlayer {
            heading_degrees: kinematics.heading_degrees,
            speed: kinematics.speed,
        });
        out.push(Command::MoveEntity {
            entity: player.id,
            delta: heading_vector(kinematics.heading_degrees) * kinematics.speed,
        });

        if intent.fire {
            if let Some(angles_degrees) = self.volley(player, intent, tuning, kinematics, now) {
                out.push(Command::Fire {
                    shooter: player.id,
                    angles_degrees,
                });
            }
        }

        if intent.interact {
            out.push(Command::Interact { entity: player.id });
        }
    }

    fn volley(
        &mut self,
        player: &PlayerSnapshot,
        intent: &PilotIntent,
        tuning: &PlayerTuning,
        kinematics: Kinematics,
        now: Duration,
    ) -> Option<Vec<f32>> {
        if player.bullets == 0 || !cooldown_elapsed(player.last_shot, tuning.shoot_cooldown(), now) {
            return None;
        }

        let mut angle = intent
            .aim
            .filter(|aim| *aim != player.position)
            .map_or(kinematics.heading_degrees, |aim| angle_towards(player.position, aim));
        let spread = tuning.spread_degrees.abs();
        let mut angles = Vec::with_capacity(player.bullets as usize);
        for _ in 0..player.bullets {
            angle += self.rng.gen_range(-spread..=spread) as f32;
            angles.push(angle);
        }
        Some(angles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aether_core::{EntityId, HitboxShape, Vitals};

    fn craft(speed: f32, facing_degrees: f32) -> PlayerSnapshot {
        PlayerSnapshot {
            id: EntityId::new(0),
            position: Vec2::new(100.0, 100.0),
            facing_degrees,
            speed,
            max_speed: 5.0,
            bullets: 1,
            vitals: Vitals::full(100),
            last_shot: None,
            invulnerable: false,
            hitbox: HitboxShape::rect(48.0, 48.0)
                .expect("valid")
                .at(Vec2::new(100.0, 100.0)),
        }
    }

    #[test]
    fn thrust_accelerates_up_to_max_speed() {
        let tuning = PlayerTuning::default();
        let intent = PilotIntent {
            thrust: true,
            ..PilotIntent::default()
        };

        let accelerated = steer(&craft(1.0, 0.0), &intent, &tuning);
        assert!((accelerated.speed - 1.2).abs() < 1e-6);

        let capped = steer(&craft(4.9, 0.0), &intent, &tuning);
        assert_eq!(capped.speed, 5.0);
    }

    #[test]
    fn coasting_applies_friction_and_stops() {
        let tuning = PlayerTuning::default();
        let idle = PilotIntent::default();

        let coasting = steer(&craft(2.0, 0.0), &idle, &tuning);
        assert!((coasting.speed - 1.84).abs() < 1e-6);

        let stopped = steer(&craft(0.05, 0.0), &idle, &tuning);
        assert_eq!(stopped.speed, 0.0);
    }

    #[test]
    fn turning_adjusts_heading_by_turn_rate() {
        let tuning = PlayerTuning::default();
        let left = PilotIntent {
            turn_left: true,
            ..PilotIntent::default()
        };
        let both = PilotIntent {
            turn_left: true,
            turn_right: true,
            ..PilotIntent::default()
        };

        assert_eq!(steer(&craft(0.0, 90.0), &left, &tuning).heading_degrees, 85.5);
        assert_eq!(steer(&craft(0.0, 90.0), &both, &tuning).heading_degrees, 90.0);
    }
}
