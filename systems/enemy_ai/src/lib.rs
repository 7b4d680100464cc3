#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that drives the enemy behaviour state machine.
//!
//! Each tick every living enemy re-evaluates its distance to the player and
//! lands in one of the [`EnemyMode`] states: idle beyond detection range,
//! approaching beyond shooting range, engaging within shooting range, and
//! striking within melee reach. Ranged and melee attacks are both checked
//! every tick; the world enforces the final cooldown and reach rules.

use std::time::Duration;

use aether_core::{
    angle_towards, cooldown_elapsed, heading_vector, Command, EnemyMode, EnemySnapshot, EnemyTuning,
    EnemyView, Event, PlayerSnapshot, SimMode,
};
use tracing::trace;

/// Maps a squared distance to the behaviour mode it implies.
///
/// Range boundaries are inclusive: a target exactly at detection range is
/// still tracked.
#[must_use]
pub fn classify(distance_squared: f32, tuning: &EnemyTuning) -> EnemyMode {
    let within = |range: f32| distance_squared <= range * range;
    if !within(tuning.detection_range) {
        EnemyMode::Idle
    } else if !within(tuning.shoot_range) {
        EnemyMode::Approaching
    } else if !within(tuning.attack_range) {
        EnemyMode::Engaging
    } else {
        EnemyMode::Melee
    }
}

/// Enemy AI system that emits movement, facing and attack commands.
#[derive(Debug, Default)]
pub struct EnemyAi {
    scratch: Vec<Command>,
}

impl EnemyAi {
    /// Creates a new enemy AI system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits commands for every living enemy in the view.
    pub fn handle(
        &mut self,
        events: &[Event],
        mode: SimMode,
        enemies: &EnemyView,
        player: Option<&PlayerSnapshot>,
        tuning: &EnemyTuning,
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

        let player = player.filter(|player| player.is_alive());
        self.scratch.clear();
        for enemy in enemies.iter().filter(|enemy| enemy.mode != EnemyMode::Dead) {
            self.decide(enemy, player, tuning, now);
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }

    fn decide(
        &mut self,
        enemy: &EnemySnapshot,
        player: Option<&PlayerSnapshot>,
        tuning: &EnemyTuning,
        now: Duration,
    ) {
        let (target, mode, distance_squared) = match player {
            Some(player) => {
                let distance_squared = enemy.position.distance_squared(player.position);
                let mode = classify(distance_squared, tuning);
                let target = mode.is_tracking().then_some(player.id);
                (target, mode, distance_squared)
            }
            None => (None, EnemyMode::Idle, f32::INFINITY),
        };

        if target != enemy.target || mode != enemy.mode {
            trace!(enemy = enemy.id.get(), ?mode, "engagement changed");
            self.scratch.push(Command::UpdateEngagement {
                enemy: enemy.id,
                target,
                mode,
            });
        }

        let (Some(target), Some(player)) = (target, player) else {
            return;
        };

        let angle = angle_towards(enemy.position, player.position);
        self.scratch.push(Command::SetFacing {
            entity: enemy.id,
            angle_degrees: angle,
        });

        if mode == EnemyMode::Approaching {
            self.scratch.push(Command::MoveEntity {
                entity: enemy.id,
                delta: heading_vector(angle) * tuning.speed,
            });
        }

        if distance_squared <= tuning.shoot_range * tuning.shoot_range
            && cooldown_elapsed(enemy.last_shot, tuning.shoot_cooldown(), now)
        {
            self.scratch.push(Command::Fire {
                shooter: enemy.id,
                angles_degrees: vec![angle],
            });
        }

        if distance_squared <= tuning.attack_range * tuning.attack_range
            && cooldown_elapsed(enemy.last_attack, tuning.attack_cooldown(), now)
        {
            self.scratch.push(Command::MeleeAttack {
                attacker: enemy.id,
                target,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_uses_inclusive_ranges() {
        let tuning = EnemyTuning::default();

        assert_eq!(classify(501.0 * 501.0, &tuning), EnemyMode::Idle);
        assert_eq!(classify(500.0 * 500.0, &tuning), EnemyMode::Approaching);
        assert_eq!(classify(301.0 * 301.0, &tuning), EnemyMode::Approaching);
        assert_eq!(classify(300.0 * 300.0, &tuning), EnemyMode::Engaging);
        assert_eq!(classify(41.0 * 41.0, &tuning), EnemyMode::Engaging);
        assert_eq!(classify(40.0 * 40.0, &tuning), EnemyMode::Melee);
        assert_eq!(classify(0.0, &tuning), EnemyMode::Melee);
    }

    #[test]
    fn paused_mode_is_silent() {
        let mut system = EnemyAi::new();
        let mut out = Vec::new();

        system.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_millis(16),
                now: Duration::from_millis(16),
            }],
            SimMode::Dialog,
            &EnemyView::default(),
            None,
            &EnemyTuning::default(),
            &mut out,
        );

        assert!(out.is_empty());
    }
}
