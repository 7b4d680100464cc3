use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{HitboxShape, ProjectileOwner};

/// Radius of the circular hitbox every projectile carries.
pub const PROJECTILE_RADIUS: f32 = 4.0;

/// Collision shape every projectile carries.
pub const PROJECTILE_SHAPE: HitboxShape = HitboxShape::circle_unchecked(PROJECTILE_RADIUS);

/// Ballistic constants keyed by projectile owner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileTuning {
    /// Distance covered per tick in world pixels.
    pub speed: f32,
    /// Damage dealt on impact.
    pub damage: u32,
    /// Travel distance beyond which the projectile expires.
    pub max_distance: f32,
}

impl ProjectileOwner {
    /// Returns the ballistic constants for projectiles fired by this owner.
    #[must_use]
    pub const fn tuning(self) -> ProjectileTuning {
        match self {
            Self::Player => ProjectileTuning {
                speed: 12.0,
                damage: 10,
                max_distance: 600.0,
            },
            Self::Enemy => ProjectileTuning {
                speed: 3.0,
                damage: 15,
                max_distance: 400.0,
            },
            Self::Neutral => ProjectileTuning {
                speed: 5.0,
                damage: 5,
                max_distance: 800.0,
            },
        }
    }
}

/// Movement, weapon and durability parameters for the player craft.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Health the player starts with and can be healed up to.
    pub max_health: u32,
    /// Initial top speed in pixels per tick.
    pub max_speed: f32,
    /// Speed gained per tick while thrusting.
    pub acceleration: f32,
    /// Multiplier applied to speed on ticks without thrust.
    pub friction: f32,
    /// Speeds below this value snap to zero while coasting.
    pub stop_threshold: f32,
    /// Degrees turned per tick while steering.
    pub turn_rate_degrees: f32,
    /// Minimum time between volleys, in milliseconds.
    pub shoot_cooldown_ms: u64,
    /// Damage immunity after a hit, in milliseconds.
    pub invulnerability_ms: u64,
    /// Projectiles per volley at spawn.
    pub bullets: u32,
    /// Maximum random deviation applied per bullet, in degrees.
    pub spread_degrees: i32,
    /// Distance ahead of the craft center where projectiles appear.
    pub muzzle_offset: f32,
    /// Collision shape of the craft.
    pub hitbox: HitboxShape,
}

impl PlayerTuning {
    /// Shoot cooldown as a duration.
    #[must_use]
    pub const fn shoot_cooldown(&self) -> Duration {
        Duration::from_millis(self.shoot_cooldown_ms)
    }

    /// Invulnerability window as a duration.
    #[must_use]
    pub const fn invulnerability(&self) -> Duration {
        Duration::from_millis(self.invulnerability_ms)
    }
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: 100,
            max_speed: 5.0,
            acceleration: 0.2,
            friction: 0.92,
            stop_threshold: 0.05,
            turn_rate_degrees: 4.5,
            shoot_cooldown_ms: 200,
            invulnerability_ms: 1000,
            bullets: 1,
            spread_degrees: 5,
            muzzle_offset: 30.0,
            hitbox: HitboxShape::rect_unchecked(48.0, 48.0),
        }
    }
}

/// Pursuit, attack and durability parameters shared by all enemies.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    /// Health at spawn.
    pub max_health: u32,
    /// Pixels per tick while approaching.
    pub speed: f32,
    /// Damage of one melee strike.
    pub melee_damage: u32,
    /// Reach of a melee strike.
    pub attack_range: f32,
    /// Minimum time between melee strikes, in milliseconds.
    pub attack_cooldown_ms: u64,
    /// Distance at which the enemy stops and fires.
    pub shoot_range: f32,
    /// Minimum time between shots, in milliseconds.
    pub shoot_cooldown_ms: u64,
    /// Distance within which a target is acquired.
    pub detection_range: f32,
    /// Distance ahead of the enemy center where projectiles appear.
    pub muzzle_offset: f32,
    /// Collision shape used when a spawn request does not name one.
    pub hitbox: HitboxShape,
}

impl EnemyTuning {
    /// Melee cooldown as a duration.
    #[must_use]
    pub const fn attack_cooldown(&self) -> Duration {
        Duration::from_millis(self.attack_cooldown_ms)
    }

    /// Ranged cooldown as a duration.
    #[must_use]
    pub const fn shoot_cooldown(&self) -> Duration {
        Duration::from_millis(self.shoot_cooldown_ms)
    }
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            max_health: 50,
            speed: 1.5,
            melee_damage: 20,
            attack_range: 40.0,
            attack_cooldown_ms: 1500,
            shoot_range: 300.0,
            shoot_cooldown_ms: 1000,
            detection_range: 500.0,
            muzzle_offset: 20.0,
            hitbox: HitboxShape::circle_unchecked(20.0),
        }
    }
}

/// Reports whether a cooldown that last fired at `last` has elapsed at `now`.
///
/// A cooldown that never fired is always ready.
#[must_use]
pub fn cooldown_elapsed(last: Option<Duration>, cooldown: Duration, now: Duration) -> bool {
    match last {
        None => true,
        Some(last) => now.saturating_sub(last) >= cooldown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_tuning_matches_ballistics_table() {
        assert_eq!(ProjectileOwner::Player.tuning().speed, 12.0);
        assert_eq!(ProjectileOwner::Enemy.tuning().damage, 15);
        assert_eq!(ProjectileOwner::Neutral.tuning().max_distance, 800.0);
    }

    #[test]
    fn cooldown_fires_on_boundary() {
        let cooldown = Duration::from_millis(1000);
        assert!(cooldown_elapsed(None, cooldown, Duration::ZERO));

        let last = Some(Duration::ZERO);
        assert!(!cooldown_elapsed(last, cooldown, Duration::from_millis(100)));
        assert!(!cooldown_elapsed(last, cooldown, Duration::from_millis(999)));
        assert!(cooldown_elapsed(last, cooldown, Duration::from_millis(1000)));
    }

    #[test]
    fn tuning_round_trips_through_bincode() {
        let mut tuning = EnemyTuning::default();
        tuning.detection_range = 640.0;
        tuning.hitbox = HitboxShape::rect(30.0, 18.0).expect("valid rect");

        let bytes = bincode::serialize(&tuning).expect("serialize");
        let restored: EnemyTuning = bincode::deserialize(&bytes).expect("deserialize");

        assert_eq!(restored, tuning);
    }
}
