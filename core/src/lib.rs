#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Aether combat simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for the next system in the frame to react to. Systems consume event
//! streams, read immutable snapshots, and respond exclusively with new command
//! batches.

pub mod hitbox;
mod tuning;

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use hitbox::{Aabb, Circle, GeometryError, Hitbox, HitboxShape};
pub use tuning::{
    cooldown_elapsed, EnemyTuning, PlayerTuning, ProjectileTuning, PROJECTILE_RADIUS,
    PROJECTILE_SHAPE,
};

/// Canonical banner emitted when the simulation boots.
pub const WELCOME_BANNER: &str = "Aether combat simulation online.";

/// Describes which screen owns the frame and whether the world advances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimMode {
    /// Regular gameplay; the world advances every step.
    #[default]
    Play,
    /// A dialog overlay is open; the world is frozen.
    Dialog,
    /// A quiz overlay is open; the world is frozen.
    Quiz,
}

impl SimMode {
    /// Reports whether the world should advance in this mode.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Play)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock and captures the tick's active snapshot.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Places the player craft. Replaces any previously placed player.
    PlacePlayer {
        /// Center of the craft in world pixels.
        position: Vec2,
    },
    /// Places a static obstacle that blocks motion and projectiles.
    PlaceObstacle {
        /// Center of the obstacle in world pixels.
        position: Vec2,
        /// Collision shape of the obstacle.
        shape: HitboxShape,
    },
    /// Places a planet, a circular obstacle sized by its kind.
    PlacePlanet {
        /// Which planet to place.
        kind: PlanetKind,
        /// Center of the planet in world pixels.
        position: Vec2,
    },
    /// Places a trigger zone that fires once when the player reaches it.
    PlaceTrigger {
        /// Center of the zone in world pixels.
        position: Vec2,
        /// Activation radius.
        radius: f32,
        /// Whether the zone fires on contact or only on interaction.
        auto: bool,
    },
    /// Requests that an enemy be created at the provided location.
    SpawnEnemy {
        /// Center of the enemy in world pixels.
        position: Vec2,
        /// Collision shape override; the enemy tuning shape is used when absent.
        shape: Option<HitboxShape>,
    },
    /// Spawns a single projectile without any shooter bookkeeping.
    SpawnProjectile {
        /// Spawn point.
        origin: Vec2,
        /// Direction of travel in degrees.
        angle_degrees: f32,
        /// Faction that owns the projectile.
        owner: ProjectileOwner,
    },
    /// Fires a volley from a combatant, one projectile per angle.
    ///
    /// Ignored while the shooter's shoot cooldown is running.
    Fire {
        /// Combatant pulling the trigger.
        shooter: EntityId,
        /// Direction of each projectile in degrees.
        angles_degrees: Vec<f32>,
    },
    /// Updates the player's heading and speed for the current tick.
    SteerPlayer {
        /// New facing angle in degrees.
        heading_degrees: f32,
        /// New speed in pixels per tick.
        speed: f32,
    },
    /// Moves a combatant, resolving collisions against the tick's obstacles.
    MoveEntity {
        /// Entity to move.
        entity: EntityId,
        /// Requested displacement.
        delta: Vec2,
    },
    /// Turns a combatant to face the provided angle.
    SetFacing {
        /// Entity to rotate.
        entity: EntityId,
        /// Facing angle in degrees.
        angle_degrees: f32,
    },
    /// Records an enemy's current target and behaviour mode.
    UpdateEngagement {
        /// Enemy being updated.
        enemy: EntityId,
        /// Tracked combatant, if any.
        target: Option<EntityId>,
        /// Behaviour mode derived from the target distance.
        mode: EnemyMode,
    },
    /// Requests a melee strike. Ignored out of reach or during cooldown.
    MeleeAttack {
        /// Striking enemy.
        attacker: EntityId,
        /// Combatant being struck.
        target: EntityId,
    },
    /// Advances every projectile and resolves expiries and impacts.
    AdvanceProjectiles,
    /// Fires automatic trigger zones the player currently stands in.
    ResolveTriggers,
    /// Activates the first manual trigger zone the entity stands in.
    Interact {
        /// Entity performing the interaction.
        entity: EntityId,
    },
    /// Restores player health, clamped to the maximum.
    HealPlayer {
        /// Health to restore.
        amount: u32,
    },
    /// Raises the player's top speed.
    BoostPlayerSpeed {
        /// Speed added to the current maximum.
        amount: f32,
    },
    /// Adds projectiles to every player volley.
    AddPlayerBullets {
        /// Number of extra projectiles.
        count: u32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that simulated time advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed.
        dt: Duration,
        /// Simulation clock after the advance.
        now: Duration,
    },
    /// Announces that the player craft was placed.
    PlayerPlaced {
        /// Identifier assigned to the craft.
        player: EntityId,
        /// Center of the craft.
        position: Vec2,
    },
    /// Announces that a static body (obstacle or planet) was placed.
    ObstaclePlaced {
        /// Identifier assigned to the obstacle.
        obstacle: EntityId,
        /// Category of the placed body.
        category: EntityCategory,
    },
    /// Announces that a trigger zone was placed.
    TriggerPlaced {
        /// Identifier assigned to the zone.
        trigger: EntityId,
    },
    /// Reports that a placement carried invalid geometry and was dropped.
    PlacementRejected {
        /// Why the placement failed.
        reason: GeometryError,
    },
    /// Announces that an enemy entered the world.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EntityId,
        /// Spawn location.
        position: Vec2,
    },
    /// Reports that an enemy spawn fell outside the world bounds.
    SpawnRejected {
        /// Requested location.
        position: Vec2,
    },
    /// Announces that a projectile was created.
    ProjectileSpawned {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Owning faction.
        owner: ProjectileOwner,
        /// Spawn point.
        origin: Vec2,
    },
    /// Reports that a projectile exceeded its travel distance.
    ProjectileExpired {
        /// Expired projectile.
        projectile: ProjectileId,
    },
    /// Reports that a projectile struck an obstacle and was destroyed.
    ProjectileBlocked {
        /// Destroyed projectile.
        projectile: ProjectileId,
        /// Obstacle that stopped it.
        obstacle: EntityId,
    },
    /// Reports that a projectile struck a combatant and was destroyed.
    ProjectileHit {
        /// Destroyed projectile.
        projectile: ProjectileId,
        /// Combatant that was struck.
        target: EntityId,
    },
    /// Reports that a combatant lost health.
    EntityDamaged {
        /// Damaged combatant.
        entity: EntityId,
        /// Damage applied.
        amount: u32,
        /// Health left after the hit.
        remaining: Health,
    },
    /// Reports that a hit landed during the player's invulnerability window.
    DamageAbsorbed {
        /// Combatant that ignored the hit.
        entity: EntityId,
    },
    /// Announces that an enemy's health reached zero.
    EnemyKilled {
        /// Enemy that died.
        enemy: EntityId,
    },
    /// Announces that the player's health reached zero.
    PlayerDefeated {
        /// Defeated craft.
        player: EntityId,
    },
    /// Reports that an enemy changed target or behaviour mode.
    EngagementChanged {
        /// Enemy that changed.
        enemy: EntityId,
        /// New target, if any.
        target: Option<EntityId>,
        /// New behaviour mode.
        mode: EnemyMode,
    },
    /// Announces that a melee strike connected.
    MeleeStruck {
        /// Striking enemy.
        attacker: EntityId,
        /// Combatant that was struck.
        target: EntityId,
    },
    /// Announces that a trigger zone fired.
    TriggerActivated {
        /// Zone that fired.
        trigger: EntityId,
    },
    /// Reports that a dead entity was removed from the world partition.
    EntityEvicted {
        /// Removed entity.
        entity: EntityId,
    },
    /// Reports the player's health after a heal.
    PlayerHealed {
        /// Health after the heal.
        health: Health,
    },
    /// Reports the player's weapon and engine stats after an upgrade.
    PlayerUpgraded {
        /// Current top speed.
        max_speed: f32,
        /// Current projectiles per volley.
        bullets: u32,
    },
}

/// Unique identifier assigned to every world entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new identifier with the provided value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to each projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new identifier with the provided value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Coarse classification used by collaborators to pick sprites and rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityCategory {
    /// The player craft.
    Player,
    /// A hostile combatant.
    Enemy,
    /// A projectile.
    Bullet,
    /// An invisible or decorative blocking body.
    Obstacle,
    /// A trigger zone.
    Event,
    /// A circular planet body.
    Planet,
}

/// Faction that fired a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileOwner {
    /// Fired by the player; damages enemies.
    Player,
    /// Fired by an enemy; damages the player.
    Enemy,
    /// Environmental fire; only obstacles stop it.
    Neutral,
}

/// Behaviour mode of an enemy.
///
/// `Approaching`, `Engaging` and `Melee` all hold a target and are
/// collectively referred to as tracking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EnemyMode {
    /// No target within detection range.
    #[default]
    Idle,
    /// Target detected but out of shooting range; closing the distance.
    Approaching,
    /// Target within shooting range; holding position and firing.
    Engaging,
    /// Target within melee reach; striking and firing.
    Melee,
    /// Health reached zero; excluded from every pass.
    Dead,
}

impl EnemyMode {
    /// Reports whether the mode holds a target.
    #[must_use]
    pub const fn is_tracking(self) -> bool {
        matches!(self, Self::Approaching | Self::Engaging | Self::Melee)
    }
}

/// Named planets available to level layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanetKind {
    /// Earth.
    Earth,
    /// Jupiter.
    Jupiter,
    /// Mars.
    Mars,
    /// Mercury.
    Mercury,
    /// Neptune.
    Neptune,
    /// Saturn.
    Saturn,
    /// Uranus.
    Uranus,
    /// Venus.
    Venus,
    /// The sun.
    Sun,
}

impl PlanetKind {
    /// Maps a layout cell code (`0`..=`8`) onto a planet.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Earth),
            1 => Some(Self::Jupiter),
            2 => Some(Self::Mars),
            3 => Some(Self::Mercury),
            4 => Some(Self::Neptune),
            5 => Some(Self::Saturn),
            6 => Some(Self::Uranus),
            7 => Some(Self::Venus),
            8 => Some(Self::Sun),
            _ => None,
        }
    }

    /// Collision radius in world pixels.
    #[must_use]
    pub const fn radius(self) -> f32 {
        match self {
            Self::Earth => 96.0,
            Self::Jupiter => 192.0,
            Self::Mars => 80.0,
            Self::Mercury => 64.0,
            Self::Neptune => 144.0,
            Self::Saturn => 176.0,
            Self::Uranus => 136.0,
            Self::Venus => 92.0,
            Self::Sun => 160.0,
        }
    }

    /// Collision shape of the planet.
    #[must_use]
    pub const fn shape(self) -> HitboxShape {
        HitboxShape::circle_unchecked(self.radius())
    }
}

/// Hit points of a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Health(u32);

impl Health {
    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Numeric hit points.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether no hit points remain.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

/// Result of applying damage to [`Vitals`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The combatant was already dead.
    Ignored,
    /// Health dropped but remains above zero.
    Wounded,
    /// This hit took health to zero.
    Killed,
}

/// Current and maximum health of a combatant, clamped to `[0, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Vitals {
    current: Health,
    max: Health,
}

impl Vitals {
    /// Creates vitals at full health.
    #[must_use]
    pub const fn full(max: u32) -> Self {
        Self {
            current: Health::new(max),
            max: Health::new(max),
        }
    }

    /// Remaining health.
    #[must_use]
    pub const fn current(&self) -> Health {
        self.current
    }

    /// Health ceiling.
    #[must_use]
    pub const fn max(&self) -> Health {
        self.max
    }

    /// Reports whether health reached zero.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.current.is_zero()
    }

    /// Subtracts damage, saturating at zero.
    ///
    /// Only the hit that crosses zero reports [`DamageOutcome::Killed`]; later
    /// hits are [`DamageOutcome::Ignored`].
    pub fn apply_damage(&mut self, amount: u32) -> DamageOutcome {
        if self.is_depleted() {
            return DamageOutcome::Ignored;
        }
        self.current = Health::new(self.current.get().saturating_sub(amount));
        if self.is_depleted() {
            DamageOutcome::Killed
        } else {
            DamageOutcome::Wounded
        }
    }

    /// Restores health up to the maximum and returns the new value.
    pub fn heal(&mut self, amount: u32) -> Health {
        let healed = self.current.get().saturating_add(amount).min(self.max.get());
        self.current = Health::new(healed);
        self.current
    }
}

/// Playable area of the world, anchored at the origin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    width: f32,
    height: f32,
}

impl WorldBounds {
    /// Creates bounds covering `[0, width] x [0, height]`.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Horizontal extent.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Vertical extent.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Reports whether the point lies within the bounds, edges included.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }
}

impl Default for WorldBounds {
    fn default() -> Self {
        // 200 tiles of 64 pixels in each direction.
        Self::new(12_800.0, 12_800.0)
    }
}

/// Unit vector pointing along `degrees`.
#[must_use]
pub fn heading_vector(degrees: f32) -> Vec2 {
    let radians = degrees.to_radians();
    Vec2::new(radians.cos(), radians.sin())
}

/// Angle in degrees of the vector from `from` towards `to`.
#[must_use]
pub fn angle_towards(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    delta.y.atan2(delta.x).to_degrees()
}

/// Immutable representation of any active entity used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntitySnapshot {
    /// Unique identifier of the entity.
    pub id: EntityId,
    /// Coarse classification.
    pub category: EntityCategory,
    /// Float world position.
    pub position: Vec2,
    /// Facing angle in degrees.
    pub facing_degrees: f32,
    /// Placed collision shape.
    pub hitbox: Hitbox,
    /// Health, for combatants only.
    pub vitals: Option<Vitals>,
    /// Planet kind, for planets only.
    pub planet: Option<PlanetKind>,
}

/// Immutable representation of the player craft.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Identifier of the craft.
    pub id: EntityId,
    /// Float world position.
    pub position: Vec2,
    /// Facing angle in degrees.
    pub facing_degrees: f32,
    /// Current speed in pixels per tick.
    pub speed: f32,
    /// Current top speed.
    pub max_speed: f32,
    /// Projectiles per volley.
    pub bullets: u32,
    /// Health.
    pub vitals: Vitals,
    /// Clock value of the last volley.
    pub last_shot: Option<Duration>,
    /// Whether incoming damage is currently ignored.
    pub invulnerable: bool,
    /// Placed collision shape.
    pub hitbox: Hitbox,
}

impl PlayerSnapshot {
    /// Reports whether the craft can still act.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        !self.vitals.is_depleted()
    }
}

/// Immutable representation of a single enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Identifier of the enemy.
    pub id: EntityId,
    /// Float world position.
    pub position: Vec2,
    /// Facing angle in degrees.
    pub facing_degrees: f32,
    /// Health.
    pub vitals: Vitals,
    /// Tracked combatant.
    pub target: Option<EntityId>,
    /// Current behaviour mode.
    pub mode: EnemyMode,
    /// Clock value of the last shot.
    pub last_shot: Option<Duration>,
    /// Clock value of the last melee strike.
    pub last_attack: Option<Duration>,
}

/// Read-only snapshot describing the enemies of the active neighborhood.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of enemies that are still alive.
    #[must_use]
    pub fn living(&self) -> usize {
        self.snapshots
            .iter()
            .filter(|snapshot| snapshot.mode != EnemyMode::Dead)
            .count()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier of the projectile.
    pub id: ProjectileId,
    /// Owning faction.
    pub owner: ProjectileOwner,
    /// Current position.
    pub position: Vec2,
    /// Per-tick displacement.
    pub velocity: Vec2,
    /// Straight-line distance from the spawn point.
    pub traveled: f32,
}
