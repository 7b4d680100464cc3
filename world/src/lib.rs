#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the Aether combat simulation.
//!
//! The world owns every entity and projectile, the chunk partition that
//! decides which of them are simulated, and the simulation clock. It is only
//! mutated through [`apply`]; systems observe it through [`query`].

pub mod motion;
pub mod partition;
mod projectiles;

use std::{collections::BTreeMap, time::Duration};

use aether_core::{
    cooldown_elapsed, heading_vector, Command, DamageOutcome, EnemyMode, EnemyTuning, EntityCategory,
    EntityId, Event, Hitbox, HitboxShape, PlanetKind, PlayerTuning, ProjectileId, ProjectileOwner,
    Vitals, WorldBounds, WELCOME_BANNER,
};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{partition::ChunkGrid, projectiles::Projectile};

/// Default chunk edge length in world pixels.
pub const DEFAULT_CHUNK_SIZE: f32 = 1000.0;

/// Static parameters of a world instance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Playable area; enemy spawns outside it are rejected.
    pub bounds: WorldBounds,
    /// Chunk edge length used by the partition.
    pub chunk_size: f32,
    /// Moves players and enemies into their current chunk at each tick.
    ///
    /// When disabled, mobile entities stay in the chunk they were created in.
    pub rebucket_mobile_entities: bool,
    /// Player craft parameters.
    pub player: PlayerTuning,
    /// Enemy parameters.
    pub enemy: EnemyTuning,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            bounds: WorldBounds::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            rebucket_mobile_entities: false,
            player: PlayerTuning::default(),
            enemy: EnemyTuning::default(),
        }
    }
}

/// Represents the authoritative combat world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: WorldConfig,
    partition: ChunkGrid,
    entities: BTreeMap<EntityId, EntityRecord>,
    projectiles: BTreeMap<ProjectileId, Projectile>,
    player: Option<EntityId>,
    next_entity: u32,
    next_projectile: u32,
    clock: Duration,
    tick_index: u64,
    frame: TickFrame,
}

#[derive(Clone, Debug)]
struct EntityRecord {
    position: Vec2,
    shape: HitboxShape,
    hitbox: Hitbox,
    facing_degrees: f32,
    body: Body,
}

#[derive(Clone, Debug)]
enum Body {
    Player(Pilot),
    Enemy(Hostile),
    Obstacle,
    Planet(PlanetKind),
    Trigger(TriggerZone),
}

impl Body {
    fn category(&self) -> EntityCategory {
        match self {
            Self::Player(_) => EntityCategory::Player,
            Self::Enemy(_) => EntityCategory::Enemy,
            Self::Obstacle => EntityCategory::Obstacle,
            Self::Planet(_) => EntityCategory::Planet,
            Self::Trigger(_) => EntityCategory::Event,
        }
    }

    fn is_obstacle(&self) -> bool {
        matches!(self, Self::Obstacle | Self::Planet(_))
    }

    fn is_mobile(&self) -> bool {
        matches!(self, Self::Player(_) | Self::Enemy(_))
    }

    fn is_alive(&self) -> bool {
        match self {
            Self::Player(pilot) => !pilot.vitals.is_depleted(),
            Self::Enemy(hostile) => hostile.mode != EnemyMode::Dead,
            Self::Obstacle | Self::Planet(_) | Self::Trigger(_) => true,
        }
    }

    fn vitals(&self) -> Option<Vitals> {
        match self {
            Self::Player(pilot) => Some(pilot.vitals),
            Self::Enemy(hostile) => Some(hostile.vitals),
            Self::Obstacle | Self::Planet(_) | Self::Trigger(_) => None,
        }
    }
}

#[derive(Clone, Debug)]
struct Pilot {
    vitals: Vitals,
    speed: f32,
    max_speed: f32,
    bullets: u32,
    last_shot: Option<Duration>,
    last_damage: Option<Duration>,
}

#[derive(Clone, Debug)]
struct Hostile {
    vitals: Vitals,
    target: Option<EntityId>,
    mode: EnemyMode,
    last_shot: Option<Duration>,
    last_attack: Option<Duration>,
}

#[derive(Clone, Debug)]
struct TriggerZone {
    auto: bool,
    fired: bool,
}

/// Entities and obstacle hitboxes captured at the start of a tick.
#[derive(Clone, Debug, Default)]
struct TickFrame {
    active: Vec<EntityId>,
    obstacle_ids: Vec<EntityId>,
    obstacle_hitboxes: Vec<Hitbox>,
}

enum Impact {
    Combatant(EntityId),
    Obstacle(EntityId),
}

impl World {
    /// Creates an empty world.
    #[must_use]
    pub fn new(config: WorldConfig) -> Self {
        Self {
            banner: WELCOME_BANNER,
            partition: ChunkGrid::new(config.chunk_size),
            config,
            entities: BTreeMap::new(),
            projectiles: BTreeMap::new(),
            player: None,
            next_entity: 0,
            next_projectile: 0,
            clock: Duration::ZERO,
            tick_index: 0,
            frame: TickFrame::default(),
        }
    }

    fn insert_entity(&mut self, position: Vec2, shape: HitboxShape, body: Body) -> EntityId {
        let id = EntityId::new(self.next_entity);
        self.next_entity = self.next_entity.saturating_add(1);
        let _ = self.partition.insert(id, position, body.is_obstacle());
        let _ = self.entities.insert(
            id,
            EntityRecord {
                position,
                shape,
                hitbox: shape.at(position.round()),
                facing_degrees: 0.0,
                body,
            },
        );
        id
    }

    fn remove_entity(&mut self, entity: EntityId) {
        let _ = self.partition.evict(entity);
        let _ = self.entities.remove(&entity);
    }

    fn living_player(&self) -> Option<(EntityId, &EntityRecord)> {
        let id = self.player?;
        self.entities
            .get(&id)
            .filter(|record| record.body.is_alive())
            .map(|record| (id, record))
    }

    fn pilot_mut(&mut self) -> Option<&mut Pilot> {
        let id = self.player?;
        match self.entities.get_mut(&id).map(|record| &mut record.body) {
            Some(Body::Player(pilot)) if !pilot.vitals.is_depleted() => Some(pilot),
            _ => None,
        }
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        self.clock = self.clock.saturating_add(dt);
        out_events.push(Event::TimeAdvanced {
            dt,
            now: self.clock,
        });

        self.evict_dead(out_events);
        if self.config.rebucket_mobile_entities {
            self.rebucket_mobile();
        }
        self.capture_frame();
    }

    fn evict_dead(&mut self, out_events: &mut Vec<Event>) {
        let dead: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|(_, record)| matches!(&record.body, Body::Enemy(hostile) if hostile.mode == EnemyMode::Dead))
            .map(|(id, _)| *id)
            .collect();
        for entity in dead {
            self.remove_entity(entity);
            debug!(entity = entity.get(), "evicted dead enemy");
            out_events.push(Event::EntityEvicted { entity });
        }
    }

    fn rebucket_mobile(&mut self) {
        for (id, record) in &self.entities {
            if record.body.is_mobile() && record.body.is_alive() {
                let _ = self.partition.relocate(*id, record.position);
            }
        }
    }

    fn capture_frame(&mut self) {
        let Some(center) = self
            .player
            .and_then(|id| self.entities.get(&id))
            .map(|record| record.position)
        else {
            self.frame = TickFrame::default();
            return;
        };

        let neighborhood = self.partition.active_neighborhood(center);
        let mut active: Vec<EntityId> = neighborhood
            .entities
            .into_iter()
            .filter(|id| self.entities.get(id).is_some_and(|record| record.body.is_alive()))
            .collect();
        if let Some((player, _)) = self.living_player() {
            if !active.contains(&player) {
                active.push(player);
            }
        }
        active.sort_unstable();

        let mut frame = TickFrame {
            active,
            ..TickFrame::default()
        };
        for id in neighborhood.obstacles {
            if let Some(record) = self.entities.get(&id) {
                frame.obstacle_ids.push(id);
                frame.obstacle_hitboxes.push(record.hitbox);
            }
        }
        self.frame = frame;
    }

    fn place_player(&mut self, position: Vec2, out_events: &mut Vec<Event>) {
        if let Some(previous) = self.player.take() {
            self.remove_entity(previous);
        }
        let tuning = self.config.player;
        let player = self.insert_entity(
            position,
            tuning.hitbox,
            Body::Player(Pilot {
                vitals: Vitals::full(tuning.max_health),
                speed: 0.0,
                max_speed: tuning.max_speed,
                bullets: tuning.bullets,
                last_shot: None,
                last_damage: None,
            }),
        );
        self.player = Some(player);
        out_events.push(Event::PlayerPlaced { player, position });
    }

    fn place_static(&mut self, position: Vec2, shape: HitboxShape, body: Body, out_events: &mut Vec<Event>) {
        let category = body.category();
        let obstacle = self.insert_entity(position, shape, body);
        out_events.push(Event::ObstaclePlaced { obstacle, category });
    }

    fn place_trigger(&mut self, position: Vec2, radius: f32, auto: bool, out_events: &mut Vec<Event>) {
        match HitboxShape::circle(radius) {
            Ok(shape) => {
                let trigger = self.insert_entity(
                    position,
                    shape,
                    Body::Trigger(TriggerZone { auto, fired: false }),
                );
                out_events.push(Event::TriggerPlaced { trigger });
            }
            Err(reason) => {
                debug!(%reason, "trigger placement rejected");
                out_events.push(Event::PlacementRejected { reason });
            }
        }
    }

    fn spawn_enemy(&mut self, position: Vec2, shape: Option<HitboxShape>, out_events: &mut Vec<Event>) {
        if !self.config.bounds.contains(position) {
            debug!(x = position.x, y = position.y, "enemy spawn outside world bounds");
            out_events.push(Event::SpawnRejected { position });
            return;
        }
        let tuning = self.config.enemy;
        let enemy = self.insert_entity(
            position,
            shape.unwrap_or(tuning.hitbox),
            Body::Enemy(Hostile {
                vitals: Vitals::full(tuning.max_health),
                target: None,
                mode: EnemyMode::Idle,
                last_shot: None,
                last_attack: None,
            }),
        );
        debug!(enemy = enemy.get(), x = position.x, y = position.y, "enemy spawned");
        out_events.push(Event::EnemySpawned { enemy, position });
    }

    fn spawn_projectile(
        &mut self,
        origin: Vec2,
        angle_degrees: f32,
        owner: ProjectileOwner,
        out_events: &mut Vec<Event>,
    ) {
        let projectile = ProjectileId::new(self.next_projectile);
        self.next_projectile = self.next_projectile.saturating_add(1);
        let _ = self
            .projectiles
            .insert(projectile, Projectile::spawn(projectile, origin, angle_degrees, owner));
        out_events.push(Event::ProjectileSpawned {
            projectile,
            owner,
            origin,
        });
    }

    fn fire(&mut self, shooter: EntityId, angles_degrees: Vec<f32>, out_events: &mut Vec<Event>) {
        if angles_degrees.is_empty() {
            return;
        }
        let now = self.clock;
        let Some(record) = self.entities.get_mut(&shooter) else {
            debug!(shooter = shooter.get(), "fire from unknown entity");
            return;
        };
        let (owner, cooldown, muzzle, last_shot) = match &mut record.body {
            Body::Player(pilot) if !pilot.vitals.is_depleted() => (
                ProjectileOwner::Player,
                self.config.player.shoot_cooldown(),
                self.config.player.muzzle_offset,
                &mut pilot.last_shot,
            ),
            Body::Enemy(hostile) if hostile.mode != EnemyMode::Dead => (
                ProjectileOwner::Enemy,
                self.config.enemy.shoot_cooldown(),
                self.config.enemy.muzzle_offset,
                &mut hostile.last_shot,
            ),
            _ => {
                debug!(shooter = shooter.get(), "fire from entity that cannot shoot");
                return;
            }
        };
        if !cooldown_elapsed(*last_shot, cooldown, now) {
            return;
        }
        *last_shot = Some(now);
        let position = record.position;

        for angle in angles_degrees {
            let origin = position + heading_vector(angle) * muzzle;
            self.spawn_projectile(origin, angle, owner, out_events);
        }
    }

    fn steer_player(&mut self, heading_degrees: f32, speed: f32) {
        let Some(id) = self.player else {
            return;
        };
        if let Some(record) = self.entities.get_mut(&id) {
            if let Body::Player(pilot) = &mut record.body {
                if pilot.vitals.is_depleted() {
                    return;
                }
                pilot.speed = speed.max(0.0).min(pilot.max_speed.max(0.0));
                record.facing_degrees = heading_degrees;
            }
        }
    }

    fn move_entity(&mut self, entity: EntityId, delta: Vec2) {
        let Self {
            entities, frame, ..
        } = self;
        let Some(record) = entities.get_mut(&entity) else {
            debug!(entity = entity.get(), "move for unknown entity");
            return;
        };
        if !record.body.is_mobile() || !record.body.is_alive() {
            return;
        }
        let resolved = motion::resolve(record.position, &record.shape, delta, &frame.obstacle_hitboxes);
        record.position = resolved.position;
        record.hitbox = resolved.hitbox;
    }

    fn set_facing(&mut self, entity: EntityId, angle_degrees: f32) {
        if let Some(record) = self.entities.get_mut(&entity) {
            if record.body.is_mobile() && record.body.is_alive() {
                record.facing_degrees = angle_degrees;
            }
        }
    }

    fn update_engagement(
        &mut self,
        enemy: EntityId,
        target: Option<EntityId>,
        mode: EnemyMode,
        out_events: &mut Vec<Event>,
    ) {
        if mode == EnemyMode::Dead {
            return;
        }
        let Some(Body::Enemy(hostile)) = self.entities.get_mut(&enemy).map(|record| &mut record.body) else {
            return;
        };
        if hostile.mode == EnemyMode::Dead || (hostile.target == target && hostile.mode == mode) {
            return;
        }
        hostile.target = target;
        hostile.mode = mode;
        out_events.push(Event::EngagementChanged {
            enemy,
            target,
            mode,
        });
    }

    fn melee_attack(&mut self, attacker: EntityId, target: EntityId, out_events: &mut Vec<Event>) {
        let now = self.clock;
        let tuning = self.config.enemy;
        let Some((origin, last_attack)) = self.entities.get(&attacker).and_then(|record| match &record.body {
            Body::Enemy(hostile) if hostile.mode != EnemyMode::Dead => {
                Some((record.position, hostile.last_attack))
            }
            _ => None,
        }) else {
            return;
        };
        let Some(victim) = self
            .entities
            .get(&target)
            .filter(|record| matches!(record.body, Body::Player(_)) && record.body.is_alive())
            .map(|record| record.position)
        else {
            return;
        };
        if origin.distance_squared(victim) > tuning.attack_range * tuning.attack_range {
            debug!(attacker = attacker.get(), "melee target out of reach");
            return;
        }
        if !cooldown_elapsed(last_attack, tuning.attack_cooldown(), now) {
            return;
        }
        if let Some(Body::Enemy(hostile)) = self.entities.get_mut(&attacker).map(|record| &mut record.body) {
            hostile.last_attack = Some(now);
        }
        out_events.push(Event::MeleeStruck { attacker, target });
        self.damage(target, tuning.melee_damage, out_events);
    }

    fn damage(&mut self, target: EntityId, amount: u32, out_events: &mut Vec<Event>) {
        let now = self.clock;
        let invulnerability = self.config.player.invulnerability();
        let Some(record) = self.entities.get_mut(&target) else {
            return;
        };
        match &mut record.body {
            Body::Player(pilot) => {
                if pilot.vitals.is_depleted() {
                    return;
                }
                if !cooldown_elapsed(pilot.last_damage, invulnerability, now) {
                    out_events.push(Event::DamageAbsorbed { entity: target });
                    return;
                }
                pilot.last_damage = Some(now);
                let outcome = pilot.vitals.apply_damage(amount);
                out_events.push(Event::EntityDamaged {
                    entity: target,
                    amount,
                    remaining: pilot.vitals.current(),
                });
                if outcome == DamageOutcome::Killed {
                    info!(player = target.get(), "player defeated");
                    out_events.push(Event::PlayerDefeated { player: target });
                }
            }
            Body::Enemy(hostile) => {
                let outcome = hostile.vitals.apply_damage(amount);
                if outcome == DamageOutcome::Ignored {
                    return;
                }
                out_events.push(Event::EntityDamaged {
                    entity: target,
                    amount,
                    remaining: hostile.vitals.current(),
                });
                if outcome == DamageOutcome::Killed {
                    hostile.mode = EnemyMode::Dead;
                    hostile.target = None;
                    info!(enemy = target.get(), "enemy killed");
                    out_events.push(Event::EnemyKilled { enemy: target });
                }
            }
            Body::Obstacle | Body::Planet(_) | Body::Trigger(_) => {}
        }
    }

    /// Resolves impacts at the position left by the previous pass, then moves
    /// every surviving projectile and expires the spent ones.
    fn advance_projectiles(&mut self, out_events: &mut Vec<Event>) {
        let ids: Vec<ProjectileId> = self.projectiles.keys().copied().collect();
        for id in ids {
            let Some(projectile) = self.projectiles.get(&id).copied() else {
                continue;
            };

            match self.find_impact(&projectile) {
                Some(Impact::Combatant(target)) => {
                    let _ = self.projectiles.remove(&id);
                    out_events.push(Event::ProjectileHit {
                        projectile: projectile.id(),
                        target,
                    });
                    self.damage(target, projectile.damage(), out_events);
                    continue;
                }
                Some(Impact::Obstacle(obstacle)) => {
                    let _ = self.projectiles.remove(&id);
                    out_events.push(Event::ProjectileBlocked {
                        projectile: projectile.id(),
                        obstacle,
                    });
                    continue;
                }
                None => {}
            }

            let Some(projectile) = self.projectiles.get_mut(&id) else {
                continue;
            };
            projectile.advance();
            if projectile.is_spent() {
                let projectile = projectile.id();
                let _ = self.projectiles.remove(&id);
                out_events.push(Event::ProjectileExpired { projectile });
            }
        }
    }

    fn find_impact(&self, projectile: &Projectile) -> Option<Impact> {
        let hitbox = projectile.hitbox();
        let victim = match projectile.owner() {
            ProjectileOwner::Player => self.frame.active.iter().copied().find(|id| {
                self.entities.get(id).is_some_and(|record| {
                    matches!(&record.body, Body::Enemy(hostile) if hostile.mode != EnemyMode::Dead)
                        && record.hitbox.overlaps(&hitbox)
                })
            }),
            ProjectileOwner::Enemy => self
                .living_player()
                .filter(|(_, record)| record.hitbox.overlaps(&hitbox))
                .map(|(id, _)| id),
            ProjectileOwner::Neutral => None,
        };
        if let Some(target) = victim {
            return Some(Impact::Combatant(target));
        }

        self.frame
            .obstacle_ids
            .iter()
            .zip(&self.frame.obstacle_hitboxes)
            .find(|(_, obstacle)| obstacle.overlaps(&hitbox))
            .map(|(id, _)| Impact::Obstacle(*id))
    }

    fn resolve_triggers(&mut self, out_events: &mut Vec<Event>) {
        let Some(position) = self.living_player().map(|(_, record)| record.position) else {
            return;
        };
        let Self {
            entities, frame, ..
        } = self;
        for id in &frame.active {
            let Some(record) = entities.get_mut(id) else {
                continue;
            };
            if let Body::Trigger(zone) = &mut record.body {
                if zone.auto && !zone.fired && record.hitbox.contains_point(position) {
                    zone.fired = true;
                    info!(trigger = id.get(), "trigger zone activated");
                    out_events.push(Event::TriggerActivated { trigger: *id });
                }
            }
        }
    }

    fn interact(&mut self, entity: EntityId, out_events: &mut Vec<Event>) {
        let Some(position) = self
            .living_player()
            .filter(|(id, _)| *id == entity)
            .map(|(_, record)| record.position)
        else {
            return;
        };
        let Self {
            entities, frame, ..
        } = self;
        for id in &frame.active {
            let Some(record) = entities.get_mut(id) else {
                continue;
            };
            if let Body::Trigger(zone) = &mut record.body {
                if !zone.auto && !zone.fired && record.hitbox.contains_point(position) {
                    zone.fired = true;
                    info!(trigger = id.get(), "trigger zone activated by interaction");
                    out_events.push(Event::TriggerActivated { trigger: *id });
                    return;
                }
            }
        }
    }

    fn heal_player(&mut self, amount: u32, out_events: &mut Vec<Event>) {
        if let Some(pilot) = self.pilot_mut() {
            let health = pilot.vitals.heal(amount);
            out_events.push(Event::PlayerHealed { health });
        }
    }

    fn upgrade_player(&mut self, extra_speed: f32, extra_bullets: u32, out_events: &mut Vec<Event>) {
        if !extra_speed.is_finite() {
            debug!(extra_speed, "non-finite speed boost ignored");
            return;
        }
        if let Some(pilot) = self.pilot_mut() {
            pilot.max_speed = (pilot.max_speed + extra_speed).max(0.0);
            pilot.speed = pilot.speed.min(pilot.max_speed);
            pilot.bullets = pilot.bullets.saturating_add(extra_bullets);
            out_events.push(Event::PlayerUpgraded {
                max_speed: pilot.max_speed,
                bullets: pilot.bullets,
            });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::PlacePlayer { position } => world.place_player(position, out_events),
        Command::PlaceObstacle { position, shape } => {
            world.place_static(position, shape, Body::Obstacle, out_events);
        }
        Command::PlacePlanet { kind, position } => {
            world.place_static(position, kind.shape(), Body::Planet(kind), out_events);
        }
        Command::PlaceTrigger {
            position,
            radius,
            auto,
        } => world.place_trigger(position, radius, auto, out_events),
        Command::SpawnEnemy { position, shape } => world.spawn_enemy(position, shape, out_events),
        Command::SpawnProjectile {
            origin,
            angle_degrees,
            owner,
        } => world.spawn_projectile(origin, angle_degrees, owner, out_events),
        Command::Fire {
            shooter,
            angles_degrees,
        } => world.fire(shooter, angles_degrees, out_events),
        Command::SteerPlayer {
            heading_degrees,
            speed,
        } => world.steer_player(heading_degrees, speed),
        Command::MoveEntity { entity, delta } => world.move_entity(entity, delta),
        Command::SetFacing {
            entity,
            angle_degrees,
        } => world.set_facing(entity, angle_degrees),
        Command::UpdateEngagement {
            enemy,
            target,
            mode,
        } => world.update_engagement(enemy, target, mode, out_events),
        Command::MeleeAttack { attacker, target } => world.melee_attack(attacker, target, out_events),
        Command::AdvanceProjectiles => world.advance_projectiles(out_events),
        Command::ResolveTriggers => world.resolve_triggers(out_events),
        Command::Interact { entity } => world.interact(entity, out_events),
        Command::HealPlayer { amount } => world.heal_player(amount, out_events),
        Command::BoostPlayerSpeed { amount } => world.upgrade_player(amount, 0, out_events),
        Command::AddPlayerBullets { count } => world.upgrade_player(0.0, count, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use aether_core::{
        cooldown_elapsed, EnemySnapshot, EnemyView, EntityId, EntitySnapshot, Hitbox,
        PlayerSnapshot, ProjectileSnapshot, WorldBounds,
    };

    use super::{Body, EntityRecord, World, WorldConfig};
    use crate::partition::ChunkGrid;

    /// Retrieves the welcome banner that adapters may display.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Simulation clock.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Configuration the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &WorldConfig {
        &world.config
    }

    /// Playable area.
    #[must_use]
    pub fn bounds(world: &World) -> WorldBounds {
        world.config.bounds
    }

    /// Provides read-only access to the chunk partition.
    #[must_use]
    pub fn partition(world: &World) -> &ChunkGrid {
        &world.partition
    }

    /// Captures the player craft, dead or alive.
    #[must_use]
    pub fn player(world: &World) -> Option<PlayerSnapshot> {
        let id = world.player?;
        let record = world.entities.get(&id)?;
        let Body::Player(pilot) = &record.body else {
            return None;
        };
        Some(PlayerSnapshot {
            id,
            position: record.position,
            facing_degrees: record.facing_degrees,
            speed: pilot.speed,
            max_speed: pilot.max_speed,
            bullets: pilot.bullets,
            vitals: pilot.vitals,
            last_shot: pilot.last_shot,
            invulnerable: !cooldown_elapsed(
                pilot.last_damage,
                world.config.player.invulnerability(),
                world.clock,
            ),
            hitbox: record.hitbox,
        })
    }

    /// Captures the enemies of the tick's active neighborhood.
    ///
    /// Enemies killed during the current tick remain in the view with
    /// [`aether_core::EnemyMode::Dead`] until the next tick evicts them.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        let snapshots = world
            .frame
            .active
            .iter()
            .filter_map(|id| {
                let record = world.entities.get(id)?;
                let Body::Enemy(hostile) = &record.body else {
                    return None;
                };
                Some(EnemySnapshot {
                    id: *id,
                    position: record.position,
                    facing_degrees: record.facing_degrees,
                    vitals: hostile.vitals,
                    target: hostile.target,
                    mode: hostile.mode,
                    last_shot: hostile.last_shot,
                    last_attack: hostile.last_attack,
                })
            })
            .collect();
        EnemyView::from_snapshots(snapshots)
    }

    /// Captures a single entity regardless of whether it is active.
    #[must_use]
    pub fn entity(world: &World, id: EntityId) -> Option<EntitySnapshot> {
        world.entities.get(&id).map(|record| snapshot(id, record))
    }

    /// Captures every entity of the tick's active neighborhood in id order.
    #[must_use]
    pub fn active_entities(world: &World) -> Vec<EntitySnapshot> {
        world
            .frame
            .active
            .iter()
            .filter_map(|id| entity(world, *id))
            .collect()
    }

    /// Obstacle hitboxes captured at the start of the current tick.
    #[must_use]
    pub fn active_obstacles(world: &World) -> &[Hitbox] {
        &world.frame.obstacle_hitboxes
    }

    /// Captures every projectile in flight in id order.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .projectiles
            .values()
            .map(|projectile| projectile.snapshot())
            .collect()
    }

    /// Number of entities stored in the world, active or not.
    #[must_use]
    pub fn entity_count(world: &World) -> usize {
        world.entities.len()
    }

    fn snapshot(id: EntityId, record: &EntityRecord) -> EntitySnapshot {
        EntitySnapshot {
            id,
            category: record.body.category(),
            position: record.position,
            facing_degrees: record.facing_degrees,
            hitbox: record.hitbox,
            vitals: record.body.vitals(),
            planet: match record.body {
                Body::Planet(kind) => Some(kind),
                _ => None,
            },
        }
    }
}
