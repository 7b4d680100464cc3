use std::time::Duration;

use aether_core::{Command, EnemyMode, EntityId, Event, Health, HitboxShape, ProjectileOwner};
use aether_world::{apply, partition::ChunkCoord, query, World, WorldConfig};
use glam::Vec2;

const FRAME: Duration = Duration::from_millis(16);

fn run(world: &mut World, commands: Vec<Command>) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        apply(world, command, &mut events);
    }
    events
}

fn place_player(world: &mut World, position: Vec2) -> EntityId {
    let events = run(world, vec![Command::PlacePlayer { position }]);
    match events.as_slice() {
        [Event::PlayerPlaced { player, .. }] => *player,
        other => panic!("unexpected events {other:?}"),
    }
}

fn spawn_enemy(world: &mut World, position: Vec2, shape: Option<HitboxShape>) -> EntityId {
    let events = run(world, vec![Command::SpawnEnemy { position, shape }]);
    match events.as_slice() {
        [Event::EnemySpawned { enemy, .. }] => *enemy,
        other => panic!("unexpected events {other:?}"),
    }
}

fn projectile(origin: Vec2, owner: ProjectileOwner) -> Command {
    Command::SpawnProjectile {
        origin,
        angle_degrees: 0.0,
        owner,
    }
}

fn hits(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, Event::ProjectileHit { .. }))
        .count()
}

#[test]
fn player_shot_hits_enemy_on_third_step() {
    let mut world = World::default();
    let _ = place_player(&mut world, Vec2::new(100.0, 400.0));
    let enemy = spawn_enemy(
        &mut world,
        Vec2::new(130.0, 100.0),
        Some(HitboxShape::circle(10.0).expect("valid")),
    );
    let _ = run(
        &mut world,
        vec![projectile(Vec2::new(100.0, 100.0), ProjectileOwner::Player)],
    );

    for expected_x in [112.0, 124.0] {
        let events = run(
            &mut world,
            vec![Command::Tick { dt: FRAME }, Command::AdvanceProjectiles],
        );
        assert_eq!(hits(&events), 0);
        assert_eq!(
            query::projectiles(&world)[0].position,
            Vec2::new(expected_x, 100.0)
        );
    }

    let third = run(
        &mut world,
        vec![Command::Tick { dt: FRAME }, Command::AdvanceProjectiles],
    );
    assert_eq!(hits(&third), 1);
    assert!(third.contains(&Event::EntityDamaged {
        entity: enemy,
        amount: 10,
        remaining: Health::new(40),
    }));
    assert!(query::projectiles(&world).is_empty());
}

#[test]
fn queued_lethal_hits_kill_exactly_once() {
    let mut world = World::default();
    let _ = place_player(&mut world, Vec2::new(300.0, 400.0));
    let enemy = spawn_enemy(&mut world, Vec2::new(300.0, 100.0), None);
    let volley = (0..6)
        .map(|_| projectile(Vec2::new(280.0, 100.0), ProjectileOwner::Player))
        .collect();
    let _ = run(&mut world, volley);

    let events = run(
        &mut world,
        vec![Command::Tick { dt: FRAME }, Command::AdvanceProjectiles],
    );

    let kills = events
        .iter()
        .filter(|event| matches!(event, Event::EnemyKilled { .. }))
        .count();
    assert_eq!(kills, 1);
    assert_eq!(hits(&events), 5);
    assert_eq!(query::projectiles(&world).len(), 1);
    assert_eq!(query::enemy_view(&world).living(), 0);

    let next = run(&mut world, vec![Command::Tick { dt: FRAME }]);
    assert!(next.contains(&Event::EntityEvicted { entity: enemy }));
    assert!(query::entity(&world, enemy).is_none());
    assert_eq!(query::partition(&world).home_of(enemy), None);
}

#[test]
fn invulnerability_absorbs_hits_but_destroys_projectiles() {
    let mut world = World::default();
    let player = place_player(&mut world, Vec2::new(500.0, 500.0));
    let _ = run(&mut world, vec![Command::Tick { dt: FRAME }]);

    let events = run(
        &mut world,
        vec![
            projectile(Vec2::new(474.0, 500.0), ProjectileOwner::Enemy),
            projectile(Vec2::new(474.0, 500.0), ProjectileOwner::Enemy),
            Command::AdvanceProjectiles,
        ],
    );
    assert_eq!(hits(&events), 2);
    assert!(events.contains(&Event::EntityDamaged {
        entity: player,
        amount: 15,
        remaining: Health::new(85),
    }));
    assert!(events.contains(&Event::DamageAbsorbed { entity: player }));
    assert!(query::projectiles(&world).is_empty());
    assert!(query::player(&world).expect("player").invulnerable);

    let later = run(
        &mut world,
        vec![
            Command::Tick {
                dt: Duration::from_millis(1000),
            },
            projectile(Vec2::new(474.0, 500.0), ProjectileOwner::Enemy),
            Command::AdvanceProjectiles,
        ],
    );
    assert!(later.contains(&Event::EntityDamaged {
        entity: player,
        amount: 15,
        remaining: Health::new(70),
    }));
}

#[test]
fn obstacles_stop_every_projectile() {
    let mut world = World::default();
    let _ = place_player(&mut world, Vec2::new(500.0, 500.0));
    let obstacle_events = run(
        &mut world,
        vec![Command::PlaceObstacle {
            position: Vec2::new(600.0, 300.0),
            shape: HitboxShape::rect(64.0, 64.0).expect("valid"),
        }],
    );
    let Some(Event::ObstaclePlaced { obstacle, .. }) = obstacle_events.first() else {
        panic!("obstacle not placed: {obstacle_events:?}");
    };
    let obstacle = *obstacle;

    let events = run(
        &mut world,
        vec![
            Command::Tick { dt: FRAME },
            projectile(Vec2::new(566.0, 300.0), ProjectileOwner::Neutral),
            Command::AdvanceProjectiles,
        ],
    );

    assert!(events.iter().any(|event| matches!(
        event,
        Event::ProjectileBlocked { obstacle: blocker, .. } if *blocker == obstacle
    )));
    assert!(query::projectiles(&world).is_empty());
}

#[test]
fn neutral_projectiles_pass_through_combatants() {
    let mut world = World::default();
    let _ = place_player(&mut world, Vec2::new(300.0, 400.0));
    let enemy = spawn_enemy(&mut world, Vec2::new(305.0, 100.0), None);

    let events = run(
        &mut world,
        vec![
            Command::Tick { dt: FRAME },
            projectile(Vec2::new(300.0, 100.0), ProjectileOwner::Neutral),
            Command::AdvanceProjectiles,
        ],
    );

    assert_eq!(hits(&events), 0);
    let snapshot = query::entity(&world, enemy).expect("enemy alive");
    assert_eq!(snapshot.vitals.map(|vitals| vitals.current()), Some(Health::new(50)));
    assert_eq!(query::projectiles(&world).len(), 1);
}

#[test]
fn projectiles_expire_past_their_range() {
    let mut world = World::default();
    let _ = run(
        &mut world,
        vec![projectile(Vec2::new(100.0, 100.0), ProjectileOwner::Player)],
    );

    let mut expired = 0;
    for step in 1..=51 {
        let events = run(&mut world, vec![Command::AdvanceProjectiles]);
        let now_expired = events
            .iter()
            .filter(|event| matches!(event, Event::ProjectileExpired { .. }))
            .count();
        if step < 51 {
            assert_eq!(now_expired, 0, "expired early at step {step}");
        }
        expired += now_expired;
    }
    assert_eq!(expired, 1);
}

#[test]
fn melee_strikes_respect_reach_and_cooldown() {
    let mut world = World::default();
    let player = place_player(&mut world, Vec2::new(500.0, 500.0));
    let near = spawn_enemy(&mut world, Vec2::new(530.0, 500.0), None);
    let far = spawn_enemy(&mut world, Vec2::new(600.0, 500.0), None);
    let _ = run(&mut world, vec![Command::Tick { dt: FRAME }]);

    let first = run(
        &mut world,
        vec![
            Command::MeleeAttack {
                attacker: far,
                target: player,
            },
            Command::MeleeAttack {
                attacker: near,
                target: player,
            },
        ],
    );
    assert_eq!(
        first,
        vec![
            Event::MeleeStruck {
                attacker: near,
                target: player,
            },
            Event::EntityDamaged {
                entity: player,
                amount: 20,
                remaining: Health::new(80),
            },
        ]
    );

    let cooling = run(
        &mut world,
        vec![
            Command::Tick { dt: FRAME },
            Command::MeleeAttack {
                attacker: near,
                target: player,
            },
        ],
    );
    assert_eq!(cooling.len(), 1);

    let _ = run(
        &mut world,
        vec![Command::Tick {
            dt: Duration::from_millis(1500),
        }],
    );
    let again = run(
        &mut world,
        vec![Command::MeleeAttack {
            attacker: near,
            target: player,
        }],
    );
    assert!(again.contains(&Event::EntityDamaged {
        entity: player,
        amount: 20,
        remaining: Health::new(60),
    }));
}

#[test]
fn player_defeat_is_reported_once() {
    let mut config = WorldConfig::default();
    config.player.max_health = 10;
    config.player.invulnerability_ms = 0;
    let mut world = World::new(config);
    let player = place_player(&mut world, Vec2::new(500.0, 500.0));
    let _ = run(&mut world, vec![Command::Tick { dt: FRAME }]);

    let events = run(
        &mut world,
        vec![
            projectile(Vec2::new(474.0, 500.0), ProjectileOwner::Enemy),
            projectile(Vec2::new(474.0, 500.0), ProjectileOwner::Enemy),
            Command::AdvanceProjectiles,
        ],
    );

    let defeats = events
        .iter()
        .filter(|event| matches!(event, Event::PlayerDefeated { player: id } if *id == player))
        .count();
    assert_eq!(defeats, 1);
    assert!(!query::player(&world).expect("player").is_alive());
}

#[test]
fn engagement_updates_are_reported_on_change_only() {
    let mut world = World::default();
    let player = place_player(&mut world, Vec2::new(500.0, 500.0));
    let enemy = spawn_enemy(&mut world, Vec2::new(900.0, 500.0), None);
    let update = Command::UpdateEngagement {
        enemy,
        target: Some(player),
        mode: EnemyMode::Approaching,
    };

    let events = run(&mut world, vec![update.clone(), update]);

    assert_eq!(
        events,
        vec![Event::EngagementChanged {
            enemy,
            target: Some(player),
            mode: EnemyMode::Approaching,
        }]
    );
}

#[test]
fn auto_and_manual_triggers_fire_once() {
    let mut world = World::default();
    let player = place_player(&mut world, Vec2::new(500.0, 520.0));
    let placed = run(
        &mut world,
        vec![
            Command::PlaceTrigger {
                position: Vec2::new(500.0, 500.0),
                radius: 50.0,
                auto: true,
            },
            Command::PlaceTrigger {
                position: Vec2::new(510.0, 520.0),
                radius: 50.0,
                auto: false,
            },
        ],
    );
    let triggers: Vec<EntityId> = placed
        .iter()
        .filter_map(|event| match event {
            Event::TriggerPlaced { trigger } => Some(*trigger),
            _ => None,
        })
        .collect();
    let _ = run(&mut world, vec![Command::Tick { dt: FRAME }]);

    let auto = run(&mut world, vec![Command::ResolveTriggers, Command::ResolveTriggers]);
    assert_eq!(auto, vec![Event::TriggerActivated { trigger: triggers[0] }]);

    let manual = run(
        &mut world,
        vec![
            Command::Interact { entity: player },
            Command::Interact { entity: player },
        ],
    );
    assert_eq!(manual, vec![Event::TriggerActivated { trigger: triggers[1] }]);
}

#[test]
fn rebucketing_follows_configuration() {
    for (rebucket, expected) in [(false, ChunkCoord::new(1, 0)), (true, ChunkCoord::new(2, 0))] {
        let config = WorldConfig {
            rebucket_mobile_entities: rebucket,
            ..WorldConfig::default()
        };
        let mut world = World::new(config);
        let _ = place_player(&mut world, Vec2::new(1500.0, 500.0));
        let enemy = spawn_enemy(&mut world, Vec2::new(1900.0, 500.0), None);
        let _ = run(
            &mut world,
            vec![
                Command::Tick { dt: FRAME },
                Command::MoveEntity {
                    entity: enemy,
                    delta: Vec2::new(200.0, 0.0),
                },
                Command::Tick { dt: FRAME },
            ],
        );

        assert_eq!(query::partition(&world).home_of(enemy), Some(expected));
    }
}

#[test]
fn movement_is_blocked_by_active_obstacles() {
    let mut world = World::default();
    let player = place_player(&mut world, Vec2::new(500.0, 500.0));
    let _ = run(
        &mut world,
        vec![
            Command::PlaceObstacle {
                position: Vec2::new(582.0, 500.0),
                shape: HitboxShape::rect(64.0, 64.0).expect("valid"),
            },
            Command::Tick { dt: FRAME },
            Command::MoveEntity {
                entity: player,
                delta: Vec2::new(30.0, 0.0),
            },
        ],
    );

    let snapshot = query::player(&world).expect("player");
    assert_eq!(snapshot.hitbox.right(), 550.0);
    assert_eq!(snapshot.position, Vec2::new(526.0, 500.0));
}
