use std::time::Duration;

use aether_core::{Command, Event, SimMode};
use aether_system_piloting::{Config, PilotIntent, Piloting};
use aether_world::{self as world, query, World};
use glam::Vec2;

fn setup() -> World {
    let mut world = World::default();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::PlacePlayer {
            position: Vec2::new(2000.0, 2000.0),
        },
        &mut events,
    );
    world
}

fn step(world: &mut World, piloting: &mut Piloting, intent: &PilotIntent, dt: Duration) -> (Vec<Command>, Vec<Event>) {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt }, &mut events);
    let player = query::player(world);
    let tuning = query::config(world).player;
    let mut commands = Vec::new();
    piloting.handle(&events, SimMode::Play, intent, player.as_ref(), &tuning, &mut commands);
    for command in commands.clone() {
        world::apply(world, command, &mut events);
    }
    (commands, events)
}

fn volleys(commands: &[Command]) -> Vec<Vec<f32>> {
    commands
        .iter()
        .filter_map(|command| match command {
            Command::Fire { angles_degrees, .. } => Some(angles_degrees.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn thrust_moves_craft_along_heading() {
    let mut world = setup();
    let mut piloting = Piloting::new(Config::default());
    let intent = PilotIntent {
        thrust: true,
        ..PilotIntent::default()
    };

    for _ in 0..10 {
        let _ = step(&mut world, &mut piloting, &intent, Duration::from_millis(16));
    }

    let player = query::player(&world).expect("player");
    assert!((player.speed - 2.0).abs() < 1e-4);
    assert!(player.position.x > 2010.0);
    assert!((player.position.y - 2000.0).abs() < 1e-3);
}

#[test]
fn aimed_volley_spreads_within_bounds() {
    let mut world = setup();
    let mut piloting = Piloting::new(Config::new(42));
    let mut events = Vec::new();
    world::apply(&mut world, Command::AddPlayerBullets { count: 2 }, &mut events);
    let intent = PilotIntent {
        fire: true,
        aim: Some(Vec2::new(2000.0, 2500.0)),
        ..PilotIntent::default()
    };

    let (commands, events) = step(&mut world, &mut piloting, &intent, Duration::from_millis(16));

    let fired = volleys(&commands);
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].len(), 3);
    for angle in &fired[0] {
        assert!((75.0..=105.0).contains(angle), "angle {angle} outside cumulative spread");
    }
    let spawned = events
        .iter()
        .filter(|event| matches!(event, Event::ProjectileSpawned { .. }))
        .count();
    assert_eq!(spawned, 3);
}

#[test]
fn volleys_wait_for_shoot_cooldown() {
    let mut world = setup();
    let mut piloting = Piloting::new(Config::default());
    let intent = PilotIntent {
        fire: true,
        ..PilotIntent::default()
    };
    let mut fired_at = Vec::new();

    for _ in 0..30 {
        let (commands, _) = step(&mut world, &mut piloting, &intent, Duration::from_millis(20));
        if !volleys(&commands).is_empty() {
            fired_at.push(query::clock(&world));
        }
    }

    assert_eq!(
        fired_at,
        vec![
            Duration::from_millis(20),
            Duration::from_millis(220),
            Duration::from_millis(420),
        ]
    );
}

#[test]
fn interaction_and_paused_modes() {
    let mut world = setup();
    let mut piloting = Piloting::new(Config::default());
    let intent = PilotIntent {
        interact: true,
        ..PilotIntent::default()
    };

    let (commands, _) = step(&mut world, &mut piloting, &intent, Duration::from_millis(16));
    assert!(commands.contains(&Command::Interact {
        entity: query::player(&world).expect("player").id,
    }));

    let mut paused = Vec::new();
    piloting.handle(
        &[Event::TimeAdvanced {
            dt: Duration::from_millis(16),
            now: Duration::from_millis(32),
        }],
        SimMode::Quiz,
        &intent,
        query::player(&world).as_ref(),
        &query::config(&world).player,
        &mut paused,
    );
    assert!(paused.is_empty());
}

#[test]
fn identical_seeds_fire_identical_volleys() {
    let intent = PilotIntent {
        fire: true,
        turn_right: true,
        ..PilotIntent::default()
    };
    let run = || {
        let mut world = setup();
        let mut piloting = Piloting::new(Config::new(7));
        let mut events = Vec::new();
        world::apply(&mut world, Command::AddPlayerBullets { count: 4 }, &mut events);
        (0..40)
            .flat_map(|_| volleys(&step(&mut world, &mut piloting, &intent, Duration::from_millis(50)).0))
            .collect::<Vec<_>>()
    };

    assert_eq!(run(), run());
}
