#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the Aether simulation headless.
//!
//! The craft is flown by a scripted pilot that sweeps in slow arcs and
//! fires at the closest active enemy. A summary of the run is printed when
//! the requested number of ticks has elapsed or the player is defeated.

use std::{
    fs,
    path::{Path, PathBuf},
};

use aether_core::{EnemyMode, EntityId, Health, SimMode};
use aether_engine::{CombatObserver, Simulation, SimulationConfig, SimulationContext};
use aether_system_bootstrap::{Bootstrap, TileLayout};
use aether_system_piloting::PilotIntent;
use aether_world::{query, World};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use glam::Vec2;
use tracing::{info, warn};

const DEMO_FLOORBLOCKS: &str = include_str!("../levels/demo/floorblocks.csv");
const DEMO_PLANETS: &str = include_str!("../levels/demo/planets.csv");
const DEMO_ENTITIES: &str = include_str!("../levels/demo/entities.csv");

/// Log output formats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    /// Compact human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Command-line arguments accepted by the simulation runner.
#[derive(Debug, Parser)]
#[command(name = "aether", about = "Runs the Aether combat simulation headless.")]
struct CliArgs {
    /// TOML file overriding the default simulation configuration.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Directory holding floorblocks.csv, planets.csv and entities.csv.
    #[arg(long, value_name = "DIR")]
    level: Option<PathBuf>,
    /// Number of simulation steps to run.
    #[arg(long, default_value_t = 3600)]
    ticks: u32,
    /// Seed for the spawner and volley generators.
    #[arg(long)]
    seed: Option<u64>,
    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

/// Running totals gathered from combat notifications.
#[derive(Debug, Default)]
struct Tally {
    kills: u32,
    hits_taken: u32,
    damage_taken: u32,
    triggers: u32,
    defeated: bool,
}

impl CombatObserver for Tally {
    fn enemy_killed(&mut self, _enemy: EntityId) {
        self.kills += 1;
    }

    fn player_damaged(&mut self, amount: u32, remaining: Health) {
        self.hits_taken += 1;
        self.damage_taken += amount;
        info!(amount, remaining = remaining.get(), "player hit");
    }

    fn player_defeated(&mut self, _player: EntityId) {
        self.defeated = true;
    }

    fn trigger_activated(&mut self, trigger: EntityId) {
        self.triggers += 1;
        info!(trigger = trigger.get(), "trigger activated");
    }
}

/// Level layers owned by the runner.
#[derive(Debug)]
struct LevelFiles {
    floorblocks: String,
    planets: String,
    entities: String,
}

impl LevelFiles {
    fn demo() -> Self {
        Self {
            floorblocks: DEMO_FLOORBLOCKS.to_owned(),
            planets: DEMO_PLANETS.to_owned(),
            entities: DEMO_ENTITIES.to_owned(),
        }
    }

    fn load(dir: &Path) -> Result<Self> {
        let read = |name: &str| {
            let path = dir.join(name);
            fs::read_to_string(&path)
                .with_context(|| format!("failed to read level layer at {}", path.display()))
        };
        Ok(Self {
            floorblocks: read("floorblocks.csv")?,
            planets: read("planets.csv")?,
            entities: read("entities.csv")?,
        })
    }

    fn layout(&self) -> TileLayout<'_> {
        TileLayout {
            floorblocks: &self.floorblocks,
            planets: &self.planets,
            entities: &self.entities,
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .init(),
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init(),
    }
}

/// Flies the craft in arcs and aims at the closest active enemy.
fn scripted_intent(world: &World, tick: u32) -> PilotIntent {
    let player = query::player(world);
    let aim = player.as_ref().and_then(|player| {
        query::enemy_view(world)
            .iter()
            .filter(|enemy| enemy.mode != EnemyMode::Dead)
            .map(|enemy| enemy.position)
            .min_by(|a, b| {
                a.distance_squared(player.position)
                    .total_cmp(&b.distance_squared(player.position))
            })
    });

    PilotIntent {
        thrust: tick % 180 < 90,
        turn_left: false,
        turn_right: tick % 240 < 60,
        fire: aim.is_some(),
        aim,
        interact: tick % 600 == 0,
    }
}

fn summarize(world: &World, tally: &Tally, ticks_run: u32) {
    let clock = query::clock(world);
    let health = query::player(world).map_or(0, |player| player.vitals.current().get());
    let position = query::player(world).map_or(Vec2::ZERO, |player| player.position);
    let alive = query::enemy_view(world).living();
    println!("ticks run:        {ticks_run}");
    println!("simulated time:   {:.2}s", clock.as_secs_f64());
    println!("enemies killed:   {}", tally.kills);
    println!("enemies active:   {alive}");
    println!("hits taken:       {} ({} damage)", tally.hits_taken, tally.damage_taken);
    println!("triggers fired:   {}", tally.triggers);
    println!("player health:    {health}");
    println!("player position:  ({:.1}, {:.1})", position.x, position.y);
    println!("projectiles:      {}", query::projectiles(world).len());
}

/// Entry point for the Aether command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.log_format);

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let level = match &args.level {
        Some(dir) => LevelFiles::load(dir)?,
        None => LevelFiles::demo(),
    };

    let mut simulation = Simulation::new(config);
    println!("{}", Bootstrap.welcome_banner(simulation.world()));
    let _ = simulation
        .populate(&level.layout())
        .context("failed to populate world from level layers")?;

    let context = SimulationContext::new(SimMode::Play);
    let dt = config.tick_duration();
    let mut tally = Tally::default();
    let mut ticks_run = 0;
    for tick in 0..args.ticks {
        let intent = scripted_intent(simulation.world(), tick);
        let _ = simulation.step(&context, &intent, dt, &mut tally);
        ticks_run = tick + 1;
        if tally.defeated {
            warn!(tick, "player defeated, stopping early");
            break;
        }
    }

    summarize(simulation.world(), &tally, ticks_run);
    Ok(())
}
