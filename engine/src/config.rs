//! Serialisable configuration for a complete simulation.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use aether_system_piloting as piloting;
use aether_system_spawning as spawning;
use aether_world::WorldConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Nominal number of steps per simulated second.
pub const DEFAULT_TICK_RATE: u32 = 60;

/// Errors raised while loading or validating a [`SimulationConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration at {}", path.display())]
    Io {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The configuration text is not valid TOML for this schema.
    #[error("failed to parse configuration")]
    Parse(#[from] toml::de::Error),
    /// Chunks must have a positive, finite edge length.
    #[error("chunk size must be positive and finite, got {chunk_size}")]
    InvalidChunkSize {
        /// Rejected edge length.
        chunk_size: f32,
    },
    /// The playable area must have a positive, finite extent.
    #[error("world bounds must be positive and finite, got {width}x{height}")]
    InvalidBounds {
        /// Rejected width.
        width: f32,
        /// Rejected height.
        height: f32,
    },
    /// Movement speeds must be finite and not negative.
    #[error("{field} must be finite and not negative, got {value}")]
    InvalidSpeed {
        /// Rejected tuning key.
        field: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// At least one step per second is required.
    #[error("tick rate must be at least one step per second")]
    InvalidTickRate,
}

/// Every tunable of a simulation run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// World bounds, partition and combatant tuning.
    pub world: WorldConfig,
    /// Enemy spawner cadence, cap and seed.
    pub spawner: spawning::Config,
    /// Volley spread seed.
    pub piloting: piloting::Config,
    /// Steps per simulated second.
    pub tick_rate: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            spawner: spawning::Config::default(),
            piloting: piloting::Config::default(),
            tick_rate: DEFAULT_TICK_RATE,
        }
    }
}

impl SimulationConfig {
    /// Parses and validates a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Checks the values serde cannot constrain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let chunk_size = self.world.chunk_size;
        if !chunk_size.is_finite() || chunk_size <= 0.0 {
            return Err(ConfigError::InvalidChunkSize { chunk_size });
        }

        let (width, height) = (self.world.bounds.width(), self.world.bounds.height());
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidBounds { width, height });
        }

        for (field, value) in [
            ("world.player.max_speed", self.world.player.max_speed),
            ("world.enemy.speed", self.world.enemy.speed),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidSpeed { field, value });
            }
        }

        if self.tick_rate == 0 {
            return Err(ConfigError::InvalidTickRate);
        }
        Ok(())
    }

    /// Derives both generator seeds from a single run seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.spawner.rng_seed = seed;
        self.piloting.rng_seed = seed.rotate_left(32) ^ 0x9e37_79b9_7f4a_7c15;
        self
    }

    /// Simulated time covered by one nominal step.
    #[must_use]
    pub fn tick_duration(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.tick_rate.max(1)))
    }
}
