//! Configuration
//!
//! Everything tunable about a round, loadable from a JSON file. Missing
//! fields fall back to defaults so a config file only needs the overrides.

use std::fs;
use std::path::Path;

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::game::input::KeyBindings;
use crate::game::state::WorldBounds;
use crate::game::tick::RoundConfig;

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "TAG_ARENA_CONFIG";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for this schema
    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    /// Values parse but make no sense
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Playfield size at world generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width in world units
    pub width: f32,
    /// Height in world units
    pub height: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl WorldConfig {
    /// As simulation bounds.
    pub fn bounds(&self) -> WorldBounds {
        WorldBounds::new(self.width, self.height)
    }
}

/// Frame pacing for the runtime driver.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Target frame period
    pub frame_ms: u64,
    /// Pace frames against the wall clock instead of running flat out
    pub realtime: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            frame_ms: 16,
            realtime: false,
        }
    }
}

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Playfield
    pub world: WorldConfig,
    /// RNG seed for spawns
    pub rng_seed: u64,
    /// Round rules
    pub round: RoundConfig,
    /// Keyboard layout
    pub bindings: KeyBindings,
    /// Frame pacing
    pub driver: DriverConfig,
}

impl GameConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(data: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// Load from the file named by `TAG_ARENA_CONFIG`, or defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.is_empty() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configurations the simulation cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let world = &self.world;
        if !(world.width.is_finite() && world.height.is_finite()) || world.width <= 0.0 || world.height <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "world size must be positive, got {}x{}",
                world.width, world.height
            )));
        }

        let round = &self.round;
        if round.round_seconds == 0 {
            return Err(ConfigError::Invalid("round_seconds must be at least 1".into()));
        }
        if round.effect_duration_ms == 0 {
            return Err(ConfigError::Invalid("effect_duration_ms must be positive".into()));
        }
        if round.powerup_spawn.interval_ms == 0 || round.orb_spawn.interval_ms == 0 {
            return Err(ConfigError::Invalid("spawn intervals must be positive".into()));
        }
        if round.powerup_spawn.bottom_margin < 0.0 || round.powerup_spawn.bottom_margin >= world.height {
            return Err(ConfigError::Invalid(format!(
                "powerup bottom_margin {} outside world height {}",
                round.powerup_spawn.bottom_margin, world.height
            )));
        }

        if self.driver.frame_ms == 0 {
            return Err(ConfigError::Invalid("driver.frame_ms must be positive".into()));
        }

        let mut keys: Vec<&str> = Vec::with_capacity(6);
        for scheme in [&self.bindings.one, &self.bindings.two] {
            keys.extend([scheme.left.as_str(), scheme.right.as_str(), scheme.jump.as_str()]);
        }
        let total = keys.len();
        keys.sort_unstable();
        keys.dedup();
        if keys.len() != total {
            return Err(ConfigError::Invalid("key bound to more than one control".into()));
        }

        Ok(())
    }
}
