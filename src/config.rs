//! Game tuning
//!
//! Persisted as JSON: a file on native, LocalStorage on the web.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::layout::LevelConfig;

/// Errors raised while loading or validating a [`GameConfig`]
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid { field: &'static str, reason: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read config: {e}"),
            ConfigError::Parse(e) => write!(f, "failed to parse config: {e}"),
            ConfigError::Invalid { field, reason } => {
                write!(f, "invalid config field `{field}`: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Tunable game parameters
///
/// Missing fields fall back to the defaults in [`crate::consts`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,

    // === Paddle ===
    pub paddle_width: f32,
    /// Keyboard paddle speed (px/ms)
    pub paddle_speed: f32,

    // === Ball ===
    /// Launch speed (px/ms)
    pub initial_speed: f32,
    /// Speed cap applied after every velocity change (px/ms)
    pub max_ball_speed: f32,
    /// Multiplier applied when a block is destroyed
    pub speed_increase: f32,

    // === Power-ups ===
    /// Per-block probability of carrying a power-up
    pub power_up_chance: f64,
    /// Lifetime of timed effects (ms)
    pub power_up_duration_ms: f32,
    /// Time scale while slow motion is active
    pub slow_motion_factor: f32,

    // === Run ===
    pub starting_lives: u32,
    pub max_levels: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            paddle_width: PADDLE_WIDTH,
            paddle_speed: PADDLE_SPEED,

            initial_speed: BALL_INITIAL_SPEED,
            max_ball_speed: BALL_MAX_SPEED,
            speed_increase: BALL_SPEED_INCREASE,

            power_up_chance: POWER_UP_CHANCE,
            power_up_duration_ms: POWER_UP_DURATION_MS,
            slow_motion_factor: SLOW_MOTION_FACTOR,

            starting_lives: STARTING_LIVES,
            max_levels: MAX_LEVELS,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a JSON config file
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &'static str, reason: &'static str| -> Result<(), ConfigError> {
            Err(ConfigError::Invalid { field, reason })
        };

        let min = self.level_config().min_field_size();
        if self.field_width <= 2.0 * WALL_THICKNESS
            || self.field_width < min.x
            || self.field_height < min.y
        {
            return invalid("field_width/field_height", "too small for the level layouts");
        }
        if self.paddle_width <= 0.0 || self.paddle_width >= self.field_width {
            return invalid("paddle_width", "must be positive and narrower than the field");
        }
        if self.paddle_speed < 0.0 {
            return invalid("paddle_speed", "must not be negative");
        }
        if self.initial_speed <= 0.0 || self.max_ball_speed <= 0.0 {
            return invalid("initial_speed/max_ball_speed", "must be positive");
        }
        if self.initial_speed > self.max_ball_speed {
            return invalid("initial_speed", "must not exceed max_ball_speed");
        }
        if self.speed_increase < 1.0 {
            return invalid("speed_increase", "must be at least 1.0");
        }
        if !(0.0..=1.0).contains(&self.power_up_chance) {
            return invalid("power_up_chance", "must be within [0, 1]");
        }
        if self.power_up_duration_ms <= 0.0 {
            return invalid("power_up_duration_ms", "must be positive");
        }
        if self.slow_motion_factor <= 0.0 || self.slow_motion_factor > 1.0 {
            return invalid("slow_motion_factor", "must be within (0, 1]");
        }
        if self.starting_lives == 0 || self.max_levels == 0 {
            return invalid("starting_lives/max_levels", "must be at least 1");
        }
        Ok(())
    }

    /// Layout parameters for the level generators
    pub fn level_config(&self) -> LevelConfig {
        LevelConfig {
            field_width: self.field_width,
            field_height: self.field_height,
            power_up_chance: self.power_up_chance,
            ..LevelConfig::default()
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "brick_breaker_config";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {e}"),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
