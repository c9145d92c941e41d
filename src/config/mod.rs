//! Configuration module - environment variable parsing

use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory holding the profile and score JSON files
    pub data_dir: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Arena width in pixels (display resolution)
    pub arena_width: f32,
    /// Arena height in pixels
    pub arena_height: f32,

    /// Run duration in seconds
    pub run_duration_secs: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_dir = env::var("AIM_DATA_DIR").unwrap_or_else(|_| ".".to_string());

        Ok(Self {
            data_dir: PathBuf::from(data_dir),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            arena_width: parse_or("ARENA_WIDTH", 1920.0)?,
            arena_height: parse_or("ARENA_HEIGHT", 1080.0)?,
            run_duration_secs: parse_or("RUN_DURATION_SECS", 60)?,
        })
    }

    /// Path of the persisted sensitivity profiles
    pub fn profiles_path(&self) -> PathBuf {
        self.data_dir.join("sensitivity_profiles.json")
    }

    /// Path of the persisted high scores
    pub fn scores_path(&self) -> PathBuf {
        self.data_dir.join("scores.json")
    }
}

fn parse_or<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidNumber(key)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid numeric value for environment variable: {0}")]
    InvalidNumber(&'static str),
}
