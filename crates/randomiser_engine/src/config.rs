//! Randomiser configuration management
//!
//! Loads registry settings from TOML files and environment variables.
//!
//! Priority (highest to lowest):
//! 1. Environment variables (`RANDOMISER_*`)
//! 2. Config file
//! 3. Default values

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::group::DEFAULT_MAX_ATTEMPTS;

/// Environment variable holding the base seed.
pub const ENV_BASE_SEED: &str = "RANDOMISER_BASE_SEED";

/// Environment variable holding the seed prefix.
pub const ENV_PREFIX: &str = "RANDOMISER_PREFIX";

/// Environment variable holding the default attempt budget.
pub const ENV_MAX_ATTEMPTS: &str = "RANDOMISER_MAX_ATTEMPTS";

/// Configuration error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Attempt budget below one
    #[error("Invalid max attempts: {0}. Must be at least 1")]
    InvalidMaxAttempts(u32),

    /// Unreadable or malformed TOML file
    #[error("Configuration file error: {0}")]
    FileError(String),

    /// Unparseable environment variable
    #[error("Environment variable error: {0}")]
    EnvError(String),
}

/// Settings for a [`ReplacementRandomiser`](crate::registry::ReplacementRandomiser).
///
/// # Examples
///
/// ```rust
/// use randomiser_engine::config::RandomiserConfig;
///
/// let config: RandomiserConfig = toml::from_str(r#"
///     base_seed = 42
///     prefix = "season-1"
/// "#).unwrap();
///
/// assert_eq!(config.base_seed, Some(42));
/// assert_eq!(config.max_attempts, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RandomiserConfig {
    /// Base seed; generated from OS entropy when absent
    pub base_seed: Option<u64>,
    /// Prefix mixed into every derived seed
    pub prefix: Option<String>,
    /// Default attempt budget for retrying randomisation
    pub max_attempts: u32,
}

impl Default for RandomiserConfig {
    fn default() -> Self {
        Self {
            base_seed: None,
            prefix: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl RandomiserConfig {
    /// Create a new RandomiserConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;

        let config: RandomiserConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidMaxAttempts(self.max_attempts));
        }
        Ok(())
    }

    /// Apply overrides from a variable lookup; unset variables leave fields alone.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(seed) = lookup(ENV_BASE_SEED) {
            let seed = seed.trim().parse().map_err(|_| {
                ConfigError::EnvError(format!("{} is not a valid u64: {}", ENV_BASE_SEED, seed))
            })?;
            self.base_seed = Some(seed);
        }

        if let Some(prefix) = lookup(ENV_PREFIX) {
            self.prefix = Some(prefix);
        }

        if let Some(attempts) = lookup(ENV_MAX_ATTEMPTS) {
            self.max_attempts = attempts.trim().parse().map_err(|_| {
                ConfigError::EnvError(format!(
                    "{} is not a valid u32: {}",
                    ENV_MAX_ATTEMPTS, attempts
                ))
            })?;
        }

        Ok(())
    }
}

/// Build configuration from all sources
///
/// Starts from the file (or defaults), then applies environment overrides.
pub fn build_config(config_file: Option<&Path>) -> Result<RandomiserConfig, ConfigError> {
    let mut config = match config_file {
        Some(path) => RandomiserConfig::from_file(path)?,
        None => RandomiserConfig::default(),
    };

    config.apply_overrides(|name| std::env::var(name).ok())?;

    config.validate()?;
    Ok(config)
}
