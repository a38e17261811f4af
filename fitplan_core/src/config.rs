//! Configuration file support for fitplan.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/fitplan/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub startup: StartupConfig,
}

/// Timing used to estimate durations of newly created exercises
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimingConfig {
    #[serde(default = "default_seconds_per_rep")]
    pub seconds_per_rep: u32,

    #[serde(default = "default_rest_between_sets")]
    pub rest_between_sets: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            seconds_per_rep: default_seconds_per_rep(),
            rest_between_sets: default_rest_between_sets(),
        }
    }
}

/// What the menu starts with
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct StartupConfig {
    #[serde(default)]
    pub load_samples: bool,
}

// Default value functions
fn default_seconds_per_rep() -> u32 {
    crate::types::DEFAULT_SECONDS_PER_REP
}

fn default_rest_between_sets() -> u32 {
    crate::types::DEFAULT_REST_BETWEEN_SETS
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        match Self::default_config_path() {
            Some(config_path) if config_path.exists() => Self::load_from(&config_path),
            config_path => {
                tracing::info!("No config file found at {:?}, using defaults", config_path);
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path, if the platform has a config dir
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|base| base.join("fitplan").join("config.toml"))
    }

    /// Reject values no exercise could be built with
    pub fn validate(&self) -> Result<()> {
        if self.timing.seconds_per_rep == 0 {
            return Err(Error::Config(
                "timing.seconds_per_rep must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
