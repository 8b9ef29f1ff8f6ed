//! Table configuration.

use crate::call::Amount;
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Fixed economics and timing of a session.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct TableConfig {
    /// Exact value each player must attach to join.
    #[serde(default = "default_entry_stake")]
    entry_stake: Amount,

    /// Seconds a player has to act before anyone may force a timeout draw.
    #[serde(default = "default_reaction_window")]
    reaction_window_secs: u64,
}

fn default_entry_stake() -> Amount {
    // 0.1 of a native unit with 18 decimals.
    100_000_000_000_000_000
}

fn default_reaction_window() -> u64 {
    180
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            entry_stake: default_entry_stake(),
            reaction_window_secs: default_reaction_window(),
        }
    }
}

impl TableConfig {
    /// Creates a configuration after validating it.
    #[instrument]
    pub fn new(entry_stake: Amount, reaction_window_secs: u64) -> Result<Self, ConfigError> {
        Self {
            entry_stake,
            reaction_window_secs,
        }
        .validated()
    }

    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading table config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml_str(&content)?;
        info!(
            entry_stake = config.entry_stake,
            reaction_window_secs = config.reaction_window_secs,
            "Table config loaded"
        );
        Ok(config)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validated()
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::new(format!("Failed to render config: {}", e)))
    }

    #[track_caller]
    fn validated(self) -> Result<Self, ConfigError> {
        if self.entry_stake == 0 {
            return Err(ConfigError::new("entry_stake must be positive".to_string()));
        }
        if self.reaction_window_secs == 0 {
            return Err(ConfigError::new(
                "reaction_window_secs must be positive".to_string(),
            ));
        }
        Ok(self)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
