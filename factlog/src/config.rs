//! Engine configuration module.
//!
//! This module provides configuration loading for the fact log from
//! environment variables.
//!
//! # Environment Variables
//!
//! - `FACTLOG_DATA_FILE`: Path of the append-only log file (default: `./data/factlog.log`)
//! - `FACTLOG_SYNC_WRITES`: Whether to fsync after every transaction (default: `true`)
//!
//! # Invariants
//!
//! - `data_file` is always a valid path (may not exist yet)

use std::path::PathBuf;

/// Name of the variable holding the log file path.
pub const DATA_FILE_VAR: &str = "FACTLOG_DATA_FILE";

/// Name of the variable controlling fsync after each transaction.
pub const SYNC_WRITES_VAR: &str = "FACTLOG_SYNC_WRITES";

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Path of the append-only log file.
    /// The parent directory is created by the binary if missing.
    pub data_file: PathBuf,
    /// Whether each committed batch is synced to disk before returning.
    pub sync_writes: bool,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(Self::DEFAULT_DATA_FILE),
            sync_writes: Self::DEFAULT_SYNC_WRITES,
        }
    }
}

impl EngineConfig {
    /// Default log file path.
    pub const DEFAULT_DATA_FILE: &'static str = "./data/factlog.log";
    /// Sync after every transaction by default.
    pub const DEFAULT_SYNC_WRITES: bool = true;

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `FACTLOG_SYNC_WRITES` is set but is not a boolean.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through a variable lookup function.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_file = lookup(DATA_FILE_VAR)
            .filter(|path| !path.is_empty())
            .map_or_else(|| PathBuf::from(Self::DEFAULT_DATA_FILE), PathBuf::from);
        let sync_writes = match lookup(SYNC_WRITES_VAR) {
            Some(value) => parse_bool(SYNC_WRITES_VAR, &value)?,
            None => Self::DEFAULT_SYNC_WRITES,
        };

        Ok(Self {
            data_file,
            sync_writes,
        })
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name: name.to_string(),
            message: format!("'{value}' is not a boolean (expected true or false)"),
        }),
    }
}
