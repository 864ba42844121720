//! # Config
//!
//! This module contains the `Config` struct, which holds all the
//! configuration params. The `Config` struct in this module is
//! __total__, that is, it contains all the required fields needed by
//! the rest of the application unlike the partial
//! [Config](partial::Config) whose fields are optional and, when
//! missing from the configuration file, are filled with the defaults
//! of the environment.
//!
//! All the [loaders](crate::loaders) return a partial configuration;
//! use `Config::from_partial` to obtain a total config object from it.
//!
//! ```
//! use tessera_config::config::{partial, Config};
//!
//! // Default config for mainnet
//! Config::from_partial(&partial::Config::default());
//!
//! // Default config for testnet
//! Config::from_partial(&partial::Config::default_testnet());
//! ```

use std::{fmt, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::defaults::{Defaults, Mainnet, Testnet};

/// Module containing the partial configuration struct that is
/// returned by the loaders.
pub mod partial;

/// The total configuration object that contains all other, more
/// specific, configuration objects (log, storage).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    /// The "environment" the wallet follows
    pub environment: Environment,

    /// Logging-related configuration
    pub log: Log,

    /// Storage-related configuration
    pub storage: Storage,
}

/// Logging-specific configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Log {
    /// Level of the messages that are logged
    pub level: log::LevelFilter,
}

/// Storage-specific configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Storage {
    /// Path to the directory that will contain the database files
    pub db_path: PathBuf,

    /// Whether to create the database if it does not exist
    pub create_if_missing: bool,
}

/// Possible values for the "environment" configuration param.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum Environment {
    /// "mainnet" environment
    #[default]
    #[serde(rename = "mainnet")]
    Mainnet,
    /// "testnet" environment
    #[serde(rename = "testnet")]
    Testnet,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Environment::Mainnet => "mainnet",
            Environment::Testnet => "testnet",
        };

        f.write_str(s)
    }
}

impl Config {
    pub fn from_partial(config: &partial::Config) -> Self {
        let defaults: Box<dyn Defaults> = match config.environment {
            Environment::Mainnet => Box::new(Mainnet),
            Environment::Testnet => Box::new(Testnet),
        };

        Config {
            environment: config.environment,
            log: Log::from_partial(&config.log, &*defaults),
            storage: Storage::from_partial(&config.storage, &*defaults),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_partial(&partial::Config::default())
    }
}

impl Log {
    pub fn from_partial(config: &partial::Log, defaults: &dyn Defaults) -> Self {
        Log {
            level: config.level.unwrap_or_else(|| defaults.log_level()),
        }
    }
}

impl Storage {
    pub fn from_partial(config: &partial::Storage, defaults: &dyn Defaults) -> Self {
        Storage {
            db_path: config
                .db_path
                .to_owned()
                .unwrap_or_else(|| defaults.storage_db_path()),
            create_if_missing: config
                .create_if_missing
                .unwrap_or_else(|| defaults.storage_create_if_missing()),
        }
    }
}
