//! # Partial Config
//!
//! This module contains the __partial__ `Config` struct. All loaders
//! in `loaders` module will transform the loaded configuration into
//! an instance of this struct. The reason why it is called
//! __partial__ is because some params are optionals and won't be
//! present (they are `None`) if they do not appear in the source.
//! Later, the `config` module will use this partial config object and
//! the environment-specific defaults (see the `defaults` module)
//! to produce a __total__ (no `Option` fields) configuration object.
use std::path::PathBuf;

use serde::Deserialize;

use crate::config::Environment;

/// The partial configuration object that contains all other, more
/// specific, configuration objects (log, storage).
#[derive(Deserialize, Default, Debug, Clone, PartialEq)]
pub struct Config {
    /// The "environment" the wallet follows, eg: mainnet, testnet.
    #[serde(default)]
    pub environment: Environment,

    /// Logging-related configuration
    #[serde(default)]
    pub log: Log,

    /// Storage-related configuration
    #[serde(default)]
    pub storage: Storage,
}

/// Logging-specific partial configuration.
#[derive(Deserialize, Default, Debug, Clone, PartialEq)]
pub struct Log {
    /// Level of the messages that are logged
    #[serde(default)]
    pub level: Option<log::LevelFilter>,
}

/// Storage-specific partial configuration.
#[derive(Deserialize, Default, Debug, Clone, PartialEq)]
pub struct Storage {
    /// Path to the directory that will contain the database files
    #[serde(default)]
    pub db_path: Option<PathBuf>,

    /// Whether to create the database if it does not exist
    #[serde(default)]
    pub create_if_missing: Option<bool>,
}

impl Config {
    pub fn default_testnet() -> Self {
        Config {
            environment: Environment::Testnet,
            ..Config::default()
        }
    }
}
