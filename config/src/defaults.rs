//! # Default per-environment values
//!
//! This module contains per-environment default values for the configuration params.
use std::path::PathBuf;

use crate::dirs;

/// Trait defining all the configuration params that have a suitable
/// default value depending on the environment (mainnet, testnet,
/// etc).
pub trait Defaults {
    /// Default log level
    fn log_level(&self) -> log::LevelFilter {
        log::LevelFilter::Info
    }

    /// Default path for the database
    fn storage_db_path(&self) -> PathBuf;

    /// Create the database when it does not exist yet
    fn storage_create_if_missing(&self) -> bool {
        true
    }
}

/// Struct that will implement all the mainnet defaults
pub struct Mainnet;

/// Struct that will implement all the testnet defaults
pub struct Testnet;

impl Defaults for Mainnet {
    fn storage_db_path(&self) -> PathBuf {
        dirs::data_dir().join("mainnet")
    }
}

impl Defaults for Testnet {
    fn storage_db_path(&self) -> PathBuf {
        dirs::data_dir().join("testnet")
    }

    fn log_level(&self) -> log::LevelFilter {
        log::LevelFilter::Debug
    }
}
