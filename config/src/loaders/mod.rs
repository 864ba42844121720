//! Loaders of partial configurations from different sources

pub mod toml;
