//! # Tessera configuration
//!
//! Configuration is loaded from a TOML file into a partial [Config](config::partial::Config),
//! where every param is optional, and then completed with the defaults of the selected
//! environment into a total [Config](config::Config).

#![deny(rust_2018_idioms)]
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]

pub mod config;
pub mod defaults;
pub mod dirs;
pub mod loaders;
