//! # Tessera wallet
//!
//! Keeps the account UTXO index of a wallet in sync with the best chain: every confirmed block
//! inserts the outputs it creates for tracked accounts and deletes the outputs it spends, and
//! every reverted block undoes exactly that.
#![deny(rust_2018_idioms)]
#![deny(unused_mut)]
#![deny(unused_must_use)]
#![deny(unused_variables)]

pub mod account;
pub mod error;
pub mod indexer;
pub mod keys;
pub mod model;
pub mod query;
pub mod wallet;

#[cfg(test)]
mod factories;

pub use error::Error;
pub use wallet::Wallet;

/// Result type of the wallet operations
pub type Result<T> = std::result::Result<T, Error>;
