//! Ledger data types: hashes, assets, the transaction entry graph and blocks.

#![deny(rust_2018_idioms)]
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]

/// Module containing the chain data types: hashes, assets, programs and blocks
pub mod chain;

/// Module containing the content-addressed entries a transaction is made of
pub mod entry;

/// Module containing error definitions
pub mod error;

/// Module containing transactions in their wire form and their entry graph
pub mod transaction;

/// Serialization boilerplate to allow serializing some data structures as
/// strings or bytes depending on the serializer.
pub mod serialization_helpers;
