//! Error type definitions for the data structure module.

use thiserror::Error;

use crate::chain::Hash;

/// Errors when resolving an entry of a transaction graph
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntryError {
    /// The transaction does not contain an entry with that id
    #[error("entry {0} not found in transaction")]
    MissingEntry(Hash),
    /// The entry exists but it is not of the requested variant
    #[error("entry {id} is a {actual} entry, expected {expected}")]
    WrongType {
        /// Id of the entry
        id: Hash,
        /// Variant that was requested
        expected: &'static str,
        /// Variant that was found
        actual: &'static str,
    },
}

/// Error when parsing a hash from a string
#[derive(Debug, Error, PartialEq)]
pub enum HashParseError {
    /// The string is not valid hexadecimal
    #[error("failed to parse hex: {0}")]
    Hex(#[from] hex::FromHexError),
    /// The decoded bytes have the wrong length
    #[error("invalid hash length: expected 32 bytes, got {0}")]
    InvalidLength(usize),
}
