//! Various hash functions

use digest::Digest;
use std::fmt;

/// Length in bytes of a SHA-256 digest
pub const SHA256_LENGTH: usize = 32;

/// Result of a SHA-256 digest
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sha256(pub [u8; SHA256_LENGTH]);

impl AsRef<[u8]> for Sha256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Sha256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sha256({})", hex::encode(self.0))
    }
}

impl fmt::Display for Sha256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Calculate the SHA256 hash
pub fn calculate_sha256(bytes: &[u8]) -> Sha256 {
    let digest = sha2::Sha256::digest(bytes);
    let mut hash = [0; SHA256_LENGTH];
    hash.copy_from_slice(digest.as_slice());

    Sha256(hash)
}

/// Incremental SHA-256 hasher for values assembled from several parts.
///
/// Feeding the parts one by one produces the same digest as calling
/// [`calculate_sha256`] on their concatenation.
#[derive(Clone, Default)]
pub struct Sha256Writer {
    hasher: sha2::Sha256,
}

impl Sha256Writer {
    /// Feed more bytes into the hasher
    pub fn write(&mut self, bytes: &[u8]) -> &mut Self {
        self.hasher.input(bytes);

        self
    }

    /// Feed a length-prefixed byte string, so that adjacent variable-length fields cannot be
    /// confused with each other
    pub fn write_var_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.write(&(bytes.len() as u64).to_le_bytes()).write(bytes)
    }

    /// Consume the hasher and return the digest
    pub fn finish(self) -> Sha256 {
        let digest = self.hasher.result();
        let mut hash = [0; SHA256_LENGTH];
        hash.copy_from_slice(digest.as_slice());

        Sha256(hash)
    }
}
