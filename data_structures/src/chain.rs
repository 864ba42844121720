use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tessera_crypto::hash::{calculate_sha256, Sha256, Sha256Writer};

use crate::{error::HashParseError, transaction::Transaction};

/// Opcode that makes a program fail unconditionally. Outputs whose control program starts with
/// it can never be spent, they retire the value they carry.
pub const OP_FAIL: u8 = 0x6a;

/// Opcode that succeeds unconditionally
pub const OP_TRUE: u8 = 0x51;

/// Types that have a content-addressed identifier
pub trait Hashable {
    fn hash(&self) -> Hash;
}

/// Any reference to a Hashable type is also Hashable
impl<'a, T: Hashable> Hashable for &'a T {
    fn hash(&self) -> Hash {
        (*self).hash()
    }
}

/// SHA-256 Hash
pub type SHA256 = [u8; 32];

/// Hash
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Hash {
    /// SHA-256 Hash
    SHA256(SHA256),
}

impl Default for Hash {
    fn default() -> Hash {
        Hash::SHA256([0; 32])
    }
}

impl Hash {
    /// Raw bytes of the hash
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Hash::SHA256(h) => h,
        }
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Conversion between tessera_crypto::Sha256 and tessera_data_structures::Hash
impl From<Sha256> for Hash {
    fn from(x: Sha256) -> Self {
        Hash::SHA256(x.0)
    }
}

impl From<SHA256> for Hash {
    fn from(x: SHA256) -> Self {
        Hash::SHA256(x)
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.as_bytes()))
    }
}

impl FromStr for Hash {
    type Err = HashParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        let len = bytes.len();
        let hash: SHA256 = bytes
            .try_into()
            .map_err(|_| HashParseError::InvalidLength(len))?;

        Ok(Hash::SHA256(hash))
    }
}

/// Identifier of an asset, derived from the program that is allowed to issue it
#[derive(
    Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AssetId(pub Hash);

impl AssetId {
    /// Compute the id of the asset issued by `issuance_program` under `asset_definition`
    pub fn compute(vm_version: u64, issuance_program: &[u8], asset_definition: &[u8]) -> Self {
        let mut writer = Sha256Writer::default();
        writer
            .write_var_bytes(b"asset")
            .write(&vm_version.to_le_bytes())
            .write_var_bytes(issuance_program)
            .write(calculate_sha256(asset_definition).as_ref());

        AssetId(writer.finish().into())
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for AssetId {
    type Err = HashParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(AssetId)
    }
}

/// An amount of some asset
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct AssetAmount {
    pub asset_id: AssetId,
    pub amount: u64,
}

impl AssetAmount {
    pub fn new(asset_id: AssetId, amount: u64) -> Self {
        Self { asset_id, amount }
    }
}

/// Whether a control program can never be satisfied. Outputs locked by such a program are
/// retirements.
pub fn is_unspendable(program: &[u8]) -> bool {
    program.first() == Some(&OP_FAIL)
}

/// Block header
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub version: u64,
    pub height: u64,
    pub previous_block_hash: Hash,
    /// Seconds since the unix epoch
    pub timestamp: u64,
    /// Commitment to the ids of the transactions of the block
    pub transactions_root: Hash,
}

impl Hashable for BlockHeader {
    fn hash(&self) -> Hash {
        let mut writer = Sha256Writer::default();
        writer
            .write_var_bytes(b"blockheader")
            .write(&self.version.to_le_bytes())
            .write(&self.height.to_le_bytes())
            .write(self.previous_block_hash.as_ref())
            .write(&self.timestamp.to_le_bytes())
            .write(self.transactions_root.as_ref());

        writer.finish().into()
    }
}

/// A block: a header and its ordered list of transactions
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Create a block on top of `previous_block_hash`, committing to `transactions`
    pub fn new(
        height: u64,
        previous_block_hash: Hash,
        timestamp: u64,
        transactions: Vec<Transaction>,
    ) -> Self {
        let header = BlockHeader {
            version: 1,
            height,
            previous_block_hash,
            timestamp,
            transactions_root: transactions_root(&transactions),
        };

        Self {
            header,
            transactions,
        }
    }

    pub fn height(&self) -> u64 {
        self.header.height
    }

    /// Block timestamp, in seconds since the unix epoch
    pub fn time(&self) -> u64 {
        self.header.timestamp
    }
}

impl Hashable for Block {
    fn hash(&self) -> Hash {
        self.header.hash()
    }
}

fn transactions_root(transactions: &[Transaction]) -> Hash {
    let mut writer = Sha256Writer::default();
    writer.write_var_bytes(b"txroot");
    for tx in transactions {
        writer.write(tx.id.as_ref());
    }

    writer.finish().into()
}
