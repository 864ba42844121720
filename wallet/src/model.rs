//! Records handled by the account UTXO index.

use serde::{Deserialize, Serialize};

use tessera_data_structures::{
    chain::{AssetAmount, AssetId, Hash},
    serialization_helpers::hex_bytes,
};

/// An output extracted from a block, before its owner is known
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawOutput {
    pub output_id: Hash,
    pub asset_amount: AssetAmount,
    pub control_program: Vec<u8>,
    /// Transaction that created (or spent) the output
    pub tx_hash: Hash,
    /// Position of the output in its creating transaction. Always 0 for spent outputs.
    pub output_index: usize,
    pub source_id: Hash,
    pub source_pos: u64,
    /// Hash of the reference data of the output
    pub ref_data: Hash,
}

/// An output whose control program belongs to a tracked account
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccountOutput {
    pub raw: RawOutput,
    pub account_id: String,
    pub key_index: u64,
    pub change: bool,
}

/// Persisted record of an unspent output owned by a tracked account
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AccountUtxo {
    pub output_id: Hash,
    pub asset_id: AssetId,
    pub amount: u64,
    pub account_id: String,
    /// Derivation index of the key behind `program`
    pub program_index: u64,
    #[serde(with = "hex_bytes")]
    pub program: Vec<u8>,
    pub source_id: Hash,
    pub source_pos: u64,
    pub ref_data: Hash,
    pub change: bool,
}

impl From<&AccountOutput> for AccountUtxo {
    fn from(output: &AccountOutput) -> Self {
        let raw = &output.raw;

        AccountUtxo {
            output_id: raw.output_id,
            asset_id: raw.asset_amount.asset_id,
            amount: raw.asset_amount.amount,
            account_id: output.account_id.clone(),
            program_index: output.key_index,
            program: raw.control_program.clone(),
            source_id: raw.source_id,
            source_pos: raw.source_pos,
            ref_data: raw.ref_data,
            change: output.change,
        }
    }
}

/// Last block applied to the index
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct WalletStatus {
    pub height: u64,
    pub hash: Hash,
}

/// Sum of the unspent outputs of an account for a single asset
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub account_id: String,
    pub asset_id: AssetId,
    pub amount: u64,
}
