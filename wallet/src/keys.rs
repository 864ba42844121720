//! Keys of the wallet records in the key-value store. Every key starts with a short prefix that
//! identifies the kind of record, so that each kind can be iterated on its own.

use tessera_data_structures::chain::Hash;

/// Prefix of the account UTXO records
pub const ACCOUNT_UTXO_PREFIX: &[u8] = b"ACU:";

/// Prefix of the control program registry records
pub const ACCOUNT_CP_PREFIX: &[u8] = b"ACP:";

/// Prefix of the account records
pub const ACCOUNT_PREFIX: &[u8] = b"ACC:";

fn prefixed(prefix: &[u8], suffix: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(prefix.len() + suffix.len());
    key.extend_from_slice(prefix);
    key.extend_from_slice(suffix);

    key
}

/// An unspent output owned by a tracked account.
#[inline]
pub fn account_utxo(output_id: &Hash) -> Vec<u8> {
    prefixed(ACCOUNT_UTXO_PREFIX, output_id.as_ref())
}

/// Ownership metadata of a control program, keyed by the hash of the program.
#[inline]
pub fn account_cp(program_hash: &Hash) -> Vec<u8> {
    prefixed(ACCOUNT_CP_PREFIX, program_hash.as_ref())
}

/// An account.
#[inline]
pub fn account(account_id: &str) -> Vec<u8> {
    prefixed(ACCOUNT_PREFIX, account_id.as_bytes())
}

/// Height and hash of the last block indexed by the wallet.
#[inline]
pub fn wallet_status() -> &'static [u8] {
    b"walletStatus"
}
