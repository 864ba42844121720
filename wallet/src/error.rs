use thiserror::Error;

use tessera_data_structures::chain::Hash;

use crate::account::RegistryError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to encode account utxo {output_id}: {source}")]
    EncodeUtxo {
        output_id: Hash,
        source: serde_json::Error,
    },
    #[error("failed to encode {what}: {source}")]
    Encode {
        what: &'static str,
        source: serde_json::Error,
    },
    #[error("failed to decode {what} stored under {key}: {source}")]
    Decode {
        what: &'static str,
        key: String,
        source: serde_json::Error,
    },
    #[error("storage failed: {0}")]
    Storage(anyhow::Error),
    #[error(
        "block {hash} at height {height} does not extend the wallet tip {tip_hash} at height {tip_height}"
    )]
    NotChild {
        hash: Hash,
        height: u64,
        tip_hash: Hash,
        tip_height: u64,
    },
    #[error("block {hash} is not the wallet tip {tip_hash}")]
    NotTip { hash: Hash, tip_hash: Hash },
    #[error("cannot detach block {0}: the wallet has not indexed any block")]
    EmptyWallet(Hash),
    #[error("balance of asset {0} overflowed")]
    BalanceOverflow(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Storage(err)
    }
}

impl From<RegistryError> for Error {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::Storage(err) => Error::Storage(err),
            RegistryError::Decode { key, source } => Error::Decode {
                what: "control program",
                key,
                source,
            },
        }
    }
}
