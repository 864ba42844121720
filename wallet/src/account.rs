//! Registry of the control programs that belong to tracked accounts.
//!
//! Ownership is never stored in the ledger: the registry maps the hash of a control program to
//! the account and key that produced it, and the account UTXO index consults it whenever a block
//! creates or spends an output.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tessera_crypto::hash::calculate_sha256;
use tessera_data_structures::{chain::Hash, serialization_helpers::hex_bytes};
use tessera_storage::storage::{Storage, WriteBatch};

use crate::{keys, Error, Result};

/// Ownership metadata of a control program
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct CtrlProgram {
    pub account_id: String,
    pub address: Option<String>,
    /// Derivation index of the key that controls the program
    pub key_index: u64,
    #[serde(with = "hex_bytes")]
    pub control_program: Vec<u8>,
    /// Whether the program was generated to receive change
    pub change: bool,
}

/// A tracked account
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub alias: Option<String>,
}

/// Errors returned by a `ControlProgramRegistry`
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The stored metadata could not be decoded
    #[error("malformed control program metadata under {key}: {source}")]
    Decode {
        key: String,
        source: serde_json::Error,
    },
    #[error("registry storage failed: {0}")]
    Storage(anyhow::Error),
}

/// Read access to the control program registry
pub trait ControlProgramRegistry {
    /// Ownership metadata of the control program whose hash is `program_hash`
    fn lookup(&self, program_hash: &Hash)
        -> std::result::Result<Option<CtrlProgram>, RegistryError>;

    /// Whether the account still exists. Programs of deleted accounts stay in the registry.
    fn account_exists(&self, account_id: &str) -> std::result::Result<bool, RegistryError>;
}

impl<R: ControlProgramRegistry + ?Sized> ControlProgramRegistry for &R {
    fn lookup(
        &self,
        program_hash: &Hash,
    ) -> std::result::Result<Option<CtrlProgram>, RegistryError> {
        (**self).lookup(program_hash)
    }

    fn account_exists(&self, account_id: &str) -> std::result::Result<bool, RegistryError> {
        (**self).account_exists(account_id)
    }
}

/// Content hash of a control program, as used to key the registry
pub fn program_hash(control_program: &[u8]) -> Hash {
    calculate_sha256(control_program).into()
}

/// Resolve the owner of `control_program`.
///
/// Returns `None` if the program is not registered, if its metadata is malformed, or if the
/// account it belongs to has been deleted. Only storage failures are errors.
pub fn resolve<R: ControlProgramRegistry + ?Sized>(
    registry: &R,
    control_program: &[u8],
) -> Result<Option<CtrlProgram>> {
    let ctrl = match registry.lookup(&program_hash(control_program)) {
        Ok(Some(ctrl)) => ctrl,
        Ok(None) => return Ok(None),
        Err(RegistryError::Decode { key, source }) => {
            log::warn!(
                "Ignoring control program {}: malformed metadata under {}: {}",
                hex::encode(control_program),
                key,
                source
            );
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    if registry.account_exists(&ctrl.account_id)? {
        Ok(Some(ctrl))
    } else {
        Ok(None)
    }
}

/// Registry backed by the wallet storage
#[derive(Clone, Debug)]
pub struct StorageRegistry<S> {
    storage: S,
}

impl<S: Storage> StorageRegistry<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }
}

impl<S: Storage> ControlProgramRegistry for StorageRegistry<S> {
    fn lookup(
        &self,
        program_hash: &Hash,
    ) -> std::result::Result<Option<CtrlProgram>, RegistryError> {
        let key = keys::account_cp(program_hash);
        let bytes = match self.storage.get(&key).map_err(RegistryError::Storage)? {
            Some(bytes) => bytes,
            None => return Ok(None),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| RegistryError::Decode {
                key: hex::encode(&key),
                source,
            })
    }

    fn account_exists(&self, account_id: &str) -> std::result::Result<bool, RegistryError> {
        self.storage
            .get(&keys::account(account_id))
            .map(|value| value.is_some())
            .map_err(RegistryError::Storage)
    }
}

/// Queue the registration of `ctrl` under the hash of its control program
pub fn insert_control_program(batch: &mut WriteBatch, ctrl: &CtrlProgram) -> Result<()> {
    let value = serde_json::to_vec(ctrl).map_err(|source| Error::Encode {
        what: "control program",
        source,
    })?;
    batch.put(
        keys::account_cp(&program_hash(&ctrl.control_program)),
        value,
    );

    Ok(())
}

/// Queue the creation of `account`
pub fn insert_account(batch: &mut WriteBatch, account: &Account) -> Result<()> {
    let value = serde_json::to_vec(account).map_err(|source| Error::Encode {
        what: "account",
        source,
    })?;
    batch.put(keys::account(&account.id), value);

    Ok(())
}

/// Queue the deletion of an account. Its control programs are kept, but they stop resolving.
pub fn delete_account(batch: &mut WriteBatch, account_id: &str) {
    batch.delete(keys::account(account_id));
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeMap, sync::RwLock};

    use tessera_storage::backends::btreemap;

    use super::*;

    fn backend() -> btreemap::Backend {
        RwLock::new(BTreeMap::new())
    }

    fn ctrl(account_id: &str, program: &[u8]) -> CtrlProgram {
        CtrlProgram {
            account_id: account_id.to_string(),
            key_index: 7,
            control_program: program.to_vec(),
            ..CtrlProgram::default()
        }
    }

    #[test]
    fn test_lookup_registered_program() {
        let db = backend();
        let mut batch = WriteBatch::default();
        insert_control_program(&mut batch, &ctrl("acc1", &[0x00, 0x01])).unwrap();
        Storage::write(&db, batch).unwrap();
        let registry = StorageRegistry::new(&db);

        let found = registry.lookup(&program_hash(&[0x00, 0x01])).unwrap();
        assert_eq!(found, Some(ctrl("acc1", &[0x00, 0x01])));
        assert_eq!(registry.lookup(&program_hash(&[0x00, 0x02])).unwrap(), None);
    }

    #[test]
    fn test_lookup_malformed_metadata() {
        let db = backend();
        db.put(keys::account_cp(&program_hash(&[0x01])), b"not json".to_vec())
            .unwrap();
        let registry = StorageRegistry::new(&db);

        match registry.lookup(&program_hash(&[0x01])) {
            Err(RegistryError::Decode { .. }) => {}
            other => panic!("expected a decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_account_exists() {
        let db = backend();
        let mut batch = WriteBatch::default();
        insert_account(
            &mut batch,
            &Account {
                id: "acc1".to_string(),
                alias: Some("alice".to_string()),
            },
        )
        .unwrap();
        Storage::write(&db, batch).unwrap();
        let registry = StorageRegistry::new(&db);

        assert!(registry.account_exists("acc1").unwrap());
        assert!(!registry.account_exists("acc2").unwrap());

        let mut batch = WriteBatch::default();
        delete_account(&mut batch, "acc1");
        Storage::write(&db, batch).unwrap();

        assert!(!registry.account_exists("acc1").unwrap());
    }
}
