//! # BTreeMap storage backend
//!
//! Storage backend that keeps data in a heap-allocated BTreeMap. Nothing is persisted, which
//! makes it the backend of choice for tests.
use std::{collections::BTreeMap, sync::RwLock};

use anyhow::anyhow;

use crate::storage::{Result, Storage, StorageIterator, WriteBatch, WriteBatchItem};

/// BTreeMap backend
pub type Backend = RwLock<BTreeMap<Vec<u8>, Vec<u8>>>;

fn poisoned<T>(_err: T) -> anyhow::Error {
    anyhow!("btreemap backend lock is poisoned")
}

impl Storage for Backend {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let map = self.read().map_err(poisoned)?;

        Ok(map.get(key).cloned())
    }

    fn put(&self, key: Vec<u8>, value: Vec<u8>) -> Result<()> {
        self.write().map_err(poisoned)?.insert(key, value);

        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        self.write().map_err(poisoned)?.remove(key);

        Ok(())
    }

    fn prefix_iterator<'a, 'b: 'a>(&'a self, prefix: &'b [u8]) -> Result<StorageIterator<'a>> {
        // Take a snapshot, so that the lock is not held while the caller iterates
        let entries: Vec<(Vec<u8>, Vec<u8>)> = self
            .read()
            .map_err(poisoned)?
            .range(prefix.to_vec()..)
            .take_while(|(k, _v)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Ok(Box::new(entries.into_iter()))
    }

    fn write(&self, batch: WriteBatch) -> Result<()> {
        let mut map = self.write().map_err(poisoned)?;

        for item in batch.batch {
            match item {
                WriteBatchItem::Put(key, value) => {
                    map.insert(key, value);
                }
                WriteBatchItem::Delete(key) => {
                    map.remove(&key);
                }
            }
        }

        Ok(())
    }
}
