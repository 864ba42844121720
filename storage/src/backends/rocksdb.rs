//! # Rocksdb storage backend
//!
//! Storage backend that persists data in the file system using a RocksDB database.
use std::path::Path;

use crate::storage::{Result, Storage, StorageIterator, WriteBatch, WriteBatchItem};

/// Rocksdb backend
pub type Backend = rocksdb::DB;

/// Open the database stored at `path`
pub fn open<P: AsRef<Path>>(path: P, create_if_missing: bool) -> Result<Backend> {
    let mut options = rocksdb::Options::default();
    options.create_if_missing(create_if_missing);

    let db = Backend::open(&options, path.as_ref())?;
    log::debug!("Opened rocksdb storage at {}", path.as_ref().display());

    Ok(db)
}

/// Read the pairs whose key starts with `prefix` from a forward iterator positioned at `prefix`.
/// A failed read aborts the whole scan.
fn collect_prefix<I, K, V, E>(iter: I, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>>
where
    I: IntoIterator<Item = std::result::Result<(K, V), E>>,
    K: AsRef<[u8]> + Into<Vec<u8>>,
    V: Into<Vec<u8>>,
    E: std::error::Error + Send + Sync + 'static,
{
    let mut entries = vec![];
    for item in iter {
        let (key, value) = item?;
        if !key.as_ref().starts_with(prefix) {
            break;
        }
        entries.push((key.into(), value.into()));
    }

    Ok(entries)
}

impl Storage for Backend {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let result = Backend::get(self, key)?;

        Ok(result)
    }

    fn put(&self, key: Vec<u8>, value: Vec<u8>) -> Result<()> {
        Backend::put(self, key, value)?;

        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        Backend::delete(self, key)?;

        Ok(())
    }

    fn prefix_iterator<'a, 'b: 'a>(&'a self, prefix: &'b [u8]) -> Result<StorageIterator<'a>> {
        let entries = collect_prefix(
            Backend::iterator(
                self,
                rocksdb::IteratorMode::From(prefix, rocksdb::Direction::Forward),
            ),
            prefix,
        )?;

        Ok(Box::new(entries.into_iter()))
    }

    /// Atomically write a batch of operations
    fn write(&self, batch: WriteBatch) -> Result<()> {
        let mut rocksdb_batch = rocksdb::WriteBatch::default();

        for item in batch.batch {
            match item {
                WriteBatchItem::Put(key, value) => {
                    rocksdb_batch.put(key, value);
                }
                WriteBatchItem::Delete(key) => {
                    rocksdb_batch.delete(key);
                }
            }
        }

        Backend::write(self, rocksdb_batch)?;

        Ok(())
    }
}
