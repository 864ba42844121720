//! Module containing a `Storage` generic trait that can be implemented for different specific
//! storage backends, and the `WriteBatch` used to apply several mutations atomically.

use std::sync::Arc;

/// Result type used by all the storage backends. Backends wrap very different engine errors, so
/// they are carried as an opaque `anyhow::Error`.
pub type Result<T> = anyhow::Result<T>;

/// Iterator over key-value pairs
pub type StorageIterator<'a> = Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)> + 'a>;

/// This is a generic trait that exposes a very simple key/value CRUD API for data storage.
/// This trait can be easily implemented for any specific storage backend solution (databases,
/// volatile memory, flat files, etc.)
///
/// All the methods take `&self`: backends are expected to handle interior mutability, so that a
/// single handle can be shared between the writer and any number of readers.
pub trait Storage {
    /// Retrieve an entry from the storage, identified by its key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Create / update entries in the storage, identified by a key.
    fn put(&self, key: Vec<u8>, value: Vec<u8>) -> Result<()>;

    /// Delete an entry from the storage, identified by its key. Deleting a key that does not
    /// exist is not an error.
    fn delete(&self, key: &[u8]) -> Result<()>;

    /// Iterate over all the key-value pairs whose key starts with `prefix`, in key order.
    fn prefix_iterator<'a, 'b: 'a>(&'a self, prefix: &'b [u8]) -> Result<StorageIterator<'a>>;

    /// Atomically write a batch of operations: either all of them become visible or none does.
    fn write(&self, batch: WriteBatch) -> Result<()>;
}

/// Operations that can be queued in a `WriteBatch`
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WriteBatchItem {
    /// Set `key` to `value`, overwriting any previous value
    Put(Vec<u8>, Vec<u8>),
    /// Remove `key`, if present
    Delete(Vec<u8>),
}

/// Ordered collection of put and delete operations.
///
/// Operations are applied in insertion order when the batch is written, so a delete queued after
/// a put on the same key wins, and vice versa.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct WriteBatch {
    /// Queued operations
    pub batch: Vec<WriteBatchItem>,
}

impl WriteBatch {
    /// Queue a put operation
    pub fn put(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.batch.push(WriteBatchItem::Put(key, value));
    }

    /// Queue a delete operation
    pub fn delete(&mut self, key: Vec<u8>) {
        self.batch.push(WriteBatchItem::Delete(key));
    }

    /// Number of queued operations
    pub fn len(&self) -> usize {
        self.batch.len()
    }

    /// Whether no operation has been queued
    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }

    /// Iterate over the queued operations, in order
    pub fn iter(&self) -> std::slice::Iter<'_, WriteBatchItem> {
        self.batch.iter()
    }
}

// Allow sharing one storage handle between several owners.
impl<S: Storage + ?Sized> Storage for Arc<S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&self, key: Vec<u8>, value: Vec<u8>) -> Result<()> {
        (**self).put(key, value)
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        (**self).delete(key)
    }

    fn prefix_iterator<'a, 'b: 'a>(&'a self, prefix: &'b [u8]) -> Result<StorageIterator<'a>> {
        (**self).prefix_iterator(prefix)
    }

    fn write(&self, batch: WriteBatch) -> Result<()> {
        (**self).write(batch)
    }
}

impl<S: Storage + ?Sized> Storage for &S {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&self, key: Vec<u8>, value: Vec<u8>) -> Result<()> {
        (**self).put(key, value)
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        (**self).delete(key)
    }

    fn prefix_iterator<'a, 'b: 'a>(&'a self, prefix: &'b [u8]) -> Result<StorageIterator<'a>> {
        (**self).prefix_iterator(prefix)
    }

    fn write(&self, batch: WriteBatch) -> Result<()> {
        (**self).write(batch)
    }
}
