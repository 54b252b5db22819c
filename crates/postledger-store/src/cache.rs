//! Write-buffering branch over a parent store.
//!
//! A [`CacheKv`] is the transaction boundary the ledger wraps around each
//! request. Reads see the branch's own writes first and fall through to the
//! parent. Nothing reaches the parent until [`CacheKv::commit`], which hands
//! every buffered write to the parent in a single [`KvStore::apply`] call.
//! Dropping the branch without committing discards the writes.

use std::collections::BTreeMap;
use std::sync::RwLock;

use bytes::Bytes;

use crate::error::{Result, StoreError};
use crate::memory::range_prefix;
use crate::traits::{KvIter, KvStore, WriteBatch};

/// A branch of `parent` holding uncommitted writes.
pub struct CacheKv<'a, S: KvStore + ?Sized> {
    parent: &'a S,
    writes: RwLock<BTreeMap<Vec<u8>, Bytes>>,
}

impl<'a, S: KvStore + ?Sized> CacheKv<'a, S> {
    /// Open a branch over `parent`.
    pub fn new(parent: &'a S) -> Self {
        Self {
            parent,
            writes: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of distinct keys written in this branch.
    pub fn pending(&self) -> Result<usize> {
        let writes = self.writes.read().map_err(StoreError::poisoned)?;
        Ok(writes.len())
    }

    /// Apply every buffered write to the parent as one unit.
    pub fn commit(self) -> Result<usize> {
        let writes = self.writes.into_inner().map_err(StoreError::poisoned)?;
        let count = writes.len();
        if count == 0 {
            return Ok(0);
        }

        let mut batch = WriteBatch::new();
        for (key, value) in writes {
            batch.set(key, value);
        }
        self.parent.apply(batch)?;
        Ok(count)
    }

    /// Drop every buffered write.
    pub fn discard(self) {
        drop(self);
    }
}

impl<'a, S: KvStore + ?Sized> KvStore for CacheKv<'a, S> {
    fn get(&self, key: &[u8]) -> Result<Option<Bytes>> {
        {
            let writes = self.writes.read().map_err(StoreError::poisoned)?;
            if let Some(value) = writes.get(key) {
                return Ok(Some(value.clone()));
            }
        }
        self.parent.get(key)
    }

    fn set(&self, key: &[u8], value: Bytes) -> Result<()> {
        let mut writes = self.writes.write().map_err(StoreError::poisoned)?;
        writes.insert(key.to_vec(), value);
        Ok(())
    }

    fn iter_prefix(&self, prefix: &[u8]) -> Result<KvIter> {
        let mut merged: BTreeMap<Vec<u8>, Bytes> = self.parent.iter_prefix(prefix)?.collect();
        {
            let writes = self.writes.read().map_err(StoreError::poisoned)?;
            merged.extend(range_prefix(&writes, prefix));
        }
        Ok(KvIter::from_sorted(merged.into_iter().collect()))
    }

    fn apply(&self, batch: WriteBatch) -> Result<()> {
        let mut writes = self.writes.write().map_err(StoreError::poisoned)?;
        for (key, value) in batch {
            writes.insert(key, value);
        }
        Ok(())
    }
}
