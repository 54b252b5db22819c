//! In-memory implementation of the KvStore trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::RwLock;

use bytes::Bytes;

use crate::error::{Result, StoreError};
use crate::traits::{prefix_end, KvIter, KvPair, KvStore, WriteBatch};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
#[derive(Debug, Default)]
pub struct MemoryKv {
    inner: RwLock<BTreeMap<Vec<u8>, Bytes>>,
}

impl MemoryKv {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys held.
    pub fn len(&self) -> Result<usize> {
        let inner = self.inner.read().map_err(StoreError::poisoned)?;
        Ok(inner.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// Collect the pairs of `map` whose key starts with `prefix`.
pub(crate) fn range_prefix(map: &BTreeMap<Vec<u8>, Bytes>, prefix: &[u8]) -> Vec<KvPair> {
    let upper = match prefix_end(prefix) {
        Some(end) => Bound::Excluded(end),
        None => Bound::Unbounded,
    };
    map.range::<Vec<u8>, _>((Bound::Included(prefix.to_vec()), upper))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

impl KvStore for MemoryKv {
    fn get(&self, key: &[u8]) -> Result<Option<Bytes>> {
        let inner = self.inner.read().map_err(StoreError::poisoned)?;
        Ok(inner.get(key).cloned())
    }

    fn set(&self, key: &[u8], value: Bytes) -> Result<()> {
        let mut inner = self.inner.write().map_err(StoreError::poisoned)?;
        inner.insert(key.to_vec(), value);
        Ok(())
    }

    fn iter_prefix(&self, prefix: &[u8]) -> Result<KvIter> {
        let inner = self.inner.read().map_err(StoreError::poisoned)?;
        Ok(KvIter::from_sorted(range_prefix(&inner, prefix)))
    }

    fn apply(&self, batch: WriteBatch) -> Result<()> {
        let mut inner = self.inner.write().map_err(StoreError::poisoned)?;
        for (key, value) in batch {
            inner.insert(key, value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_kv_basic() {
        let store = MemoryKv::new();
        assert_eq!(store.get(b"k").unwrap(), None);

        store.set(b"k", Bytes::from_static(b"v1")).unwrap();
        assert_eq!(store.get(b"k").unwrap(), Some(Bytes::from_static(b"v1")));

        store.set(b"k", Bytes::from_static(b"v2")).unwrap();
        assert_eq!(store.get(b"k").unwrap(), Some(Bytes::from_static(b"v2")));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_memory_kv_prefix_iteration_is_ordered_and_scoped() {
        let store = MemoryKv::new();
        store.set(b"b-2", Bytes::from_static(b"x")).unwrap();
        store.set(b"a-1", Bytes::from_static(b"x")).unwrap();
        store.set(b"b-1", Bytes::from_static(b"x")).unwrap();
        store.set(b"c", Bytes::from_static(b"x")).unwrap();

        let keys: Vec<Vec<u8>> = store.iter_prefix(b"b-").unwrap().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![b"b-1".to_vec(), b"b-2".to_vec()]);
    }

    #[test]
    fn test_memory_kv_iterator_is_a_snapshot() {
        let store = MemoryKv::new();
        store.set(b"p1", Bytes::from_static(b"x")).unwrap();

        let before = store.iter_prefix(b"p").unwrap();
        store.set(b"p2", Bytes::from_static(b"x")).unwrap();
        let after = store.iter_prefix(b"p").unwrap();

        assert_eq!(before.count(), 1);
        assert_eq!(after.count(), 2);
    }

    #[test]
    fn test_memory_kv_apply_batch() {
        let store = MemoryKv::new();
        let mut batch = WriteBatch::new();
        batch.set(b"x".to_vec(), Bytes::from_static(b"1"));
        batch.set(b"x".to_vec(), Bytes::from_static(b"2"));
        batch.set(b"y".to_vec(), Bytes::from_static(b"3"));
        store.apply(batch).unwrap();

        assert_eq!(store.get(b"x").unwrap(), Some(Bytes::from_static(b"2")));
        assert_eq!(store.get(b"y").unwrap(), Some(Bytes::from_static(b"3")));
    }

    #[test]
    fn test_memory_kv_high_byte_prefix() {
        let store = MemoryKv::new();
        store.set(&[0xff, 0x01], Bytes::from_static(b"x")).unwrap();
        store.set(&[0xfe], Bytes::from_static(b"x")).unwrap();

        let keys: Vec<Vec<u8>> = store.iter_prefix(&[0xff]).unwrap().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![vec![0xff, 0x01]]);
    }
}
