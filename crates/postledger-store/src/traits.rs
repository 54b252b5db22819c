//! KvStore trait: the abstract interface for ledger persistence.
//!
//! The ledger keeps all of its state in one ordered byte-string namespace.
//! Implementations include SQLite (primary) and in-memory (for tests), plus
//! the [`CacheKv`](crate::CacheKv) branch used as a per-request transaction.

use std::sync::Arc;

use bytes::Bytes;

use crate::error::Result;

/// A single key/value pair as returned by iteration.
pub type KvPair = (Vec<u8>, Bytes);

/// A set of writes applied together by [`KvStore::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    writes: Vec<KvPair>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a write. Later writes to the same key win.
    pub fn set(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Bytes>) {
        self.writes.push((key.into(), value.into()));
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KvPair> {
        self.writes.iter()
    }
}

impl IntoIterator for WriteBatch {
    type Item = KvPair;
    type IntoIter = std::vec::IntoIter<KvPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.writes.into_iter()
    }
}

/// Cursor over the pairs under a prefix, in ascending raw-byte key order.
///
/// The cursor owns an in-memory snapshot of every pair under the prefix,
/// copied out when it was created. Writes made after that point are not
/// observed, and two cursors never share a position.
#[derive(Debug)]
pub struct KvIter {
    inner: std::vec::IntoIter<KvPair>,
    strip: usize,
}

impl KvIter {
    /// Wrap pairs that are already sorted by key.
    pub fn from_sorted(pairs: Vec<KvPair>) -> Self {
        debug_assert!(pairs.windows(2).all(|w| w[0].0 < w[1].0));
        Self {
            inner: pairs.into_iter(),
            strip: 0,
        }
    }

    pub fn empty() -> Self {
        Self::from_sorted(Vec::new())
    }

    /// Drop the first `len` bytes of each key as it is yielded.
    ///
    /// Every key in the snapshot must be at least `len` bytes long.
    pub fn strip_prefix(mut self, len: usize) -> Self {
        self.strip += len;
        self
    }

    fn strip_key(&self, (mut key, value): KvPair) -> KvPair {
        key.drain(..self.strip);
        (key, value)
    }
}

impl Iterator for KvIter {
    type Item = KvPair;

    fn next(&mut self) -> Option<Self::Item> {
        let pair = self.inner.next()?;
        Some(self.strip_key(pair))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for KvIter {
    fn next_back(&mut self) -> Option<Self::Item> {
        let pair = self.inner.next_back()?;
        Some(self.strip_key(pair))
    }
}

impl ExactSizeIterator for KvIter {}

/// The KvStore trait: synchronous interface to an ordered byte-string map.
///
/// # Design Notes
///
/// - **No transactions**: a store applies each call as it arrives. Grouping
///   writes into an all-or-nothing unit is the caller's job, either through
///   [`KvStore::apply`] or a [`CacheKv`](crate::CacheKv) branch.
/// - **Ordering**: iteration compares keys as raw bytes, ascending.
/// - **Shared handles**: methods take `&self`; implementations synchronise
///   internally.
pub trait KvStore: Send + Sync {
    /// Read the value stored at `key`.
    fn get(&self, key: &[u8]) -> Result<Option<Bytes>>;

    /// Write `value` at `key`, replacing any previous value.
    fn set(&self, key: &[u8], value: Bytes) -> Result<()>;

    /// Iterate every pair whose key starts with `prefix`.
    ///
    /// Keys are returned in full, prefix included.
    fn iter_prefix(&self, prefix: &[u8]) -> Result<KvIter>;

    /// Apply every write in `batch` as one atomic unit.
    fn apply(&self, batch: WriteBatch) -> Result<()>;

    /// Check whether a key is present.
    fn contains(&self, key: &[u8]) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: KvStore + ?Sized> KvStore for &S {
    fn get(&self, key: &[u8]) -> Result<Option<Bytes>> {
        (**self).get(key)
    }

    fn set(&self, key: &[u8], value: Bytes) -> Result<()> {
        (**self).set(key, value)
    }

    fn iter_prefix(&self, prefix: &[u8]) -> Result<KvIter> {
        (**self).iter_prefix(prefix)
    }

    fn apply(&self, batch: WriteBatch) -> Result<()> {
        (**self).apply(batch)
    }
}

impl<S: KvStore + ?Sized> KvStore for Arc<S> {
    fn get(&self, key: &[u8]) -> Result<Option<Bytes>> {
        (**self).get(key)
    }

    fn set(&self, key: &[u8], value: Bytes) -> Result<()> {
        (**self).set(key, value)
    }

    fn iter_prefix(&self, prefix: &[u8]) -> Result<KvIter> {
        (**self).iter_prefix(prefix)
    }

    fn apply(&self, batch: WriteBatch) -> Result<()> {
        (**self).apply(batch)
    }
}

impl<S: KvStore + ?Sized> KvStore for Box<S> {
    fn get(&self, key: &[u8]) -> Result<Option<Bytes>> {
        (**self).get(key)
    }

    fn set(&self, key: &[u8], value: Bytes) -> Result<()> {
        (**self).set(key, value)
    }

    fn iter_prefix(&self, prefix: &[u8]) -> Result<KvIter> {
        (**self).iter_prefix(prefix)
    }

    fn apply(&self, batch: WriteBatch) -> Result<()> {
        (**self).apply(batch)
    }
}

/// Smallest key strictly greater than every key starting with `prefix`.
///
/// Returns `None` when no such key exists (empty prefix or all `0xff`).
pub fn prefix_end(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.pop() {
        if last < u8::MAX {
            end.push(last + 1);
            return Some(end);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kv_iter_strips_keys_from_both_ends() {
        let pairs = vec![
            (b"p/a".to_vec(), Bytes::from_static(b"1")),
            (b"p/b".to_vec(), Bytes::from_static(b"2")),
            (b"p/c".to_vec(), Bytes::from_static(b"3")),
        ];
        let mut iter = KvIter::from_sorted(pairs).strip_prefix(2);

        assert_eq!(iter.len(), 3);
        assert_eq!(iter.next().unwrap().0, b"a".to_vec());
        assert_eq!(iter.next_back().unwrap().0, b"c".to_vec());
        assert_eq!(iter.next(), Some((b"b".to_vec(), Bytes::from_static(b"2"))));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_prefix_end() {
        assert_eq!(prefix_end(b"abc"), Some(b"abd".to_vec()));
        assert_eq!(prefix_end(&[0x01, 0xff]), Some(vec![0x02]));
        assert_eq!(prefix_end(&[0xff, 0xff]), None);
        assert_eq!(prefix_end(b""), None);
    }

    #[test]
    fn test_write_batch_keeps_order() {
        let mut batch = WriteBatch::new();
        batch.set(b"b".to_vec(), Bytes::from_static(b"1"));
        batch.set(b"a".to_vec(), Bytes::from_static(b"2"));

        let keys: Vec<Vec<u8>> = batch.into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![b"b".to_vec(), b"a".to_vec()]);
    }
}
