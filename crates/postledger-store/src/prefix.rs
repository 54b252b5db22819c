//! Prefix-scoped views over a store.

use bytes::Bytes;

use crate::error::Result;
use crate::traits::{KvIter, KvStore};

/// A view of a parent store restricted to keys under `prefix`.
///
/// Keys passed in and returned are relative to the prefix. Several views
/// over the same parent share one physical namespace; the prefixes keep
/// them apart.
pub struct PrefixStore<'a, S: KvStore + ?Sized> {
    parent: &'a S,
    prefix: &'a [u8],
}

impl<'a, S: KvStore + ?Sized> PrefixStore<'a, S> {
    pub fn new(parent: &'a S, prefix: &'a [u8]) -> Self {
        Self { parent, prefix }
    }

    pub fn prefix(&self) -> &[u8] {
        self.prefix
    }

    fn full_key(&self, key: &[u8]) -> Vec<u8> {
        let mut full = Vec::with_capacity(self.prefix.len() + key.len());
        full.extend_from_slice(self.prefix);
        full.extend_from_slice(key);
        full
    }

    pub fn get(&self, key: &[u8]) -> Result<Option<Bytes>> {
        self.parent.get(&self.full_key(key))
    }

    pub fn set(&self, key: &[u8], value: impl Into<Bytes>) -> Result<()> {
        self.parent.set(&self.full_key(key), value.into())
    }

    pub fn contains(&self, key: &[u8]) -> Result<bool> {
        self.parent.contains(&self.full_key(key))
    }

    /// Iterate every pair in the view, keys stripped of the prefix.
    pub fn iter(&self) -> Result<KvIter> {
        Ok(self
            .parent
            .iter_prefix(self.prefix)?
            .strip_prefix(self.prefix.len()))
    }
}
