//! Backend selection.

use std::path::PathBuf;

use bytes::Bytes;
use serde::Deserialize;

use crate::error::Result;
use crate::memory::MemoryKv;
use crate::sqlite::SqliteKv;
use crate::traits::{KvIter, KvStore, WriteBatch};

/// Which backend to open and where.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Volatile in-memory map.
    Memory,
    /// SQLite database file, created and migrated on open.
    Sqlite { path: PathBuf },
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Memory
    }
}

impl StorageConfig {
    /// Open the configured backend.
    pub fn open(&self) -> Result<AnyStore> {
        match self {
            StorageConfig::Memory => Ok(AnyStore::Memory(MemoryKv::new())),
            StorageConfig::Sqlite { path } => Ok(AnyStore::Sqlite(SqliteKv::open(path)?)),
        }
    }
}

/// A store opened from a [`StorageConfig`].
pub enum AnyStore {
    Memory(MemoryKv),
    Sqlite(SqliteKv),
}

impl KvStore for AnyStore {
    fn get(&self, key: &[u8]) -> Result<Option<Bytes>> {
        match self {
            AnyStore::Memory(s) => s.get(key),
            AnyStore::Sqlite(s) => s.get(key),
        }
    }

    fn set(&self, key: &[u8], value: Bytes) -> Result<()> {
        match self {
            AnyStore::Memory(s) => s.set(key, value),
            AnyStore::Sqlite(s) => s.set(key, value),
        }
    }

    fn iter_prefix(&self, prefix: &[u8]) -> Result<KvIter> {
        match self {
            AnyStore::Memory(s) => s.iter_prefix(prefix),
            AnyStore::Sqlite(s) => s.iter_prefix(prefix),
        }
    }

    fn apply(&self, batch: WriteBatch) -> Result<()> {
        match self {
            AnyStore::Memory(s) => s.apply(batch),
            AnyStore::Sqlite(s) => s.apply(batch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_memory() {
        let store = StorageConfig::default().open().unwrap();
        assert!(matches!(store, AnyStore::Memory(_)));
    }

    #[test]
    fn test_open_sqlite_backend() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig::Sqlite {
            path: dir.path().join("kv.db"),
        };
        let store = config.open().unwrap();
        store.set(b"k", Bytes::from_static(b"v")).unwrap();

        assert!(matches!(store, AnyStore::Sqlite(_)));
        assert_eq!(store.get(b"k").unwrap(), Some(Bytes::from_static(b"v")));
    }
}
