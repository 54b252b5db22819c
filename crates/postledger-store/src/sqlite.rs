//! SQLite implementation of the KvStore trait.
//!
//! This is the persistent storage backend for the Post Ledger. It uses
//! rusqlite with bundled SQLite and a single `kv` table.

use std::path::Path;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{prefix_end, KvIter, KvPair, KvStore, WriteBatch};

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. Cloning shares the connection.
#[derive(Clone)]
pub struct SqliteKv {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteKv {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        tracing::debug!(path = %path.display(), "opened sqlite store");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Execute a blocking operation on the connection.
    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(StoreError::poisoned)?;
        f(&conn)
    }

    /// Execute a blocking operation that needs mutable access.
    fn with_conn_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self.conn.lock().map_err(StoreError::poisoned)?;
        f(&mut conn)
    }
}

fn row_to_pair(row: &rusqlite::Row<'_>) -> rusqlite::Result<KvPair> {
    let key: Vec<u8> = row.get(0)?;
    let value: Vec<u8> = row.get(1)?;
    Ok((key, Bytes::from(value)))
}

impl KvStore for SqliteKv {
    fn get(&self, key: &[u8]) -> Result<Option<Bytes>> {
        self.with_conn(|conn| {
            let value: Option<Vec<u8>> = conn
                .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                    row.get(0)
                })
                .optional()?;
            Ok(value.map(Bytes::from))
        })
    }

    fn set(&self, key: &[u8], value: Bytes) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                params![key, value.as_ref()],
            )?;
            Ok(())
        })
    }

    fn iter_prefix(&self, prefix: &[u8]) -> Result<KvIter> {
        self.with_conn(|conn| {
            let pairs = match prefix_end(prefix) {
                Some(end) => {
                    let mut stmt = conn.prepare_cached(
                        "SELECT key, value FROM kv WHERE key >= ?1 AND key < ?2 ORDER BY key",
                    )?;
                    let rows = stmt.query_map(params![prefix, end], row_to_pair)?;
                    rows.collect::<rusqlite::Result<Vec<_>>>()?
                }
                None => {
                    let mut stmt = conn
                        .prepare_cached("SELECT key, value FROM kv WHERE key >= ?1 ORDER BY key")?;
                    let rows = stmt.query_map(params![prefix], row_to_pair)?;
                    rows.collect::<rusqlite::Result<Vec<_>>>()?
                }
            };
            Ok(KvIter::from_sorted(pairs))
        })
    }

    fn apply(&self, batch: WriteBatch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let writes = batch.len();
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt =
                    tx.prepare_cached("INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)")?;
                for (key, value) in batch {
                    stmt.execute(params![key, value.as_ref()])?;
                }
            }
            tx.commit()?;
            tracing::trace!(writes, "applied write batch");
            Ok(())
        })
    }
}
