//! # Post Ledger Store
//!
//! Storage abstraction for the Post Ledger. Provides a trait-based interface
//! to an ordered byte-string map with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! All ledger state lives in one key-value namespace behind the [`KvStore`]
//! trait. Components carve out their own region with a [`PrefixStore`] and
//! requests group their writes in a [`CacheKv`] branch that is committed or
//! dropped as a whole.
//!
//! ## Key Types
//!
//! - [`KvStore`] - The synchronous trait for all storage operations
//! - [`SqliteKv`] - SQLite-based persistent storage
//! - [`MemoryKv`] - In-memory storage for tests
//! - [`PrefixStore`] - Prefix-scoped view over a store
//! - [`CacheKv`] - Write-buffering branch, the per-request transaction
//! - [`StorageConfig`] / [`AnyStore`] - Backend selection
//!
//! ## Usage
//!
//! ```rust
//! use bytes::Bytes;
//! use postledger_store::{CacheKv, KvStore, MemoryKv, PrefixStore};
//!
//! let store = MemoryKv::new();
//!
//! let branch = CacheKv::new(&store);
//! PrefixStore::new(&branch, b"Post-").set(b"1", Bytes::from_static(b"hello")).unwrap();
//! assert!(store.get(b"Post-1").unwrap().is_none());
//!
//! branch.commit().unwrap();
//! assert!(store.get(b"Post-1").unwrap().is_some());
//! ```
//!
//! ## Design Notes
//!
//! - **Raw byte order**: iteration is ascending by `memcmp` on keys in every backend
//! - **Snapshot cursors**: each iteration call sees the state at call time
//! - **No built-in transactions**: atomicity comes from [`KvStore::apply`]

pub mod cache;
pub mod config;
pub mod error;
pub mod memory;
pub mod migration;
pub mod prefix;
pub mod sqlite;
pub mod traits;

pub use cache::CacheKv;
pub use config::{AnyStore, StorageConfig};
pub use error::{Result, StoreError};
pub use memory::MemoryKv;
pub use prefix::PrefixStore;
pub use sqlite::SqliteKv;
pub use traits::{prefix_end, KvIter, KvPair, KvStore, WriteBatch};
