//! # Post Ledger Core
//!
//! Pure primitives for the Post Ledger: actor addresses, post records and
//! the persisted key layout.
//!
//! This crate contains no I/O and no storage. It defines the values the
//! other crates read and write.
//!
//! ## Key Types
//!
//! - [`Address`] - Actor identity, compared on raw bytes
//! - [`Post`] - An immutable, id-ordered post
//! - [`PostDraft`] - A post before the ledger assigns its id
//! - [`Listing`] - Enumeration result that reports corrupt records
//!
//! ## Key Layout
//!
//! See the [`keys`] module for the byte-exact prefixes.

pub mod address;
pub mod error;
pub mod keys;
pub mod listing;
pub mod post;

pub use address::{Address, DERIVED_ADDRESS_LEN, MAX_ADDRESS_LEN};
pub use error::{AddressError, CoreError, DecodeError};
pub use listing::Listing;
pub use post::{Post, PostDraft};
