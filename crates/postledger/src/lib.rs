//! # Post Ledger
//!
//! An append-only ledger of posts where every write is checked against the
//! verified signers of the request.
//!
//! ## Overview
//!
//! The ledger accepts three requests:
//!
//! - **CreatePost**: publish a post as its author, who must have signed
//! - **Delegate**: name one identity allowed to post on the delegator's behalf
//! - **DelegatePost**: publish as the delegator, signed by its delegate
//!
//! Posts get dense ids starting at zero and are never edited or removed.
//! Anyone may read posts and delegations; only writes are checked.
//!
//! ## Key Concepts
//!
//! - **Signers**: who signed the request, as verified by the transport
//! - **Claim**: who the payload says the request acts as
//! - **Authorization**: a claim checked against the signers; the only source
//!   of the identity a handler writes as
//! - **Branch**: each request writes to a private branch of the store that
//!   is committed only if the request succeeds
//!
//! ## Usage
//!
//! ```rust
//! use postledger::{Ledger, LedgerConfig};
//! use postledger::core::Address;
//! use postledger::perms::Signers;
//! use postledger::store::MemoryKv;
//!
//! let mut ledger = Ledger::new(MemoryKv::new(), LedgerConfig::default());
//! let alice = Address::parse("a11ce0").unwrap();
//! let bob = Address::parse("b0b0").unwrap();
//!
//! let by_alice = Signers::verified([alice.clone()]).unwrap();
//! let by_bob = Signers::verified([bob.clone()]).unwrap();
//!
//! ledger.create_post(&by_alice, &alice, "hello", "first post").unwrap();
//! ledger.delegate(&by_alice, &alice, &bob).unwrap();
//! let id = ledger
//!     .delegate_post(&by_bob, &alice, &bob, "from bob", "posted for alice")
//!     .unwrap();
//!
//! let posts = ledger.list_posts().unwrap().items;
//! assert_eq!(posts[id as usize].author, alice);
//! ```
//!
//! ## Re-exports
//!
//! - `postledger::core` - Addresses, posts and the key layout
//! - `postledger::store` - Key-value stores, branches and backends
//! - `postledger::perms` - Signer sets, delegations and authorization

pub mod config;
pub mod error;
pub mod handlers;
pub mod ledger;
pub mod msgs;
pub mod posts;

// Re-export component crates
pub use postledger_core as core;
pub use postledger_perms as perms;
pub use postledger_store as store;

// Re-export main types for convenience
pub use config::LedgerConfig;
pub use error::{LedgerError, Result};
pub use handlers::Handler;
pub use ledger::Ledger;
pub use msgs::{Msg, MsgCreatePost, MsgDelegate, MsgDelegatePost, MsgResponse, ParsedMsg};
pub use posts::{PostLedger, Posts};

// Re-export commonly used types
pub use postledger_core::{Address, Listing, Post};
pub use postledger_perms::{Delegation, Signers};
