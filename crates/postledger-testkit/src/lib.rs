//! # Post Ledger Testkit
//!
//! Testing utilities for the Post Ledger.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: the byte layout of stored records, pinned
//! - **Generators**: Proptest strategies and a reference model of the ledger
//! - **Fixtures**: actors with Ed25519 keys and a ready ledger
//!
//! ## Golden Vectors
//!
//! ```rust
//! use postledger_testkit::vectors::{golden_store, verify_all_vectors};
//!
//! let store = golden_store();
//! for (name, matches, _) in verify_all_vectors(&store) {
//!     assert!(matches, "{name}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use postledger_testkit::generators::{op_sequence, LedgerModel};
//!
//! proptest! {
//!     #[test]
//!     fn model_accepts(ops in op_sequence(3, 16)) {
//!         let mut model = LedgerModel::new();
//!         for op in &ops {
//!             model.apply(op);
//!         }
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use postledger::MsgCreatePost;
//! use postledger_testkit::fixtures::TestFixture;
//!
//! let mut fixture = TestFixture::new();
//! let signed = fixture
//!     .alice
//!     .sign(MsgCreatePost::new(fixture.alice.address(), "hello", "world"));
//! fixture.deliver(&signed).unwrap();
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_actors, SignedMsg, TestActor, TestFixture};
pub use generators::{op_sequence, run_op, LedgerModel, Op};
pub use vectors::{
    all_vectors, golden_store, replay_golden_scenario, verify_all_vectors, GoldenVector,
};
