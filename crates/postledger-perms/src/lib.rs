//! # Post Ledger Permissions
//!
//! Signer checks and delegation records.
//!
//! ## Overview
//!
//! Every request is signed by one or more actors, verified upstream and
//! delivered here as [`Signers`]. A request acts as some identity, which it
//! names in its payload. This crate decides whether the signers may act as
//! that identity:
//!
//! - **Direct**: the identity itself signed the request.
//! - **Delegated**: the identity's recorded delegatee signed the request.
//!
//! ## Key Concepts
//!
//! - **Signers**: the verified signer set; never built from payload fields
//! - **Claim**: the identity a payload asks to act as
//! - **Authorization**: the checked result, carrying the identity to write as
//! - **Delegation**: a delegator -> delegatee record, one per delegator
//!
//! ## Delegation Model
//!
//! A delegator with no record is its own delegatee. Setting a delegation
//! replaces the previous one; there is no revocation back to "none". Only
//! the direct edge is honored, never a chain.
//!
//! ## Usage
//!
//! ```rust
//! use postledger_core::Address;
//! use postledger_perms::{Authorizer, Claim, DelegationRegistry, Signers};
//! use postledger_store::MemoryKv;
//!
//! let store = MemoryKv::new();
//! let alice = Address::parse("a11ce0").unwrap();
//! let bob = Address::parse("b0b0").unwrap();
//!
//! DelegationRegistry::new(&store).set_delegation(&alice, &bob).unwrap();
//!
//! let signers = Signers::verified([bob.clone()]).unwrap();
//! let claim = Claim::Delegated { delegator: alice.clone(), delegatee: bob };
//! let auth = Authorizer::new(&store).authorize(&signers, &claim).unwrap();
//! assert_eq!(auth.acting_as(), &alice);
//! ```

pub mod authorize;
pub mod delegation;
pub mod error;
pub mod signers;

pub use authorize::{require_signer, Authorization, Authorizer, Claim};
pub use delegation::{Delegation, DelegationRegistry};
pub use error::{DenyReason, PermsError, Result};
pub use signers::Signers;
