//! Error types for the permissions module.

use std::fmt;

use postledger_core::{Address, DecodeError};
use postledger_store::StoreError;
use thiserror::Error;

/// Why a signer set failed to authorize a claimed identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// The claimed identity is not in the verified signer set.
    NotASigner,
    /// The delegator's recorded delegatee is a different address.
    DelegationMismatch {
        delegator: Address,
        recorded: Address,
    },
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::NotASigner => f.write_str("did not sign the request"),
            DenyReason::DelegationMismatch {
                delegator,
                recorded,
            } => write!(f, "{} delegates to {}", delegator, recorded),
        }
    }
}

/// Errors that can occur during permission operations.
#[derive(Debug, Error)]
pub enum PermsError {
    /// The signer set does not entitle the request to act as `claimed`.
    #[error("not authorized to act as {claimed}: {reason}")]
    NotAuthorized { claimed: Address, reason: DenyReason },

    /// The transport handed over an empty signer set.
    #[error("request carries no verified signers")]
    NoSigners,

    /// A stored delegation record could not be decoded.
    #[error("corrupt delegation record: {0}")]
    Decode(#[from] DecodeError),

    /// Storage error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl PermsError {
    pub(crate) fn not_a_signer(claimed: &Address) -> Self {
        PermsError::NotAuthorized {
            claimed: claimed.clone(),
            reason: DenyReason::NotASigner,
        }
    }

    /// The identity that was refused, if this is an authorization failure.
    pub fn claimed(&self) -> Option<&Address> {
        match self {
            PermsError::NotAuthorized { claimed, .. } => Some(claimed),
            _ => None,
        }
    }
}

/// Result type for permission operations.
pub type Result<T> = std::result::Result<T, PermsError>;
