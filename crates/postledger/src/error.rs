//! Error types for the Ledger.

use postledger_core::{AddressError, CoreError, DecodeError};
use postledger_perms::PermsError;
use postledger_store::StoreError;
use thiserror::Error;

/// Errors that can occur during Ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A request field holds malformed address text.
    #[error("invalid {field} address: {source}")]
    InvalidAddress {
        field: &'static str,
        #[source]
        source: AddressError,
    },

    /// The signer set does not authorize the request.
    #[error("permission error: {0}")]
    Permission(#[source] PermsError),

    /// Encoding a record failed.
    #[error("encoding error: {0}")]
    Core(#[from] CoreError),

    /// A stored record could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Stored state contradicts itself. Fatal: the ledger stops accepting
    /// requests once this is seen.
    #[error("ledger invariant violated: {0}")]
    InvariantViolation(String),

    /// The ledger stopped after an earlier invariant violation.
    #[error("ledger halted after an invariant violation")]
    Halted,

    /// Configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Decode and storage failures keep their own variants; only refusals
/// surface as [`LedgerError::Permission`].
impl From<PermsError> for LedgerError {
    fn from(e: PermsError) -> Self {
        match e {
            PermsError::Decode(d) => LedgerError::Decode(d),
            PermsError::Store(s) => LedgerError::Store(s),
            other => LedgerError::Permission(other),
        }
    }
}

impl LedgerError {
    pub(crate) fn invalid_address(field: &'static str) -> impl FnOnce(AddressError) -> Self {
        move |source| LedgerError::InvalidAddress { field, source }
    }

    /// Whether the request was refused by the signer or delegation checks.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            LedgerError::Permission(PermsError::NotAuthorized { .. })
        )
    }

    /// Whether this error means stored state can no longer be trusted.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            LedgerError::InvariantViolation(_) | LedgerError::Halted
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postledger_core::Address;

    #[test]
    fn test_perms_decode_failure_is_not_a_refusal() {
        let err = LedgerError::from(PermsError::Decode(DecodeError::new(vec![0x02], "empty")));
        assert!(matches!(err, LedgerError::Decode(_)));
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_perms_refusal_stays_a_permission_error() {
        let err = LedgerError::from(PermsError::NotAuthorized {
            claimed: Address::parse("aa").unwrap(),
            reason: postledger_perms::DenyReason::NotASigner,
        });
        assert!(err.is_unauthorized());
    }
}

/// Result type for Ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
