//! Error types for the Post Ledger core.

use thiserror::Error;

/// Errors produced when parsing or decoding an [`Address`](crate::Address).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AddressError {
    #[error("address is empty")]
    Empty,

    #[error("address is {len} bytes, maximum is {max}")]
    TooLong { len: usize, max: usize },

    #[error("address is not valid hex: {0}")]
    InvalidEncoding(#[from] hex::FromHexError),
}

/// Core errors that can occur while encoding or decoding records.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid address: {0}")]
    InvalidAddress(#[from] AddressError),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

/// A stored record that could not be decoded.
///
/// Carries the raw key so the caller can report exactly which record is
/// corrupt without aborting the surrounding enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot decode record {}: {}", hex::encode(.key), .reason)]
pub struct DecodeError {
    /// Key of the record with its namespace prefix stripped: the big-endian
    /// id for posts, the delegator's bytes for delegations.
    pub key: Vec<u8>,
    /// Why decoding failed.
    pub reason: String,
}

impl DecodeError {
    pub fn new(key: impl Into<Vec<u8>>, reason: impl ToString) -> Self {
        Self {
            key: key.into(),
            reason: reason.to_string(),
        }
    }
}
