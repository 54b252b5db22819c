//! Actor identities.
//!
//! An [`Address`] is an opaque byte string. Equality, ordering and hashing
//! are defined on the raw bytes only; the text form is a rendering of those
//! bytes and is never compared directly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AddressError;

/// Maximum length of an address in bytes.
pub const MAX_ADDRESS_LEN: usize = 255;

/// Length of an address derived from a public key.
pub const DERIVED_ADDRESS_LEN: usize = 20;

/// An actor identity.
///
/// Canonical byte form is used as store-key material. Canonical text form is
/// lowercase hex; parsing accepts either case and always yields the same
/// bytes, so `Address::parse(&a.to_text()) == Ok(a)`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(Vec<u8>);

impl Address {
    /// Parse an address from its text form.
    pub fn parse(text: &str) -> Result<Self, AddressError> {
        if text.is_empty() {
            return Err(AddressError::Empty);
        }
        let bytes = hex::decode(text)?;
        Self::from_bytes(&bytes)
    }

    /// Build an address from its canonical bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AddressError> {
        if bytes.is_empty() {
            return Err(AddressError::Empty);
        }
        if bytes.len() > MAX_ADDRESS_LEN {
            return Err(AddressError::TooLong {
                len: bytes.len(),
                max: MAX_ADDRESS_LEN,
            });
        }
        Ok(Self(bytes.to_vec()))
    }

    /// Derive the address owned by a 32-byte public key.
    ///
    /// The address is the first [`DERIVED_ADDRESS_LEN`] bytes of
    /// `blake3(public_key)`.
    pub fn from_public_key(public_key: &[u8; 32]) -> Self {
        let hash = blake3::hash(public_key);
        Self(hash.as_bytes()[..DERIVED_ADDRESS_LEN].to_vec())
    }

    /// Get the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Render the canonical text form.
    pub fn to_text(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_text())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<&[u8]> for Address {
    type Error = AddressError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::parse(&text)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_text()
    }
}
