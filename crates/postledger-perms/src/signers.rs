//! Verified signer sets.
//!
//! [`Signers`] is the only representation of "who signed this request" the
//! authorization checks accept. It is built by the transport layer after it
//! has verified the signatures, and nothing converts a request payload field
//! into it. A payload field that happens to be called "signer" is just a
//! claimed identity and goes through the same checks as any other.

use std::collections::BTreeSet;

use postledger_core::Address;

use crate::error::{PermsError, Result};

/// Non-empty set of addresses whose signatures the transport verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signers(BTreeSet<Address>);

impl Signers {
    /// Wrap the addresses the transport verified for one request.
    ///
    /// Fails with [`PermsError::NoSigners`] when the set is empty.
    pub fn verified(addresses: impl IntoIterator<Item = Address>) -> Result<Self> {
        let set: BTreeSet<Address> = addresses.into_iter().collect();
        if set.is_empty() {
            return Err(PermsError::NoSigners);
        }
        Ok(Self(set))
    }

    /// Whether `address` signed the request.
    pub fn contains(&self, address: &Address) -> bool {
        self.0.contains(address)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Signers {
    type Item = &'a Address;
    type IntoIter = std::collections::btree_set::Iter<'a, Address>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
