//! Delegation records.
//!
//! A delegator may name one delegatee who is then allowed to publish posts
//! as the delegator. Records live under the [`DELEGATION_KEY`] prefix, keyed
//! by the delegator's bytes, with the delegatee's bytes as the value.
//!
//! A delegator with no record is its own delegatee. Lookups are therefore
//! total: there is no "not found" outcome, and an absent record behaves
//! exactly like an explicit self-delegation.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use postledger_core::keys::DELEGATION_KEY;
use postledger_core::{Address, DecodeError, Listing};
use postledger_store::{KvStore, PrefixStore};

use crate::error::{DenyReason, PermsError, Result};

/// A delegator -> delegatee edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    pub delegator: Address,
    pub delegatee: Address,
}

/// Delegation records over a store handle.
pub struct DelegationRegistry<'a, S: KvStore + ?Sized> {
    records: PrefixStore<'a, S>,
}

impl<'a, S: KvStore + ?Sized> DelegationRegistry<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            records: PrefixStore::new(store, DELEGATION_KEY),
        }
    }

    /// The address `delegator` currently delegates to, or `delegator` itself
    /// when it never delegated.
    pub fn get_delegatee(&self, delegator: &Address) -> Result<Address> {
        match self.records.get(delegator.as_bytes())? {
            Some(bytes) => decode_address(delegator.as_bytes(), &bytes),
            None => Ok(delegator.clone()),
        }
    }

    /// Record that `delegator` delegates to `delegatee`, replacing any
    /// previous record.
    pub fn set_delegation(&self, delegator: &Address, delegatee: &Address) -> Result<()> {
        self.records.set(
            delegator.as_bytes(),
            Bytes::copy_from_slice(delegatee.as_bytes()),
        )?;
        Ok(())
    }

    /// Check that `delegator`'s current delegatee is exactly
    /// `claimed_delegatee`.
    ///
    /// Only the direct edge is consulted. If A delegates to B and B to C,
    /// C is not A's delegatee.
    pub fn validate_delegation(
        &self,
        claimed_delegatee: &Address,
        delegator: &Address,
    ) -> Result<()> {
        let recorded = self.get_delegatee(delegator)?;
        if &recorded != claimed_delegatee {
            return Err(PermsError::NotAuthorized {
                claimed: claimed_delegatee.clone(),
                reason: DenyReason::DelegationMismatch {
                    delegator: delegator.clone(),
                    recorded,
                },
            });
        }
        Ok(())
    }

    /// Every stored delegation in ascending delegator byte order.
    ///
    /// Records that fail to decode are reported in the listing and do not
    /// stop the enumeration.
    pub fn delegations(&self) -> Result<Listing<Delegation>> {
        let listing = self
            .records
            .iter()?
            .map(|(key, value)| -> std::result::Result<Delegation, DecodeError> {
                let delegator = Address::from_bytes(&key)
                    .map_err(|e| DecodeError::new(key.clone(), e))?;
                let delegatee = decode_address(&key, &value).map_err(|e| match e {
                    PermsError::Decode(d) => d,
                    other => DecodeError::new(key.clone(), other),
                })?;
                Ok(Delegation {
                    delegator,
                    delegatee,
                })
            })
            .collect::<Listing<Delegation>>();

        for corrupt in &listing.corrupt {
            tracing::error!(error = %corrupt, "skipping corrupt delegation record");
        }
        Ok(listing)
    }
}

fn decode_address(key: &[u8], value: &[u8]) -> Result<Address> {
    Address::from_bytes(value).map_err(|e| PermsError::Decode(DecodeError::new(key, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use postledger_store::MemoryKv;
    use proptest::prelude::*;

    fn addr(text: &str) -> Address {
        Address::parse(text).unwrap()
    }

    #[test]
    fn test_undelegated_address_is_its_own_delegatee() {
        let store = MemoryKv::new();
        let registry = DelegationRegistry::new(&store);

        assert_eq!(registry.get_delegatee(&addr("aa")).unwrap(), addr("aa"));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_set_delegation_overwrites() {
        let store = MemoryKv::new();
        let registry = DelegationRegistry::new(&store);

        registry.set_delegation(&addr("aa"), &addr("bb")).unwrap();
        assert_eq!(registry.get_delegatee(&addr("aa")).unwrap(), addr("bb"));

        registry.set_delegation(&addr("aa"), &addr("cc")).unwrap();
        assert_eq!(registry.get_delegatee(&addr("aa")).unwrap(), addr("cc"));
        assert!(registry.validate_delegation(&addr("bb"), &addr("aa")).is_err());
    }

    #[test]
    fn test_record_layout() {
        let store = MemoryKv::new();
        DelegationRegistry::new(&store)
            .set_delegation(&addr("0102"), &addr("0304"))
            .unwrap();

        assert_eq!(
            store.get(b"Delegation-\x01\x02").unwrap(),
            Some(Bytes::from_static(&[0x03, 0x04]))
        );
    }

    #[test]
    fn test_validate_delegation_single_hop_only() {
        let store = MemoryKv::new();
        let registry = DelegationRegistry::new(&store);
        registry.set_delegation(&addr("aa"), &addr("bb")).unwrap();
        registry.set_delegation(&addr("bb"), &addr("cc")).unwrap();

        registry.validate_delegation(&addr("bb"), &addr("aa")).unwrap();
        let err = registry
            .validate_delegation(&addr("cc"), &addr("aa"))
            .unwrap_err();
        assert_eq!(err.claimed(), Some(&addr("cc")));
        assert!(matches!(
            err,
            PermsError::NotAuthorized {
                reason: DenyReason::DelegationMismatch { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_self_delegation_matches_default() {
        let store = MemoryKv::new();
        let registry = DelegationRegistry::new(&store);

        registry.validate_delegation(&addr("aa"), &addr("aa")).unwrap();
        registry.set_delegation(&addr("aa"), &addr("aa")).unwrap();
        registry.validate_delegation(&addr("aa"), &addr("aa")).unwrap();
    }

    #[test]
    fn test_delegations_reports_corrupt_records() {
        let store = MemoryKv::new();
        let registry = DelegationRegistry::new(&store);
        registry.set_delegation(&addr("01"), &addr("0a")).unwrap();
        registry.set_delegation(&addr("03"), &addr("0c")).unwrap();
        store.set(b"Delegation-\x02", Bytes::new()).unwrap();

        let listing = registry.delegations().unwrap();
        assert_eq!(
            listing.items,
            vec![
                Delegation {
                    delegator: addr("01"),
                    delegatee: addr("0a"),
                },
                Delegation {
                    delegator: addr("03"),
                    delegatee: addr("0c"),
                },
            ]
        );
        assert_eq!(listing.corrupt.len(), 1);
        assert_eq!(listing.corrupt[0].key, vec![0x02]);

        assert!(matches!(
            registry.get_delegatee(&addr("02")),
            Err(PermsError::Decode(_))
        ));
    }

    proptest! {
        #[test]
        fn test_delegate_then_lookup(
            delegator in prop::collection::vec(any::<u8>(), 1..32),
            delegatee in prop::collection::vec(any::<u8>(), 1..32),
        ) {
            let store = MemoryKv::new();
            let registry = DelegationRegistry::new(&store);
            let delegator = Address::from_bytes(&delegator).unwrap();
            let delegatee = Address::from_bytes(&delegatee).unwrap();

            prop_assert_eq!(registry.get_delegatee(&delegator).unwrap(), delegator.clone());
            registry.set_delegation(&delegator, &delegatee).unwrap();
            prop_assert_eq!(registry.get_delegatee(&delegator).unwrap(), delegatee);
        }
    }
}
