//! Deciding whether a signer set may act as a claimed identity.
//!
//! Requests name the identity they act as in their payload. Payload fields
//! are chosen by whoever built the request, so they are only ever treated as
//! a [`Claim`]. The [`Authorizer`] resolves a claim against the verified
//! [`Signers`] and, for delegated claims, the delegation records. On success
//! it hands back an [`Authorization`]; callers take the identity they write
//! as from that value and from nowhere else.

use postledger_core::Address;
use postledger_store::KvStore;

use crate::delegation::DelegationRegistry;
use crate::error::{PermsError, Result};
use crate::signers::Signers;

/// An identity a request claims to act as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim {
    /// Acting as `identity`, which must itself have signed.
    Direct(Address),
    /// Acting as `delegator` through `delegatee`, which must have signed and
    /// must be the delegator's recorded delegatee.
    Delegated {
        delegator: Address,
        delegatee: Address,
    },
}

impl Claim {
    /// The identity the request acts as once authorized.
    pub fn acting_as(&self) -> &Address {
        match self {
            Claim::Direct(identity) => identity,
            Claim::Delegated { delegator, .. } => delegator,
        }
    }

    /// The identity whose signature the claim requires.
    pub fn required_signer(&self) -> &Address {
        match self {
            Claim::Direct(identity) => identity,
            Claim::Delegated { delegatee, .. } => delegatee,
        }
    }
}

/// Proof that a claim was checked against a signer set.
///
/// Only [`Authorizer::authorize`] constructs this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorization {
    acting_as: Address,
    signer: Address,
}

impl Authorization {
    /// The identity the request may act as.
    pub fn acting_as(&self) -> &Address {
        &self.acting_as
    }

    /// The verified signer that satisfied the claim.
    pub fn signer(&self) -> &Address {
        &self.signer
    }

    /// Whether the request acts through a delegation.
    pub fn is_delegated(&self) -> bool {
        self.acting_as != self.signer
    }
}

/// Resolves claims against signer sets and delegation records.
pub struct Authorizer<'a, S: KvStore + ?Sized> {
    delegations: DelegationRegistry<'a, S>,
}

impl<'a, S: KvStore + ?Sized> Authorizer<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            delegations: DelegationRegistry::new(store),
        }
    }

    /// Check `claim` against `signers`.
    pub fn authorize(&self, signers: &Signers, claim: &Claim) -> Result<Authorization> {
        match claim {
            Claim::Direct(identity) => {
                require_signer(signers, identity)?;
            }
            Claim::Delegated {
                delegator,
                delegatee,
            } => {
                require_signer(signers, delegatee)?;
                self.delegations.validate_delegation(delegatee, delegator)?;
            }
        }

        Ok(Authorization {
            acting_as: claim.acting_as().clone(),
            signer: claim.required_signer().clone(),
        })
    }
}

/// Direct-signer check: `claimed` must be in the verified set.
pub fn require_signer(signers: &Signers, claimed: &Address) -> Result<()> {
    if signers.contains(claimed) {
        Ok(())
    } else {
        Err(PermsError::not_a_signer(claimed))
    }
}
