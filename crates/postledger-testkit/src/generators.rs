//! Proptest generators for property-based testing.
//!
//! [`op_sequence`] generates random request sequences over a small set of
//! actors. [`LedgerModel`] predicts which of them a correct ledger accepts
//! and what it ends up holding, so tests can compare the two.

use std::collections::BTreeMap;

use proptest::prelude::*;

use postledger::Ledger;
use postledger_core::Address;
use postledger_store::KvStore;

use crate::fixtures::TestActor;

/// Generate an actor from a random seed.
pub fn actor() -> impl Strategy<Value = TestActor> {
    any::<[u8; 32]>().prop_map(TestActor::from_seed)
}

/// Generate an address of 1 to 32 bytes.
pub fn address() -> impl Strategy<Value = Address> {
    prop::collection::vec(any::<u8>(), 1..=32)
        .prop_map(|bytes| Address::from_bytes(&bytes).expect("length is in range"))
}

/// Generate a post title.
pub fn title() -> impl Strategy<Value = String> {
    ".{0,40}".prop_map(String::from)
}

/// Generate a post body.
pub fn body() -> impl Strategy<Value = String> {
    ".{0,200}".prop_map(String::from)
}

/// A request over actor indices. `signer` is the actor that signs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    CreatePost {
        author: usize,
        signer: usize,
    },
    Delegate {
        delegator: usize,
        delegatee: usize,
        signer: usize,
    },
    DelegatePost {
        delegator: usize,
        delegatee: usize,
        signer: usize,
    },
}

/// Generate one request over `actors` actors.
pub fn op(actors: usize) -> impl Strategy<Value = Op> {
    let idx = 0..actors;
    prop_oneof![
        (idx.clone(), idx.clone()).prop_map(|(author, signer)| Op::CreatePost { author, signer }),
        (idx.clone(), idx.clone(), idx.clone()).prop_map(|(delegator, delegatee, signer)| {
            Op::Delegate {
                delegator,
                delegatee,
                signer,
            }
        }),
        (idx.clone(), idx.clone(), idx).prop_map(|(delegator, delegatee, signer)| {
            Op::DelegatePost {
                delegator,
                delegatee,
                signer,
            }
        }),
    ]
}

/// Generate up to `max_len` requests over `actors` actors.
pub fn op_sequence(actors: usize, max_len: usize) -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(op(actors), 0..=max_len)
}

/// Reference model of the ledger over actor indices.
#[derive(Debug, Clone, Default)]
pub struct LedgerModel {
    /// Recorded delegatee per delegator.
    pub delegatees: BTreeMap<usize, usize>,
    /// Author of each post, by id.
    pub authors: Vec<usize>,
}

impl LedgerModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delegatee_of(&self, delegator: usize) -> usize {
        self.delegatees.get(&delegator).copied().unwrap_or(delegator)
    }

    /// Apply `op`, returning whether a correct ledger accepts it.
    pub fn apply(&mut self, op: &Op) -> bool {
        match *op {
            Op::CreatePost { author, signer } => {
                if author != signer {
                    return false;
                }
                self.authors.push(author);
                true
            }
            Op::Delegate {
                delegator,
                delegatee,
                signer,
            } => {
                if delegator != signer {
                    return false;
                }
                self.delegatees.insert(delegator, delegatee);
                true
            }
            Op::DelegatePost {
                delegator,
                delegatee,
                signer,
            } => {
                if delegatee != signer || self.delegatee_of(delegator) != delegatee {
                    return false;
                }
                self.authors.push(delegator);
                true
            }
        }
    }
}

/// Run `op` against `ledger` with each actor signing for itself.
pub fn run_op<S: KvStore>(
    ledger: &mut Ledger<S>,
    actors: &[TestActor],
    op: &Op,
) -> postledger::Result<()> {
    match *op {
        Op::CreatePost { author, signer } => ledger
            .create_post(
                &actors[signer].signers(),
                actors[author].address(),
                "title",
                "body",
            )
            .map(drop),
        Op::Delegate {
            delegator,
            delegatee,
            signer,
        } => ledger.delegate(
            &actors[signer].signers(),
            actors[delegator].address(),
            actors[delegatee].address(),
        ),
        Op::DelegatePost {
            delegator,
            delegatee,
            signer,
        } => ledger
            .delegate_post(
                &actors[signer].signers(),
                actors[delegator].address(),
                actors[delegatee].address(),
                "title",
                "body",
            )
            .map(drop),
    }
}
