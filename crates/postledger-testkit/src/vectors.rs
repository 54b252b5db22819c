//! Golden storage vectors.
//!
//! These vectors pin the byte layout of stored records. A fixed scenario is
//! replayed on a fresh ledger and the resulting store is compared key by key
//! against the expected hex.

use postledger::{Ledger, LedgerConfig};
use postledger_core::{Address, CoreError};
use postledger_perms::Signers;
use postledger_store::{KvStore, MemoryKv};

/// An expected record in the store.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Expected key (hex).
    pub key: &'static str,
    /// Expected value (hex). `None` when only the key is pinned.
    pub value: Option<&'static str>,
}

/// Delegator used by the golden scenario.
pub const GOLDEN_DELEGATOR: &str = "a11ce0";
/// Delegatee used by the golden scenario.
pub const GOLDEN_DELEGATEE: &str = "b0b0";

/// Get all golden vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "first post",
            // "Post-value-" ++ be64(0)
            key: "506f73742d76616c75652d0000000000000000",
            value: None,
        },
        GoldenVector {
            name: "second post",
            key: "506f73742d76616c75652d0000000000000001",
            value: None,
        },
        GoldenVector {
            name: "post counter",
            // "Post-count-" ++ "Post-count-"
            key: "506f73742d636f756e742d506f73742d636f756e742d",
            value: Some("0000000000000002"),
        },
        GoldenVector {
            name: "delegation",
            // "Delegation-" ++ delegator bytes
            key: "44656c65676174696f6e2da11ce0",
            value: Some("b0b0"),
        },
    ]
}

/// Replay the scenario the golden vectors describe.
///
/// The delegator posts once, delegates, and the delegatee posts on its
/// behalf.
pub fn replay_golden_scenario<S: KvStore>(ledger: &mut Ledger<S>) -> postledger::Result<()> {
    let delegator = Address::parse(GOLDEN_DELEGATOR).map_err(CoreError::from)?;
    let delegatee = Address::parse(GOLDEN_DELEGATEE).map_err(CoreError::from)?;
    let by_delegator = Signers::verified([delegator.clone()])?;
    let by_delegatee = Signers::verified([delegatee.clone()])?;

    ledger.create_post(&by_delegator, &delegator, "hello", "world")?;
    ledger.delegate(&by_delegator, &delegator, &delegatee)?;
    ledger.delegate_post(&by_delegatee, &delegator, &delegatee, "on behalf", "of a11ce0")?;
    Ok(())
}

/// A memory store holding the golden scenario.
pub fn golden_store() -> MemoryKv {
    let mut ledger = Ledger::new(MemoryKv::new(), LedgerConfig::default());
    replay_golden_scenario(&mut ledger).expect("golden scenario replays");
    ledger.into_store()
}

/// Check every golden vector against `store`.
///
/// Returns `(name, matches, found_value_hex)` per vector.
pub fn verify_all_vectors(store: &impl KvStore) -> Vec<(String, bool, Option<String>)> {
    all_vectors()
        .iter()
        .map(|v| {
            let found = hex::decode(v.key)
                .ok()
                .and_then(|key| store.get(&key).ok().flatten())
                .map(hex::encode);

            let matches = match (&found, v.value) {
                (Some(found), Some(expected)) => found == expected,
                (Some(_), None) => true,
                (None, _) => false,
            };
            (v.name.to_string(), matches, found)
        })
        .collect()
}
