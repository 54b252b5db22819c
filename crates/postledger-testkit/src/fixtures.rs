//! Test fixtures and helpers.
//!
//! Common setup code for integration tests. Actors hold real Ed25519 keys;
//! [`SignedMsg::verify`] plays the transport's part of turning signatures
//! into a verified [`Signers`] set.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;

use postledger::{Ledger, LedgerConfig, Msg, MsgResponse};
use postledger_core::Address;
use postledger_perms::{PermsError, Signers};
use postledger_store::MemoryKv;

/// Domain prefix for message signatures.
pub const SIGN_DOMAIN: &[u8] = b"postledger-msg-v1:";

/// An identity with a signing key.
#[derive(Debug, Clone)]
pub struct TestActor {
    key: SigningKey,
    address: Address,
}

impl TestActor {
    /// Create an actor with a random key.
    pub fn generate() -> Self {
        Self::from_key(SigningKey::generate(&mut OsRng))
    }

    /// Create an actor with a deterministic key from seed.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self::from_key(SigningKey::from_bytes(&seed))
    }

    fn from_key(key: SigningKey) -> Self {
        let address = Address::from_public_key(key.verifying_key().as_bytes());
        Self { key, address }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        self.key.verifying_key()
    }

    /// A signer set holding only this actor.
    pub fn signers(&self) -> Signers {
        Signers::verified([self.address.clone()]).expect("one signer is never empty")
    }

    /// Sign `msg` as this actor.
    pub fn sign(&self, msg: impl Into<Msg>) -> SignedMsg {
        SignedMsg {
            msg: msg.into(),
            signatures: Vec::new(),
        }
        .cosign(self)
    }
}

/// A message with the signatures a transport would deliver alongside it.
#[derive(Debug, Clone)]
pub struct SignedMsg {
    pub msg: Msg,
    pub signatures: Vec<(VerifyingKey, Signature)>,
}

impl SignedMsg {
    /// Add `actor`'s signature.
    pub fn cosign(mut self, actor: &TestActor) -> Self {
        let signature = actor.key.sign(&signing_bytes(&self.msg));
        self.signatures.push((actor.verifying_key(), signature));
        self
    }

    /// Check every signature and return the signer set.
    ///
    /// `None` if any signature is invalid or there are none.
    pub fn verify(&self) -> Option<Signers> {
        let bytes = signing_bytes(&self.msg);
        let mut addresses = Vec::with_capacity(self.signatures.len());
        for (key, signature) in &self.signatures {
            key.verify(&bytes, signature).ok()?;
            addresses.push(Address::from_public_key(key.as_bytes()));
        }
        Signers::verified(addresses).ok()
    }
}

/// Bytes covered by a message signature.
pub fn signing_bytes(msg: &Msg) -> Vec<u8> {
    let mut bytes = SIGN_DOMAIN.to_vec();
    bytes.extend(serde_json::to_vec(msg).expect("messages always serialize"));
    bytes
}

/// A ledger with three actors.
pub struct TestFixture {
    pub ledger: Ledger<MemoryKv>,
    pub alice: TestActor,
    pub bob: TestActor,
    pub carol: TestActor,
}

impl TestFixture {
    /// Create a fixture with the default configuration.
    pub fn new() -> Self {
        Self::with_config(LedgerConfig::default())
    }

    pub fn with_config(config: LedgerConfig) -> Self {
        let mut actors = multi_party_actors(3).into_iter();
        let mut next = || actors.next().expect("three actors");
        Self {
            ledger: Ledger::new(MemoryKv::new(), config),
            alice: next(),
            bob: next(),
            carol: next(),
        }
    }

    /// Verify signatures, then deliver the message.
    pub fn deliver(&mut self, signed: &SignedMsg) -> postledger::Result<MsgResponse> {
        let signers = signed.verify().ok_or(PermsError::NoSigners)?;
        self.ledger.deliver(&signers, &signed.msg)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create actors with distinct deterministic keys.
pub fn multi_party_actors(count: usize) -> Vec<TestActor> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[..8].copy_from_slice(&(i as u64).to_be_bytes());
            TestActor::from_seed(seed)
        })
        .collect()
}
