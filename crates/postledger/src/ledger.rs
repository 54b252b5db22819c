//! The Ledger: request entry point and query surface.

use postledger_core::{Address, Listing, Post};
use postledger_perms::{Delegation, DelegationRegistry, Signers};
use postledger_store::{AnyStore, CacheKv, KvStore};

use crate::config::LedgerConfig;
use crate::error::{LedgerError, Result};
use crate::handlers::Handler;
use crate::msgs::{Msg, MsgResponse};
use crate::posts::{PostLedger, Posts};

/// A post ledger over an owned store.
///
/// Requests run one at a time (`&mut self`). Each runs in its own branch of
/// the store and is committed only if it succeeds, so a rejected request
/// leaves no writes behind. Queries (`&self`) see committed state only.
///
/// An invariant violation halts the ledger: the offending request is
/// dropped and every later request fails with [`LedgerError::Halted`].
/// Queries keep working so the state can be inspected.
pub struct Ledger<S: KvStore> {
    /// The storage backend.
    store: S,
    /// Configuration.
    config: LedgerConfig,
    /// Set once an invariant violation is seen.
    halted: bool,
}

impl Ledger<AnyStore> {
    /// Open the storage backend named in `config` and wrap it.
    pub fn open(config: LedgerConfig) -> Result<Self> {
        let store = config.storage.open()?;
        Ok(Self::new(store, config))
    }
}

impl<S: KvStore> Ledger<S> {
    pub fn new(store: S, config: LedgerConfig) -> Self {
        Self {
            store,
            config,
            halted: false,
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give up the ledger and return its store.
    pub fn into_store(self) -> S {
        self.store
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Whether the ledger stopped after an invariant violation.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Requests
    // ─────────────────────────────────────────────────────────────────────────

    /// Run `msg` on behalf of the verified `signers`.
    pub fn deliver(&mut self, signers: &Signers, msg: &Msg) -> Result<MsgResponse> {
        self.transact(msg.type_name(), |handler| handler.handle(signers, msg))
    }

    /// Publish a post as `author`.
    pub fn create_post(
        &mut self,
        signers: &Signers,
        author: &Address,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<u64> {
        let (title, body) = (title.into(), body.into());
        self.transact("create_post", |handler| {
            handler.create_post(signers, author, title, body)
        })
    }

    /// Let `delegatee` publish posts as `delegator`.
    pub fn delegate(
        &mut self,
        signers: &Signers,
        delegator: &Address,
        delegatee: &Address,
    ) -> Result<()> {
        self.transact("delegate", |handler| {
            handler.delegate(signers, delegator, delegatee)
        })
    }

    /// Publish a post as `delegator`, signed by its delegate.
    pub fn delegate_post(
        &mut self,
        signers: &Signers,
        delegator: &Address,
        delegatee: &Address,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<u64> {
        let (title, body) = (title.into(), body.into());
        self.transact("delegate_post", |handler| {
            handler.delegate_post(signers, delegator, delegatee, title, body)
        })
    }

    /// Run `apply` in a fresh branch and commit it if it succeeds.
    fn transact<T>(
        &mut self,
        msg: &'static str,
        apply: impl FnOnce(&Handler<'_, CacheKv<'_, S>>) -> Result<T>,
    ) -> Result<T> {
        if self.halted {
            return Err(LedgerError::Halted);
        }

        let branch = CacheKv::new(&self.store);
        let outcome = apply(&Handler::new(&branch, self.config.check_invariants));

        match outcome {
            Ok(value) => {
                let writes = branch.commit()?;
                tracing::debug!(msg, writes, "request committed");
                Ok(value)
            }
            Err(err) => {
                branch.discard();
                if matches!(err, LedgerError::InvariantViolation(_)) {
                    tracing::error!(msg, error = %err, "halting ledger");
                    self.halted = true;
                }
                Err(err)
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Number of posts published so far.
    pub fn post_count(&self) -> Result<u64> {
        PostLedger::new(&self.store).get_post_count()
    }

    /// Every post in ascending id order, with undecodable records reported
    /// separately.
    pub fn list_posts(&self) -> Result<Listing<Post>> {
        PostLedger::new(&self.store).list()
    }

    /// Variant of [`list_posts`](Self::list_posts) that decodes one record
    /// at a time from a snapshot of the post records.
    pub fn posts(&self) -> Result<Posts> {
        PostLedger::new(&self.store).posts()
    }

    /// Every recorded delegation in ascending delegator order.
    pub fn list_delegations(&self) -> Result<Listing<Delegation>> {
        Ok(DelegationRegistry::new(&self.store).delegations()?)
    }

    /// The identity allowed to post as `delegator`.
    pub fn get_delegatee(&self, delegator: &Address) -> Result<Address> {
        Ok(DelegationRegistry::new(&self.store).get_delegatee(delegator)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msgs::MsgCreatePost;
    use bytes::Bytes;
    use postledger_core::keys::POST_KEY;
    use postledger_store::{MemoryKv, StorageConfig};

    fn addr(text: &str) -> Address {
        Address::parse(text).unwrap()
    }

    fn signed_by(text: &str) -> Signers {
        Signers::verified([addr(text)]).unwrap()
    }

    fn ledger() -> Ledger<MemoryKv> {
        Ledger::new(MemoryKv::new(), LedgerConfig::default())
    }

    #[test]
    fn test_deliver_commits_on_success() {
        let mut ledger = ledger();
        let msg: Msg = MsgCreatePost::new(&addr("aa"), "t", "b").into();

        let response = ledger.deliver(&signed_by("aa"), &msg).unwrap();
        assert_eq!(response.post_id(), Some(0));
        assert_eq!(ledger.post_count().unwrap(), 1);
    }

    #[test]
    fn test_rejected_request_writes_nothing() {
        let mut ledger = ledger();

        let err = ledger
            .create_post(&signed_by("bb"), &addr("aa"), "t", "b")
            .unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(ledger.store().len().unwrap(), 0);
    }

    #[test]
    fn test_invariant_violation_halts() {
        let mut ledger = ledger();
        let author = addr("aa");
        ledger.create_post(&signed_by("aa"), &author, "t", "b").unwrap();

        // Occupy slot 1 behind the counter's back.
        let mut key = POST_KEY.to_vec();
        key.extend_from_slice(&1u64.to_be_bytes());
        ledger.store().set(&key, Bytes::from_static(b"x")).unwrap();

        let err = ledger
            .create_post(&signed_by("aa"), &author, "t", "b")
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvariantViolation(_)));
        assert!(ledger.is_halted());
        assert_eq!(ledger.post_count().unwrap(), 1);

        let err = ledger
            .delegate(&signed_by("aa"), &author, &addr("bb"))
            .unwrap_err();
        assert!(matches!(err, LedgerError::Halted));
        assert!(err.is_fatal());

        // Queries still answer.
        assert_eq!(ledger.list_posts().unwrap().corrupt.len(), 1);
    }

    #[test]
    fn test_unchecked_ledger_does_not_halt() {
        let config = LedgerConfig {
            check_invariants: false,
            ..LedgerConfig::default()
        };
        let mut ledger = Ledger::new(MemoryKv::new(), config);
        let author = addr("aa");

        let mut key = POST_KEY.to_vec();
        key.extend_from_slice(&0u64.to_be_bytes());
        ledger.store().set(&key, Bytes::from_static(b"x")).unwrap();

        assert_eq!(
            ledger.create_post(&signed_by("aa"), &author, "t", "b").unwrap(),
            0
        );
        assert!(!ledger.is_halted());
        assert!(ledger.list_posts().unwrap().is_clean());
    }

    #[test]
    fn test_open_memory_backend() {
        let mut ledger = Ledger::open(LedgerConfig::default()).unwrap();
        ledger
            .create_post(&signed_by("aa"), &addr("aa"), "t", "b")
            .unwrap();
        assert_eq!(ledger.post_count().unwrap(), 1);
    }

    #[test]
    fn test_sqlite_ledger_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = LedgerConfig {
            storage: StorageConfig::Sqlite {
                path: dir.path().join("ledger.db"),
            },
            ..LedgerConfig::default()
        };
        let (a, b) = (addr("aa"), addr("bb"));

        {
            let mut ledger = Ledger::open(config.clone()).unwrap();
            ledger.delegate(&signed_by("aa"), &a, &b).unwrap();
            ledger
                .delegate_post(&signed_by("bb"), &a, &b, "t", "b")
                .unwrap();
        }

        let ledger = Ledger::open(config).unwrap();
        assert_eq!(ledger.get_delegatee(&a).unwrap(), b);
        let posts = ledger.list_posts().unwrap().items;
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].author, a);
    }
}
