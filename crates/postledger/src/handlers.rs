//! Request handlers.
//!
//! A request moves through Parsed -> Authorized -> Applied. The handler
//! writes to whatever store handle it is given; the ledger hands it a
//! branch and decides afterwards whether to commit.
//!
//! Each operation builds the [`Claim`] for its payload, has it checked
//! against the verified signers, and writes as the identity named by the
//! resulting [`Authorization`].

use postledger_core::{Address, PostDraft};
use postledger_perms::{
    Authorization, Authorizer, Claim, DelegationRegistry, PermsError, Signers,
};
use postledger_store::KvStore;

use crate::error::Result;
use crate::msgs::{Msg, MsgCreatePost, MsgDelegate, MsgDelegatePost, MsgResponse, ParsedMsg};
use crate::posts::PostLedger;

/// Runs requests against one store handle.
pub struct Handler<'a, S: KvStore + ?Sized> {
    store: &'a S,
    check_invariants: bool,
}

impl<'a, S: KvStore + ?Sized> Handler<'a, S> {
    pub fn new(store: &'a S, check_invariants: bool) -> Self {
        Self {
            store,
            check_invariants,
        }
    }

    /// Parse `msg` and run it on behalf of `signers`.
    pub fn handle(&self, signers: &Signers, msg: &Msg) -> Result<MsgResponse> {
        match msg.parse()? {
            ParsedMsg::CreatePost {
                author,
                title,
                body,
            } => self
                .create_post(signers, &author, title, body)
                .map(|id| MsgResponse::PostCreated { id }),
            ParsedMsg::Delegate {
                delegator,
                delegatee,
            } => self
                .delegate(signers, &delegator, &delegatee)
                .map(|()| MsgResponse::Delegated),
            ParsedMsg::DelegatePost {
                delegator,
                delegatee,
                title,
                body,
            } => self
                .delegate_post(signers, &delegator, &delegatee, title, body)
                .map(|id| MsgResponse::PostCreated { id }),
        }
    }

    /// Append a post as `author`, who must be a signer.
    pub fn create_post(
        &self,
        signers: &Signers,
        author: &Address,
        title: String,
        body: String,
    ) -> Result<u64> {
        let authorization = self.authorize(
            MsgCreatePost::TYPE,
            signers,
            Claim::Direct(author.clone()),
        )?;
        self.publish(&authorization, title, body)
    }

    /// Make `delegatee` the delegate of `delegator`, who must be a signer.
    pub fn delegate(
        &self,
        signers: &Signers,
        delegator: &Address,
        delegatee: &Address,
    ) -> Result<()> {
        let authorization = self.authorize(
            MsgDelegate::TYPE,
            signers,
            Claim::Direct(delegator.clone()),
        )?;
        DelegationRegistry::new(self.store)
            .set_delegation(authorization.acting_as(), delegatee)?;

        tracing::debug!(
            delegator = %authorization.acting_as(),
            delegatee = %delegatee,
            "delegation recorded"
        );
        Ok(())
    }

    /// Append a post as `delegator`. `delegatee` must be a signer and the
    /// delegator's recorded delegate.
    pub fn delegate_post(
        &self,
        signers: &Signers,
        delegator: &Address,
        delegatee: &Address,
        title: String,
        body: String,
    ) -> Result<u64> {
        let authorization = self.authorize(
            MsgDelegatePost::TYPE,
            signers,
            Claim::Delegated {
                delegator: delegator.clone(),
                delegatee: delegatee.clone(),
            },
        )?;
        self.publish(&authorization, title, body)
    }

    fn authorize(&self, msg: &'static str, signers: &Signers, claim: Claim) -> Result<Authorization> {
        Authorizer::new(self.store)
            .authorize(signers, &claim)
            .map_err(|e| {
                match e {
                    PermsError::NotAuthorized { .. } | PermsError::NoSigners => {
                        tracing::warn!(msg, error = %e, "request not authorized")
                    }
                    _ => tracing::error!(msg, error = %e, "authorization check failed"),
                }
                e.into()
            })
    }

    fn publish(&self, authorization: &Authorization, title: String, body: String) -> Result<u64> {
        let draft = PostDraft::new(authorization.acting_as().clone(), title, body);
        let id = PostLedger::new(self.store)
            .check_invariants(self.check_invariants)
            .append_post(draft)?;

        tracing::debug!(
            id,
            signer = %authorization.signer(),
            delegated = authorization.is_delegated(),
            "post created"
        );
        Ok(id)
    }
}
