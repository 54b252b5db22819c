//! Post storage.
//!
//! Posts are stored under [`POST_KEY`] keyed by their big-endian id, so
//! iteration order is id order. The counter lives in its own namespace and
//! always equals the number of posts appended so far: the next post takes
//! the counter's value as its id, then the counter moves on by one.

use bytes::Bytes;

use postledger_core::keys::{
    decode_count, decode_post_id, encode_count, post_id_key, POST_COUNT_KEY, POST_COUNT_RECORD,
    POST_KEY,
};
use postledger_core::{DecodeError, Listing, Post, PostDraft};
use postledger_store::{KvIter, KvStore, PrefixStore};

use crate::error::{LedgerError, Result};

/// Post records and the post counter over a store handle.
pub struct PostLedger<'a, S: KvStore + ?Sized> {
    posts: PrefixStore<'a, S>,
    counter: PrefixStore<'a, S>,
    check_invariants: bool,
}

impl<'a, S: KvStore + ?Sized> PostLedger<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            posts: PrefixStore::new(store, POST_KEY),
            counter: PrefixStore::new(store, POST_COUNT_KEY),
            check_invariants: true,
        }
    }

    /// Toggle the occupied-slot check in [`append_post`](Self::append_post).
    pub fn check_invariants(mut self, enabled: bool) -> Self {
        self.check_invariants = enabled;
        self
    }

    /// Number of posts appended so far. Zero when nothing was ever stored.
    pub fn get_post_count(&self) -> Result<u64> {
        let Some(bytes) = self.counter.get(POST_COUNT_RECORD)? else {
            return Ok(0);
        };
        decode_count(&bytes).ok_or_else(|| {
            LedgerError::Decode(DecodeError::new(
                POST_COUNT_RECORD,
                format!("counter must be 8 bytes, found {}", bytes.len()),
            ))
        })
    }

    /// Overwrite the counter.
    pub(crate) fn set_post_count(&self, count: u64) -> Result<()> {
        self.counter.set(
            POST_COUNT_RECORD,
            Bytes::copy_from_slice(&encode_count(count)),
        )?;
        Ok(())
    }

    /// Append a post and return its id.
    ///
    /// The post record and the new counter are written to the same store
    /// handle; run this inside a branch so both land or neither does.
    pub fn append_post(&self, draft: PostDraft) -> Result<u64> {
        let id = self.get_post_count()?;
        let key = post_id_key(id);

        if self.check_invariants && self.posts.contains(&key)? {
            return Err(LedgerError::InvariantViolation(format!(
                "post slot {id} is already occupied"
            )));
        }
        let next = id.checked_add(1).ok_or_else(|| {
            LedgerError::InvariantViolation("post counter exhausted".to_string())
        })?;

        let post = draft.into_post(id);
        self.posts.set(&key, post.to_bytes()?)?;
        self.set_post_count(next)?;

        tracing::debug!(id, author = %post.author, "appended post");
        Ok(id)
    }

    /// Every stored post in ascending id order.
    ///
    /// The iterator reads from a snapshot taken when it was created.
    pub fn posts(&self) -> Result<Posts> {
        Ok(Posts {
            records: self.posts.iter()?,
        })
    }

    /// Decode every stored post, setting aside those that fail.
    pub fn list(&self) -> Result<Listing<Post>> {
        let listing: Listing<Post> = self.posts()?.collect();
        for corrupt in &listing.corrupt {
            tracing::error!(error = %corrupt, "skipping corrupt post record");
        }
        Ok(listing)
    }
}

/// Iterator over stored posts, yielding one decode result per record.
pub struct Posts {
    records: KvIter,
}

impl Iterator for Posts {
    type Item = std::result::Result<Post, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let (key, value) = self.records.next()?;
        Some(decode_post(&key, &value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}

/// `key` is relative to [`POST_KEY`], and so is the key of any error.
fn decode_post(key: &[u8], value: &[u8]) -> std::result::Result<Post, DecodeError> {
    let id = decode_post_id(key)
        .ok_or_else(|| DecodeError::new(key, "post key is not an 8-byte id"))?;
    let post = Post::from_bytes(value).map_err(|e| DecodeError::new(key, e))?;
    if post.id != id {
        return Err(DecodeError::new(
            key,
            format!("record holds post {} under key for post {id}", post.id),
        ));
    }
    Ok(post)
}

#[cfg(test)]
mod tests {
    use super::*;
    use postledger_core::Address;
    use postledger_store::{CacheKv, MemoryKv};
    use proptest::prelude::*;

    fn author() -> Address {
        Address::parse("a11ce0").unwrap()
    }

    fn draft(title: &str) -> PostDraft {
        PostDraft::new(author(), title, "body")
    }

    #[test]
    fn test_count_starts_at_zero() {
        let store = MemoryKv::new();
        assert_eq!(PostLedger::new(&store).get_post_count().unwrap(), 0);
    }

    #[test]
    fn test_append_assigns_sequential_ids() {
        let store = MemoryKv::new();
        let ledger = PostLedger::new(&store);

        assert_eq!(ledger.append_post(draft("first")).unwrap(), 0);
        assert_eq!(ledger.append_post(draft("second")).unwrap(), 1);
        assert_eq!(ledger.get_post_count().unwrap(), 2);

        let posts: Vec<Post> = ledger.posts().unwrap().map(|p| p.unwrap()).collect();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "first");
        assert_eq!(posts[1].id, 1);
    }

    #[test]
    fn test_key_layout() {
        let store = MemoryKv::new();
        PostLedger::new(&store).append_post(draft("t")).unwrap();

        let mut post_key = b"Post-value-".to_vec();
        post_key.extend_from_slice(&0u64.to_be_bytes());
        assert!(store.get(&post_key).unwrap().is_some());

        let counter = store.get(b"Post-count-Post-count-").unwrap().unwrap();
        assert_eq!(&counter[..], &1u64.to_be_bytes());
    }

    #[test]
    fn test_occupied_slot_is_an_invariant_violation() {
        let store = MemoryKv::new();
        let ledger = PostLedger::new(&store);
        ledger.append_post(draft("first")).unwrap();
        ledger.set_post_count(0).unwrap();

        let err = ledger.append_post(draft("clobber")).unwrap_err();
        assert!(matches!(err, LedgerError::InvariantViolation(_)));
        assert_eq!(ledger.posts().unwrap().next().unwrap().unwrap().title, "first");
    }

    #[test]
    fn test_unchecked_append_overwrites_slot() {
        let store = MemoryKv::new();
        let ledger = PostLedger::new(&store).check_invariants(false);
        ledger.append_post(draft("first")).unwrap();
        ledger.set_post_count(0).unwrap();

        ledger.append_post(draft("second")).unwrap();
        assert_eq!(ledger.posts().unwrap().next().unwrap().unwrap().title, "second");
    }

    #[test]
    fn test_corrupt_record_is_skipped_and_reported() {
        let store = MemoryKv::new();
        let ledger = PostLedger::new(&store);
        ledger.append_post(draft("a")).unwrap();
        ledger.append_post(draft("b")).unwrap();
        ledger.append_post(draft("c")).unwrap();

        let mut bad = b"Post-value-".to_vec();
        bad.extend_from_slice(&1u64.to_be_bytes());
        store.set(&bad, Bytes::from_static(b"not cbor")).unwrap();

        let listing = ledger.list().unwrap();
        let ids: Vec<u64> = listing.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 2]);
        assert_eq!(listing.corrupt.len(), 1);
        assert_eq!(listing.corrupt[0].key, 1u64.to_be_bytes().to_vec());
    }

    #[test]
    fn test_record_under_wrong_id_is_corrupt() {
        let store = MemoryKv::new();
        let ledger = PostLedger::new(&store);
        let misplaced = draft("x").into_post(7);

        let mut key = b"Post-value-".to_vec();
        key.extend_from_slice(&3u64.to_be_bytes());
        store.set(&key, misplaced.to_bytes().unwrap().into()).unwrap();

        assert!(ledger.posts().unwrap().next().unwrap().is_err());
    }

    #[test]
    fn test_malformed_counter_is_a_decode_error() {
        let store = MemoryKv::new();
        store
            .set(b"Post-count-Post-count-", Bytes::from_static(b"\x01"))
            .unwrap();

        match PostLedger::new(&store).get_post_count() {
            Err(LedgerError::Decode(err)) => assert_eq!(err.key, b"Post-count-".to_vec()),
            other => panic!("expected a decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_discarded_branch_leaves_no_trace() {
        let store = MemoryKv::new();
        let branch = CacheKv::new(&store);
        PostLedger::new(&branch).append_post(draft("t")).unwrap();
        branch.discard();

        let ledger = PostLedger::new(&store);
        assert_eq!(ledger.get_post_count().unwrap(), 0);
        assert_eq!(ledger.posts().unwrap().count(), 0);
    }

    proptest! {
        #[test]
        fn prop_ids_are_dense_and_ordered(titles in prop::collection::vec(".{0,12}", 0..24)) {
            let store = MemoryKv::new();
            let ledger = PostLedger::new(&store);
            for title in &titles {
                ledger.append_post(draft(title)).unwrap();
            }

            let listing = ledger.list().unwrap();
            prop_assert!(listing.is_clean());
            let ids: Vec<u64> = listing.items.iter().map(|p| p.id).collect();
            let expected: Vec<u64> = (0..titles.len() as u64).collect();
            prop_assert_eq!(ids, expected);
            prop_assert_eq!(ledger.get_post_count().unwrap(), titles.len() as u64);
        }
    }
}
