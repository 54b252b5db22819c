//! Persisted key layout.
//!
//! Every record lives in one key-value namespace and is told apart by a
//! string prefix. These byte strings are part of the storage format and must
//! not change.

/// Prefix of post records. The key suffix is the big-endian post id.
pub const POST_KEY: &[u8] = b"Post-value-";

/// Prefix of the post counter namespace.
pub const POST_COUNT_KEY: &[u8] = b"Post-count-";

/// Key of the counter inside the [`POST_COUNT_KEY`] namespace.
///
/// The counter record therefore sits at `Post-count-Post-count-`.
pub const POST_COUNT_RECORD: &[u8] = b"Post-count-";

/// Prefix of delegation records. The key suffix is the delegator's bytes,
/// the value is the delegatee's bytes.
pub const DELEGATION_KEY: &[u8] = b"Delegation-";

/// Encode a post id as its record key. Big-endian keeps byte order equal to
/// id order.
pub fn post_id_key(id: u64) -> [u8; 8] {
    id.to_be_bytes()
}

/// Decode a post record key back to its id.
pub fn decode_post_id(key: &[u8]) -> Option<u64> {
    let bytes: [u8; 8] = key.try_into().ok()?;
    Some(u64::from_be_bytes(bytes))
}

/// Encode the post counter value.
pub fn encode_count(count: u64) -> [u8; 8] {
    count.to_be_bytes()
}

/// Decode the post counter value.
pub fn decode_count(bytes: &[u8]) -> Option<u64> {
    decode_post_id(bytes)
}
