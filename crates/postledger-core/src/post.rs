//! Post records.
//!
//! A [`Post`] is created once, when the ledger appends it, and never changes
//! afterwards. Callers describe the post they want with a [`PostDraft`]; the
//! ledger assigns the id.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::error::CoreError;

/// A published post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Position in the ledger, assigned at append time.
    pub id: u64,
    /// Identity the post is published as.
    pub author: Address,
    pub title: String,
    pub body: String,
}

/// A post that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub author: Address,
    pub title: String,
    pub body: String,
}

impl PostDraft {
    pub fn new(author: Address, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            author,
            title: title.into(),
            body: body.into(),
        }
    }

    /// Turn the draft into a post with the given id.
    pub fn into_post(self, id: u64) -> Post {
        Post {
            id,
            author: self.author,
            title: self.title,
            body: self.body,
        }
    }
}

impl Post {
    /// Serialize to CBOR bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CoreError> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf)
            .map_err(|e| CoreError::EncodingError(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize from CBOR bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        ciborium::from_reader(bytes).map_err(|e| CoreError::DecodingError(e.to_string()))
    }
}
