//! Request messages.
//!
//! Messages arrive as plain text fields. [`Msg::validate_basic`] checks them
//! without touching state and [`Msg::parse`] turns them into typed form.
//! Nothing in a message says who signed it: the address fields only name
//! the identity the request wants to act as.

use serde::{Deserialize, Serialize};

use postledger_core::Address;

use crate::error::{LedgerError, Result};

/// Publish a post as `author`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCreatePost {
    pub author: String,
    pub title: String,
    pub body: String,
}

/// Name `delegatee` as the identity allowed to post for `delegator`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgDelegate {
    pub delegator: String,
    pub delegatee: String,
}

/// Publish a post as `delegator`, signed by its delegatee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgDelegatePost {
    pub delegator: String,
    pub delegatee: String,
    pub title: String,
    pub body: String,
}

impl MsgCreatePost {
    pub const TYPE: &'static str = "create_post";

    pub fn new(author: &Address, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            author: author.to_text(),
            title: title.into(),
            body: body.into(),
        }
    }
}

impl MsgDelegate {
    pub const TYPE: &'static str = "delegate";

    pub fn new(delegator: &Address, delegatee: &Address) -> Self {
        Self {
            delegator: delegator.to_text(),
            delegatee: delegatee.to_text(),
        }
    }
}

impl MsgDelegatePost {
    pub const TYPE: &'static str = "delegate_post";

    pub fn new(
        delegator: &Address,
        delegatee: &Address,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            delegator: delegator.to_text(),
            delegatee: delegatee.to_text(),
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Any request the ledger accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Msg {
    CreatePost(MsgCreatePost),
    Delegate(MsgDelegate),
    DelegatePost(MsgDelegatePost),
}

impl Msg {
    /// Stable name of the message type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Msg::CreatePost(_) => MsgCreatePost::TYPE,
            Msg::Delegate(_) => MsgDelegate::TYPE,
            Msg::DelegatePost(_) => MsgDelegatePost::TYPE,
        }
    }

    /// Stateless checks: every address field must parse.
    pub fn validate_basic(&self) -> Result<()> {
        self.parse().map(drop)
    }

    /// Parse address fields into typed form.
    pub fn parse(&self) -> Result<ParsedMsg> {
        Ok(match self {
            Msg::CreatePost(m) => ParsedMsg::CreatePost {
                author: parse_field("author", &m.author)?,
                title: m.title.clone(),
                body: m.body.clone(),
            },
            Msg::Delegate(m) => ParsedMsg::Delegate {
                delegator: parse_field("delegator", &m.delegator)?,
                delegatee: parse_field("delegatee", &m.delegatee)?,
            },
            Msg::DelegatePost(m) => ParsedMsg::DelegatePost {
                delegator: parse_field("delegator", &m.delegator)?,
                delegatee: parse_field("delegatee", &m.delegatee)?,
                title: m.title.clone(),
                body: m.body.clone(),
            },
        })
    }
}

impl From<MsgCreatePost> for Msg {
    fn from(msg: MsgCreatePost) -> Self {
        Msg::CreatePost(msg)
    }
}

impl From<MsgDelegate> for Msg {
    fn from(msg: MsgDelegate) -> Self {
        Msg::Delegate(msg)
    }
}

impl From<MsgDelegatePost> for Msg {
    fn from(msg: MsgDelegatePost) -> Self {
        Msg::DelegatePost(msg)
    }
}

fn parse_field(field: &'static str, text: &str) -> Result<Address> {
    Address::parse(text).map_err(LedgerError::invalid_address(field))
}

/// A message with its address fields parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedMsg {
    CreatePost {
        author: Address,
        title: String,
        body: String,
    },
    Delegate {
        delegator: Address,
        delegatee: Address,
    },
    DelegatePost {
        delegator: Address,
        delegatee: Address,
        title: String,
        body: String,
    },
}

/// Outcome of an applied request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MsgResponse {
    PostCreated { id: u64 },
    Delegated,
}

impl MsgResponse {
    /// Id of the created post, if the request created one.
    pub fn post_id(&self) -> Option<u64> {
        match self {
            MsgResponse::PostCreated { id } => Some(*id),
            MsgResponse::Delegated => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postledger_core::AddressError;

    fn addr(text: &str) -> Address {
        Address::parse(text).unwrap()
    }

    #[test]
    fn test_type_names() {
        let a = addr("aa");
        let b = addr("bb");
        assert_eq!(Msg::from(MsgCreatePost::new(&a, "t", "b")).type_name(), "create_post");
        assert_eq!(Msg::from(MsgDelegate::new(&a, &b)).type_name(), "delegate");
        assert_eq!(
            Msg::from(MsgDelegatePost::new(&a, &b, "t", "b")).type_name(),
            "delegate_post"
        );
    }

    #[test]
    fn test_validate_basic_names_the_bad_field() {
        let msg = Msg::Delegate(MsgDelegate {
            delegator: "aa".into(),
            delegatee: "invalid_address".into(),
        });

        match msg.validate_basic().unwrap_err() {
            LedgerError::InvalidAddress { field, source } => {
                assert_eq!(field, "delegatee");
                assert!(matches!(source, AddressError::InvalidEncoding(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_author_is_invalid() {
        let msg = Msg::CreatePost(MsgCreatePost {
            author: String::new(),
            title: "t".into(),
            body: "b".into(),
        });
        assert!(matches!(
            msg.validate_basic(),
            Err(LedgerError::InvalidAddress { field: "author", .. })
        ));
    }

    #[test]
    fn test_decode_from_json() {
        let msg: Msg = serde_json::from_str(
            r#"{"type":"delegate_post","delegator":"AA","delegatee":"bb","title":"hi","body":"there"}"#,
        )
        .unwrap();

        assert_eq!(msg.type_name(), "delegate_post");
        match msg.parse().unwrap() {
            ParsedMsg::DelegatePost { delegator, .. } => assert_eq!(delegator, addr("aa")),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_response_json() {
        let json = serde_json::to_string(&MsgResponse::PostCreated { id: 3 }).unwrap();
        assert_eq!(json, r#"{"type":"post_created","id":3}"#);
        assert_eq!(MsgResponse::Delegated.post_id(), None);
    }
}
