// SPDX-License-Identifier: MPL-2.0

//! Typed view of `app.bsky.feed.post` records.
//!
//! Records are authored by clients, not the AppView, so anything can show up
//! in them. A record is only trusted once it parses and passes the lexicon
//! limits checked here.

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

pub const POST_RECORD_TYPE: &str = "app.bsky.feed.post";

const MAX_TEXT_BYTES: usize = 3000;
const MAX_TEXT_GRAPHEMES: usize = 300;
const MAX_LANGS: usize = 3;
const MAX_TAGS: usize = 8;
const MAX_TAG_BYTES: usize = 640;
const MAX_TAG_GRAPHEMES: usize = 64;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("not a post record: {0:?}")]
    WrongType(Option<String>),
    #[error("malformed post record: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid createdAt: {0}")]
    InvalidDatetime(String),
    #[error("{field} exceeds {limit}")]
    TooLong { field: &'static str, limit: usize },
    #[error("{field} has more than {limit} entries")]
    TooMany { field: &'static str, limit: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrongRef {
    pub uri: String,
    pub cid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyRef {
    pub root: StrongRef,
    pub parent: StrongRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    pub text: String,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<ReplyRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facets: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub langs: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl PostRecord {
    /// Parse and validate a raw record value.
    pub fn from_value(value: &Value) -> Result<Self, RecordError> {
        let record_type = value.get("$type").and_then(Value::as_str);
        if record_type != Some(POST_RECORD_TYPE) {
            return Err(RecordError::WrongType(record_type.map(str::to_string)));
        }

        let record: PostRecord = serde_json::from_value(value.clone())?;
        record.validate()?;
        Ok(record)
    }

    fn validate(&self) -> Result<(), RecordError> {
        check_length("text", &self.text, MAX_TEXT_BYTES, MAX_TEXT_GRAPHEMES)?;

        DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|_| RecordError::InvalidDatetime(self.created_at.clone()))?;

        if self.langs.len() > MAX_LANGS {
            return Err(RecordError::TooMany {
                field: "langs",
                limit: MAX_LANGS,
            });
        }
        if self.tags.len() > MAX_TAGS {
            return Err(RecordError::TooMany {
                field: "tags",
                limit: MAX_TAGS,
            });
        }
        for tag in &self.tags {
            check_length("tags", tag, MAX_TAG_BYTES, MAX_TAG_GRAPHEMES)?;
        }

        Ok(())
    }

    /// DID of the account this post replies to, taken from the parent URI
    /// (or the root URI when the parent is unusable).
    pub fn reply_author_did(&self) -> Option<&str> {
        let reply = self.reply.as_ref()?;
        AtUri::parse(&reply.parent.uri)
            .or_else(|| AtUri::parse(&reply.root.uri))
            .map(|uri| uri.authority)
    }
}

fn check_length(
    field: &'static str,
    value: &str,
    max_bytes: usize,
    max_graphemes: usize,
) -> Result<(), RecordError> {
    if value.len() > max_bytes {
        return Err(RecordError::TooLong {
            field,
            limit: max_bytes,
        });
    }
    if value.graphemes(true).count() > max_graphemes {
        return Err(RecordError::TooLong {
            field,
            limit: max_graphemes,
        });
    }
    Ok(())
}

/// `at://authority/collection/rkey`, borrowed from the source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtUri<'a> {
    pub authority: &'a str,
    pub collection: Option<&'a str>,
    pub rkey: Option<&'a str>,
}

impl<'a> AtUri<'a> {
    pub fn parse(uri: &'a str) -> Option<Self> {
        let rest = uri.strip_prefix("at://")?;
        let mut parts = rest.splitn(3, '/');
        let authority = parts.next().filter(|a| !a.is_empty())?;
        let collection = parts.next().filter(|c| !c.is_empty());
        let rkey = parts.next().filter(|r| !r.is_empty());
        Some(Self {
            authority,
            collection,
            rkey,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(text: &str) -> Value {
        json!({
            "$type": "app.bsky.feed.post",
            "text": text,
            "createdAt": "2024-01-01T00:00:00.000Z"
        })
    }

    #[test]
    fn test_valid_record() {
        let parsed = PostRecord::from_value(&record("hello")).unwrap();
        assert_eq!(parsed.text, "hello");
        assert!(parsed.reply.is_none());
    }

    #[test]
    fn test_wrong_type_rejected() {
        let mut value = record("hello");
        value["$type"] = json!("app.bsky.feed.like");
        assert!(matches!(
            PostRecord::from_value(&value),
            Err(RecordError::WrongType(Some(_)))
        ));
    }

    #[test]
    fn test_missing_text_rejected() {
        let value = json!({"$type": "app.bsky.feed.post", "createdAt": "2024-01-01T00:00:00Z"});
        assert!(matches!(
            PostRecord::from_value(&value),
            Err(RecordError::Malformed(_))
        ));
    }

    #[test]
    fn test_bad_datetime_rejected() {
        let mut value = record("hello");
        value["createdAt"] = json!("yesterday");
        assert!(matches!(
            PostRecord::from_value(&value),
            Err(RecordError::InvalidDatetime(_))
        ));
    }

    #[test]
    fn test_text_grapheme_limit() {
        let ok = "a".repeat(300);
        assert!(PostRecord::from_value(&record(&ok)).is_ok());

        let too_long = "a".repeat(301);
        assert!(matches!(
            PostRecord::from_value(&record(&too_long)),
            Err(RecordError::TooLong { field: "text", .. })
        ));
    }

    #[test]
    fn test_text_byte_limit() {
        // each family emoji is one grapheme but 18 bytes
        let text = "\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}".repeat(290);
        assert!(matches!(
            PostRecord::from_value(&record(&text)),
            Err(RecordError::TooLong { field: "text", limit: 3000 })
        ));
    }

    #[test]
    fn test_too_many_langs() {
        let mut value = record("hello");
        value["langs"] = json!(["en", "de", "fr", "ja"]);
        assert!(matches!(
            PostRecord::from_value(&value),
            Err(RecordError::TooMany { field: "langs", .. })
        ));
    }

    #[test]
    fn test_reply_author_did() {
        let mut value = record("hi");
        value["reply"] = json!({
            "root": {"uri": "at://did:plc:root/app.bsky.feed.post/1", "cid": "c1"},
            "parent": {"uri": "at://did:plc:parent/app.bsky.feed.post/2", "cid": "c2"}
        });
        let parsed = PostRecord::from_value(&value).unwrap();
        assert_eq!(parsed.reply_author_did(), Some("did:plc:parent"));
    }

    #[test]
    fn test_reply_missing_parent_is_malformed() {
        let mut value = record("hi");
        value["reply"] = json!({
            "root": {"uri": "at://did:plc:root/app.bsky.feed.post/1", "cid": "c1"}
        });
        assert!(PostRecord::from_value(&value).is_err());
    }

    #[test]
    fn test_at_uri_parse() {
        let uri = AtUri::parse("at://did:plc:abc/app.bsky.feed.post/3k2").unwrap();
        assert_eq!(uri.authority, "did:plc:abc");
        assert_eq!(uri.collection, Some("app.bsky.feed.post"));
        assert_eq!(uri.rkey, Some("3k2"));

        assert!(AtUri::parse("https://bsky.app").is_none());
        assert!(AtUri::parse("at://").is_none());
    }
}
