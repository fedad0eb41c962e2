// SPDX-License-Identifier: MPL-2.0

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Decoupled from atrium's internal representation so we own the API boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub did: String,
    pub handle: String,
    pub access_jwt: String,
    pub refresh_jwt: String,
}

/// One node of a `getPostThread` response, exactly as the server sent it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum RawThreadNode {
    #[serde(rename = "app.bsky.feed.defs#threadViewPost")]
    ThreadViewPost(Box<ThreadViewPost>),
    #[serde(rename = "app.bsky.feed.defs#notFoundPost")]
    NotFoundPost(NotFoundPost),
    #[serde(rename = "app.bsky.feed.defs#blockedPost")]
    BlockedPost(BlockedPost),
    /// Any union member this client doesn't understand.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadViewPost {
    pub post: PostView,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<RawThreadNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replies: Option<Vec<RawThreadNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewer: Option<ViewerThreadState>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundPost {
    pub uri: String,
    #[serde(default)]
    pub not_found: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedPost {
    pub uri: String,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerThreadState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_reply: Option<bool>,
}

/// A hydrated post as the AppView returns it.
///
/// `record` stays untyped here: it is authored by the poster, not the server,
/// and must be validated before it is trusted (see `atproto::record`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub uri: String,
    #[serde(default)]
    pub cid: String,
    pub author: ProfileViewBasic,
    pub record: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repost_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_count: Option<u32>,
    /// Server-assigned sortable timestamp. Compared as a string, never parsed.
    pub indexed_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewer: Option<PostViewerState>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Value>,
}

impl PostView {
    pub fn has_replies(&self) -> bool {
        self.reply_count.unwrap_or(0) > 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostViewerState {
    /// URI of the viewer's like record, if they liked this post
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like: Option<String>,
    /// URI of the viewer's repost record, if they reposted this post
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repost: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_muted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_disabled: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileViewBasic {
    pub did: String,
    pub handle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewer: Option<ActorViewerState>,
}

impl ProfileViewBasic {
    /// Whether the logged-in user follows this account.
    pub fn is_followed_by_viewer(&self) -> bool {
        self.viewer
            .as_ref()
            .is_some_and(|v| v.following.is_some())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorViewerState {
    /// URI of the viewer's follow record for this account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub following: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_by: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocking: Option<String>,
}

/// An entry of a timeline or custom feed page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedViewPost {
    pub post: PostView,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<Value>,
}

/// An entry of a notifications page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedNotification {
    pub uri: String,
    #[serde(default)]
    pub cid: String,
    pub author: ProfileViewBasic,
    /// "like", "repost", "follow", "mention", "reply", "quote"
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_subject: Option<String>,
    #[serde(default)]
    pub is_read: bool,
    pub indexed_at: String,
    /// The hydrated post this notification is about, when there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<PostView>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unrecognized_type_is_unknown() {
        let node: RawThreadNode =
            serde_json::from_value(json!({"$type": "app.bsky.feed.defs#somethingNew", "uri": "x"}))
                .unwrap();
        assert!(matches!(node, RawThreadNode::Unknown));
    }

    #[test]
    fn test_blocked_post_parses() {
        let node: RawThreadNode = serde_json::from_value(json!({
            "$type": "app.bsky.feed.defs#blockedPost",
            "uri": "at://did:plc:b/app.bsky.feed.post/1",
            "blocked": true,
            "author": {"did": "did:plc:b", "viewer": {"blockedBy": true}}
        }))
        .unwrap();
        match node {
            RawThreadNode::BlockedPost(b) => {
                assert_eq!(b.uri, "at://did:plc:b/app.bsky.feed.post/1");
                assert!(b.blocked);
            }
            other => panic!("expected BlockedPost, got {other:?}"),
        }
    }

    #[test]
    fn test_following_flag() {
        let author: ProfileViewBasic = serde_json::from_value(json!({
            "did": "did:plc:a",
            "handle": "alice.test",
            "viewer": {"following": "at://did:plc:me/app.bsky.graph.follow/1"}
        }))
        .unwrap();
        assert!(author.is_followed_by_viewer());

        let stranger: ProfileViewBasic =
            serde_json::from_value(json!({"did": "did:plc:b", "handle": "bob.test"})).unwrap();
        assert!(!stranger.is_followed_by_viewer());
    }
}
