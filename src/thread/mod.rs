// SPDX-License-Identifier: MPL-2.0

//! Display-ready post threads.
//!
//! A [`ThreadNode`] tree is built from a `getPostThread` response by
//! [`build_thread`], ordered by [`sort_thread`], and walked by
//! [`traverse_thread`]. Every node owns its parent and replies outright, so a
//! tree is always acyclic: each build step moves exactly one level away from
//! the focused post.

mod build;
mod placeholder;
mod sort;
mod traverse;

pub use build::{build_node, build_thread};
pub use placeholder::{
    feed_view_post_to_placeholder, post_view_to_placeholder, thread_node_to_placeholder,
};
pub use sort::sort_thread;
pub use traverse::traverse_thread;

use crate::atproto::{PostRecord, PostView, ViewerThreadState};

/// Which way the builder is walking when it reaches a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The focused post itself.
    Start,
    /// Ancestors of the focused post.
    Up,
    /// Replies below the focused post.
    Down,
}

/// Presentation state derived while building; never sent by the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThreadCtx {
    /// 0 for the focused post, negative above it, positive below it.
    pub depth: i32,
    pub is_highlighted_post: bool,
    /// The server says replies exist but cut them off.
    pub has_more: bool,
    pub show_child_reply_line: bool,
    pub show_parent_reply_line: bool,
    /// Placeholder only: ancestors are still being fetched.
    pub is_parent_loading: bool,
    /// Placeholder only: replies are still being fetched.
    pub is_child_loading: bool,
}

impl ThreadCtx {
    pub fn at_depth(depth: i32) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct ThreadPost {
    pub uri: String,
    pub post: PostView,
    pub record: PostRecord,
    pub parent: Option<ThreadNode>,
    pub replies: Option<Vec<ThreadNode>>,
    pub viewer: Option<ViewerThreadState>,
    pub ctx: ThreadCtx,
}

impl ThreadPost {
    pub fn author_did(&self) -> &str {
        &self.post.author.did
    }
}

#[derive(Debug, Clone)]
pub enum ThreadNode {
    Post(Box<ThreadPost>),
    NotFound { uri: String, ctx: ThreadCtx },
    Blocked { uri: String, ctx: ThreadCtx },
    /// Unrecognized payload, invalid record or failed fetch. The URI may be empty.
    Unknown { uri: String },
}

impl ThreadNode {
    /// Leaf shown when a thread couldn't be loaded at all.
    pub fn unknown(uri: impl Into<String>) -> Self {
        ThreadNode::Unknown { uri: uri.into() }
    }

    pub fn uri(&self) -> &str {
        match self {
            ThreadNode::Post(post) => &post.uri,
            ThreadNode::NotFound { uri, .. }
            | ThreadNode::Blocked { uri, .. }
            | ThreadNode::Unknown { uri } => uri,
        }
    }

    pub fn ctx(&self) -> Option<&ThreadCtx> {
        match self {
            ThreadNode::Post(post) => Some(&post.ctx),
            ThreadNode::NotFound { ctx, .. } | ThreadNode::Blocked { ctx, .. } => Some(ctx),
            ThreadNode::Unknown { .. } => None,
        }
    }

    pub fn as_post(&self) -> Option<&ThreadPost> {
        match self {
            ThreadNode::Post(post) => Some(post),
            _ => None,
        }
    }

    pub fn is_post(&self) -> bool {
        matches!(self, ThreadNode::Post(_))
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, ThreadNode::Blocked { .. })
    }
}
