// SPDX-License-Identifier: MPL-2.0

//! Single-node trees shown while the real thread is still loading.

use super::{ThreadCtx, ThreadNode, ThreadPost};
use crate::atproto::{FeedViewPost, PostRecord, PostView, RecordError, ViewerThreadState};

fn placeholder(
    post: PostView,
    record: PostRecord,
    viewer: Option<ViewerThreadState>,
) -> ThreadNode {
    let ctx = ThreadCtx {
        depth: 0,
        is_highlighted_post: true,
        has_more: false,
        show_child_reply_line: false,
        show_parent_reply_line: false,
        is_parent_loading: record.reply.is_some(),
        is_child_loading: post.has_replies(),
    };
    ThreadNode::Post(Box::new(ThreadPost {
        uri: post.uri.clone(),
        post,
        record,
        parent: None,
        replies: None,
        viewer,
        ctx,
    }))
}

/// Lift a post out of a previously built thread. Only posts qualify.
pub fn thread_node_to_placeholder(node: &ThreadNode) -> Option<ThreadNode> {
    let ThreadNode::Post(post) = node else {
        return None;
    };
    Some(placeholder(
        post.post.clone(),
        post.record.clone(),
        post.viewer.clone(),
    ))
}

pub fn feed_view_post_to_placeholder(item: &FeedViewPost) -> Result<ThreadNode, RecordError> {
    post_view_to_placeholder(&item.post)
}

pub fn post_view_to_placeholder(post: &PostView) -> Result<ThreadNode, RecordError> {
    let record = PostRecord::from_value(&post.record)?;
    Ok(placeholder(post.clone(), record, None))
}
