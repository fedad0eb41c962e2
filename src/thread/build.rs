// SPDX-License-Identifier: MPL-2.0

use super::{Direction, ThreadCtx, ThreadNode, ThreadPost};
use crate::atproto::{PostRecord, RawThreadNode};
use tracing::debug;

/// Build the display tree for a `getPostThread` response rooted at the
/// focused post.
pub fn build_thread(raw: RawThreadNode) -> ThreadNode {
    build_node(raw, 0, Direction::Start)
}

/// Build one node at `depth`, expanding only the side `direction` allows.
///
/// Ancestors never expand their replies and replies never expand their
/// parents. Blocked replies are dropped; a blocked parent is kept.
pub fn build_node(raw: RawThreadNode, depth: i32, direction: Direction) -> ThreadNode {
    match raw {
        RawThreadNode::ThreadViewPost(view) => {
            let view = *view;
            let record = match PostRecord::from_value(&view.post.record) {
                Ok(record) => record,
                Err(e) => {
                    debug!(uri = %view.post.uri, error = %e, "dropping post with invalid record");
                    return ThreadNode::unknown("");
                }
            };

            let has_raw_parent = view.parent.is_some();
            let has_raw_replies = view.replies.as_ref().is_some_and(|r| !r.is_empty());
            let claims_replies = view.post.has_replies();

            let parent = match view.parent {
                Some(parent) if direction != Direction::Down => {
                    Some(build_node(*parent, depth - 1, Direction::Up))
                }
                _ => None,
            };

            let replies = match view.replies {
                Some(replies) if !replies.is_empty() && direction != Direction::Up => Some(
                    replies
                        .into_iter()
                        .map(|reply| build_node(reply, depth + 1, Direction::Down))
                        .filter(|node| !node.is_blocked())
                        .collect(),
                ),
                _ => None,
            };

            let ctx = ThreadCtx {
                depth,
                is_highlighted_post: depth == 0,
                has_more: direction == Direction::Down && !has_raw_replies && claims_replies,
                show_child_reply_line: direction == Direction::Up
                    || (direction == Direction::Down && has_raw_replies),
                show_parent_reply_line: (direction == Direction::Up && has_raw_parent)
                    || (direction == Direction::Down && depth != 1),
                is_parent_loading: false,
                is_child_loading: false,
            };

            ThreadNode::Post(Box::new(ThreadPost {
                uri: view.post.uri.clone(),
                post: view.post,
                record,
                parent,
                replies,
                viewer: view.viewer,
                ctx,
            }))
        }
        RawThreadNode::BlockedPost(blocked) => ThreadNode::Blocked {
            uri: blocked.uri,
            ctx: ThreadCtx::at_depth(depth),
        },
        RawThreadNode::NotFoundPost(not_found) => ThreadNode::NotFound {
            uri: not_found.uri,
            ctx: ThreadCtx::at_depth(depth),
        },
        RawThreadNode::Unknown => ThreadNode::unknown(""),
    }
}
