// SPDX-License-Identifier: MPL-2.0

use super::ThreadNode;

/// Every post in the tree, ancestors first, then the node, then its replies
/// depth-first. Non-post nodes are skipped along with anything below them.
pub fn traverse_thread(node: &ThreadNode) -> Vec<&ThreadNode> {
    let mut out = Vec::new();
    walk(node, &mut out);
    out
}

fn walk<'a>(node: &'a ThreadNode, out: &mut Vec<&'a ThreadNode>) {
    let ThreadNode::Post(post) = node else {
        return;
    };
    if let Some(parent) = &post.parent {
        walk(parent, out);
    }
    out.push(node);
    for reply in post.replies.iter().flatten() {
        walk(reply, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thread::{build_thread, fixtures};

    #[test]
    fn test_order_is_ancestors_self_replies() {
        let tree = build_thread(fixtures::small_thread());
        let uris: Vec<_> = traverse_thread(&tree).into_iter().map(ThreadNode::uri).collect();
        assert_eq!(
            uris,
            vec![
                "at://did:plc:gp/app.bsky.feed.post/p-1",
                "at://did:plc:op/app.bsky.feed.post/p0",
                "at://did:plc:r1/app.bsky.feed.post/r1",
                "at://did:plc:r2/app.bsky.feed.post/r2",
            ]
        );
    }

    #[test]
    fn test_non_post_yields_nothing() {
        assert!(traverse_thread(&ThreadNode::unknown("at://x")).is_empty());
    }

    #[test]
    fn test_restartable() {
        let tree = build_thread(fixtures::small_thread());
        assert_eq!(traverse_thread(&tree).len(), traverse_thread(&tree).len());
    }
}
