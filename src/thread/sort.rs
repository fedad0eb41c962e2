// SPDX-License-Identifier: MPL-2.0

use super::{ThreadNode, ThreadPost};
use crate::atproto::PostView;
use crate::state::{ThreadSort, ThreadViewPrefs};
use rand::RngCore;
use std::cmp::Ordering;

/// Reorder replies at every level of the tree according to the viewer's
/// thread preferences. Non-post nodes are left untouched.
///
/// Ordering, first decisive rule wins:
/// 1. replies by the author of the post being replied to, oldest first
/// 2. replies from followed accounts, if `prioritize_followed_users`
/// 3. the preferred sort (newest first when unrecognized)
///
/// Non-post siblings always go last.
pub fn sort_thread<'a>(node: &'a mut ThreadNode, opts: &ThreadViewPrefs) -> &'a mut ThreadNode {
    if let ThreadNode::Post(post) = node {
        sort_post(post, opts);
    }
    node
}

fn sort_post(post: &mut ThreadPost, opts: &ThreadViewPrefs) {
    let op_did = post.post.author.did.as_str();
    if let Some(replies) = post.replies.as_mut() {
        sort_replies(replies, op_did, opts);
        for reply in replies.iter_mut() {
            sort_thread(reply, opts);
        }
    }
}

fn sort_replies(replies: &mut Vec<ThreadNode>, op_did: &str, opts: &ThreadViewPrefs) {
    if opts.sort == ThreadSort::Random {
        // One key per reply per pass keeps the comparator consistent within
        // the sort while the result still changes from pass to pass.
        let mut rng = rand::thread_rng();
        let mut keyed: Vec<(u64, ThreadNode)> =
            replies.drain(..).map(|r| (rng.next_u64(), r)).collect();
        keyed.sort_by(|(ka, a), (kb, b)| {
            compare_replies(a, b, op_did, opts, |_, _| ka.cmp(kb))
        });
        replies.extend(keyed.into_iter().map(|(_, reply)| reply));
    } else {
        replies.sort_by(|a, b| {
            compare_replies(a, b, op_did, opts, |a, b| by_preference(a, b, opts.sort))
        });
    }
}

fn compare_replies(
    a: &ThreadNode,
    b: &ThreadNode,
    op_did: &str,
    opts: &ThreadViewPrefs,
    primary: impl FnOnce(&PostView, &PostView) -> Ordering,
) -> Ordering {
    let (a, b) = match (a, b) {
        (ThreadNode::Post(a), ThreadNode::Post(b)) => (&a.post, &b.post),
        (ThreadNode::Post(_), _) => return Ordering::Less,
        (_, ThreadNode::Post(_)) => return Ordering::Greater,
        _ => return Ordering::Equal,
    };

    let a_is_op = a.author.did == op_did;
    let b_is_op = b.author.did == op_did;
    match (a_is_op, b_is_op) {
        (true, true) => return oldest_first(a, b),
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }

    if opts.prioritize_followed_users {
        match (
            a.author.is_followed_by_viewer(),
            b.author.is_followed_by_viewer(),
        ) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }
    }

    primary(a, b)
}

fn by_preference(a: &PostView, b: &PostView, sort: ThreadSort) -> Ordering {
    match sort {
        ThreadSort::Oldest => oldest_first(a, b),
        ThreadSort::MostLikes => b
            .like_count
            .unwrap_or(0)
            .cmp(&a.like_count.unwrap_or(0))
            .then_with(|| newest_first(a, b)),
        ThreadSort::Newest | ThreadSort::Random | ThreadSort::Other => newest_first(a, b),
    }
}

// indexedAt is compared as text: the server emits sortable timestamps.
fn oldest_first(a: &PostView, b: &PostView) -> Ordering {
    a.indexed_at.cmp(&b.indexed_at)
}

fn newest_first(a: &PostView, b: &PostView) -> Ordering {
    b.indexed_at.cmp(&a.indexed_at)
}
