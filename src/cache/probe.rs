// SPDX-License-Identifier: MPL-2.0

//! Look up a post in results already held in memory, so a thread can show
//! something before its own fetch returns.
//!
//! Thread results carry the most context and are checked first, then feeds,
//! then notifications. A miss is normal and just means no placeholder.

use super::QueryCache;
use crate::atproto::{FeedViewPost, PostView};
use crate::thread::{
    ThreadNode, feed_view_post_to_placeholder, post_view_to_placeholder,
    thread_node_to_placeholder, traverse_thread,
};
use tracing::debug;

/// First post with `uri` in any cached thread, walking each thread
/// ancestors-first.
pub fn find_post_in_threads<'a>(cache: &'a QueryCache, uri: &str) -> Option<&'a ThreadNode> {
    cache
        .post_thread
        .iter()
        .flat_map(|(_, tree)| traverse_thread(tree))
        .find(|node| node.uri() == uri)
}

pub fn find_post_in_feeds<'a>(cache: &'a QueryCache, uri: &str) -> Option<&'a FeedViewPost> {
    feed_matches(cache, uri).next()
}

pub fn find_post_in_notifications<'a>(cache: &'a QueryCache, uri: &str) -> Option<&'a PostView> {
    notification_matches(cache, uri).next()
}

fn feed_matches<'a>(cache: &'a QueryCache, uri: &str) -> impl Iterator<Item = &'a FeedViewPost> {
    cache
        .post_feed
        .iter()
        .flat_map(|(_, pages)| pages.items())
        .filter(move |item| item.post.uri == uri)
}

fn notification_matches<'a>(
    cache: &'a QueryCache,
    uri: &str,
) -> impl Iterator<Item = &'a PostView> {
    cache
        .notifications
        .iter()
        .flat_map(|(_, pages)| pages.items())
        .filter_map(|item| item.subject.as_ref())
        .filter(move |post| post.uri == uri)
}

/// Placeholder thread for `uri`, if any cache has seen the post.
pub fn find_post(cache: &QueryCache, uri: &str) -> Option<ThreadNode> {
    if let Some(node) = find_post_in_threads(cache, uri) {
        return thread_node_to_placeholder(node);
    }

    let from_feeds = feed_matches(cache, uri).find_map(|item| {
        feed_view_post_to_placeholder(item)
            .inspect_err(|e| debug!(uri, error = %e, "skipping cached feed post"))
            .ok()
    });
    if from_feeds.is_some() {
        return from_feeds;
    }

    notification_matches(cache, uri).find_map(|post| {
        post_view_to_placeholder(post)
            .inspect_err(|e| debug!(uri, error = %e, "skipping cached notification post"))
            .ok()
    })
}
