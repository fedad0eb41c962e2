// SPDX-License-Identifier: MPL-2.0

//! In-memory query results the rest of the app has already fetched.
//!
//! Each store maps an opaque query key to its last result. Thread lookups
//! only ever read from these; writes belong to whoever ran the query.

pub mod probe;
mod resolve;

pub use probe::{find_post, find_post_in_feeds, find_post_in_notifications, find_post_in_threads};
pub use resolve::ResolvedDidCache;

use crate::atproto::{FeedNotification, FeedViewPost};
use crate::config::POST_THREAD_KEY_PREFIX;
use crate::thread::ThreadNode;

/// Cache key for the thread focused on `uri`.
pub fn thread_query_key(uri: &str) -> String {
    format!("{POST_THREAD_KEY_PREFIX}:{uri}")
}

/// Results keyed by query, kept in insertion order.
#[derive(Debug, Clone)]
pub struct QueryStore<T> {
    entries: Vec<(String, T)>,
}

impl<T> Default for QueryStore<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> QueryStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the result for `key`, keeping its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: T) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: &str) -> Option<T> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub cursor: Option<String>,
    pub items: Vec<T>,
}

/// A cursor-paginated result, pages in load order.
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    pub pages: Vec<Page<T>>,
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self { pages: Vec::new() }
    }
}

impl<T> Paginated<T> {
    pub fn push_page(&mut self, cursor: Option<String>, items: Vec<T>) {
        self.pages.push(Page { cursor, items });
    }

    /// Items across all pages, in page order.
    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.pages.iter().flat_map(|page| page.items.iter())
    }
}

/// Every result store a thread placeholder may be drawn from.
#[derive(Debug, Clone, Default)]
pub struct QueryCache {
    pub post_thread: QueryStore<ThreadNode>,
    pub post_feed: QueryStore<Paginated<FeedViewPost>>,
    pub notifications: QueryStore<Paginated<FeedNotification>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut store = QueryStore::new();
        store.insert("a", 1);
        store.insert("b", 2);
        store.insert("a", 3);
        let entries: Vec<_> = store.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        assert_eq!(entries, vec![("a".to_string(), 3), ("b".to_string(), 2)]);
    }

    #[test]
    fn test_remove() {
        let mut store = QueryStore::new();
        store.insert("a", 1);
        assert_eq!(store.remove("a"), Some(1));
        assert!(store.is_empty());
        assert_eq!(store.remove("a"), None);
    }

    #[test]
    fn test_paginated_items_in_page_order() {
        let mut pages = Paginated::default();
        pages.push_page(Some("c1".to_string()), vec![1, 2]);
        pages.push_page(None, vec![3]);
        assert_eq!(pages.items().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_thread_query_key() {
        assert_eq!(
            thread_query_key("at://did:plc:a/app.bsky.feed.post/1"),
            "post-thread:at://did:plc:a/app.bsky.feed.post/1"
        );
    }
}
