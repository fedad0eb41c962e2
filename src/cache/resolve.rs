// SPDX-License-Identifier: MPL-2.0

use crate::thread::{ThreadNode, traverse_thread};
use std::collections::HashMap;

/// Handle to DID resolutions learned for free from fetched threads, so
/// profile links from a thread don't need another round-trip.
#[derive(Debug, Clone, Default)]
pub struct ResolvedDidCache {
    handles: HashMap<String, String>,
}

impl ResolvedDidCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, handle: impl Into<String>, did: impl Into<String>) {
        self.handles.insert(handle.into(), did.into());
    }

    pub fn get(&self, handle: &str) -> Option<&str> {
        self.handles.get(handle).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Record the author of every post in `tree`.
    pub fn precache_thread_posts(&mut self, tree: &ThreadNode) {
        for node in traverse_thread(tree) {
            if let Some(post) = node.as_post() {
                let author = &post.post.author;
                if !author.handle.is_empty() {
                    self.insert(author.handle.clone(), author.did.clone());
                }
            }
        }
    }
}
