// SPDX-License-Identifier: MPL-2.0

//! Loading a post thread: placeholder first, canonical tree once the fetch
//! resolves.
//!
//! A caller that stops caring about a fetch (the focused post changed, the
//! view closed) just drops the future or ignores the result. Coalescing
//! concurrent requests for the same thread is left to whoever owns the query.

use crate::atproto::{ClientError, RawThreadNode};
use crate::cache::{QueryCache, ResolvedDidCache, find_post, thread_query_key};
use crate::runtime;
use crate::state::ThreadViewPrefs;
use crate::thread::{ThreadNode, build_thread, sort_thread};
use tracing::{debug, warn};

/// Anything that can fetch a raw `getPostThread` response.
#[allow(async_fn_in_trait)]
pub trait ThreadSource {
    async fn get_post_thread(&self, uri: &str) -> Result<RawThreadNode, ClientError>;
}

pub struct PostThreadQuery<S> {
    source: S,
    cache: QueryCache,
    resolved: ResolvedDidCache,
}

impl<S: ThreadSource> PostThreadQuery<S> {
    pub fn new(source: S) -> Self {
        Self::with_cache(source, QueryCache::new())
    }

    pub fn with_cache(source: S, cache: QueryCache) -> Self {
        Self {
            source,
            cache,
            resolved: ResolvedDidCache::new(),
        }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut QueryCache {
        &mut self.cache
    }

    pub fn resolved(&self) -> &ResolvedDidCache {
        &self.resolved
    }

    /// Something to show for `uri` while the real thread loads.
    pub fn placeholder(&self, uri: &str) -> Option<ThreadNode> {
        if uri.is_empty() {
            return None;
        }
        find_post(&self.cache, uri)
    }

    /// Fetch and build the thread focused on `uri`, replacing whatever was
    /// cached for it. A failed fetch yields an `Unknown` node for `uri`.
    pub async fn fetch(&mut self, uri: &str) -> ThreadNode {
        if uri.is_empty() {
            debug!("thread query disabled without a uri");
            return ThreadNode::unknown("");
        }

        let tree = match self.source.get_post_thread(uri).await {
            Ok(raw) => {
                let tree = build_thread(raw);
                self.resolved.precache_thread_posts(&tree);
                tree
            }
            Err(e) => {
                warn!(uri, error = %e, "failed to fetch thread");
                ThreadNode::unknown(uri)
            }
        };

        self.cache.post_thread.insert(thread_query_key(uri), tree.clone());
        tree
    }

    /// [`fetch`](Self::fetch), driven to completion on the shared runtime.
    pub fn fetch_blocking(&mut self, uri: &str) -> ThreadNode {
        runtime::block_on(self.fetch(uri))
    }

    /// The cached thread for `uri`, ordered for display. The cached copy
    /// keeps server order so it can be re-sorted when preferences change.
    pub fn sorted(&self, uri: &str, prefs: &ThreadViewPrefs) -> Option<ThreadNode> {
        let mut tree = self.cache.post_thread.get(&thread_query_key(uri))?.clone();
        sort_thread(&mut tree, prefs);
        Some(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Paginated;
    use crate::state::ThreadSort;
    use crate::thread::fixtures;
    use serde_json::json;
    use std::cell::Cell;

    const ROOT: &str = "at://did:plc:op/app.bsky.feed.post/p0";

    struct FakeSource {
        fail: bool,
        calls: Cell<usize>,
    }

    impl FakeSource {
        fn ok() -> Self {
            Self {
                fail: false,
                calls: Cell::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                calls: Cell::new(0),
            }
        }
    }

    impl ThreadSource for FakeSource {
        async fn get_post_thread(&self, _uri: &str) -> Result<RawThreadNode, ClientError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                Err(ClientError::Network("connection lost".to_string()))
            } else {
                Ok(fixtures::small_thread())
            }
        }
    }

    #[test]
    fn test_fetch_builds_caches_and_precaches() {
        let mut query = PostThreadQuery::new(FakeSource::ok());
        let tree = query.fetch_blocking(ROOT);

        assert_eq!(tree.uri(), ROOT);
        assert!(query.cache().post_thread.get(&thread_query_key(ROOT)).is_some());
        assert_eq!(query.resolved().get("r2.test"), Some("did:plc:r2"));
    }

    #[test]
    fn test_failed_fetch_keeps_requested_uri() {
        let mut query = PostThreadQuery::new(FakeSource::failing());
        let tree = query.fetch_blocking(ROOT);
        assert!(matches!(tree, ThreadNode::Unknown { ref uri } if uri == ROOT));
        assert!(query.resolved().is_empty());
    }

    #[test]
    fn test_empty_uri_never_fetches() {
        let mut query = PostThreadQuery::new(FakeSource::ok());
        assert!(matches!(query.fetch_blocking(""), ThreadNode::Unknown { .. }));
        assert_eq!(query.source.calls.get(), 0);
        assert!(query.placeholder("").is_none());
    }

    #[test]
    fn test_placeholder_from_earlier_thread() {
        let mut query = PostThreadQuery::new(FakeSource::ok());
        assert!(query.placeholder("at://did:plc:r1/app.bsky.feed.post/r1").is_none());

        query.fetch_blocking(ROOT);
        let placeholder = query
            .placeholder("at://did:plc:r1/app.bsky.feed.post/r1")
            .unwrap();
        assert!(placeholder.ctx().unwrap().is_highlighted_post);
    }

    #[test]
    fn test_placeholder_from_feed_cache() {
        let mut cache = QueryCache::new();
        let mut feed = Paginated::default();
        feed.push_page(
            None,
            vec![
                serde_json::from_value(json!({
                    "post": fixtures::post_view(ROOT, "did:plc:op", "2024-01-01T00:00:00Z")
                }))
                .unwrap(),
            ],
        );
        cache.post_feed.insert("post-feed:home", feed);

        let query = PostThreadQuery::with_cache(FakeSource::ok(), cache);
        assert_eq!(query.placeholder(ROOT).unwrap().uri(), ROOT);
    }

    #[test]
    fn test_sorted_copy_leaves_cache_in_server_order() {
        let mut query = PostThreadQuery::new(FakeSource::ok());
        query.fetch_blocking(ROOT);

        let prefs = ThreadViewPrefs {
            sort: ThreadSort::Newest,
            prioritize_followed_users: false,
        };
        let sorted = query.sorted(ROOT, &prefs).unwrap();
        let first = |node: &ThreadNode| {
            node.as_post().unwrap().replies.as_ref().unwrap()[0]
                .uri()
                .to_string()
        };

        assert_eq!(first(&sorted), "at://did:plc:r2/app.bsky.feed.post/r2");
        let cached = query.cache().post_thread.get(&thread_query_key(ROOT)).unwrap();
        assert_eq!(first(cached), "at://did:plc:r1/app.bsky.feed.post/r1");
    }

    #[test]
    fn test_refetch_replaces_cached_thread() {
        let mut query = PostThreadQuery::new(FakeSource::ok());
        query.fetch_blocking(ROOT);
        query.fetch_blocking(ROOT);
        assert_eq!(query.cache().post_thread.len(), 1);
        assert_eq!(query.source.calls.get(), 2);
    }
}
