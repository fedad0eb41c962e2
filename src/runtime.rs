// SPDX-License-Identifier: MPL-2.0

//! Shared async runtime for thread fetches.
//!
//! Thread building itself is synchronous; only the network round-trip that
//! produces its input runs here. One runtime is shared so callers on the UI
//! side don't spin up a new one per request.

use once_cell::sync::Lazy;
use std::future::Future;
use tokio::runtime::Runtime;

/// Two workers are plenty for I/O-bound requests.
static RUNTIME: Lazy<Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .thread_name("hangar-async")
        .build()
        .expect("failed to create async runtime")
});

/// Execute a future on the shared runtime, blocking until completion.
pub fn block_on<F: Future>(future: F) -> F::Output {
    RUNTIME.block_on(future)
}

/// Spawn a future on the shared runtime without blocking.
pub fn spawn<F>(future: F) -> tokio::task::JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    RUNTIME.spawn(future)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_on_returns_output() {
        assert_eq!(block_on(async { 40 + 2 }), 42);
    }

    #[test]
    fn test_spawned_task_completes() {
        let handle = spawn(async { "done" });
        assert_eq!(block_on(handle).unwrap(), "done");
    }
}
