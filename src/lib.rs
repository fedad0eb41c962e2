// SPDX-License-Identifier: MPL-2.0

//! Post thread assembly for Hangar.
//!
//! Turns a `getPostThread` response into a display-ready [`ThreadNode`] tree,
//! orders its replies by the viewer's preferences and finds placeholder posts
//! in already-loaded feeds while the real thread is in flight.

pub mod atproto;
pub mod cache;
pub mod config;
pub mod query;
pub mod runtime;
pub mod state;
pub mod thread;

pub use cache::QueryCache;
pub use query::{PostThreadQuery, ThreadSource};
pub use state::{ThreadSort, ThreadViewPrefs};
pub use thread::{Direction, ThreadCtx, ThreadNode, ThreadPost, build_thread, sort_thread};
