// SPDX-License-Identifier: MPL-2.0

mod client;
pub mod record;
mod types;

pub use client::{ClientError, HangarClient};
pub use record::{AtUri, PostRecord, RecordError, ReplyRef, StrongRef};
pub use types::{
    ActorViewerState, BlockedPost, FeedNotification, FeedViewPost, NotFoundPost, PostView,
    PostViewerState, ProfileViewBasic, RawThreadNode, Session, ThreadViewPost, ViewerThreadState,
};
