// SPDX-License-Identifier: MPL-2.0

pub const APP_ID: &str = "io.github.sethcottle.Hangar";
pub const APP_NAME: &str = "Hangar";

pub const DEFAULT_PDS: &str = "https://bsky.social";

/// How many levels of replies to request below the focused post.
pub const THREAD_REPLY_DEPTH: u16 = 6;

/// How many ancestors to request above the focused post.
pub const THREAD_PARENT_HEIGHT: u16 = 80;

/// Query key prefix for cached post threads.
pub const POST_THREAD_KEY_PREFIX: &str = "post-thread";
