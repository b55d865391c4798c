//! Orchestrates a YouTube live broadcast and ingests its live chat.
//!
//! - [`provision::create_broadcast_and_bind`] creates an RTMP ingest stream and a broadcast and
//!   binds them, yielding a [`BroadcastHandle`].
//! - [`lifecycle`] moves that broadcast through `testing`, `live` and `complete`, and reads its
//!   state back.
//! - [`ChatPoller`] polls the broadcast's live chat in the background and hands every new
//!   message to a [`ChatSink`] until cancelled.
//!
//! Nothing here acquires or refreshes credentials: every operation takes the caller's
//! [`AccessToken`].

pub mod background;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod provision;
pub mod youtube_api;

#[cfg(test)]
pub(crate) mod mock;

pub use background::chat::{
    ChatCursor, ChatMessage, ChatPoller, ChatSink, SinkClosed, poll_live_chat,
};
pub use config::{ChatPollerConfig, ClientConfig};
pub use error::{Error, Result};
pub use provision::{BroadcastHandle, create_broadcast_and_bind};
pub use youtube_api::{AccessToken, BroadcastLifeCycleStatus, PrivacyStatus, YouTubeClient};
