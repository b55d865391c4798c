//! Typed access to the live streaming corner of the YouTube Data API v3.
//!
//! Going live involves two resources:
//!
//! - a [`LiveStream`] is the ingest side. It says how an encoder pushes video (RTMP, variable
//!   resolution) and carries the stream name the encoder uses as its key.
//! - a [`LiveBroadcast`] is what viewers see: a title, a schedule, a privacy setting, a live chat,
//!   and a lifecycle status the owner moves along with transitions.
//!
//! A broadcast shows nothing until it is bound to a stream. Its live chat is addressed through
//! the `liveChatId` in its snippet, and read page by page through [`chat`].

pub mod broadcasts;
pub mod chat;
pub mod client;
pub mod streams;

pub use client::{AccessToken, YouTubeClient};

pub use broadcasts::{
    BroadcastLifeCycleStatus, BroadcastStatus, LiveBroadcast, LiveBroadcastSnippet,
    LiveBroadcastStatus, PrivacyStatus,
};

pub use streams::{IngestionInfo, LiveStream, LiveStreamCdn, StreamStatus};

pub use chat::{LiveChatMessage, LiveChatMessageAuthor, LiveChatMessageListResponse};
