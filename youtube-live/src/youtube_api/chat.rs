//! YouTube Live Chat Messages API types.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Response structure for the `liveChatMessages.list` API call.
///
/// `next_page_token` and `polling_interval_millis` together form the cursor for the next poll:
/// fetching with that token returns only messages newer than the ones in this page, and the
/// server asks clients to wait at least `polling_interval_millis` before doing so.
///
/// See: <https://developers.google.com/youtube/v3/live/docs/liveChatMessages/list>
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveChatMessageListResponse {
    /// Chat messages, oldest first.
    #[serde(default)]
    pub items: Vec<LiveChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    /// How long to wait before polling again.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polling_interval_millis: Option<u64>,
    /// When the chat went offline. Only present once the chat has ended.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offline_at: Option<Timestamp>,
}

/// A `liveChatMessage` resource.
///
/// See: <https://developers.google.com/youtube/v3/live/docs/liveChatMessages#resource>
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveChatMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub snippet: LiveChatMessageSnippet,
    /// Always present when `authorDetails` is requested in `part`.
    pub author_details: LiveChatMessageAuthor,
}

/// See: <https://developers.google.com/youtube/v3/live/docs/liveChatMessages#snippet>
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveChatMessageSnippet {
    /// The message type, e.g. `textMessageEvent` or `superChatEvent`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<Timestamp>,
    /// Contains a string that can be displayed to the user.
    ///
    /// If this field is not present, the message is being deleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_message: Option<String>,
}

/// See: <https://developers.google.com/youtube/v3/live/docs/liveChatMessages#authorDetails>
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveChatMessageAuthor {
    /// The display name of the channel as it appears in chat.
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
}
