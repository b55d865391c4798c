//! `liveBroadcast` resources: the viewer-facing side of a live event.
//!
//! Covers the resource as read back from the API, the insert request body, and the status
//! enums sent with and read from it.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Response structure for the `liveBroadcasts.list` API call.
///
/// See: <https://developers.google.com/youtube/v3/live/docs/liveBroadcasts/list>
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveBroadcastListResponse {
    /// A list of broadcasts that match the request criteria.
    #[serde(default)]
    pub items: Vec<LiveBroadcast>,
    /// Token that can be used as the value of the pageToken parameter to retrieve the next page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// A `liveBroadcast` resource.
///
/// Which parts are present depends on the `part` parameter of the request, so all of them are
/// optional here. Callers that need the `id` treat its absence as [`crate::Error::NotFound`].
///
/// See: <https://developers.google.com/youtube/v3/live/docs/liveBroadcasts#resource>
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveBroadcast {
    /// The ID that YouTube assigns to uniquely identify the broadcast.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<LiveBroadcastSnippet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LiveBroadcastStatus>,
}

/// Basic details about the broadcast.
///
/// See: <https://developers.google.com/youtube/v3/live/docs/liveBroadcasts#snippet>
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveBroadcastSnippet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_start_time: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_end_time: Option<Timestamp>,
    /// Unset until the broadcast has actually started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_start_time: Option<Timestamp>,
    /// Unset until the broadcast has actually ended.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_end_time: Option<Timestamp>,
    /// The ID of the broadcast's live chat, used to address its message feed.
    ///
    /// Absent when the broadcast has no live chat.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_chat_id: Option<String>,
}

/// The broadcast's status and settings.
///
/// See: <https://developers.google.com/youtube/v3/live/docs/liveBroadcasts#status>
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveBroadcastStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub life_cycle_status: Option<BroadcastLifeCycleStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy_status: Option<PrivacyStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_declared_made_for_kids: Option<bool>,
}

/// The broadcast's current lifecycle status.
///
/// Statuses this crate does not know about are kept verbatim in [`Self::Other`].
///
/// See: <https://developers.google.com/youtube/v3/live/docs/liveBroadcasts#status.lifeCycleStatus>
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BroadcastLifeCycleStatus {
    /// The broadcast was created but never activated.
    Created,
    /// The broadcast settings are complete and it is bound to a stream.
    Ready,
    /// The broadcast is transitioning to testing.
    TestStarting,
    /// The broadcast is only visible to its owner.
    Testing,
    /// The broadcast is transitioning to live.
    LiveStarting,
    /// The broadcast is active and visible to anyone who has access to the URL.
    Live,
    /// The broadcast has finished and is no longer live.
    Complete,
    /// The broadcast was removed by an admin action.
    Revoked,
    #[serde(untagged)]
    Other(String),
}

impl BroadcastLifeCycleStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Created => "created",
            Self::Ready => "ready",
            Self::TestStarting => "testStarting",
            Self::Testing => "testing",
            Self::LiveStarting => "liveStarting",
            Self::Live => "live",
            Self::Complete => "complete",
            Self::Revoked => "revoked",
            Self::Other(other) => other,
        }
    }
}

impl fmt::Display for BroadcastLifeCycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who can see a broadcast.
///
/// See: <https://developers.google.com/youtube/v3/live/docs/liveBroadcasts#status.privacyStatus>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PrivacyStatus {
    /// Only the owner and explicitly authorized viewers.
    Private,
    /// Anyone with the link.
    Unlisted,
    /// Anyone.
    Public,
}

impl PrivacyStatus {
    pub const ALL: [Self; 3] = [Self::Private, Self::Unlisted, Self::Public];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Unlisted => "unlisted",
            Self::Public => "public",
        }
    }
}

impl fmt::Display for PrivacyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrivacyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown privacy status {s:?} (expected private, unlisted or public)"))
    }
}

/// Target status for the `liveBroadcasts.transition` API.
///
/// See: <https://developers.google.com/youtube/v3/live/docs/liveBroadcasts/transition>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BroadcastStatus {
    /// Start broadcast testing mode.
    Testing,
    /// Make broadcast visible to audience.
    Live,
    /// Mark broadcast as complete/over.
    Complete,
}

impl BroadcastStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Testing => "testing",
            Self::Live => "live",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for BroadcastStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body for `liveBroadcasts.insert`.
///
/// See: <https://developers.google.com/youtube/v3/live/docs/liveBroadcasts/insert>
#[derive(Debug, Clone, Serialize)]
pub struct LiveBroadcastInsertRequest {
    pub snippet: LiveBroadcastInsertSnippet,
    pub status: LiveBroadcastInsertStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveBroadcastInsertSnippet {
    pub title: String,
    pub description: String,
    pub scheduled_start_time: Timestamp,
    pub scheduled_end_time: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveBroadcastInsertStatus {
    pub privacy_status: PrivacyStatus,
    pub self_declared_made_for_kids: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn unknown_life_cycle_status_passes_through() {
        let known: BroadcastLifeCycleStatus = serde_json::from_value(json!("testStarting")).unwrap();
        assert_eq!(known, BroadcastLifeCycleStatus::TestStarting);

        let other: BroadcastLifeCycleStatus = serde_json::from_value(json!("archived")).unwrap();
        assert_eq!(other, BroadcastLifeCycleStatus::Other("archived".to_string()));
        assert_eq!(other.to_string(), "archived");
        assert_eq!(serde_json::to_value(&other).unwrap(), json!("archived"));
    }

    #[test]
    fn privacy_status_parses_and_prints() {
        for status in PrivacyStatus::ALL {
            assert_eq!(status.to_string().parse::<PrivacyStatus>(), Ok(status));
            assert_eq!(serde_json::to_value(status).unwrap(), json!(status.as_str()));
        }
        assert_eq!("Unlisted".parse::<PrivacyStatus>(), Ok(PrivacyStatus::Unlisted));
        assert!("secret".parse::<PrivacyStatus>().is_err());
    }

    #[test]
    fn insert_request_shape() {
        let start: Timestamp = "2025-05-13T10:00:01Z".parse().unwrap();
        let end: Timestamp = "2025-05-13T11:01:01Z".parse().unwrap();
        let request = LiveBroadcastInsertRequest {
            snippet: LiveBroadcastInsertSnippet {
                title: "T".to_string(),
                description: "D".to_string(),
                scheduled_start_time: start,
                scheduled_end_time: end,
            },
            status: LiveBroadcastInsertStatus {
                privacy_status: PrivacyStatus::Unlisted,
                self_declared_made_for_kids: false,
            },
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "snippet": {
                    "title": "T",
                    "description": "D",
                    "scheduledStartTime": "2025-05-13T10:00:01Z",
                    "scheduledEndTime": "2025-05-13T11:01:01Z",
                },
                "status": {
                    "privacyStatus": "unlisted",
                    "selfDeclaredMadeForKids": false,
                },
            })
        );
    }

    #[test]
    fn partial_broadcast_decodes() {
        let broadcast: LiveBroadcast = serde_json::from_value(json!({
            "kind": "youtube#liveBroadcast",
            "id": "bc-1",
            "snippet": { "title": "T", "liveChatId": "chat-1" },
        }))
        .unwrap();
        assert_eq!(broadcast.id.as_deref(), Some("bc-1"));
        let snippet = broadcast.snippet.unwrap();
        assert_eq!(snippet.live_chat_id.as_deref(), Some("chat-1"));
        assert!(snippet.scheduled_start_time.is_none());
        assert!(broadcast.status.is_none());
    }
}
