//! `liveStream` resources: where and how an encoder pushes video.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A `liveStream` resource.
///
/// See: <https://developers.google.com/youtube/v3/live/docs/liveStreams#resource>
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveStream {
    /// The ID that YouTube assigns to uniquely identify the stream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<LiveStreamSnippet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cdn: Option<LiveStreamCdn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LiveStreamStatus>,
}

impl LiveStream {
    /// The stream name (stream key) an encoder must push to.
    pub fn stream_name(&self) -> Option<&str> {
        self.ingestion_info()?.stream_name.as_deref()
    }

    /// The primary ingestion URL, without the stream name.
    pub fn ingestion_address(&self) -> Option<&str> {
        self.ingestion_info()?.ingestion_address.as_deref()
    }

    fn ingestion_info(&self) -> Option<&IngestionInfo> {
        self.cdn.as_ref()?.ingestion_info.as_ref()
    }
}

/// See: <https://developers.google.com/youtube/v3/live/docs/liveStreams#snippet>
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStreamSnippet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Ingestion settings of a stream.
///
/// See: <https://developers.google.com/youtube/v3/live/docs/liveStreams#cdn>
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStreamCdn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingestion_type: Option<IngestionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingestion_info: Option<IngestionInfo>,
}

/// Where and under which name an encoder pushes video.
///
/// See: <https://developers.google.com/youtube/v3/live/docs/liveStreams#cdn.ingestionInfo>
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingestion_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_ingestion_address: Option<String>,
}

/// The protocol an encoder uses to push video.
///
/// Protocols this crate does not know about are kept verbatim in [`Self::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestionType {
    Dash,
    Hls,
    Rtmp,
    #[serde(untagged)]
    Other(String),
}

/// The status of a live stream.
///
/// Statuses this crate does not know about are kept verbatim in [`Self::Other`].
///
/// See: <https://developers.google.com/youtube/v3/live/docs/liveStreams#status>
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StreamStatus {
    /// The stream is receiving data.
    Active,
    /// The stream exists but lacks valid CDN settings.
    Created,
    /// An error condition exists on the stream.
    Error,
    /// The stream is not receiving data.
    Inactive,
    /// The stream has valid CDN settings.
    Ready,
    #[serde(untagged)]
    Other(String),
}

impl StreamStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Created => "created",
            Self::Error => "error",
            Self::Inactive => "inactive",
            Self::Ready => "ready",
            Self::Other(other) => other,
        }
    }
}

impl fmt::Display for StreamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStreamStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_status: Option<StreamStatus>,
}

/// Request body for `liveStreams.insert`.
///
/// See: <https://developers.google.com/youtube/v3/live/docs/liveStreams/insert>
#[derive(Debug, Clone, Serialize)]
pub struct LiveStreamInsertRequest {
    pub snippet: LiveStreamInsertSnippet,
    pub cdn: LiveStreamInsertCdn,
}

impl LiveStreamInsertRequest {
    /// An RTMP stream that accepts any resolution and frame rate.
    pub fn rtmp_variable(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            snippet: LiveStreamInsertSnippet {
                title: title.into(),
                description: description.into(),
            },
            cdn: LiveStreamInsertCdn {
                ingestion_type: IngestionType::Rtmp,
                resolution: "variable".to_string(),
                frame_rate: "variable".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LiveStreamInsertSnippet {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStreamInsertCdn {
    pub ingestion_type: IngestionType,
    pub resolution: String,
    pub frame_rate: String,
}
