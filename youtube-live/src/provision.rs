//! Provisioning of a new broadcast: create an ingest stream, create a broadcast, bind them.

use crate::error::{Result, require};
use crate::youtube_api::broadcasts::{
    LiveBroadcastInsertRequest, LiveBroadcastInsertSnippet, LiveBroadcastInsertStatus,
    PrivacyStatus,
};
use crate::youtube_api::streams::LiveStreamInsertRequest;
use crate::youtube_api::{AccessToken, YouTubeClient};
use jiff::{SignedDuration, Timestamp};
use tracing::instrument;

/// How far in the future a new broadcast is scheduled to start.
const SCHEDULED_START_DELAY: SignedDuration = SignedDuration::from_secs(1);

/// How far in the future a new broadcast is scheduled to end.
const SCHEDULED_END_DELAY: SignedDuration = SignedDuration::from_secs(3600 + 60 + 1);

/// A broadcast bound to its ingest stream.
///
/// Produced once by [`create_broadcast_and_bind`]; every other operation takes the
/// [`broadcast_id`](Self::broadcast_id) from here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BroadcastHandle {
    pub broadcast_id: String,
    /// The stream key an encoder pushes to.
    pub stream_name: String,
    /// ID of the ingest stream the broadcast is bound to.
    pub stream_id: String,
    /// Primary ingestion URL, when the platform reported one.
    pub ingestion_address: Option<String>,
}

impl BroadcastHandle {
    /// Full URL to point an RTMP encoder at, when the ingestion address is known.
    pub fn rtmp_url(&self) -> Option<String> {
        self.ingestion_address
            .as_deref()
            .map(|address| format!("{}/{}", address.trim_end_matches('/'), self.stream_name))
    }
}

/// Creates an RTMP ingest stream and a broadcast, and binds the two together.
///
/// The broadcast is scheduled to start one second from now and end just over an hour later, and
/// is declared as not made for kids.
///
/// The steps run strictly in order. If a later step fails, resources created by earlier steps
/// are left in place.
#[instrument(skip(yt, token), err)]
pub async fn create_broadcast_and_bind(
    yt: &YouTubeClient,
    token: &AccessToken,
    title: &str,
    description: &str,
    privacy_status: PrivacyStatus,
) -> Result<BroadcastHandle> {
    let stream = yt
        .insert_live_stream(
            token,
            &LiveStreamInsertRequest::rtmp_variable(title, description),
        )
        .await?;
    let stream_name = require(
        stream.stream_name().map(str::to_string),
        "cdn.ingestionInfo.streamName",
    )?;
    let ingestion_address = stream.ingestion_address().map(str::to_string);
    let stream_id = require(stream.id, "live stream id")?;

    let now = Timestamp::now();
    let broadcast = yt
        .insert_live_broadcast(
            token,
            &LiveBroadcastInsertRequest {
                snippet: LiveBroadcastInsertSnippet {
                    title: title.to_string(),
                    description: description.to_string(),
                    scheduled_start_time: now + SCHEDULED_START_DELAY,
                    scheduled_end_time: now + SCHEDULED_END_DELAY,
                },
                status: LiveBroadcastInsertStatus {
                    privacy_status,
                    self_declared_made_for_kids: false,
                },
            },
        )
        .await?;
    let broadcast_id = require(broadcast.id, "live broadcast id")?;

    yt.bind_live_broadcast(token, &broadcast_id, &stream_id)
        .await?;

    tracing::info!(
        %broadcast_id,
        %stream_id,
        %stream_name,
        "broadcast created and bound to stream"
    );

    Ok(BroadcastHandle {
        broadcast_id,
        stream_name,
        stream_id,
        ingestion_address,
    })
}
