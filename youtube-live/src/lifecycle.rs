//! Broadcast lifecycle transitions and status reads.
//!
//! A broadcast moves `created → testing → live → complete`. The platform is the only authority
//! on which transitions are legal; nothing here checks preconditions or caches status.
//!
//! Callers must run [`test`] and let the broadcast settle into `testing` before [`start`] can
//! succeed. Waiting for that is the caller's job.

use crate::error::{Result, require};
use crate::youtube_api::{
    AccessToken, BroadcastLifeCycleStatus, BroadcastStatus, LiveBroadcast, YouTubeClient,
};
use tracing::instrument;

/// Requests a single transition of `broadcast_id` to `status`.
#[instrument(skip(yt, token), err)]
pub async fn transition(
    yt: &YouTubeClient,
    token: &AccessToken,
    broadcast_id: &str,
    status: BroadcastStatus,
) -> Result<LiveBroadcast> {
    let broadcast = yt
        .transition_live_broadcast(token, broadcast_id, status)
        .await?;
    tracing::info!(broadcast_id, %status, "broadcast transitioned");
    Ok(broadcast)
}

/// Moves the broadcast into testing, where only its owner can see it.
pub async fn test(
    yt: &YouTubeClient,
    token: &AccessToken,
    broadcast_id: &str,
) -> Result<LiveBroadcast> {
    transition(yt, token, broadcast_id, BroadcastStatus::Testing).await
}

/// Makes the broadcast visible to its audience.
pub async fn start(
    yt: &YouTubeClient,
    token: &AccessToken,
    broadcast_id: &str,
) -> Result<LiveBroadcast> {
    transition(yt, token, broadcast_id, BroadcastStatus::Live).await
}

/// Ends the broadcast.
pub async fn stop(
    yt: &YouTubeClient,
    token: &AccessToken,
    broadcast_id: &str,
) -> Result<LiveBroadcast> {
    transition(yt, token, broadcast_id, BroadcastStatus::Complete).await
}

/// Fetches the broadcast's snippet and status as the raw API document, for display.
#[instrument(skip(yt, token), err)]
pub async fn fetch_broadcast_state(
    yt: &YouTubeClient,
    token: &AccessToken,
    broadcast_id: &str,
) -> Result<serde_json::Value> {
    yt.get_live_broadcast_document(token, broadcast_id).await
}

/// Fetches the broadcast's current lifecycle status.
#[instrument(skip(yt, token), ret, err)]
pub async fn broadcast_status(
    yt: &YouTubeClient,
    token: &AccessToken,
    broadcast_id: &str,
) -> Result<BroadcastLifeCycleStatus> {
    let broadcast = yt.get_live_broadcast(token, broadcast_id).await?;
    require(
        broadcast.status.and_then(|status| status.life_cycle_status),
        "status.lifeCycleStatus",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::mock::{MockResponse, MockYouTubeServer};
    use http::{Method, StatusCode};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const TRANSITION: &str = "liveBroadcasts/transition";

    fn transitioned(status: &str) -> MockResponse {
        MockResponse::json(json!({
            "id": "bc-1",
            "status": { "lifeCycleStatus": status, "privacyStatus": "unlisted" },
        }))
    }

    #[tokio::test]
    async fn wrappers_use_fixed_targets() {
        let server = MockYouTubeServer::start().await;
        server
            .respond(Method::POST, TRANSITION, transitioned("testing"))
            .await;
        server
            .respond(Method::POST, TRANSITION, transitioned("live"))
            .await;
        server
            .respond(Method::POST, TRANSITION, transitioned("complete"))
            .await;

        let yt = server.client();
        let token = AccessToken::new("tok");
        let after_test = test(&yt, &token, "bc-1").await.unwrap();
        start(&yt, &token, "bc-1").await.unwrap();
        let after_stop = stop(&yt, &token, "bc-1").await.unwrap();

        assert_eq!(
            after_test.status.unwrap().life_cycle_status,
            Some(BroadcastLifeCycleStatus::Testing)
        );
        assert_eq!(
            after_stop.status.unwrap().life_cycle_status,
            Some(BroadcastLifeCycleStatus::Complete)
        );

        let requests = server.requests_to(Method::POST, TRANSITION).await;
        let targets: Vec<_> = requests
            .iter()
            .map(|r| r.query("broadcastStatus").unwrap())
            .collect();
        assert_eq!(targets, ["testing", "live", "complete"]);
        assert!(requests.iter().all(|r| r.query("id") == Some("bc-1")));
    }

    #[tokio::test]
    async fn rejected_transition_keeps_status_and_body() {
        let server = MockYouTubeServer::start().await;
        server
            .respond(
                Method::POST,
                TRANSITION,
                MockResponse::text(StatusCode::FORBIDDEN, "Forbidden"),
            )
            .await;

        let err = start(&server.client(), &AccessToken::new("tok"), "bc-1")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Api { .. }), "{err:?}");
        assert_eq!(err.status().map(|s| s.as_u16()), Some(403));
        assert_eq!(err.body(), Some("Forbidden"));

        // One request, no retry.
        assert_eq!(server.requests().await.len(), 1);
    }

    #[tokio::test]
    async fn state_reads_are_idempotent() {
        let server = MockYouTubeServer::start().await;
        let document = json!({
            "kind": "youtube#liveBroadcastListResponse",
            "items": [{
                "id": "bc-1",
                "snippet": { "title": "T", "liveChatId": "chat-1" },
                "status": { "lifeCycleStatus": "ready", "privacyStatus": "unlisted" },
            }],
        });
        server
            .respond(
                Method::GET,
                "liveBroadcasts",
                MockResponse::json(document.clone()),
            )
            .await;

        let yt = server.client();
        let token = AccessToken::new("tok");
        let first = fetch_broadcast_state(&yt, &token, "bc-1").await.unwrap();
        let second = fetch_broadcast_state(&yt, &token, "bc-1").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first, document);

        let requests = server.requests().await;
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].query("part"), Some("snippet,status"));
    }

    #[tokio::test]
    async fn typed_status_passes_unknown_values_through() {
        let server = MockYouTubeServer::start().await;
        server
            .respond(
                Method::GET,
                "liveBroadcasts",
                MockResponse::json(json!({
                    "items": [{ "id": "bc-1", "status": { "lifeCycleStatus": "liveStarting" } }],
                })),
            )
            .await;
        server
            .respond(
                Method::GET,
                "liveBroadcasts",
                MockResponse::json(json!({
                    "items": [{ "id": "bc-1", "status": { "lifeCycleStatus": "somethingNew" } }],
                })),
            )
            .await;

        let yt = server.client();
        let token = AccessToken::new("tok");
        assert_eq!(
            broadcast_status(&yt, &token, "bc-1").await.unwrap(),
            BroadcastLifeCycleStatus::LiveStarting
        );
        assert_eq!(
            broadcast_status(&yt, &token, "bc-1").await.unwrap(),
            BroadcastLifeCycleStatus::Other("somethingNew".to_string())
        );
    }
}
