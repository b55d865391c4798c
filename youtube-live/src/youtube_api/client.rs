//! Core YouTube API transport: authenticated requests and response decoding.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::youtube_api::{
    broadcasts::{
        BroadcastStatus, LiveBroadcast, LiveBroadcastInsertRequest, LiveBroadcastListResponse,
    },
    chat::LiveChatMessageListResponse,
    streams::{LiveStream, LiveStreamInsertRequest},
};
use http::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use tracing::instrument;

/// A bearer token for the YouTube Data API.
///
/// This crate never acquires, refreshes, or validates tokens. Callers hand one in to every
/// operation, and it is assumed to be fresh for the duration of that operation.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, as sent in the `Authorization` header.
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

impl From<String> for AccessToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for AccessToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

/// Client for the YouTube Data API v3 live streaming endpoints.
///
/// The client holds no credentials. Every method takes the [`AccessToken`] to use, and each
/// call performs exactly one HTTP round trip with no retries.
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    /// HTTP client for API requests
    client: reqwest::Client,
    /// Base URL, without a trailing slash
    base_url: String,
}

impl YouTubeClient {
    /// Creates a client with its own HTTP connection pool.
    ///
    /// # Panics
    ///
    /// Panics if the TLS backend cannot be initialized, which `reqwest` treats as unrecoverable.
    pub fn new(config: &ClientConfig) -> Self {
        let client = reqwest::ClientBuilder::new()
            .timeout(config.request_timeout)
            // SSRF no thank you.
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("building reqwest client should not fail");
        Self::with_http_client(client, config)
    }

    /// Creates a client that shares an existing HTTP client.
    pub fn with_http_client(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Makes one authenticated request and decodes the JSON response into `T`.
    ///
    /// - Any status outside 2xx becomes [`Error::Api`] carrying the body verbatim.
    /// - A body that does not decode into `T` becomes [`Error::MalformedResponse`].
    /// - Failing to send the request or read the body becomes [`Error::Transport`].
    #[instrument(skip(self, token, json_body), level = tracing::Level::TRACE)]
    pub(crate) async fn request<T: DeserializeOwned>(
        &self,
        token: &AccessToken,
        method: Method,
        endpoint: &'static str,
        query_params: &[(&str, &str)],
        json_body: Option<&(impl Serialize + Sync)>,
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .bearer_auth(token.secret())
            .query(query_params);

        if let Some(body) = json_body {
            request = request
                .header(http::header::CONTENT_TYPE, "application/json")
                .json(body);
        }

        let transport = |source| Error::Transport {
            method: method.clone(),
            url: url.clone(),
            source,
        };

        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        if !status.is_success() {
            tracing::debug!(%method, endpoint, %status, "YouTube API rejected request");
            return Err(Error::Api {
                method,
                status,
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| Error::MalformedResponse { endpoint, source })
    }

    /// Creates a live stream (ingest endpoint) resource.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/live/docs/liveStreams/insert>
    #[instrument(skip(self, token), ret, err)]
    pub async fn insert_live_stream(
        &self,
        token: &AccessToken,
        stream: &LiveStreamInsertRequest,
    ) -> Result<LiveStream> {
        let query_params = [("part", "snippet,cdn")];
        let stream: LiveStream = self
            .request(token, Method::POST, "liveStreams", &query_params, Some(stream))
            .await?;

        tracing::debug!(stream_id = ?stream.id, "created live stream");
        Ok(stream)
    }

    /// Creates a live broadcast resource.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/live/docs/liveBroadcasts/insert>
    #[instrument(skip(self, token), ret, err)]
    pub async fn insert_live_broadcast(
        &self,
        token: &AccessToken,
        broadcast: &LiveBroadcastInsertRequest,
    ) -> Result<LiveBroadcast> {
        let query_params = [("part", "snippet,status")];
        let broadcast: LiveBroadcast = self
            .request(
                token,
                Method::POST,
                "liveBroadcasts",
                &query_params,
                Some(broadcast),
            )
            .await?;

        tracing::debug!(broadcast_id = ?broadcast.id, "created live broadcast");
        Ok(broadcast)
    }

    /// Binds a broadcast to the stream whose video it should carry.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/live/docs/liveBroadcasts/bind>
    #[instrument(skip(self, token), err)]
    pub async fn bind_live_broadcast(
        &self,
        token: &AccessToken,
        broadcast_id: &str,
        stream_id: &str,
    ) -> Result<LiveBroadcast> {
        let query_params = [
            ("part", "id,snippet,status"),
            ("id", broadcast_id),
            ("streamId", stream_id),
        ];
        let broadcast = self
            .request(
                token,
                Method::POST,
                "liveBroadcasts/bind",
                &query_params,
                None::<&()>,
            )
            .await?;

        tracing::debug!(broadcast_id, stream_id, "bound broadcast to stream");
        Ok(broadcast)
    }

    /// Changes the status of a live broadcast.
    ///
    /// No local check is made that the transition is legal; the platform decides, and rejects
    /// illegal transitions with a non-2xx status.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/live/docs/liveBroadcasts/transition>
    #[instrument(skip(self, token), err)]
    pub async fn transition_live_broadcast(
        &self,
        token: &AccessToken,
        broadcast_id: &str,
        status: BroadcastStatus,
    ) -> Result<LiveBroadcast> {
        let query_params = [
            ("part", "id,snippet,status"),
            ("broadcastStatus", status.as_str()),
            ("id", broadcast_id),
        ];
        let broadcast = self
            .request(
                token,
                Method::POST,
                "liveBroadcasts/transition",
                &query_params,
                None::<&()>,
            )
            .await?;

        tracing::debug!(broadcast_id, %status, "successfully transitioned broadcast");
        Ok(broadcast)
    }

    /// Fetches the raw `liveBroadcasts.list` document for one broadcast (snippet and status).
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/live/docs/liveBroadcasts/list>
    #[instrument(skip(self, token), err)]
    pub async fn get_live_broadcast_document(
        &self,
        token: &AccessToken,
        broadcast_id: &str,
    ) -> Result<serde_json::Value> {
        let query_params = [("part", "snippet,status"), ("id", broadcast_id)];
        self.request(
            token,
            Method::GET,
            "liveBroadcasts",
            &query_params,
            None::<&()>,
        )
        .await
    }

    /// Fetches one broadcast by ID, failing with [`Error::NotFound`] if no such broadcast exists.
    #[instrument(skip(self, token), err)]
    pub async fn get_live_broadcast(
        &self,
        token: &AccessToken,
        broadcast_id: &str,
    ) -> Result<LiveBroadcast> {
        let query_params = [("part", "id,snippet,status"), ("id", broadcast_id)];
        let response: LiveBroadcastListResponse = self
            .request(
                token,
                Method::GET,
                "liveBroadcasts",
                &query_params,
                None::<&()>,
            )
            .await?;

        response
            .items
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found(format!("broadcast {broadcast_id}")))
    }

    /// Fetches one page of live chat messages.
    ///
    /// `page_token` must be the `nextPageToken` of the previous page, or `None` for the first.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/live/docs/liveChatMessages/list>
    #[instrument(skip(self, token), err, level = tracing::Level::DEBUG)]
    pub async fn list_live_chat_messages(
        &self,
        token: &AccessToken,
        live_chat_id: &str,
        page_token: Option<&str>,
        max_results: u32,
    ) -> Result<LiveChatMessageListResponse> {
        let max_results_string = max_results.to_string();
        let mut query_params = vec![
            ("part", "snippet,authorDetails"),
            ("liveChatId", live_chat_id),
            ("maxResults", max_results_string.as_str()),
        ];

        if let Some(page_token) = page_token {
            query_params.push(("pageToken", page_token));
        }

        let page: LiveChatMessageListResponse = self
            .request(
                token,
                Method::GET,
                "liveChat/messages",
                &query_params,
                None::<&()>,
            )
            .await?;

        tracing::trace!(
            returned_items = page.items.len(),
            next_page_token = ?page.next_page_token,
            polling_interval_millis = ?page.polling_interval_millis,
            "fetched live chat messages"
        );

        Ok(page)
    }
}
