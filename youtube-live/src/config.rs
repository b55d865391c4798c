//! Configuration for the API transport and the chat poller.

use crate::error::{Error, Result};
use std::time::Duration;

/// Root of the YouTube Data API v3.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Environment variable overriding [`ClientConfig::base_url`].
pub const BASE_URL_ENV: &str = "YOUTUBE_API_BASE_URL";

/// Environment variable overriding [`ClientConfig::request_timeout`], in whole seconds.
pub const TIMEOUT_ENV: &str = "YOUTUBE_API_TIMEOUT_SECS";

/// Settings for [`crate::YouTubeClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL that endpoint paths such as `liveBroadcasts` are appended to.
    pub base_url: String,
    /// Upper bound on a single request, including reading the body.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Builds a config from the defaults, overridden by [`BASE_URL_ENV`] and [`TIMEOUT_ENV`].
    ///
    /// Fails with [`Error::Config`] if [`TIMEOUT_ENV`] is set but is not a whole number.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(base_url) = lookup(BASE_URL_ENV) {
            config = config.with_base_url(base_url);
        }
        if let Some(secs) = lookup(TIMEOUT_ENV) {
            let secs: u64 = secs.trim().parse().map_err(|source| Error::Config {
                var: TIMEOUT_ENV,
                value: secs.clone(),
                source,
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// Replaces the base URL, dropping any trailing slash.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

/// Settings for the live chat poll loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPollerConfig {
    /// `maxResults` sent with every page request.
    pub page_size: u32,
    /// Sleep between polls when the server does not send `pollingIntervalMillis`.
    pub default_polling_interval: Duration,
}

impl Default for ChatPollerConfig {
    fn default() -> Self {
        Self {
            page_size: 200,
            default_polling_interval: Duration::from_millis(5000),
        }
    }
}
