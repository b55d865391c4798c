//! Error types shared by every YouTube Live operation.
//!
//! Errors surface to the immediate caller unmodified. Nothing in this crate retries, and the
//! provisioning sequence does not roll back resources created before a failing step.

use http::{Method, StatusCode};

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request never produced a complete response (connect failure, timeout, broken body).
    #[error("send {method} request to YouTube API: {url}")]
    Transport {
        method: Method,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The YouTube API answered with a status outside of 2xx.
    #[error("YouTube API {method} request failed with status {status}: {body}")]
    Api {
        method: Method,
        status: StatusCode,
        /// The response body, verbatim.
        body: String,
    },

    /// A successful response lacked a field or resource we need.
    #[error("{what} not found in YouTube API response")]
    NotFound { what: String },

    /// A successful response did not have the shape we expected.
    #[error("parse YouTube API {endpoint} response")]
    MalformedResponse {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A configuration value from the environment could not be parsed.
    #[error("invalid {var} value {value:?}")]
    Config {
        var: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

impl Error {
    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// The HTTP status code of a rejected request, if this is an [`Error::Api`].
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The response body of a rejected request, if this is an [`Error::Api`].
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Api { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Extracts a field the caller cannot proceed without.
pub(crate) fn require<T>(value: Option<T>, what: &str) -> Result<T> {
    value.ok_or_else(|| Error::not_found(what))
}
