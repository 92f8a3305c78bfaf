//! Error taxonomy for YouTube API calls.

use http::StatusCode;
use std::sync::Arc;
use std::time::Duration;

/// Errors surfaced by [`super::YouTubeClient`] and the transformer.
///
/// None of these are retried internally. [`ApiError::is_retryable`] tells the caller
/// whether offering a retry (e.g. pull-to-refresh) makes sense. Errors are cheap to clone
/// so that a feed can keep the last one while also handing it to the caller.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// No API key was configured. The user must fix their configuration.
    #[error("YouTube API key is not configured")]
    Configuration,

    /// The API answered, but not successfully, or did not answer in time.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// The response body does not match the expected envelope.
    #[error("malformed YouTube API response: {0}")]
    MalformedResponse(String),

    /// The request never produced a response (DNS, connection refused, offline, ...).
    #[error("network error talking to YouTube API")]
    Network(#[source] Arc<reqwest::Error>),
}

/// A failed upstream round-trip.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UpstreamError {
    #[error("YouTube API error: {} {status_text}", status.as_u16())]
    Status {
        status: StatusCode,
        status_text: String,
        /// Response body, kept for diagnostics.
        body: String,
    },

    #[error("YouTube API request timed out after {after:?}")]
    Timeout { after: Duration },
}

impl ApiError {
    pub(crate) fn network(e: reqwest::Error) -> Self {
        ApiError::Network(Arc::new(e.without_url()))
    }

    pub(crate) fn status(status: StatusCode, body: String) -> Self {
        ApiError::Upstream(UpstreamError::Status {
            status,
            status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            body,
        })
    }

    /// Whether the same request may succeed if issued again later.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Configuration | ApiError::MalformedResponse(_) => false,
            ApiError::Upstream(_) | ApiError::Network(_) => true,
        }
    }

    /// The HTTP status of an upstream failure, if there was one.
    pub fn http_status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Upstream(UpstreamError::Status { status, .. }) => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Upstream(UpstreamError::Timeout { .. }))
    }
}
