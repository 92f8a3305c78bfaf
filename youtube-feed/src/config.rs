//! Client configuration.
//!
//! The API key is injected into [`crate::youtube_api::YouTubeClient`] once, at construction
//! time, instead of being looked up from the process environment on every call. The key is
//! still allowed to be missing: that only becomes an error when a request is actually made.

use eyre::Context;
use std::fmt;
use std::time::Duration;

/// Base URL of the YouTube Data API v3.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Bound on a single API round-trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// How long a cached page is served before it is fetched again.
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(300);

const API_KEY_VARS: [&str; 2] = ["YOUTUBE_API_KEY", "REACT_APP_YOUTUBE_API_KEY"];

/// A YouTube Data API key.
///
/// The secret is never included in `Debug` output so that it cannot end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Credential sent as the `key` query parameter. `None` means "not configured".
    pub api_key: Option<ApiKey>,
    /// Endpoint root; `/search` and `/videos` are appended to it.
    pub base_url: String,
    /// Per-request timeout. Exceeding it yields an upstream timeout error.
    pub timeout: Duration,
    /// Age after which a cached page is considered stale.
    pub stale_after: Duration,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            stale_after: DEFAULT_STALE_AFTER,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// Recognized variables:
    ///
    /// * `YOUTUBE_API_KEY` (or the legacy `REACT_APP_YOUTUBE_API_KEY`)
    /// * `YOUTUBE_API_BASE_URL`
    /// * `YOUTUBE_API_TIMEOUT_SECS`
    /// * `YOUTUBE_FEED_STALE_SECS`
    ///
    /// A missing key is not an error here; numeric variables that fail to parse are.
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let mut config = Self::default();

        config.api_key = API_KEY_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .map(|v| v.trim().to_string())
            .find(|v| !v.is_empty())
            .map(ApiKey);

        if let Some(base_url) = lookup("YOUTUBE_API_BASE_URL") {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = lookup("YOUTUBE_API_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("parse YOUTUBE_API_TIMEOUT_SECS={secs:?}"))?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = lookup("YOUTUBE_FEED_STALE_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("parse YOUTUBE_FEED_STALE_SECS={secs:?}"))?;
            config.stale_after = Duration::from_secs(secs);
        }

        tracing::debug!(
            has_api_key = config.api_key.is_some(),
            base_url = %config.base_url,
            timeout = ?config.timeout,
            "loaded configuration"
        );

        Ok(config)
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(ApiKey::new(key));
        self
    }

    pub fn without_api_key(mut self) -> Self {
        self.api_key = None;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_stale_after(mut self, stale_after: Duration) -> Self {
        self.stale_after = stale_after;
        self
    }
}
