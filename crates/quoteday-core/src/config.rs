//! Sync configuration
//!
//! Defaults match the public demo endpoint; every field can be overridden
//! through the builder methods or `QUOTEDAY_*` environment variables.

use std::time::Duration;

use crate::error::{Error, Result};
use crate::util::normalize_text_option;

/// Public demo endpoint used when nothing else is configured
pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/posts";
/// Periodic sync cadence
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(30);
/// Remote records kept per fetch
pub const DEFAULT_FETCH_LIMIT: usize = 5;
/// Category given to records fetched from the remote source
pub const DEFAULT_REMOTE_CATEGORY: &str = "Imported";
/// HTTP request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub const ENV_ENDPOINT: &str = "QUOTEDAY_ENDPOINT";
pub const ENV_SYNC_INTERVAL_SECS: &str = "QUOTEDAY_SYNC_INTERVAL_SECS";
pub const ENV_FETCH_LIMIT: &str = "QUOTEDAY_FETCH_LIMIT";

/// Configuration for remote sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Remote collection endpoint (`http://` or `https://`, no trailing slash)
    pub endpoint: String,
    /// Automatic sync interval; `None` means manual sync only
    pub sync_interval: Option<Duration>,
    /// Maximum records kept from one fetch; `None` keeps everything
    pub fetch_limit: Option<usize>,
    /// Category assigned to fetched records
    pub remote_category: String,
    /// Transport timeout for fetch and push
    pub request_timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            sync_interval: Some(DEFAULT_SYNC_INTERVAL),
            fetch_limit: Some(DEFAULT_FETCH_LIMIT),
            remote_category: DEFAULT_REMOTE_CATEGORY.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl SyncConfig {
    /// Create a configuration for `endpoint` with default settings
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Ok(Self {
            endpoint: normalize_endpoint(endpoint.into())?,
            ..Self::default()
        })
    }

    /// Set the automatic sync interval
    #[must_use]
    pub const fn with_sync_interval(mut self, interval: Duration) -> Self {
        self.sync_interval = Some(interval);
        self
    }

    /// Disable automatic sync (manual sync only)
    #[must_use]
    pub const fn without_auto_sync(mut self) -> Self {
        self.sync_interval = None;
        self
    }

    #[must_use]
    pub const fn with_fetch_limit(mut self, limit: Option<usize>) -> Self {
        self.fetch_limit = limit;
        self
    }

    #[must_use]
    pub fn with_remote_category(mut self, category: impl Into<String>) -> Self {
        self.remote_category = category.into();
        self
    }

    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Apply `QUOTEDAY_*` overrides read through `lookup`
    ///
    /// `QUOTEDAY_SYNC_INTERVAL_SECS=0` disables automatic sync and
    /// `QUOTEDAY_FETCH_LIMIT=0` removes the fetch cap.
    pub fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(endpoint) = normalize_text_option(lookup(ENV_ENDPOINT)) {
            self.endpoint = normalize_endpoint(endpoint)?;
        }
        if let Some(raw) = normalize_text_option(lookup(ENV_SYNC_INTERVAL_SECS)) {
            let seconds = parse_number(ENV_SYNC_INTERVAL_SECS, &raw)?;
            self.sync_interval = (seconds > 0).then(|| Duration::from_secs(seconds));
        }
        if let Some(raw) = normalize_text_option(lookup(ENV_FETCH_LIMIT)) {
            let limit = parse_number(ENV_FETCH_LIMIT, &raw)?;
            self.fetch_limit = usize::try_from(limit).ok().filter(|limit| *limit > 0);
        }
        Ok(self)
    }
}

/// Trim an endpoint and require an `http://` or `https://` scheme
pub fn normalize_endpoint(raw: String) -> Result<String> {
    let endpoint = normalize_text_option(Some(raw))
        .ok_or_else(|| Error::InvalidInput("endpoint must not be empty".to_string()))?;
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        Ok(endpoint.trim_end_matches('/').to_string())
    } else {
        Err(Error::InvalidInput(
            "endpoint must include http:// or https://".to_string(),
        ))
    }
}

fn parse_number(name: &str, raw: &str) -> Result<u64> {
    raw.parse()
        .map_err(|_| Error::InvalidInput(format!("{name} must be a non-negative integer, got '{raw}'")))
}
