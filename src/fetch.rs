//! Page fetching over HTTP.
//!
//! The pipeline only needs one capability from the network: GET a URL and
//! hand back the decoded page text, or say why it could not. [`PageFetcher`]
//! captures that so adapters can be exercised against canned pages in tests,
//! while [`HttpFetcher`] is the `reqwest`-backed implementation used at runtime.
//!
//! There is no retry or backoff here: a failed fetch is abandoned and the
//! caller decides whether that skips a link or ends a discovery loop.

use crate::error::{ConfigError, FetchError};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Browser-like identity sent when a source does not configure its own.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0 Safari/537.36";

/// Per-request timeout used when a source does not configure its own.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Trait for fetching a single page.
pub trait PageFetcher {
    /// GET `url` and return the page body as text.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// `reqwest` client carrying one source's identity header and timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Build a fetcher with a fixed user agent and per-request timeout.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self { client, timeout })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let res = async {
            let response = self.client.get(url).send().await?.error_for_status()?;
            Ok::<_, reqwest::Error>(response.text().await?)
        }
        .await
        .map_err(FetchError::from);
        let dt = t0.elapsed();

        match &res {
            Ok(body) => debug!(
                bytes = body.len(),
                elapsed_ms = dt.as_millis() as u64,
                "Fetched page"
            ),
            Err(FetchError::Timeout) => warn!(
                timeout_secs = self.timeout.as_secs(),
                "Timed out fetching page"
            ),
            Err(e) => warn!(error = %e, elapsed_ms = dt.as_millis() as u64, "Page fetch failed"),
        }
        res
    }
}
