//! Error types shared across fetching, extraction, persistence and dedupe.
//!
//! Network failures never end a run: they surface as [`FetchError`] from the
//! fetcher and as [`ExtractError`] from an adapter, and the pipeline skips the
//! affected link or page. Only [`PersistError`] (and [`DedupeError`] when the
//! deduplicator is invoked) reach the operator as run-ending conditions.

use thiserror::Error;

/// Failure of a single HTTP GET.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("unexpected HTTP status {0}")]
    HttpStatus(u16),
    /// The response arrived but its body could not be decoded to text.
    #[error("unreadable response body: {0}")]
    Body(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = e.status() {
            FetchError::HttpStatus(status.as_u16())
        } else if e.is_decode() || e.is_body() {
            FetchError::Body(e.to_string())
        } else {
            FetchError::Connection(e.to_string())
        }
    }
}

/// Whole-call failure of [`SourceAdapter::extract`](crate::scrapers::SourceAdapter::extract).
///
/// Missing fields are not errors; they come back as `None` inside
/// [`ArticleExtract`](crate::models::ArticleExtract).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("timed out fetching {url}")]
    Timeout { url: String },
    #[error("failed to fetch {url}: {reason}")]
    FetchFailed { url: String, reason: String },
    #[error("failed to parse {url}: {reason}")]
    ParseFailed { url: String, reason: String },
}

impl ExtractError {
    pub fn from_fetch(url: &str, e: FetchError) -> Self {
        let url = url.to_string();
        match e {
            FetchError::Timeout => ExtractError::Timeout { url },
            FetchError::Body(reason) => ExtractError::ParseFailed { url, reason },
            other => ExtractError::FetchFailed {
                url,
                reason: other.to_string(),
            },
        }
    }
}

/// Invalid site configuration, detected at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown source '{0}' (use --list-sources)")]
    UnknownSource(String),
    #[error("source '{source_key}': invalid selector '{selector}': {reason}")]
    Selector {
        source_key: String,
        selector: String,
        reason: String,
    },
    #[error("source '{source_key}': URL template '{template}' lacks {placeholder}")]
    Template {
        source_key: String,
        template: String,
        placeholder: &'static str,
    },
    #[error("source '{source_key}': invalid base URL: {reason}")]
    BaseUrl { source_key: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
    #[error("failed to read sources file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed sources file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// The output file could not be durably replaced.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize {path}: {source}")]
    Serialize {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    /// The blocking write task ended without reporting a result.
    #[error("write task for {path} did not finish: {reason}")]
    Task { path: String, reason: String },
}

#[derive(Debug, Error)]
pub enum DedupeError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not valid JSON: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    /// Top-level value is not an array; nothing was written.
    #[error("unexpected data format in {path}: top-level value is not an array")]
    Format { path: String },
    #[error(transparent)]
    Persist(#[from] PersistError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_maps_to_extract_timeout() {
        let e = ExtractError::from_fetch("https://a.example/1", FetchError::Timeout);
        assert_eq!(
            e,
            ExtractError::Timeout {
                url: "https://a.example/1".to_string()
            }
        );
    }

    #[test]
    fn test_status_and_connection_map_to_fetch_failed() {
        let e = ExtractError::from_fetch("u", FetchError::HttpStatus(404));
        assert!(matches!(e, ExtractError::FetchFailed { ref reason, .. } if reason.contains("404")));

        let e = ExtractError::from_fetch("u", FetchError::Connection("refused".into()));
        assert!(matches!(e, ExtractError::FetchFailed { .. }));
    }

    #[test]
    fn test_body_maps_to_parse_failed() {
        let e = ExtractError::from_fetch("u", FetchError::Body("bad charset".into()));
        assert!(matches!(e, ExtractError::ParseFailed { .. }));
    }
}
