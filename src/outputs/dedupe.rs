//! Post-run deduplication of an output file by `url`.
//!
//! The first entry seen for a URL is kept and later ones are dropped, with
//! order otherwise preserved. Entries without a `url` always pass through.
//! The file is only rewritten when something was actually removed, so a
//! second run over a clean file leaves it byte-for-byte untouched.

use crate::error::DedupeError;
use crate::outputs::json::persist_json;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, instrument};

/// Outcome of one deduplication pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupeReport {
    pub kept: usize,
    /// Dropped URLs, in the order their duplicates appeared.
    pub removed: Vec<String>,
}

impl DedupeReport {
    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }
}

/// Split entries into first-seen (kept) and the URLs of later repeats.
pub fn partition_by_url(entries: Vec<Value>) -> (Vec<Value>, Vec<String>) {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(entries.len());
    let mut removed = Vec::new();

    for entry in entries {
        let url = entry
            .get("url")
            .and_then(Value::as_str)
            .filter(|u| !u.is_empty())
            .map(str::to_owned);
        match url {
            Some(url) if !seen.insert(url.clone()) => removed.push(url),
            _ => kept.push(entry),
        }
    }
    (kept, removed)
}

/// Remove duplicate-URL entries from the JSON array at `path`.
///
/// # Errors
///
/// [`DedupeError::Format`] when the top-level value is not an array (the
/// file is left alone), or an I/O, parse or persistence error.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn dedupe_file(path: &Path) -> Result<DedupeReport, DedupeError> {
    let display = path.display().to_string();
    let text = std::fs::read_to_string(path).map_err(|source| DedupeError::Io {
        path: display.clone(),
        source,
    })?;
    let root: Value = serde_json::from_str(&text).map_err(|source| DedupeError::Json {
        path: display.clone(),
        source,
    })?;
    let Value::Array(entries) = root else {
        return Err(DedupeError::Format { path: display });
    };

    let (kept, removed) = partition_by_url(entries);
    let report = DedupeReport {
        kept: kept.len(),
        removed,
    };

    if report.removed.is_empty() {
        info!(kept = report.kept, "No duplicates found");
        return Ok(report);
    }

    persist_json(path, &kept)?;
    info!(
        removed = report.removed_count(),
        kept = report.kept,
        urls = ?report.removed,
        "Removed duplicates"
    );
    Ok(report)
}
