//! JSON persistence for the run output and per-unit scratch files.
//!
//! Every write goes to a temporary file beside the target and is then renamed
//! over it, so readers (and a crashed run) only ever see either the previous
//! complete document or the new one, never a truncated array.
//!
//! The replacement keeps the permissions of the file it replaces, and a new
//! file is created world-readable, since the output is consumed by other
//! tools. Documents are UTF-8 without ASCII escaping, indented with four spaces.

use crate::error::PersistError;
use crate::models::{ArticleRecord, Criterion, LinkRecord, ScratchArticles, ScratchLinks};
use crate::utils::parent_dir;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs::Permissions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument, warn};

/// Atomically replace `path` with the pretty-printed JSON of `value`.
pub fn persist_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), PersistError> {
    let io_err = |source: std::io::Error| PersistError::Io {
        path: path.display().to_string(),
        source,
    };
    let tmp = NamedTempFile::new_in(parent_dir(path)).map_err(io_err)?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        let mut ser = Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
        value
            .serialize(&mut ser)
            .map_err(|source| PersistError::Serialize {
                path: path.display().to_string(),
                source,
            })?;
        writer.write_all(b"\n").map_err(io_err)?;
        writer.flush().map_err(io_err)?;
    }
    if let Some(permissions) = target_permissions(path) {
        tmp.as_file().set_permissions(permissions).map_err(io_err)?;
    }
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

/// Mode the replaced file should end up with. Temp files start owner-only.
fn target_permissions(path: &Path) -> Option<Permissions> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => Some(meta.permissions()),
        _ => new_file_permissions(),
    }
}

#[cfg(unix)]
fn new_file_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<Permissions> {
    None
}

/// Overwrite the output file with the full accumulator.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = articles.len()))]
pub fn write_articles(path: &Path, articles: &[ArticleRecord]) -> Result<(), PersistError> {
    persist_json(path, articles)?;
    info!("Saved articles");
    Ok(())
}

/// Transient per-unit files, removed once the unit completes.
#[derive(Debug)]
pub struct ScratchFiles {
    links: PathBuf,
    articles: PathBuf,
}

impl ScratchFiles {
    pub fn new(dir: &Path, criterion: &Criterion) -> Self {
        let slug = criterion.slug();
        Self {
            links: dir.join(format!("links_{slug}.json")),
            articles: dir.join(format!("articles_{slug}.json")),
        }
    }

    pub fn links_path(&self) -> &Path {
        &self.links
    }

    pub fn articles_path(&self) -> &Path {
        &self.articles
    }

    /// Best effort: a failed scratch write is logged and the unit carries on.
    pub fn save_links(&self, criterion: &Criterion, links: &[LinkRecord]) {
        match persist_json(&self.links, &ScratchLinks::new(criterion, links)) {
            Ok(()) => debug!(path = %self.links.display(), count = links.len(), "Saved links"),
            Err(e) => warn!(error = %e, "Could not write scratch links file"),
        }
    }

    pub fn save_articles(&self, criterion: &Criterion, articles: &[ArticleRecord]) {
        match persist_json(&self.articles, &ScratchArticles::new(criterion, articles)) {
            Ok(()) => {
                debug!(path = %self.articles.display(), count = articles.len(), "Saved articles")
            }
            Err(e) => warn!(error = %e, "Could not write scratch articles file"),
        }
    }

    /// Delete both files; failures are logged, never propagated.
    pub fn cleanup(&self) {
        for path in [&self.links, &self.articles] {
            if let Err(e) = std::fs::remove_file(path) {
                warn!(path = %path.display(), error = %e, "Could not delete temporary file");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::{Error as _, SerializeSeq};

    fn record(url: &str) -> ArticleRecord {
        ArticleRecord {
            country: "Czech Republic".to_string(),
            language: "cs".to_string(),
            source: "Aktualne.cz".to_string(),
            url: url.to_string(),
            query: Some("atom".to_string()),
            title: Some("Jaderná energie".to_string()),
            header: None,
            date: None,
            article_body: Some("Text.\n".to_string()),
        }
    }

    /// Serializes some records, then fails as a full disk would.
    struct FailsMidway(Vec<ArticleRecord>);

    impl Serialize for FailsMidway {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut seq = serializer.serialize_seq(None)?;
            for r in &self.0 {
                seq.serialize_element(r)?;
            }
            Err(S::Error::custom("simulated write failure"))
        }
    }

    #[test]
    fn test_write_is_pretty_and_unescaped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        write_articles(&path, &[record("https://a.example/1")]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n    {\n        \"country\""));
        assert!(text.contains("Jaderná energie"));
        let parsed: Vec<ArticleRecord> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, vec![record("https://a.example/1")]);
    }

    #[test]
    fn test_write_replaces_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        write_articles(&path, &[record("1"), record("2")]).unwrap();
        write_articles(&path, &[record("3")]).unwrap();

        let parsed: Vec<ArticleRecord> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, vec![record("3")]);
    }

    #[test]
    fn test_interrupted_write_keeps_previous_complete_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let first_unit = vec![record("https://a.example/1")];
        write_articles(&path, &first_unit).unwrap();

        let mut second = first_unit.clone();
        second.push(record("https://a.example/2"));
        let err = persist_json(&path, &FailsMidway(second)).unwrap_err();
        assert!(matches!(err, PersistError::Serialize { .. }));

        let parsed: Vec<ArticleRecord> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, first_unit);
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1, "temporary file should be cleaned up");
    }

    #[cfg(unix)]
    fn mode(path: &Path) -> u32 {
        use std::os::unix::fs::PermissionsExt;
        std::fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[cfg(unix)]
    #[test]
    fn test_rewrite_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        std::fs::write(&path, "[]").unwrap();

        std::fs::set_permissions(&path, Permissions::from_mode(0o644)).unwrap();
        write_articles(&path, &[]).unwrap();
        assert_eq!(mode(&path), 0o644);

        std::fs::set_permissions(&path, Permissions::from_mode(0o640)).unwrap();
        write_articles(&path, &[record("https://a.example/1")]).unwrap();
        assert_eq!(mode(&path), 0o640);
    }

    #[cfg(unix)]
    #[test]
    fn test_new_output_is_world_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        write_articles(&path, &[]).unwrap();

        assert_eq!(mode(&path), 0o644);
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");
        assert!(matches!(
            write_articles(&path, &[]),
            Err(PersistError::Io { .. })
        ));
    }

    #[test]
    fn test_scratch_files_roundtrip_and_cleanup() {
        let dir = tempfile::tempdir().unwrap();
        let criterion = Criterion::Query("nuclear energy".to_string());
        let scratch = ScratchFiles::new(dir.path(), &criterion);
        assert!(scratch.links_path().ends_with("links_nuclear_energy.json"));

        scratch.save_links(&criterion, &[LinkRecord::new("https://a.example/1")]);
        scratch.save_articles(&criterion, &[record("https://a.example/1")]);

        let links: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(scratch.links_path()).unwrap()).unwrap();
        assert_eq!(links["query_or_date"], "nuclear energy");
        assert_eq!(links["count"], 1);
        let articles: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(scratch.articles_path()).unwrap())
                .unwrap();
        assert_eq!(articles["articles"][0]["url"], "https://a.example/1");

        scratch.cleanup();
        assert!(!scratch.links_path().exists());
        assert!(!scratch.articles_path().exists());

        // Second cleanup only logs.
        scratch.cleanup();
    }

    #[test]
    fn test_scratch_files_for_query_with_slash() {
        let dir = tempfile::tempdir().unwrap();
        let criterion = Criterion::Query("covid/19".to_string());
        let scratch = ScratchFiles::new(dir.path(), &criterion);

        scratch.save_links(&criterion, &[LinkRecord::new("https://a.example/1")]);

        assert_eq!(scratch.links_path(), dir.path().join("links_covid_19.json"));
        assert!(scratch.links_path().exists());
    }
}
