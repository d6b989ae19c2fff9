//! News source adapters.
//!
//! Every source follows the same two-phase contract ([`SourceAdapter`]):
//!
//! 1. **Discovery**: enumerate candidate article URLs for one query or one day
//! 2. **Extraction**: fetch one article page and pull headline, date and body
//!
//! The sites differ only in data (URL templates, pagination, selectors and
//! date rendering), so a single [`engine::SiteScraper`] drives all of them
//! from a [`config::SiteConfig`].
//!
//! # Supported Sources
//!
//! | Source | Module | Mode | Notes |
//! |--------|--------|------|-------|
//! | Aktuálně.cz | [`aktualne`] | by_query | First search page only |
//! | Izvestia | [`izru`] | by_query | Three offset pages; `header` key |
//! | Aktuality.sk | [`aktuality`] | by_query | Listing dates; `header` key |
//! | Ukrainska Pravda | [`pravda`] | by_date | Sister-site markup variants |
//! | Blikk | [`blikk`] | by_date | Pages until empty |
//! | Onet | [`onet`] | by_date | Single archive page |

pub mod aktualne;
pub mod aktuality;
pub mod blikk;
pub mod config;
pub mod dates;
pub mod engine;
pub mod izru;
pub mod onet;
pub mod pravda;

use crate::error::{ConfigError, ExtractError};
use crate::models::{ArticleExtract, Criterion, DiscoveryMode, LinkRecord, SourceProfile};
use config::SiteConfig;
use std::path::Path;
use tracing::{info, instrument};

/// Link discovery and article extraction for one news site.
pub trait SourceAdapter {
    /// Provenance stamped on every record from this source.
    fn profile(&self) -> &SourceProfile;

    /// Whether units of work are queries or days.
    fn mode(&self) -> DiscoveryMode;

    /// Enumerate candidate links for one unit of work.
    ///
    /// Never fails: a failed or empty listing page ends traversal and the
    /// links gathered so far are returned.
    async fn discover(&self, criterion: &Criterion) -> Vec<LinkRecord>;

    /// Fetch one article and extract its fields.
    ///
    /// Only network-level failures produce an error; fields that cannot be
    /// found come back as `None`.
    async fn extract(&self, url: &str) -> Result<ArticleExtract, ExtractError>;
}

/// The built-in site catalog, in selection-menu order.
pub fn builtin_sites() -> Vec<SiteConfig> {
    vec![
        aktualne::config(),
        izru::config(),
        pravda::config(),
        aktuality::config(),
        blikk::config(),
        onet::config(),
    ]
}

/// Built-in sites with entries from an optional YAML file merged over them by key.
#[instrument(level = "info", skip_all)]
pub fn load_catalog(sources_file: Option<&Path>) -> Result<Vec<SiteConfig>, ConfigError> {
    let mut catalog = builtin_sites();
    let Some(path) = sources_file else {
        return Ok(catalog);
    };

    let yaml = std::fs::read_to_string(path)?;
    let overrides: Vec<SiteConfig> = serde_yaml::from_str(&yaml)?;
    info!(path = %path.display(), count = overrides.len(), "Loaded site overrides");
    merge_sites(&mut catalog, overrides);
    Ok(catalog)
}

fn merge_sites(catalog: &mut Vec<SiteConfig>, overrides: Vec<SiteConfig>) {
    for site in overrides {
        match catalog
            .iter_mut()
            .find(|existing| existing.key.eq_ignore_ascii_case(&site.key))
        {
            Some(existing) => *existing = site,
            None => catalog.push(site),
        }
    }
}

/// Look up a site by key, ignoring ASCII case.
pub fn find_site(catalog: &[SiteConfig], key: &str) -> Result<SiteConfig, ConfigError> {
    catalog
        .iter()
        .find(|site| site.key.eq_ignore_ascii_case(key.trim()))
        .cloned()
        .ok_or_else(|| ConfigError::UnknownSource(key.to_string()))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::HttpFetcher;
    use crate::scrapers::engine::SiteScraper;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn test_builtin_catalog_modes() {
        let catalog = builtin_sites();
        let modes: Vec<(&str, DiscoveryMode)> = catalog
            .iter()
            .map(|s| (s.key.as_str(), s.mode()))
            .collect();
        assert_eq!(
            modes,
            vec![
                ("aktualne.cz", DiscoveryMode::ByQuery),
                ("iz.ru", DiscoveryMode::ByQuery),
                ("pravda.ua", DiscoveryMode::ByDate),
                ("aktuality.sk", DiscoveryMode::ByQuery),
                ("blikk.hu", DiscoveryMode::ByDate),
                ("onet.pl", DiscoveryMode::ByDate),
            ]
        );
    }

    #[test]
    fn test_every_builtin_site_compiles() {
        for site in builtin_sites() {
            let key = site.key.clone();
            let fetcher = HttpFetcher::new(&site.user_agent, Duration::from_secs(site.timeout_secs))
                .unwrap();
            assert!(
                SiteScraper::new(site, fetcher).is_ok(),
                "site {key} failed to compile"
            );
        }
    }

    #[test]
    fn test_find_site_is_case_insensitive() {
        let catalog = builtin_sites();
        assert_eq!(find_site(&catalog, "Onet.PL").unwrap().key, "onet.pl");
        assert!(matches!(
            find_site(&catalog, "cnn.com"),
            Err(ConfigError::UnknownSource(_))
        ));
    }

    #[test]
    fn test_sources_file_overrides_and_adds() {
        let yaml = r#"
- key: onet.pl
  country: Poland
  language: pl
  source: onet_pl
  base_url: https://wiadomosci.onet.pl/
  timeout_secs: 5
  discovery:
    strategy: archive
    url_template: "https://wiadomosci.onet.pl/archiwum/{date}"
    date_format: "%Y-%m-%d"
    pages: { max_pages: 1 }
    listing: { item: a.itemTitle }
  extract:
    title: h1
    body: { container: article }
- key: new.example
  country: Example
  language: en
  source: new_example
  base_url: https://new.example/
  discovery:
    strategy: search
    url_template: "https://new.example/s?q={query}&p={page}"
    pages: { start: 1, max_pages: 2 }
    listing: { item: li, link: a }
  extract:
    title: h1
    body: { container: main }
"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let catalog = load_catalog(Some(file.path())).unwrap();

        assert_eq!(catalog.len(), 7);
        let onet = find_site(&catalog, "onet.pl").unwrap();
        assert_eq!(onet.timeout_secs, 5);
        assert_eq!(onet.extract.title, "h1");
        let added = find_site(&catalog, "new.example").unwrap();
        assert_eq!(added.mode(), DiscoveryMode::ByQuery);
    }

    #[test]
    fn test_malformed_sources_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"- key: [unterminated").unwrap();
        assert!(matches!(
            load_catalog(Some(file.path())),
            Err(ConfigError::Yaml(_))
        ));
    }
}
