//! Data models for discovered links and harvested article records.
//!
//! This module defines the core data structures used throughout the pipeline:
//! - [`Criterion`]: Why a unit of work runs (one query, or one calendar day)
//! - [`LinkRecord`]: A candidate article URL produced by discovery
//! - [`ArticleExtract`]: Fields pulled from one article page
//! - [`ArticleRecord`]: The normalized record written to the output file
//! - [`ScratchLinks`] / [`ScratchArticles`]: Transient per-unit snapshots
//!
//! Optional record fields are omitted from the JSON output rather than
//! written as `null`, matching the files existing consumers already read.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Day rendering used in records and logs (`DD-MM-YYYY`).
pub const DISPLAY_DATE_FORMAT: &str = "%d-%m-%Y";

/// Render a day the way records carry it.
pub fn display_date(day: NaiveDate) -> String {
    day.format(DISPLAY_DATE_FORMAT).to_string()
}

/// How a source enumerates candidate articles. Fixed per source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryMode {
    /// Paginated search results for a keyword.
    ByQuery,
    /// Paginated archive listing for a calendar day.
    ByDate,
}

impl fmt::Display for DiscoveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryMode::ByQuery => write!(f, "by_query"),
            DiscoveryMode::ByDate => write!(f, "by_date"),
        }
    }
}

/// The input of one unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    Query(String),
    Day(NaiveDate),
}

impl Criterion {
    /// Filesystem-friendly name used for scratch files.
    ///
    /// Anything other than letters, digits, `-` and `_` becomes `_`, so a
    /// query never names a path outside the scratch directory.
    pub fn slug(&self) -> String {
        match self {
            Criterion::Query(q) => q
                .chars()
                .map(|c| {
                    if c.is_alphanumeric() || c == '-' || c == '_' {
                        c
                    } else {
                        '_'
                    }
                })
                .collect(),
            Criterion::Day(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::Query(q) => write!(f, "query '{q}'"),
            Criterion::Day(d) => write!(f, "day {}", display_date(*d)),
        }
    }
}

/// Which JSON key carries an article's headline for a source.
///
/// Two sources historically write `header`, the rest `title`; consumers of
/// existing output files depend on that, so it is configured per source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleKey {
    #[default]
    Title,
    Header,
}

/// Fixed provenance stamped on every record of a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceProfile {
    pub country: String,
    pub language: String,
    /// Value written to each record's `source` field.
    pub source: String,
    #[serde(default)]
    pub title_key: TitleKey,
}

/// A candidate article URL. Consumed exactly once by the fetch stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    pub url: String,
    /// Archive day the link was listed under.
    pub associated_date: Option<NaiveDate>,
    /// Date printed next to the link in a search listing, in the page's own digits.
    pub listing_date: Option<String>,
}

impl LinkRecord {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            associated_date: None,
            listing_date: None,
        }
    }

    pub fn dated(url: impl Into<String>, day: NaiveDate) -> Self {
        Self {
            associated_date: Some(day),
            ..Self::new(url)
        }
    }

    pub fn with_listing_date(mut self, label: Option<String>) -> Self {
        self.listing_date = label;
        self
    }

    /// Date to fall back on when the article page has none.
    pub fn date_label(&self) -> Option<String> {
        self.listing_date
            .clone()
            .or_else(|| self.associated_date.map(display_date))
    }
}

/// Fields extracted from one article page; each may independently be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleExtract {
    pub title: Option<String>,
    pub date: Option<String>,
    pub body: Option<String>,
}

impl ArticleExtract {
    /// `true` when nothing usable came back.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.date.is_none() && self.body.is_none()
    }
}

/// A normalized article as written to the output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub country: String,
    pub language: String,
    pub source: String,
    pub url: String,
    /// Search query that led to this article (query mode only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_body: Option<String>,
}

impl ArticleRecord {
    /// Merge source provenance, the link and its extracted fields.
    ///
    /// Returns `None` when the extract carries no usable content, or when
    /// the link has no URL. The record date prefers the extracted date, then
    /// the link's own date, then the day being harvested.
    pub fn assemble(
        profile: &SourceProfile,
        criterion: &Criterion,
        link: &LinkRecord,
        extract: ArticleExtract,
    ) -> Option<Self> {
        if link.url.is_empty() || extract.is_empty() {
            return None;
        }

        let (title, header) = match profile.title_key {
            TitleKey::Title => (extract.title, None),
            TitleKey::Header => (None, extract.title),
        };
        let query = match criterion {
            Criterion::Query(q) => Some(q.clone()),
            Criterion::Day(_) => None,
        };
        let provenance_day = match criterion {
            Criterion::Day(d) => Some(*d),
            Criterion::Query(_) => None,
        };
        let date = extract
            .date
            .or_else(|| link.date_label())
            .or_else(|| provenance_day.map(display_date));

        Some(Self {
            country: profile.country.clone(),
            language: profile.language.clone(),
            source: profile.source.clone(),
            url: link.url.clone(),
            query,
            title,
            header,
            date,
            article_body: extract.body,
        })
    }
}

/// Scratch snapshot of one unit's discovered links.
#[derive(Debug, Serialize)]
pub struct ScratchLinks<'a> {
    pub query_or_date: String,
    pub links: Vec<ScratchLink<'a>>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ScratchLink<'a> {
    pub url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl<'a> ScratchLinks<'a> {
    pub fn new(criterion: &Criterion, links: &'a [LinkRecord]) -> Self {
        Self {
            query_or_date: criterion_label(criterion),
            links: links
                .iter()
                .map(|l| ScratchLink {
                    url: &l.url,
                    date: l.date_label(),
                })
                .collect(),
            count: links.len(),
        }
    }
}

/// Scratch snapshot of one unit's harvested records.
#[derive(Debug, Serialize)]
pub struct ScratchArticles<'a> {
    pub query_or_date: String,
    pub articles: &'a [ArticleRecord],
    pub count: usize,
}

impl<'a> ScratchArticles<'a> {
    pub fn new(criterion: &Criterion, articles: &'a [ArticleRecord]) -> Self {
        Self {
            query_or_date: criterion_label(criterion),
            articles,
            count: articles.len(),
        }
    }
}

fn criterion_label(criterion: &Criterion) -> String {
    match criterion {
        Criterion::Query(q) => q.clone(),
        Criterion::Day(d) => display_date(*d),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(title_key: TitleKey) -> SourceProfile {
        SourceProfile {
            country: "Slovakia".to_string(),
            language: "sk".to_string(),
            source: "aktuality.sk".to_string(),
            title_key,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_assemble_query_record_with_header_key() {
        let extract = ArticleExtract {
            title: Some("T1".to_string()),
            date: None,
            body: Some("B1".to_string()),
        };
        let record = ArticleRecord::assemble(
            &profile(TitleKey::Header),
            &Criterion::Query("alpha".to_string()),
            &LinkRecord::new("https://example.com/a"),
            extract,
        )
        .unwrap();

        assert_eq!(record.query.as_deref(), Some("alpha"));
        assert_eq!(record.header.as_deref(), Some("T1"));
        assert_eq!(record.title, None);
        assert_eq!(record.article_body.as_deref(), Some("B1"));
        assert_eq!(record.date, None);
    }

    #[test]
    fn test_assemble_rejects_empty_extract() {
        let record = ArticleRecord::assemble(
            &profile(TitleKey::Title),
            &Criterion::Query("beta".to_string()),
            &LinkRecord::new("https://example.com/b"),
            ArticleExtract::default(),
        );
        assert!(record.is_none());
    }

    #[test]
    fn test_assemble_rejects_missing_url() {
        let extract = ArticleExtract {
            title: Some("T".to_string()),
            ..Default::default()
        };
        let record = ArticleRecord::assemble(
            &profile(TitleKey::Title),
            &Criterion::Query("q".to_string()),
            &LinkRecord::new(""),
            extract,
        );
        assert!(record.is_none());
    }

    #[test]
    fn test_extracted_date_wins_over_link_date() {
        let extract = ArticleExtract {
            title: Some("T".to_string()),
            date: Some("02-05-2025".to_string()),
            body: None,
        };
        let record = ArticleRecord::assemble(
            &profile(TitleKey::Title),
            &Criterion::Day(day(2025, 5, 1)),
            &LinkRecord::dated("https://example.com/c", day(2025, 5, 1)),
            extract,
        )
        .unwrap();
        assert_eq!(record.date.as_deref(), Some("02-05-2025"));
        assert_eq!(record.query, None);
    }

    #[test]
    fn test_day_provenance_fills_date() {
        let extract = ArticleExtract {
            body: Some("text".to_string()),
            ..Default::default()
        };
        let record = ArticleRecord::assemble(
            &profile(TitleKey::Title),
            &Criterion::Day(day(2024, 3, 9)),
            &LinkRecord::new("https://example.com/d"),
            extract,
        )
        .unwrap();
        assert_eq!(record.date.as_deref(), Some("09-03-2024"));
    }

    #[test]
    fn test_absent_fields_are_omitted_from_json() {
        let record = ArticleRecord {
            country: "Poland".to_string(),
            language: "pl".to_string(),
            source: "onet_pl".to_string(),
            url: "https://example.com/e".to_string(),
            query: None,
            title: Some("Tytuł".to_string()),
            header: None,
            date: None,
            article_body: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("title"));
        assert!(!obj.contains_key("header"));
        assert!(!obj.contains_key("date"));
        assert!(!obj.contains_key("article_body"));
        assert!(!obj.contains_key("query"));
    }

    #[test]
    fn test_criterion_slug() {
        assert_eq!(
            Criterion::Query("nuclear energy".to_string()).slug(),
            "nuclear_energy"
        );
        assert_eq!(Criterion::Day(day(2024, 1, 31)).slug(), "2024-01-31");
    }

    #[test]
    fn test_criterion_slug_stays_inside_directory() {
        assert_eq!(Criterion::Query("covid/19".to_string()).slug(), "covid_19");
        assert_eq!(
            Criterion::Query("../a:b\\c".to_string()).slug(),
            "___a_b_c"
        );
        assert_eq!(Criterion::Query("атом-2".to_string()).slug(), "атом-2");
    }

    #[test]
    fn test_listing_date_kept_verbatim_in_record() {
        let extract = ArticleExtract {
            title: Some("T".to_string()),
            ..Default::default()
        };
        let link = LinkRecord::new("https://example.com/f")
            .with_listing_date(Some("9-4-2024".to_string()));
        let record = ArticleRecord::assemble(
            &profile(TitleKey::Header),
            &Criterion::Query("atom".to_string()),
            &link,
            extract,
        )
        .unwrap();
        assert_eq!(record.date.as_deref(), Some("9-4-2024"));
    }

    #[test]
    fn test_scratch_links_snapshot() {
        let links = vec![
            LinkRecord::dated("https://example.com/1", day(2024, 2, 1)),
            LinkRecord::new("https://example.com/2"),
        ];
        let snapshot = ScratchLinks::new(&Criterion::Day(day(2024, 2, 1)), &links);
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["query_or_date"], "01-02-2024");
        assert_eq!(json["count"], 2);
        assert_eq!(json["links"][0]["date"], "01-02-2024");
        assert!(json["links"][1].get("date").is_none());
    }
}
