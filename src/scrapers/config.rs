//! Per-site configuration records.
//!
//! Every news site is described by one [`SiteConfig`]: where its search or
//! archive listings live, how they paginate, and which selectors pull the
//! headline, date and body out of an article page. The built-in catalog and
//! the optional YAML sources file share this shape.

use crate::fetch::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::models::{DiscoveryMode, SourceProfile};
use serde::{Deserialize, Serialize};

/// Complete description of one news site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Selection key used on the command line, e.g. `aktualne.cz`.
    pub key: String,
    #[serde(flatten)]
    pub profile: SourceProfile,
    /// Base used to resolve relative links.
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    pub discovery: DiscoveryConfig,
    pub extract: ExtractRules,
    /// Alternative rules for article URLs served by sister sites.
    #[serde(default)]
    pub variants: Vec<ExtractVariant>,
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl SiteConfig {
    pub fn mode(&self) -> DiscoveryMode {
        match self.discovery {
            DiscoveryConfig::Search(_) => DiscoveryMode::ByQuery,
            DiscoveryConfig::Archive(_) => DiscoveryMode::ByDate,
        }
    }

    /// Default output path, e.g. `data/raw/aktualne_cz_output.json`.
    pub fn default_output_path(&self) -> String {
        format!("data/raw/{}_output.json", self.key.replace('.', "_"))
    }
}

/// Link discovery strategy; the variant fixes the source's mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum DiscoveryConfig {
    /// Search results for a keyword. Template placeholders: `{query}`, `{page}`.
    Search(SearchConfig),
    /// Archive listing for a day. Template placeholders: `{date}`, optional `{page}`.
    Archive(ArchiveConfig),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub url_template: String,
    pub pages: Pagination,
    pub listing: ListingSelectors,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveConfig {
    pub url_template: String,
    /// `chrono` format for the `{date}` placeholder.
    pub date_format: String,
    pub pages: Pagination,
    pub listing: ListingSelectors,
}

/// Page numbering for a listing.
///
/// Page `i` (0-based) is requested as `start + i * step`. Traversal stops at
/// the first empty or failed page, or after `max_pages` pages when set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub start: u32,
    #[serde(default = "default_step")]
    pub step: u32,
    #[serde(default)]
    pub max_pages: Option<u32>,
}

fn default_step() -> u32 {
    1
}

impl Pagination {
    pub const fn single() -> Self {
        Self {
            start: 0,
            step: 1,
            max_pages: Some(1),
        }
    }

    pub fn page_number(&self, index: u32) -> u32 {
        self.start + index * self.step
    }

    pub fn allows(&self, index: u32) -> bool {
        self.max_pages.is_none_or(|max| index < max)
    }
}

/// Selectors applied to a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingSelectors {
    /// One match per result entry; zero matches means the listing is exhausted.
    pub item: String,
    /// Link inside an item. When absent the item itself carries the `href`.
    #[serde(default)]
    pub link: Option<String>,
    /// Take every matching link inside an item instead of only the first.
    #[serde(default)]
    pub all_links: bool,
    /// Per-item publication date `D.M.YYYY` in its first word; written as `D-M-YYYY` with the page's digits.
    #[serde(default)]
    pub date: Option<String>,
}

/// Selectors applied to an article page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractRules {
    pub title: String,
    #[serde(default)]
    pub date: Option<DateRule>,
    /// Lead paragraph placed before the body.
    #[serde(default)]
    pub perex: Option<String>,
    pub body: BodyRule,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyRule {
    /// Containers holding the article text; every match contributes.
    pub container: String,
    /// Paragraph/heading elements collected inside each container.
    #[serde(default = "default_body_elements")]
    pub elements: String,
    /// Only keep elements without any attributes (skips captions, ads, embeds).
    #[serde(default)]
    pub bare_only: bool,
}

fn default_body_elements() -> String {
    "p, h1, h2, h3, h4, h5, h6".to_string()
}

/// How an article page exposes its publication date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DateRule {
    /// Attribute holding an ISO timestamp, e.g. `time[datetime]`; rendered `DD-MM-YYYY`.
    IsoAttribute { selector: String, attribute: String },
    /// Element text like `12. 5. 2024 14:30`; rendered `12-5-2024`.
    DottedText { selector: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractVariant {
    pub url_contains: String,
    pub extract: ExtractRules,
}
