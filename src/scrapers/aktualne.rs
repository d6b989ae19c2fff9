//! Aktuálně.cz (Czech Republic) search scraper.
//!
//! Searches `/hledani/` with an offset-based page parameter. Each `.timeline`
//! block can hold several article links, all of which are collected. Only the
//! first result page is read.

use super::config::{
    BodyRule, DateRule, DiscoveryConfig, ExtractRules, ListingSelectors, Pagination,
    SearchConfig, SiteConfig,
};
use crate::fetch::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::models::{SourceProfile, TitleKey};

pub fn config() -> SiteConfig {
    SiteConfig {
        key: "aktualne.cz".to_string(),
        profile: SourceProfile {
            country: "Czech Republic".to_string(),
            language: "cs".to_string(),
            source: "Aktualne.cz".to_string(),
            title_key: TitleKey::Title,
        },
        base_url: "https://www.aktualne.cz/".to_string(),
        user_agent: DEFAULT_USER_AGENT.to_string(),
        timeout_secs: DEFAULT_TIMEOUT_SECS,
        discovery: DiscoveryConfig::Search(SearchConfig {
            url_template: "https://www.aktualne.cz/hledani/?offset={page}&query={query}"
                .to_string(),
            pages: Pagination {
                start: 0,
                step: 20,
                max_pages: Some(1),
            },
            listing: ListingSelectors {
                item: "div.timeline".to_string(),
                link: Some("a[href]".to_string()),
                all_links: true,
                date: None,
            },
        }),
        extract: ExtractRules {
            title: "h1.article-title".to_string(),
            date: Some(DateRule::DottedText {
                selector: "div.author__date".to_string(),
            }),
            perex: Some("div.article__perex".to_string()),
            body: BodyRule {
                container: "div.article__content".to_string(),
                elements: "p".to_string(),
                bare_only: true,
            },
        },
        variants: Vec::new(),
    }
}
