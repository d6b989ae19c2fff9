//! Aktuality.sk (Slovakia) search scraper.
//!
//! Search results are numbered pages starting at 1, read up to three deep.
//! Each result carries its own publication date, which becomes the record
//! date since article pages do not expose one in a stable place.

use super::config::{
    BodyRule, DiscoveryConfig, ExtractRules, ListingSelectors, Pagination, SearchConfig,
    SiteConfig,
};
use crate::fetch::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::models::{SourceProfile, TitleKey};

pub fn config() -> SiteConfig {
    SiteConfig {
        key: "aktuality.sk".to_string(),
        profile: SourceProfile {
            country: "Slovakia".to_string(),
            language: "sk".to_string(),
            source: "aktuality.sk".to_string(),
            title_key: TitleKey::Header,
        },
        base_url: "https://www.aktuality.sk/".to_string(),
        user_agent: DEFAULT_USER_AGENT.to_string(),
        timeout_secs: DEFAULT_TIMEOUT_SECS,
        discovery: DiscoveryConfig::Search(SearchConfig {
            url_template: "https://www.aktuality.sk/vyhladavanie/{page}/?search%5Btext%5D={query}&search%5Bzdroj%5D=spravy".to_string(),
            pages: Pagination {
                start: 1,
                step: 1,
                max_pages: Some(3),
            },
            listing: ListingSelectors {
                item: "li.article-item".to_string(),
                link: Some("a.article-image".to_string()),
                all_links: false,
                date: Some("span.article-time".to_string()),
            },
        }),
        extract: ExtractRules {
            title: r#"h1[itemprop="headline"]"#.to_string(),
            date: None,
            perex: Some(r#"div#perex-id span[itemprop="description"]"#.to_string()),
            body: BodyRule {
                container: r#"div[itemprop="articleBody"]"#.to_string(),
                elements: "p, h1, h2, h3, h4, h5, h6".to_string(),
                bare_only: true,
            },
        },
        variants: Vec::new(),
    }
}
