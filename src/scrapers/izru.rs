//! Izvestia (iz.ru, Russia) search scraper.
//!
//! The search endpoint pages with a `from` offset in steps of ten; three
//! pages are read per query. Articles carry an ISO `time[datetime]`.

use super::config::{
    BodyRule, DateRule, DiscoveryConfig, ExtractRules, ListingSelectors, Pagination,
    SearchConfig, SiteConfig,
};
use crate::fetch::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::models::{SourceProfile, TitleKey};

pub fn config() -> SiteConfig {
    SiteConfig {
        key: "iz.ru".to_string(),
        profile: SourceProfile {
            country: "Russia".to_string(),
            language: "rus".to_string(),
            source: "iz.ru".to_string(),
            title_key: TitleKey::Header,
        },
        base_url: "https://iz.ru/".to_string(),
        user_agent: DEFAULT_USER_AGENT.to_string(),
        timeout_secs: DEFAULT_TIMEOUT_SECS,
        discovery: DiscoveryConfig::Search(SearchConfig {
            url_template: "https://iz.ru/search?type=0&prd=0&from={page}&text={query}&date_from=&date_to=2022-02-24&sort=0".to_string(),
            pages: Pagination {
                start: 0,
                step: 10,
                max_pages: Some(3),
            },
            listing: ListingSelectors {
                item: "div.view-search__title".to_string(),
                link: Some("a".to_string()),
                all_links: false,
                date: None,
            },
        }),
        extract: ExtractRules {
            title: r#"h1[itemprop="headline"]"#.to_string(),
            date: Some(DateRule::IsoAttribute {
                selector: "time[datetime]".to_string(),
                attribute: "datetime".to_string(),
            }),
            perex: None,
            body: BodyRule {
                container: r#"div[itemprop="articleBody"]"#.to_string(),
                elements: "p, h1, h2, h3, h4, h5, h6".to_string(),
                bare_only: true,
            },
        },
        variants: Vec::new(),
    }
}
