//! Blikk (blikk.hu, Hungary) archive scraper.
//!
//! The online archive is paged from 0 for each day and read until a page
//! comes back without entries; there is no fixed page cap.

use super::config::{
    ArchiveConfig, BodyRule, DiscoveryConfig, ExtractRules, ListingSelectors, Pagination,
    SiteConfig,
};
use crate::fetch::DEFAULT_TIMEOUT_SECS;
use crate::models::{SourceProfile, TitleKey};

pub fn config() -> SiteConfig {
    SiteConfig {
        key: "blikk.hu".to_string(),
        profile: SourceProfile {
            country: "Hungary".to_string(),
            language: "hu".to_string(),
            source: "blikk_hu".to_string(),
            title_key: TitleKey::Title,
        },
        base_url: "https://www.blikk.hu/".to_string(),
        user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
            .to_string(),
        timeout_secs: DEFAULT_TIMEOUT_SECS,
        discovery: DiscoveryConfig::Archive(ArchiveConfig {
            url_template: "https://www.blikk.hu/archivum/online?date={date}&page={page}"
                .to_string(),
            date_format: "%Y-%m-%d".to_string(),
            pages: Pagination {
                start: 0,
                step: 1,
                max_pages: None,
            },
            listing: ListingSelectors {
                item: "ul.flex.flex-col.gap-4 li.pb-3.border-b".to_string(),
                link: Some("a[href]".to_string()),
                all_links: false,
                date: None,
            },
        }),
        extract: ExtractRules {
            title: "section.title h1".to_string(),
            date: None,
            perex: None,
            body: BodyRule {
                container: "article.space-y-6".to_string(),
                elements: "h1, h2, h3, h4, h5, h6, p".to_string(),
                bare_only: false,
            },
        },
        variants: Vec::new(),
    }
}
