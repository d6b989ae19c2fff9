//! Ukrainska Pravda (pravda.com.ua, Ukraine) archive scraper.
//!
//! One archive page per day at `/archives/date_DDMMYYYY/`. The archive links
//! out to sister sites that use their own article markup, so extraction
//! picks a rule set by host.

use super::config::{
    ArchiveConfig, BodyRule, DiscoveryConfig, ExtractRules, ExtractVariant, ListingSelectors,
    Pagination, SiteConfig,
};
use crate::fetch::DEFAULT_TIMEOUT_SECS;
use crate::models::{SourceProfile, TitleKey};

const MAC_CHROME_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

fn rules(title: &str, container: &str) -> ExtractRules {
    ExtractRules {
        title: title.to_string(),
        date: None,
        perex: None,
        body: BodyRule {
            container: container.to_string(),
            elements: "h1, h2, h3, h4, h5, h6, p".to_string(),
            bare_only: false,
        },
    }
}

pub fn config() -> SiteConfig {
    SiteConfig {
        key: "pravda.ua".to_string(),
        profile: SourceProfile {
            country: "Ukraine".to_string(),
            language: "ua".to_string(),
            source: "pravda_ua".to_string(),
            title_key: TitleKey::Title,
        },
        base_url: "https://www.pravda.com.ua/".to_string(),
        user_agent: MAC_CHROME_USER_AGENT.to_string(),
        timeout_secs: DEFAULT_TIMEOUT_SECS,
        discovery: DiscoveryConfig::Archive(ArchiveConfig {
            url_template: "https://www.pravda.com.ua/archives/date_{date}/".to_string(),
            date_format: "%d%m%Y".to_string(),
            pages: Pagination::single(),
            listing: ListingSelectors {
                item: "div.article.article_list".to_string(),
                link: Some("a".to_string()),
                all_links: false,
                date: None,
            },
        }),
        extract: rules("h1.post_title", "div.post_text"),
        variants: vec![
            ExtractVariant {
                url_contains: "life.pravda.com.ua".to_string(),
                extract: rules("h1.post_article_title", "div.post_article_text"),
            },
            ExtractVariant {
                url_contains: "epravda.com.ua".to_string(),
                extract: rules("h1.post_article_title", "div.post_article_body"),
            },
            ExtractVariant {
                url_contains: "eurointegration.com.ua".to_string(),
                extract: rules("h1.post__title", "div.post__text"),
            },
        ],
    }
}
