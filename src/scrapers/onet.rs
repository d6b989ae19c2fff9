//! Onet Wiadomości (onet.pl, Poland) archive scraper.
//!
//! One archive page per day; every `a.itemTitle` anchor is an article.

use super::config::{
    ArchiveConfig, BodyRule, DiscoveryConfig, ExtractRules, ListingSelectors, Pagination,
    SiteConfig,
};
use crate::fetch::DEFAULT_TIMEOUT_SECS;
use crate::models::{SourceProfile, TitleKey};

pub fn config() -> SiteConfig {
    SiteConfig {
        key: "onet.pl".to_string(),
        profile: SourceProfile {
            country: "Poland".to_string(),
            language: "pl".to_string(),
            source: "onet_pl".to_string(),
            title_key: TitleKey::Title,
        },
        base_url: "https://wiadomosci.onet.pl/".to_string(),
        user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
            .to_string(),
        timeout_secs: DEFAULT_TIMEOUT_SECS,
        discovery: DiscoveryConfig::Archive(ArchiveConfig {
            url_template: "https://wiadomosci.onet.pl/archiwum/{date}".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            pages: Pagination::single(),
            listing: ListingSelectors {
                item: "a.itemTitle".to_string(),
                link: None,
                all_links: false,
                date: None,
            },
        }),
        extract: ExtractRules {
            title: "h1.mainTitle".to_string(),
            date: None,
            perex: Some("div#lead".to_string()),
            body: BodyRule {
                container: "div#detail".to_string(),
                elements: "p.hyphenate.narrow".to_string(),
                bare_only: false,
            },
        },
        variants: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Criterion;
    use crate::scrapers::SourceAdapter;
    use crate::scrapers::engine::SiteScraper;
    use crate::scrapers::testing::StubFetcher;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_archive_anchor_is_the_item() {
        let archive = r#"
            <a class="itemTitle" href="https://wiadomosci.onet.pl/kraj/abc/xyz">Jeden</a>
            <a class="itemTitle" href="swiat/def/uvw">Dwa</a>
            <a class="other" href="/ignored">Nie</a>"#;
        let fetcher =
            StubFetcher::default().page("https://wiadomosci.onet.pl/archiwum/2024-01-15", archive);
        let scraper = SiteScraper::new(config(), fetcher).unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

        let links = scraper.discover(&Criterion::Day(day)).await;

        let urls: Vec<&str> = links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://wiadomosci.onet.pl/kraj/abc/xyz",
                "https://wiadomosci.onet.pl/swiat/def/uvw"
            ]
        );
        assert_eq!(scraper.config().key, "onet.pl");
    }

    #[tokio::test]
    async fn test_article_fields() {
        let article = r#"
            <h1 class="mainTitle">Tytuł</h1>
            <div id="lead">Lead.</div>
            <div id="detail">
              <p class="hyphenate narrow">Akapit.</p>
              <p>Reklama</p>
            </div>"#;
        let fetcher = StubFetcher::default().page("https://wiadomosci.onet.pl/kraj/abc/xyz", article);
        let scraper = SiteScraper::new(config(), fetcher).unwrap();

        let extract = scraper
            .extract("https://wiadomosci.onet.pl/kraj/abc/xyz")
            .await
            .unwrap();

        assert_eq!(extract.title.as_deref(), Some("Tytuł"));
        assert_eq!(extract.date, None);
        assert_eq!(extract.body.as_deref(), Some("Lead.\n\nAkapit.\n"));
    }
}
