//! Configuration-driven adapter engine.
//!
//! [`SiteScraper`] turns a [`SiteConfig`] into a working [`SourceAdapter`]:
//! selectors are compiled once at construction, listing pages are walked
//! according to the site's pagination, and article pages are reduced to an
//! [`ArticleExtract`] field by field. A selector that matches nothing only
//! blanks its own field; the remaining fields are still extracted.

use super::config::{
    DateRule, DiscoveryConfig, ExtractRules, ListingSelectors, Pagination, SiteConfig,
};
use super::dates::{dotted_to_display, iso_to_display, listing_date_label};
use super::SourceAdapter;
use crate::error::{ConfigError, ExtractError};
use crate::fetch::PageFetcher;
use crate::models::{ArticleExtract, Criterion, DiscoveryMode, LinkRecord, SourceProfile};
use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// A news site adapter built from configuration.
#[derive(Debug)]
pub struct SiteScraper<F> {
    config: SiteConfig,
    base_url: Url,
    listing_template: String,
    archive_date_format: Option<String>,
    pages: Pagination,
    listing: CompiledListing,
    rules: CompiledRules,
    variants: Vec<(String, CompiledRules)>,
    fetcher: F,
}

#[derive(Debug)]
struct CompiledListing {
    item: Selector,
    link: Option<Selector>,
    all_links: bool,
    date: Option<Selector>,
}

#[derive(Debug)]
struct CompiledRules {
    title: Selector,
    date: Option<CompiledDateRule>,
    perex: Option<Selector>,
    container: Selector,
    elements: Selector,
    bare_only: bool,
}

#[derive(Debug)]
enum CompiledDateRule {
    IsoAttribute { selector: Selector, attribute: String },
    DottedText { selector: Selector },
}

/// Links found on one listing page, plus how many result entries it had.
#[derive(Debug, Default)]
struct ListingPage {
    items: usize,
    links: Vec<LinkRecord>,
}

impl<F: PageFetcher> SiteScraper<F> {
    /// Compile `config` into an adapter that fetches through `fetcher`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a selector does not parse, the base URL is
    /// invalid, or a URL template lacks a placeholder its pagination needs.
    pub fn new(config: SiteConfig, fetcher: F) -> Result<Self, ConfigError> {
        let key = config.key.as_str();
        let base_url = Url::parse(&config.base_url).map_err(|e| ConfigError::BaseUrl {
            source_key: key.to_string(),
            reason: e.to_string(),
        })?;

        let (template, criterion_placeholder, archive_date_format, pages, listing) =
            match &config.discovery {
                DiscoveryConfig::Search(s) => (&s.url_template, "{query}", None, s.pages, &s.listing),
                DiscoveryConfig::Archive(a) => (
                    &a.url_template,
                    "{date}",
                    Some(a.date_format.clone()),
                    a.pages,
                    &a.listing,
                ),
            };
        require_placeholder(key, template, criterion_placeholder)?;
        if pages.max_pages != Some(1) {
            require_placeholder(key, template, "{page}")?;
        }

        let listing = compile_listing(key, listing)?;
        let rules = compile_rules(key, &config.extract)?;
        let variants = config
            .variants
            .iter()
            .map(|v| Ok((v.url_contains.clone(), compile_rules(key, &v.extract)?)))
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Self {
            listing_template: template.clone(),
            archive_date_format,
            pages,
            base_url,
            listing,
            rules,
            variants,
            fetcher,
            config,
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    fn rules_for(&self, url: &str) -> &CompiledRules {
        self.variants
            .iter()
            .find(|(needle, _)| url.contains(needle.as_str()))
            .map(|(_, rules)| rules)
            .unwrap_or(&self.rules)
    }

    fn listing_url(&self, criterion: &Criterion, page: u32) -> Option<String> {
        let filled = match (criterion, &self.archive_date_format) {
            (Criterion::Query(q), None) => self
                .listing_template
                .replace("{query}", &urlencoding::encode(q)),
            (Criterion::Day(d), Some(fmt)) => self
                .listing_template
                .replace("{date}", &d.format(fmt).to_string()),
            _ => return None,
        };
        Some(filled.replace("{page}", &page.to_string()))
    }

    fn parse_listing(&self, html: &str, day: Option<NaiveDate>) -> ListingPage {
        let document = Html::parse_document(html);
        let mut page = ListingPage::default();

        for item in document.select(&self.listing.item) {
            page.items += 1;

            let listing_date = match day {
                Some(_) => None,
                None => self
                    .listing
                    .date
                    .as_ref()
                    .and_then(|sel| item.select(sel).next())
                    .and_then(|el| listing_date_label(&text_of(el))),
            };

            let anchors: Vec<ElementRef> = match &self.listing.link {
                None => vec![item],
                Some(sel) if self.listing.all_links => item.select(sel).collect(),
                Some(sel) => item.select(sel).next().into_iter().collect(),
            };

            for anchor in anchors {
                let Some(href) = anchor.value().attr("href") else {
                    continue;
                };
                match self.base_url.join(href.trim()) {
                    Ok(resolved) => {
                        debug!(url = %resolved, "Discovered link");
                        let link = match day {
                            Some(day) => LinkRecord::dated(resolved.to_string(), day),
                            None => LinkRecord::new(resolved.to_string()),
                        };
                        page.links.push(link.with_listing_date(listing_date.clone()));
                    }
                    Err(e) => debug!(%href, error = %e, "Skipping unresolvable link"),
                }
            }
        }
        page
    }
}

impl<F: PageFetcher> SourceAdapter for SiteScraper<F> {
    fn profile(&self) -> &SourceProfile {
        &self.config.profile
    }

    fn mode(&self) -> DiscoveryMode {
        self.config.mode()
    }

    #[instrument(level = "info", skip_all, fields(source = %self.config.key, %criterion))]
    async fn discover(&self, criterion: &Criterion) -> Vec<LinkRecord> {
        let day = match criterion {
            Criterion::Day(d) => Some(*d),
            Criterion::Query(_) => None,
        };
        let mut links = Vec::new();
        let mut index = 0u32;

        while self.pages.allows(index) {
            let page_number = self.pages.page_number(index);
            let Some(url) = self.listing_url(criterion, page_number) else {
                warn!(mode = %self.mode(), "Criterion does not match this source's mode");
                break;
            };

            let html = match self.fetcher.fetch(&url).await {
                Ok(html) => html,
                Err(e) => {
                    warn!(%url, page = page_number, error = %e, "Listing page failed; stopping discovery");
                    break;
                }
            };

            let page = self.parse_listing(&html, day);
            if page.items == 0 {
                info!(%url, page = page_number, "No more results");
                break;
            }
            debug!(page = page_number, items = page.items, links = page.links.len(), "Parsed listing page");
            links.extend(page.links);
            index += 1;
        }

        info!(count = links.len(), pages = index, "Collected links");
        links
    }

    #[instrument(level = "debug", skip_all, fields(source = %self.config.key, %url))]
    async fn extract(&self, url: &str) -> Result<ArticleExtract, ExtractError> {
        let html = self
            .fetcher
            .fetch(url)
            .await
            .map_err(|e| ExtractError::from_fetch(url, e))?;
        let extract = self.rules_for(url).apply(&html);
        debug!(
            title = extract.title.is_some(),
            date = extract.date.is_some(),
            body_bytes = extract.body.as_ref().map_or(0, String::len),
            "Parsed article"
        );
        Ok(extract)
    }
}

impl CompiledRules {
    fn apply(&self, html: &str) -> ArticleExtract {
        let document = Html::parse_document(html);
        ArticleExtract {
            title: self.title(&document),
            date: self.date(&document),
            body: self.body(&document),
        }
    }

    fn title(&self, document: &Html) -> Option<String> {
        document
            .select(&self.title)
            .map(text_of)
            .find(|t| !t.is_empty())
    }

    fn date(&self, document: &Html) -> Option<String> {
        match self.date.as_ref()? {
            CompiledDateRule::IsoAttribute {
                selector,
                attribute,
            } => document
                .select(selector)
                .find_map(|el| el.value().attr(attribute))
                .and_then(iso_to_display),
            CompiledDateRule::DottedText { selector } => document
                .select(selector)
                .next()
                .and_then(|el| dotted_to_display(&text_of(el))),
        }
    }

    /// Perex first, then paragraphs one per line, headings padded with blank lines.
    fn body(&self, document: &Html) -> Option<String> {
        let mut text = String::new();

        if let Some(perex) = self
            .perex
            .as_ref()
            .and_then(|sel| document.select(sel).next())
            .map(text_of)
            .filter(|t| !t.is_empty())
        {
            text.push_str(&perex);
            text.push_str("\n\n");
        }

        for container in document.select(&self.container) {
            for element in container.select(&self.elements) {
                if self.bare_only && element.value().attrs().next().is_some() {
                    continue;
                }
                let chunk = text_of(element);
                if chunk.is_empty() {
                    continue;
                }
                if is_heading(element.value().name()) {
                    text.push('\n');
                    text.push_str(&chunk);
                    text.push('\n');
                } else {
                    text.push_str(&chunk);
                    text.push('\n');
                }
            }
        }

        (!text.trim().is_empty()).then_some(text)
    }
}

/// Element text with each fragment trimmed and blank fragments dropped.
fn text_of(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_heading(name: &str) -> bool {
    matches!(name, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

fn require_placeholder(
    key: &str,
    template: &str,
    placeholder: &'static str,
) -> Result<(), ConfigError> {
    if template.contains(placeholder) {
        Ok(())
    } else {
        Err(ConfigError::Template {
            source_key: key.to_string(),
            template: template.to_string(),
            placeholder,
        })
    }
}

fn selector(key: &str, css: &str) -> Result<Selector, ConfigError> {
    Selector::parse(css).map_err(|e| ConfigError::Selector {
        source_key: key.to_string(),
        selector: css.to_string(),
        reason: format!("{e:?}"),
    })
}

fn optional_selector(key: &str, css: Option<&String>) -> Result<Option<Selector>, ConfigError> {
    css.map(|c| selector(key, c)).transpose()
}

fn compile_listing(key: &str, listing: &ListingSelectors) -> Result<CompiledListing, ConfigError> {
    Ok(CompiledListing {
        item: selector(key, &listing.item)?,
        link: optional_selector(key, listing.link.as_ref())?,
        all_links: listing.all_links,
        date: optional_selector(key, listing.date.as_ref())?,
    })
}

fn compile_rules(key: &str, rules: &ExtractRules) -> Result<CompiledRules, ConfigError> {
    let date = match &rules.date {
        None => None,
        Some(DateRule::IsoAttribute {
            selector: css,
            attribute,
        }) => Some(CompiledDateRule::IsoAttribute {
            selector: selector(key, css)?,
            attribute: attribute.clone(),
        }),
        Some(DateRule::DottedText { selector: css }) => Some(CompiledDateRule::DottedText {
            selector: selector(key, css)?,
        }),
    };
    Ok(CompiledRules {
        title: selector(key, &rules.title)?,
        date,
        perex: optional_selector(key, rules.perex.as_ref())?,
        container: selector(key, &rules.body.container)?,
        elements: selector(key, &rules.body.elements)?,
        bare_only: rules.body.bare_only,
    })
}
