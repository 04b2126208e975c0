//! HTML extractor for quote pages
//!
//! This module turns the HTML of one listing page into:
//! - One `Record` per quote container, in document order
//! - The absolute URL of the next page, if the page links to one

use crate::config::{validate_selector, SelectorConfig};
use crate::record::Record;
use crate::url::resolve_link;
use crate::{ConfigError, HarvestError};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Records and pagination link extracted from a single page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    /// Quotes found on the page, in document order
    pub records: Vec<Record>,

    /// Absolute URL of the next page, if any
    pub next_link: Option<Url>,
}

/// Compiled selectors for every part of a quote page
#[derive(Debug, Clone)]
pub struct PageSelectors {
    quote: Selector,
    text: Selector,
    author: Selector,
    tag: Selector,
    next: Selector,
}

impl PageSelectors {
    /// Compiles the configured selectors
    ///
    /// Fails with `ConfigError::InvalidSelector` naming the first selector
    /// that does not parse.
    pub fn compile(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            quote: validate_selector(&config.quote)?,
            text: validate_selector(&config.text)?,
            author: validate_selector(&config.author)?,
            tag: validate_selector(&config.tag)?,
            next: validate_selector(&config.next)?,
        })
    }
}

/// Extracts quote records and the next-page link from a page
///
/// # Extraction Rules
///
/// - Each element matching the quote selector yields exactly one record
/// - Text and author are the trimmed text content of the first match inside
///   the container; tags are every tag match, each trimmed, in order
/// - The first next-page element's `href` is resolved against `base_url`;
///   if that href is missing or not followable there is no next link
///
/// A container without a text or author node is treated as a malformed page
/// and fails the whole extraction. A page with no containers at all is not an
/// error; it yields an empty record list.
///
/// # Example
///
/// ```
/// use quote_harvest::config::SelectorConfig;
/// use quote_harvest::crawler::{extract_page, PageSelectors};
/// use url::Url;
///
/// let html = r#"<div class="quote"><span class="text">Hi</span>
///     <small class="author">Me</small></div>
///     <li class="next"><a href="/page/2/">Next</a></li>"#;
/// let selectors = PageSelectors::compile(&SelectorConfig::default()).unwrap();
/// let base = Url::parse("https://quotes.toscrape.com").unwrap();
///
/// let page = extract_page(html, &base, &selectors).unwrap();
/// assert_eq!(page.records.len(), 1);
/// assert_eq!(page.next_link.unwrap().as_str(), "https://quotes.toscrape.com/page/2/");
/// ```
pub fn extract_page(
    html: &str,
    base_url: &Url,
    selectors: &PageSelectors,
) -> Result<PageResult, HarvestError> {
    let document = Html::parse_document(html);

    let records = document
        .select(&selectors.quote)
        .enumerate()
        .map(|(index, container)| extract_record(container, index, base_url, selectors))
        .collect::<Result<Vec<_>, _>>()?;

    let next_link = extract_next_link(&document, base_url, &selectors.next);

    Ok(PageResult { records, next_link })
}

/// Builds a record from one quote container
fn extract_record(
    container: ElementRef<'_>,
    index: usize,
    base_url: &Url,
    selectors: &PageSelectors,
) -> Result<Record, HarvestError> {
    let text = required_text(container, &selectors.text)
        .ok_or_else(|| missing_field(base_url, index, "text"))?;
    let author = required_text(container, &selectors.author)
        .ok_or_else(|| missing_field(base_url, index, "author"))?;

    let tags = container
        .select(&selectors.tag)
        .map(element_text)
        .collect();

    Ok(Record::new(text, author, tags))
}

/// Returns the trimmed text of the first match, or None if nothing matches
fn required_text(container: ElementRef<'_>, selector: &Selector) -> Option<String> {
    container.select(selector).next().map(element_text)
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn missing_field(base_url: &Url, index: usize, field: &str) -> HarvestError {
    HarvestError::Extraction {
        url: base_url.to_string(),
        message: format!("quote container #{} has no {} element", index + 1, field),
    }
}

/// Finds the next-page link, if any
///
/// Only the first element matching the selector is considered.
fn extract_next_link(document: &Html, base_url: &Url, selector: &Selector) -> Option<Url> {
    let element = document.select(selector).next()?;

    let Some(href) = element.value().attr("href") else {
        tracing::debug!("Next-page element has no href, treating page as last");
        return None;
    };

    let resolved = resolve_link(href, base_url);
    if resolved.is_none() {
        tracing::debug!(
            "Next-page href '{}' is not a followable link, treating page as last",
            href
        );
    }
    resolved
}
