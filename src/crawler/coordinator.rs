//! Pagination coordinator - the fetch/extract loop
//!
//! This module drives a harvest from the start URL to the last page:
//! - Fetching each page in turn
//! - Extracting its records and next-page link
//! - Deciding, through `PaginationState`, whether to continue
//! - Pausing between pages
//!
//! Any fetch or extraction failure ends the run immediately and no records
//! are returned.

use crate::config::Config;
use crate::crawler::parser::{extract_page, PageResult, PageSelectors};
use crate::crawler::{build_http_client, fetch_page};
use crate::record::Record;
use crate::state::{PaginationState, StopReason};
use crate::url::{parse_http_url, same_page};
use crate::HarvestError;
use reqwest::Client;
use std::time::{Duration, Instant};
use url::Url;

/// Everything collected by a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Harvest {
    /// All records, in page order then document order
    pub records: Vec<Record>,

    /// Number of pages fetched, including a final empty page
    pub pages_visited: usize,

    /// Why the run stopped
    pub stop_reason: StopReason,
}

/// Main pagination coordinator
pub struct Coordinator {
    config: Config,
    client: Client,
    selectors: PageSelectors,
    start_url: Url,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Builds the HTTP client and compiles the page selectors up front, so a
    /// bad configuration fails before any request is made.
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let client = build_http_client(&config)?;
        Self::with_client(config, client)
    }

    /// Creates a coordinator around an existing HTTP client
    pub fn with_client(config: Config, client: Client) -> Result<Self, HarvestError> {
        let start_url = parse_http_url(&config.scraper.start_url)?;
        let selectors = PageSelectors::compile(&config.selectors)?;

        Ok(Self {
            config,
            client,
            selectors,
            start_url,
        })
    }

    /// Runs the pagination loop until it reaches `Done`
    ///
    /// Every step either moves to the next page number or to `Done`, so the
    /// loop ends once a page is empty, has no next link, hits the page limit
    /// or links back to a visited page.
    pub async fn run(&self) -> Result<Harvest, HarvestError> {
        tracing::info!("Starting harvest at {}", self.start_url);
        let start_time = Instant::now();

        let mut state = PaginationState::start(self.start_url.clone());
        let mut records: Vec<Record> = Vec::new();
        let mut visited: Vec<Url> = Vec::new();

        let stop_reason = loop {
            let (url, page) = match &state {
                PaginationState::Fetching { url, page } => (url.clone(), *page),
                PaginationState::Done(reason) => break *reason,
            };
            let next = self.visit(&url, page, &mut records, &mut visited).await?;
            transition(&mut state, next)?;
        };

        let pages_visited = visited.len() + usize::from(stop_reason == StopReason::EmptyPage);

        tracing::info!(
            "Harvest finished: {} quotes from {} pages in {:?} ({})",
            records.len(),
            pages_visited,
            start_time.elapsed(),
            stop_reason.description()
        );

        Ok(Harvest {
            records,
            pages_visited,
            stop_reason,
        })
    }

    /// Fetches and extracts one page, returning the next state
    async fn visit(
        &self,
        url: &Url,
        page: usize,
        records: &mut Vec<Record>,
        visited: &mut Vec<Url>,
    ) -> Result<PaginationState, HarvestError> {
        tracing::debug!("Fetching page {}: {}", page, url);

        let body = fetch_page(&self.client, url).await?;

        // Next links resolve against the configured base, not the current page
        let PageResult {
            records: page_records,
            next_link,
        } = extract_page(&body, &self.start_url, &self.selectors).map_err(|e| match e {
            HarvestError::Extraction { message, .. } => HarvestError::Extraction {
                url: url.to_string(),
                message,
            },
            other => other,
        })?;

        if page_records.is_empty() {
            tracing::info!("Page {} has no quotes, stopping", page);
            return Ok(PaginationState::Done(StopReason::EmptyPage));
        }

        tracing::info!("Page {}: {} quotes", page, page_records.len());
        records.extend(page_records);
        visited.push(url.clone());

        let Some(next_url) = next_link else {
            tracing::info!("Page {} has no next link, stopping", page);
            return Ok(PaginationState::Done(StopReason::LastPage));
        };

        if let Some(max_pages) = self.config.scraper.max_pages {
            if page >= max_pages {
                tracing::info!("Reached page limit of {}, stopping", max_pages);
                return Ok(PaginationState::Done(StopReason::PageLimit));
            }
        }

        if visited.iter().any(|seen| same_page(seen, &next_url)) {
            tracing::warn!(
                "Next link {} on page {} points to a visited page, stopping",
                next_url,
                page
            );
            return Ok(PaginationState::Done(StopReason::LoopDetected));
        }

        tracing::debug!("Next page: {}", next_url);
        self.pause().await;

        Ok(PaginationState::Fetching {
            url: next_url,
            page: page + 1,
        })
    }

    /// Politeness delay between consecutive pages
    async fn pause(&self) {
        let delay = self.config.scraper.page_delay_ms;
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
    }
}

/// Applies a state change, rejecting transitions the machine does not allow
fn transition(state: &mut PaginationState, next: PaginationState) -> Result<(), HarvestError> {
    if !state.can_transition_to(&next) {
        return Err(HarvestError::InvalidTransition {
            from: state.to_string(),
            to: next.to_string(),
        });
    }
    *state = next;
    Ok(())
}

/// Collects every record reachable from the configured start URL
///
/// # Arguments
///
/// * `config` - The harvest configuration
///
/// # Returns
///
/// * `Ok(Harvest)` - All records, in visitation order
/// * `Err(HarvestError)` - The first fetch or extraction failure
pub async fn collect_all(config: Config) -> Result<Harvest, HarvestError> {
    let coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
