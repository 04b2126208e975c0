//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made during a harvest:
//! - Building the HTTP client with the user agent and timeouts
//! - GET requests for page content
//! - Error classification (status, timeout, transport)
//!
//! There is no retry: every failure is returned to the caller, which aborts
//! the run.

use crate::config::Config;
use crate::HarvestError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Connection setup gets its own, shorter bound than the full request
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds an HTTP client with proper configuration
///
/// The request timeout comes from `scraper.request-timeout-secs`; the
/// connect timeout never exceeds it.
///
/// # Example
///
/// ```no_run
/// use quote_harvest::config::Config;
/// use quote_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(config.scraper.request_timeout_secs);

    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page and returns its body
///
/// # Errors
///
/// | Condition | Error |
/// |-----------|-------|
/// | Non-2xx status | `HarvestError::Fetch` with the status code |
/// | Timeout | `HarvestError::Timeout` |
/// | Any other transport failure | `HarvestError::Http` |
pub async fn fetch_page(client: &Client, url: &Url) -> Result<String, HarvestError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!("GET {} returned HTTP {}", url, status.as_u16());
        return Err(HarvestError::Fetch {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(|e| classify_error(url, e))?;
    tracing::debug!(
        "GET {} -> {} ({} bytes)",
        url,
        status.as_u16(),
        body.len()
    );

    Ok(body)
}

/// Maps a reqwest error onto the harvest error taxonomy
fn classify_error(url: &Url, error: reqwest::Error) -> HarvestError {
    if error.is_timeout() {
        HarvestError::Timeout {
            url: url.to_string(),
        }
    } else {
        HarvestError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
