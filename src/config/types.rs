use serde::Deserialize;

/// Default start URL of the quote site
pub const DEFAULT_START_URL: &str = "https://quotes.toscrape.com";

/// Main configuration structure for Quote-Harvest
///
/// Every table and key is optional; `Config::default()` reproduces the
/// built-in behavior.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scraper: ScraperConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    pub selectors: SelectorConfig,
}

/// Pagination behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// URL of the first page
    #[serde(rename = "start-url")]
    pub start_url: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Pause between consecutive page fetches (milliseconds)
    #[serde(rename = "page-delay-ms")]
    pub page_delay_ms: u64,

    /// Optional upper bound on the number of pages visited
    #[serde(rename = "max-pages")]
    pub max_pages: Option<usize>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            start_url: DEFAULT_START_URL.to_string(),
            request_timeout_secs: 10,
            page_delay_ms: 300,
            max_pages: None,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the client
    pub name: String,

    /// Version of the client
    pub version: String,

    /// URL with information about the client
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://github.com/quote-harvest/quote-harvest".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!("{}/{} (+{})", self.name, self.version, self.contact_url)
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the CSV file
    #[serde(rename = "csv-path")]
    pub csv_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: "quotes.csv".to_string(),
        }
    }
}

/// CSS selectors locating each part of a quote page
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// One match per quote container
    pub quote: String,

    /// Quote text, relative to the container
    pub text: String,

    /// Author name, relative to the container
    pub author: String,

    /// Tag labels, relative to the container
    pub tag: String,

    /// Next-page anchor, relative to the document
    pub next: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            quote: "div.quote".to_string(),
            text: "span.text".to_string(),
            author: "small.author".to_string(),
            tag: "div.tags a.tag".to_string(),
            next: "li.next a".to_string(),
        }
    }
}
