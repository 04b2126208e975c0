//! Crawler module for page fetching and quote extraction
//!
//! This module contains the harvesting pipeline:
//! - HTTP fetching with a per-request timeout
//! - HTML extraction of quote records and the next-page link
//! - The pagination loop that ties them together

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::{collect_all, Coordinator, Harvest};
pub use fetcher::{build_http_client, fetch_page};
pub use parser::{extract_page, PageResult, PageSelectors};

use crate::config::Config;
use crate::output::write_records;
use crate::HarvestError;
use std::path::Path;

/// Runs a complete harvest and writes the CSV
///
/// Records are written only after every page was collected, so a failed run
/// leaves no output file behind.
///
/// # Arguments
///
/// * `config` - The harvest configuration
/// * `output_path` - Where the CSV is written
///
/// # Returns
///
/// * `Ok(Harvest)` - Harvest completed and written
/// * `Err(HarvestError)` - Collection or writing failed
pub async fn harvest_to_csv(config: Config, output_path: &Path) -> Result<Harvest, HarvestError> {
    let harvest = collect_all(config).await?;
    write_records(&harvest.records, output_path)?;
    tracing::info!(
        "Wrote {} quotes to {}",
        harvest.records.len(),
        output_path.display()
    );
    Ok(harvest)
}
