//! Output module for writing harvest results
//!
//! This module handles:
//! - Writing records to CSV and reading them back
//! - Summarizing a harvest for display

mod csv_writer;
pub mod stats;

pub use csv_writer::{read_records, write_records, CSV_HEADER};
pub use stats::{print_statistics, HarvestStatistics};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unexpected CSV header: {0}")]
    MissingHeader(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
