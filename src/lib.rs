//! Quote-Sieve: a small, polite quote harvester
//!
//! This crate fetches a fixed run of paginated quote listing pages on a pool of
//! worker threads, extracts quote records from every page, drops records whose
//! text has already been seen during the run, and appends the survivors to a
//! CSV file.

pub mod config;
pub mod crawler;
pub mod output;
pub mod storage;

use thiserror::Error;

/// Main error type for run-level failures
///
/// Page-level failures never surface here; they are contained by the page
/// fetcher and reported through [`crawler::PageError`].
#[derive(Debug, Error)]
pub enum SieveError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Sink error: {0}")]
    Sink(#[from] storage::SinkError),

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL template: {0}")]
    InvalidTemplate(String),
}

/// Result type alias for Quote-Sieve operations
pub type Result<T> = std::result::Result<T, SieveError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, Coordinator, PageError};
pub use output::CrawlSummary;
pub use storage::{CsvSink, QuoteStore, Record, RecordSink};
