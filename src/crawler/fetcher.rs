//! Page fetcher
//!
//! This module is the failure barrier of the pipeline. One call handles one
//! page end to end:
//! - GET the page through the [`Transport`]
//! - Extract its quotes
//! - Hand them to the [`QuoteStore`] for dedup and writing
//!
//! Every way a page can go wrong comes back as a [`PageError`]; nothing is
//! retried and nothing escapes into the worker loop.

use crate::crawler::extractor::{extract_records, ExtractionError};
use crate::crawler::transport::{Transport, TransportError};
use crate::output::FailureKind;
use crate::storage::{PageTally, QuoteStore, SinkError};
use std::time::Duration;
use thiserror::Error;

/// Why a page contributed no records
#[derive(Debug, Error)]
pub enum PageError {
    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: TransportError,
    },

    #[error("malformed page {url}: {source}")]
    Extraction {
        url: String,
        #[source]
        source: ExtractionError,
    },

    #[error("failed to store quotes from {url}: {source}")]
    Sink {
        url: String,
        #[source]
        source: SinkError,
    },

    #[error("processing {url} panicked: {message}")]
    Panicked { url: String, message: String },
}

impl PageError {
    /// The page the error belongs to
    pub fn url(&self) -> &str {
        match self {
            Self::HttpStatus { url, .. }
            | Self::Transport { url, .. }
            | Self::Extraction { url, .. }
            | Self::Sink { url, .. }
            | Self::Panicked { url, .. } => url,
        }
    }

    /// The failure category used in run statistics
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::HttpStatus { .. } => FailureKind::HttpStatus,
            Self::Transport { .. } => FailureKind::Transport,
            Self::Extraction { .. } => FailureKind::Extraction,
            Self::Sink { .. } => FailureKind::Sink,
            Self::Panicked { .. } => FailureKind::Panic,
        }
    }
}

/// Result of a successfully stored page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReport {
    pub url: String,
    pub tally: PageTally,
}

/// Fetches one page, extracts its quotes and stores the novel ones
///
/// # Outcomes
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 200, well-formed | `Ok(PageReport)` |
/// | Any other status | `PageError::HttpStatus` |
/// | Timeout, connect, body read | `PageError::Transport` |
/// | Quote block missing text/author | `PageError::Extraction` |
/// | Sink write failed | `PageError::Sink` |
///
/// # Arguments
///
/// * `transport` - The transport to fetch through
/// * `store` - The shared dedup store
/// * `url` - The page URL
/// * `timeout` - Request timeout
pub fn fetch_page(
    transport: &dyn Transport,
    store: &QuoteStore,
    url: &str,
    timeout: Duration,
) -> Result<PageReport, PageError> {
    let response = transport
        .fetch(url, timeout)
        .map_err(|source| PageError::Transport {
            url: url.to_string(),
            source,
        })?;

    if response.status != 200 {
        return Err(PageError::HttpStatus {
            url: url.to_string(),
            status: response.status,
        });
    }

    let records = extract_records(&response.body).map_err(|source| PageError::Extraction {
        url: url.to_string(),
        source,
    })?;

    tracing::debug!("Extracted {} quotes from {}", records.len(), url);

    let tally = store.accept_page(records).map_err(|source| PageError::Sink {
        url: url.to_string(),
        source,
    })?;

    Ok(PageReport {
        url: url.to_string(),
        tally,
    })
}
