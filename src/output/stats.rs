//! Live run statistics
//!
//! Workers bump these counters as pages finish; the coordinator turns them
//! into a [`CrawlSummary`] once every worker has been joined.

use crate::crawler::{PageError, PageReport};
use crate::output::summary::{CrawlSummary, FailureKind};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Counters shared by every worker of a run
#[derive(Debug, Default)]
pub struct RunStatistics {
    pages_processed: AtomicU64,
    http_status_failures: AtomicU64,
    transport_failures: AtomicU64,
    extraction_failures: AtomicU64,
    sink_failures: AtomicU64,
    panics: AtomicU64,
    records_extracted: AtomicU64,
    records_written: AtomicU64,
    duplicates_dropped: AtomicU64,
}

impl RunStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    fn failure_counter(&self, kind: FailureKind) -> &AtomicU64 {
        match kind {
            FailureKind::HttpStatus => &self.http_status_failures,
            FailureKind::Transport => &self.transport_failures,
            FailureKind::Extraction => &self.extraction_failures,
            FailureKind::Sink => &self.sink_failures,
            FailureKind::Panic => &self.panics,
        }
    }

    /// Records a page whose quotes reached the store
    pub fn record_page(&self, report: &PageReport) {
        self.pages_processed.fetch_add(1, Ordering::Relaxed);
        self.records_extracted
            .fetch_add(report.tally.extracted as u64, Ordering::Relaxed);
        self.records_written
            .fetch_add(report.tally.written as u64, Ordering::Relaxed);
        self.duplicates_dropped
            .fetch_add(report.tally.duplicates as u64, Ordering::Relaxed);
    }

    /// Records a page that contributed no records
    pub fn record_failure(&self, error: &PageError) {
        self.failure_counter(error.kind())
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Number of pages processed so far
    pub fn pages_processed(&self) -> u64 {
        self.pages_processed.load(Ordering::Relaxed)
    }

    /// Number of failed pages so far
    pub fn pages_failed(&self) -> u64 {
        FailureKind::ALL
            .iter()
            .map(|kind| self.failure_counter(*kind).load(Ordering::Relaxed))
            .sum()
    }

    /// Snapshots the counters into a summary
    pub fn summarize(&self, pages_total: u64, output_path: &Path, duration: Duration) -> CrawlSummary {
        let mut failures = HashMap::new();
        for kind in FailureKind::ALL {
            let count = self.failure_counter(kind).load(Ordering::Relaxed);
            if count > 0 {
                failures.insert(kind, count);
            }
        }

        CrawlSummary {
            output_path: output_path.to_path_buf(),
            duration,
            pages_total,
            pages_processed: self.pages_processed(),
            failures,
            records_extracted: self.records_extracted.load(Ordering::Relaxed),
            records_written: self.records_written.load(Ordering::Relaxed),
            duplicates_dropped: self.duplicates_dropped.load(Ordering::Relaxed),
        }
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `summary` - The summary to display
pub fn print_statistics(summary: &CrawlSummary) {
    print!("{}", summary);
}
