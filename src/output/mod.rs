//! Output module for run reporting
//!
//! This module handles:
//! - Counting page outcomes and records while the workers run
//! - Snapshotting those counters into a [`CrawlSummary`]
//! - Printing the summary once the run is complete

pub mod stats;
mod summary;

pub use stats::{print_statistics, RunStatistics};
pub use summary::{CrawlSummary, FailureKind};
