//! Crawl summary types
//!
//! A [`CrawlSummary`] is an immutable snapshot of a finished run's counters.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Category of a page that contributed no records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Non-200 response
    HttpStatus,
    /// Timeout, connection or body read failure
    Transport,
    /// Quote block missing a required element
    Extraction,
    /// Accepted quotes could not be written
    Sink,
    /// Page processing panicked
    Panic,
}

impl FailureKind {
    pub const ALL: [FailureKind; 5] = [
        Self::HttpStatus,
        Self::Transport,
        Self::Extraction,
        Self::Sink,
        Self::Panic,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::HttpStatus => "http status",
            Self::Transport => "transport",
            Self::Extraction => "extraction",
            Self::Sink => "sink write",
            Self::Panic => "panic",
        }
    }
}

/// Summary statistics for a run
#[derive(Debug, Clone, Default)]
pub struct CrawlSummary {
    // Run metadata
    pub output_path: PathBuf,
    pub duration: Duration,

    // Page statistics
    pub pages_total: u64,
    pub pages_processed: u64,

    // Failures by kind (kind -> count), kinds with zero count omitted
    pub failures: HashMap<FailureKind, u64>,

    // Record statistics
    pub records_extracted: u64,
    pub records_written: u64,
    pub duplicates_dropped: u64,
}

impl CrawlSummary {
    /// Creates a new empty crawl summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of pages that contributed no records
    pub fn pages_failed(&self) -> u64 {
        self.failures.values().sum()
    }

    /// Returns the number of failures of one kind
    pub fn failures_of(&self, kind: FailureKind) -> u64 {
        self.failures.get(&kind).copied().unwrap_or(0)
    }

    /// Returns the success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.pages_total == 0 {
            return 0.0;
        }
        (self.pages_processed as f64 / self.pages_total as f64) * 100.0
    }

    /// Returns the duplicate rate among extracted records as a percentage
    pub fn duplicate_rate(&self) -> f64 {
        if self.records_extracted == 0 {
            return 0.0;
        }
        (self.duplicates_dropped as f64 / self.records_extracted as f64) * 100.0
    }
}

impl fmt::Display for CrawlSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Crawl Statistics ===\n")?;

        writeln!(f, "Output:")?;
        writeln!(f, "  File: {}", self.output_path.display())?;
        writeln!(f)?;

        writeln!(f, "Pages:")?;
        writeln!(f, "  Total: {}", self.pages_total)?;
        writeln!(f, "  Processed: {}", self.pages_processed)?;
        writeln!(f, "  Failed: {}", self.pages_failed())?;
        writeln!(f)?;

        if !self.failures.is_empty() {
            writeln!(f, "Failure Summary:")?;
            let mut failure_counts: Vec<_> = self.failures.iter().collect();
            failure_counts.sort_by(|a, b| b.1.cmp(a.1).then(a.0.label().cmp(b.0.label())));

            for (kind, count) in failure_counts {
                writeln!(f, "  {}: {}", kind.label(), count)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "Quotes:")?;
        writeln!(f, "  Extracted: {}", self.records_extracted)?;
        writeln!(f, "  Written: {}", self.records_written)?;
        writeln!(
            f,
            "  Duplicates dropped: {} ({:.1}%)",
            self.duplicates_dropped,
            self.duplicate_rate()
        )?;
        writeln!(f)?;

        writeln!(
            f,
            "Success Rate: {:.1}% ({} / {} pages successfully processed) in {:.1}s",
            self.success_rate(),
            self.pages_processed,
            self.pages_total,
            self.duration.as_secs_f64()
        )
    }
}
