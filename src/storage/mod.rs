//! Storage module for persisting harvested quotes
//!
//! This module handles everything that outlives a single page, including:
//! - The set of quote keys already seen during the run
//! - The append-only CSV sink the accepted quotes land in
//! - The store that guards both behind one lock so that the dedup check and
//!   the write of a page happen as a single step

mod dedup;
mod sink;
mod store;

pub use dedup::SeenSet;
pub use sink::{CsvSink, RecordSink, SinkError, SinkResult};
pub use store::{PageTally, QuoteStore};

#[cfg(test)]
pub(crate) use sink::test_support;

/// One quote harvested from a listing page
///
/// Records are never mutated after extraction. Two records with the same
/// trimmed text are the same quote as far as deduplication is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub text: String,
    pub author: String,
    pub tags: Vec<String>,
}

impl Record {
    /// Creates a record, trimming surrounding whitespace from every field
    pub fn new(text: &str, author: &str, tags: Vec<String>) -> Self {
        Self {
            text: text.trim().to_string(),
            author: author.trim().to_string(),
            tags: tags.iter().map(|tag| tag.trim().to_string()).collect(),
        }
    }

    /// Returns the deduplication key of this record
    pub fn key(&self) -> &str {
        self.text.trim()
    }

    /// Returns the tags joined into a single CSV cell
    pub fn joined_tags(&self) -> String {
        self.tags.join(",")
    }
}
