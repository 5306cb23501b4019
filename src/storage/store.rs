//! Deduplicating quote store
//!
//! The seen-key set and the sink live behind one mutex. A page enters the
//! critical section once: every record is checked, the novel ones are written
//! as one batch, and only then are their keys recorded. Two pages on different
//! workers can never race on the same key, and a failed write leaves no key
//! marked as seen without a matching row.

use crate::storage::{Record, RecordSink, SeenSet, SinkError, SinkResult};
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

/// Outcome of storing one page's records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageTally {
    /// Records offered by the page
    pub extracted: usize,

    /// Records appended to the sink
    pub written: usize,

    /// Records dropped because their key was already seen
    pub duplicates: usize,
}

struct StoreInner {
    seen: SeenSet,
    sink: Box<dyn RecordSink>,
}

/// Shared dedup set and sink, guarded by a single lock
pub struct QuoteStore {
    inner: Mutex<StoreInner>,
}

impl QuoteStore {
    /// Creates a store around a freshly opened sink
    pub fn new(sink: Box<dyn RecordSink>) -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                seen: SeenSet::new(),
                sink,
            }),
        }
    }

    fn lock(&self) -> SinkResult<MutexGuard<'_, StoreInner>> {
        self.inner.lock().map_err(|_| SinkError::Poisoned)
    }

    /// Writes the header row
    pub fn write_header(&self, columns: &[String]) -> SinkResult<()> {
        self.lock()?.sink.write_header(columns)
    }

    /// Deduplicates one page's records and appends the novel ones
    ///
    /// Duplicates within the page itself are dropped as well: only the first
    /// occurrence of a key is written.
    pub fn accept_page(&self, records: Vec<Record>) -> SinkResult<PageTally> {
        let extracted = records.len();
        let mut inner = self.lock()?;

        let mut page_keys: HashSet<&str> = HashSet::new();
        let mut batch: Vec<Record> = Vec::new();
        for record in &records {
            let key = record.key();
            if inner.seen.contains(key) || !page_keys.insert(key) {
                tracing::trace!("Dropping duplicate quote: {}", key);
                continue;
            }
            batch.push(record.clone());
        }

        inner.sink.append_rows(&batch)?;

        for record in &batch {
            inner.seen.insert(record.key());
        }

        Ok(PageTally {
            extracted,
            written: batch.len(),
            duplicates: extracted - batch.len(),
        })
    }

    /// Number of distinct quote keys persisted so far
    pub fn seen_count(&self) -> SinkResult<usize> {
        Ok(self.lock()?.seen.len())
    }

    /// Flushes the sink
    pub fn flush(&self) -> SinkResult<()> {
        self.lock()?.sink.flush()
    }
}
