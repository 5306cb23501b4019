//! Sink traits and the CSV sink implementation
//!
//! A sink is append-only: the header is written once at the start of a run,
//! after which each accepted page arrives as one batch of rows.

use crate::storage::Record;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while writing to a sink
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store lock poisoned by a panicking writer")]
    Poisoned,
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Trait for append-only record sinks
///
/// Implementations are moved into the [`QuoteStore`](crate::storage::QuoteStore),
/// which serializes every call behind its lock.
pub trait RecordSink: Send {
    /// Writes the header row; called once before any rows
    fn write_header(&mut self, columns: &[String]) -> SinkResult<()>;

    /// Appends one batch of rows
    fn append_rows(&mut self, records: &[Record]) -> SinkResult<()>;

    /// Flushes buffered rows to the underlying destination
    fn flush(&mut self) -> SinkResult<()>;
}

/// Row layout of the output file
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    quote: &'a str,
    author: &'a str,
    tags: String,
}

impl<'a> From<&'a Record> for CsvRow<'a> {
    fn from(record: &'a Record) -> Self {
        Self {
            quote: &record.text,
            author: &record.author,
            tags: record.joined_tags(),
        }
    }
}

/// CSV-backed sink
///
/// Every call encodes its rows into a private buffer first and hands the
/// finished bytes to the destination in one `write_all`. A failed write
/// therefore leaves nothing queued that a later flush could emit.
pub struct CsvSink<W: Write> {
    out: W,
    rows_written: u64,
}

impl CsvSink<File> {
    /// Creates the output file, truncating any previous run's content
    pub fn create(path: &Path) -> SinkResult<Self> {
        let file = File::create(path)?;
        Ok(Self::from_writer(file))
    }
}

impl<W: Write> CsvSink<W> {
    /// Wraps an arbitrary writer
    pub fn from_writer(out: W) -> Self {
        Self {
            out,
            rows_written: 0,
        }
    }

    /// Number of data rows appended so far
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Flushes and returns the underlying writer
    pub fn into_inner(mut self) -> SinkResult<W> {
        self.out.flush()?;
        Ok(self.out)
    }

    fn commit(&mut self, bytes: &[u8]) -> SinkResult<()> {
        self.out.write_all(bytes)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Encoder for one header or batch
///
/// The header is written explicitly, so serde must not emit one.
fn encoder() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new())
}

fn finish(encoder: csv::Writer<Vec<u8>>) -> SinkResult<Vec<u8>> {
    encoder
        .into_inner()
        .map_err(|e| SinkError::Io(std::io::Error::new(e.error().kind(), e.to_string())))
}

impl<W: Write + Send> RecordSink for CsvSink<W> {
    fn write_header(&mut self, columns: &[String]) -> SinkResult<()> {
        let mut header = encoder();
        header.write_record(columns)?;
        let bytes = finish(header)?;
        self.commit(&bytes)
    }

    fn append_rows(&mut self, records: &[Record]) -> SinkResult<()> {
        if records.is_empty() {
            return Ok(());
        }

        let mut batch = encoder();
        for record in records {
            batch.serialize(CsvRow::from(record))?;
        }
        let bytes = finish(batch)?;
        self.commit(&bytes)?;
        self.rows_written += records.len() as u64;

        tracing::trace!("Appended {} rows ({} total)", records.len(), self.rows_written);
        Ok(())
    }

    fn flush(&mut self) -> SinkResult<()> {
        self.out.flush()?;
        Ok(())
    }
}
