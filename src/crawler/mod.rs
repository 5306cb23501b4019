//! Crawler module for page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The task queue of listing pages and its completion tracking
//! - The fixed-size worker pool draining that queue
//! - HTTP fetching behind the `Transport` seam
//! - Quote extraction from listing pages
//! - Overall run coordination

mod coordinator;
mod extractor;
mod fetcher;
mod pool;
mod queue;
mod transport;

pub use coordinator::{run_crawl, Coordinator};
pub use extractor::{extract_records, parse_quotes, ExtractionError, RawQuote};
pub use fetcher::{fetch_page, PageError, PageReport};
pub use pool::{SpawnError, WorkerContext, WorkerPool};
pub use queue::{PageTask, TaskQueue};
pub use transport::{build_http_client, HttpResponse, HttpTransport, Transport, TransportError};
