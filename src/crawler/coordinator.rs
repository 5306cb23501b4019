//! Crawler coordinator - run orchestration
//!
//! The coordinator builds every shared object of a run exactly once and hands
//! them to the workers through `Arc`s:
//! - The output sink (truncated) and the dedup store around it
//! - The HTTP transport
//! - The task queue, seeded with one task per page
//! - The run statistics
//!
//! A run writes the header, seeds the queue, starts the pool, waits for the
//! queue to drain, joins every worker and flushes the sink.

use crate::config::{validate, Config};
use crate::crawler::pool::{SpawnError, WorkerContext, WorkerPool};
use crate::crawler::queue::{PageTask, TaskQueue};
use crate::crawler::transport::{HttpTransport, Transport};
use crate::output::{CrawlSummary, RunStatistics};
use crate::storage::{CsvSink, QuoteStore, RecordSink};
use crate::SieveError;
use std::sync::Arc;
use std::time::Instant;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    store: Arc<QuoteStore>,
    transport: Arc<dyn Transport>,
    stats: Arc<RunStatistics>,
}

impl Coordinator {
    /// Creates a coordinator with the production transport and CSV sink
    ///
    /// The output file is created (or truncated) here.
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(SieveError)` - Invalid configuration, HTTP client or output file
    pub fn new(config: Config) -> Result<Self, SieveError> {
        validate(&config)?;

        let transport = HttpTransport::from_config(&config.source, config.crawler.fetch_timeout)?;
        let sink = CsvSink::create(&config.output.path)?;

        tracing::debug!("Output file {} created", config.output.path.display());

        Self::with_parts(config, Arc::new(transport), Box::new(sink))
    }

    /// Creates a coordinator around an existing transport and sink
    pub fn with_parts(
        config: Config,
        transport: Arc<dyn Transport>,
        sink: Box<dyn RecordSink>,
    ) -> Result<Self, SieveError> {
        validate(&config)?;

        Ok(Self {
            config: Arc::new(config),
            store: Arc::new(QuoteStore::new(sink)),
            transport,
            stats: Arc::new(RunStatistics::new()),
        })
    }

    /// Builds the run's tasks, one per page in page order
    pub fn page_tasks(&self) -> Vec<PageTask> {
        (1..=self.config.crawler.page_count)
            .map(|page| PageTask::new(page, self.config.page_url(page)))
            .collect()
    }

    /// Runs the crawl to completion
    ///
    /// Page failures never abort the run; they are logged by the workers and
    /// show up in the returned summary.
    pub fn run(self) -> Result<CrawlSummary, SieveError> {
        self.run_with(WorkerPool::spawn)
    }

    /// Runs the crawl, starting the pool through `spawn`
    pub(crate) fn run_with<S>(self, spawn: S) -> Result<CrawlSummary, SieveError>
    where
        S: FnOnce(usize, WorkerContext) -> Result<WorkerPool, SpawnError>,
    {
        let start_time = Instant::now();
        let crawler = &self.config.crawler;

        // Header goes out before any worker can append
        self.store.write_header(&self.config.output.header)?;

        let tasks = self.page_tasks();
        let pages_total = tasks.len() as u64;
        let queue = Arc::new(TaskQueue::seeded(tasks));

        tracing::info!(
            "Starting crawl: {} pages, {} workers, output {}",
            pages_total,
            crawler.worker_count,
            self.config.output.path.display()
        );

        let context = WorkerContext {
            queue: Arc::clone(&queue),
            store: Arc::clone(&self.store),
            transport: Arc::clone(&self.transport),
            stats: Arc::clone(&self.stats),
            fetch_timeout: crawler.fetch_timeout,
            pacing_delay: crawler.pacing_delay,
        };

        let pool = match spawn(crawler.worker_count, context) {
            Ok(pool) => pool,
            Err(failure) => return Err(self.settle_failed_start(&queue, failure)),
        };

        queue.wait_until_drained();
        pool.join();

        self.store.flush()?;

        let summary = self
            .stats
            .summarize(pages_total, &self.config.output.path, start_time.elapsed());

        tracing::info!(
            "Crawl completed: {} / {} pages, {} quotes written in {:?}",
            summary.pages_processed,
            summary.pages_total,
            summary.records_written,
            summary.duration
        );

        Ok(summary)
    }

    /// Winds down a partially started pool and returns the start failure
    ///
    /// Workers that did start finish the queue and are joined, and the sink is
    /// flushed, before the error reaches the caller.
    fn settle_failed_start(&self, queue: &TaskQueue, failure: SpawnError) -> SieveError {
        let SpawnError {
            worker,
            started,
            source,
        } = failure;

        tracing::error!("Could not start worker {}: {}", worker, source);

        if started.size() > 0 {
            tracing::warn!("Letting {} started workers finish the queue", started.size());
            queue.wait_until_drained();
        }
        started.join();

        if let Err(error) = self.store.flush() {
            tracing::error!("Flush after failed start failed: {}", error);
        }

        SieveError::Spawn(source)
    }
}

/// Runs a complete crawl with the production transport and CSV sink
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - The run completed (individual pages may have failed)
/// * `Err(SieveError)` - The run could not start or its output could not be finalized
pub fn run_crawl(config: Config) -> Result<CrawlSummary, SieveError> {
    Coordinator::new(config)?.run()
}
