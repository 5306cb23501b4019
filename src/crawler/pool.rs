//! Worker pool
//!
//! A fixed number of OS threads share one [`TaskQueue`]. Each worker takes a
//! task, processes it, marks it done and then sleeps the pacing delay before
//! looking for the next one. A worker retires the first time it finds the
//! queue empty.

use crate::crawler::fetcher::{fetch_page, PageError};
use crate::crawler::queue::{PageTask, TaskQueue};
use crate::crawler::transport::Transport;
use crate::output::RunStatistics;
use crate::storage::QuoteStore;
use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use thiserror::Error;

/// Everything a worker shares with its siblings
#[derive(Clone)]
pub struct WorkerContext {
    pub queue: Arc<TaskQueue>,
    pub store: Arc<QuoteStore>,
    pub transport: Arc<dyn Transport>,
    pub stats: Arc<RunStatistics>,
    pub fetch_timeout: Duration,
    pub pacing_delay: Duration,
}

/// Handle to a running set of workers
#[derive(Debug)]
pub struct WorkerPool {
    workers: Vec<(usize, JoinHandle<usize>)>,
}

/// The OS refused to start a worker
///
/// Workers started before the failure are already draining the queue; they
/// come back in `started` and must still be joined.
#[derive(Debug, Error)]
#[error("failed to start worker {worker}: {source}")]
pub struct SpawnError {
    pub worker: usize,
    pub started: WorkerPool,
    #[source]
    pub source: io::Error,
}

impl WorkerPool {
    /// Starts `size` workers on the given context
    ///
    /// # Returns
    ///
    /// * `Ok(WorkerPool)` - All workers started
    /// * `Err(SpawnError)` - A thread could not be started; carries the
    ///   workers started before it
    pub fn spawn(size: usize, context: WorkerContext) -> Result<Self, SpawnError> {
        Self::spawn_with(size, context, start_worker)
    }

    /// Starts workers through `start`, stopping at the first failure
    pub(crate) fn spawn_with<F>(
        size: usize,
        context: WorkerContext,
        mut start: F,
    ) -> Result<Self, SpawnError>
    where
        F: FnMut(usize, WorkerContext) -> io::Result<JoinHandle<usize>>,
    {
        let mut workers = Vec::with_capacity(size);

        for id in 1..=size {
            match start(id, context.clone()) {
                Ok(handle) => workers.push((id, handle)),
                Err(source) => {
                    return Err(SpawnError {
                        worker: id,
                        started: Self { workers },
                        source,
                    })
                }
            }
        }

        tracing::debug!("Started {} workers", workers.len());
        Ok(Self { workers })
    }

    /// Number of workers in the pool
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Waits for every worker to retire
    ///
    /// Returns the number of tasks each worker handled, in worker order. A
    /// worker that died counts as zero and is logged, never propagated.
    pub fn join(self) -> Vec<usize> {
        self.workers
            .into_iter()
            .map(|(id, handle)| match handle.join() {
                Ok(handled) => {
                    tracing::debug!("Worker {} retired after {} pages", id, handled);
                    handled
                }
                Err(payload) => {
                    tracing::error!("Worker {} died: {}", id, panic_message(payload.as_ref()));
                    0
                }
            })
            .collect()
    }
}

/// Starts one named worker thread
pub(crate) fn start_worker(id: usize, context: WorkerContext) -> io::Result<JoinHandle<usize>> {
    thread::Builder::new()
        .name(format!("worker-{}", id))
        .spawn(move || run_worker(id, context))
}

/// Main loop of one worker thread
fn run_worker(id: usize, context: WorkerContext) -> usize {
    let span = tracing::info_span!("worker", id);
    let _entered = span.enter();

    let mut handled = 0;

    // Retiring on the first empty observation is only sound because tasks are
    // never re-enqueued: an in-flight task can never reappear for this worker
    // to miss. Adding retries requires a close/poison-pill signal instead.
    while let Some(task) = context.queue.try_dequeue() {
        process_task(&context, &task);
        context.queue.mark_done();
        handled += 1;

        if !context.pacing_delay.is_zero() {
            thread::sleep(context.pacing_delay);
        }
    }

    tracing::trace!("Queue empty, worker {} retiring", id);
    handled
}

/// Processes one task, logging and counting its outcome
fn process_task(context: &WorkerContext, task: &PageTask) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        fetch_page(
            context.transport.as_ref(),
            &context.store,
            &task.url,
            context.fetch_timeout,
        )
    }))
    .unwrap_or_else(|payload| {
        Err(PageError::Panicked {
            url: task.url.clone(),
            message: panic_message(payload.as_ref()),
        })
    });

    match outcome {
        Ok(report) => {
            tracing::info!(
                "Page {}: {} quotes, {} new, {} duplicates",
                task.page,
                report.tally.extracted,
                report.tally.written,
                report.tally.duplicates
            );
            context.stats.record_page(&report);
        }
        Err(error) => {
            match &error {
                PageError::HttpStatus { .. } => tracing::warn!("Skipping page {}: {}", task.page, error),
                _ => tracing::error!("Skipping page {}: {}", task.page, error),
            }
            context.stats.record_failure(&error);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
