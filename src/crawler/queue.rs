//! Task queue for page fetches
//!
//! A finite FIFO seeded before the workers start. Alongside the items it keeps
//! an outstanding-task counter: enqueue increments it, `mark_done` decrements
//! it, and `wait_until_drained` blocks until it reaches zero. A dequeued task
//! stays outstanding until its worker marks it done, so draining means every
//! page has been fully processed, not merely handed out.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// A single listing page to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTask {
    /// 1-based page number
    pub page: u32,

    /// Absolute URL of the page
    pub url: String,
}

impl PageTask {
    pub fn new(page: u32, url: impl Into<String>) -> Self {
        Self {
            page,
            url: url.into(),
        }
    }
}

#[derive(Debug, Default)]
struct QueueState {
    pending: VecDeque<PageTask>,
    outstanding: usize,
}

/// Thread-safe FIFO of page tasks with completion tracking
#[derive(Debug, Default)]
pub struct TaskQueue {
    state: Mutex<QueueState>,
    drained: Condvar,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a queue pre-populated with the given tasks
    pub fn seeded(tasks: impl IntoIterator<Item = PageTask>) -> Self {
        let queue = Self::new();
        for task in tasks {
            queue.enqueue(task);
        }
        queue
    }

    // Deque and counter are consistent after every statement, even if poisoned
    fn state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a task and counts it as outstanding
    pub fn enqueue(&self, task: PageTask) {
        let mut state = self.state();
        state.pending.push_back(task);
        state.outstanding += 1;
    }

    /// Takes the next task without blocking; `None` when nothing is pending
    pub fn try_dequeue(&self) -> Option<PageTask> {
        self.state().pending.pop_front()
    }

    /// Marks one previously dequeued task as finished
    pub fn mark_done(&self) {
        let mut state = self.state();
        if state.outstanding == 0 {
            tracing::warn!("mark_done called with no outstanding tasks");
            return;
        }
        state.outstanding -= 1;
        if state.outstanding == 0 {
            self.drained.notify_all();
        }
    }

    /// Blocks until every enqueued task has been marked done
    pub fn wait_until_drained(&self) {
        let state = self.state();
        let _state = self
            .drained
            .wait_while(state, |state| state.outstanding > 0)
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// Number of tasks not yet dequeued
    pub fn pending(&self) -> usize {
        self.state().pending.len()
    }

    /// Number of tasks not yet marked done
    pub fn outstanding(&self) -> usize {
        self.state().outstanding
    }

    pub fn is_empty(&self) -> bool {
        self.pending() == 0
    }
}
