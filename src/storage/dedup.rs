//! Run-wide record of quote keys already persisted

use std::collections::HashSet;

/// Set of quote keys seen during the current run
///
/// Grows monotonically; keys are never evicted. Not synchronized on its own:
/// the [`QuoteStore`](crate::storage::QuoteStore) owns it behind the same lock
/// as the sink.
#[derive(Debug, Default)]
pub struct SeenSet {
    keys: HashSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the key has already been recorded
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Records a key, returning false if it was already present
    pub fn insert(&mut self, key: &str) -> bool {
        if self.keys.contains(key) {
            return false;
        }
        self.keys.insert(key.to_string())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
