//! StagingBuffer - multi-writer buffer for newly observed values
//!
//! Monitoring threads stage samples at any time; the owning entity commits
//! them into the retained history when it is ready to consume them.

use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;

/// Maximum number of committed samples retained per buffer
pub const MAX_COMMITTED_SAMPLES: usize = 1024;

/// A single observation. Most metrics carry one value; some carry a vector
/// (e.g. per-core utilisation).
pub type Sample = Vec<f64>;

/// Thread-safe staging area with a bounded committed history
#[derive(Debug, Default)]
pub struct StagingBuffer {
    pending: Mutex<Vec<Sample>>,
    committed: RwLock<VecDeque<Sample>>,
}

impl StagingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage one observation. Empty observations are ignored.
    pub fn stage(&self, values: &[f64]) {
        if values.is_empty() {
            return;
        }
        self.pending.lock().push(values.to_vec());
    }

    /// Number of staged, not yet committed observations
    pub fn pending_len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Move every staged observation into the committed history.
    ///
    /// Returns the number of observations committed. Concurrent commits are
    /// serialized on the history lock, so batches land in staging order.
    pub fn commit(&self) -> usize {
        // Lock order: committed, then pending
        let mut committed = self.committed.write();
        let drained: Vec<Sample> = std::mem::take(&mut *self.pending.lock());
        if drained.is_empty() {
            return 0;
        }

        let count = drained.len();
        committed.extend(drained);
        while committed.len() > MAX_COMMITTED_SAMPLES {
            committed.pop_front();
        }
        count
    }

    /// Most recently committed observation
    pub fn latest(&self) -> Option<Sample> {
        self.committed.read().back().cloned()
    }

    /// Snapshot of the committed history, oldest first
    pub fn history(&self) -> Vec<Sample> {
        self.committed.read().iter().cloned().collect()
    }

    pub fn committed_len(&self) -> usize {
        self.committed.read().len()
    }
}
