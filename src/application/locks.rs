//! Per-assessment serialization.
//!
//! Every read of a module result rewrites the cached summary, so reads and
//! writes of one assessment must not interleave. Different assessments never
//! wait on each other.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::foundation::AssessmentId;

/// One async mutex per assessment id, created on first use and dropped
/// from the table once nobody holds or awaits it.
#[derive(Debug, Default)]
pub struct AssessmentLocks {
    locks: Mutex<HashMap<AssessmentId, Arc<Mutex<()>>>>,
}

impl AssessmentLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other task holds `id`, then returns the guard.
    pub async fn acquire(&self, id: AssessmentId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            // Holders and waiters keep a clone; a count of 1 is the table alone.
            locks.retain(|_, lock| Arc::strong_count(&*lock) > 1);
            locks.entry(id).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Number of ids currently held or awaited.
    pub async fn len(&self) -> usize {
        self.locks
            .lock()
            .await
            .values()
            .filter(|lock| Arc::strong_count(*lock) > 1)
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
