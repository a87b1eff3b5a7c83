use std::collections::HashMap;

use uuid::Uuid;

/// Status of one individual request, kept for diagnostics only
///
/// Batch completion is decided by counting responses, not by scanning these.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RequestStatus {
    Sent,
    Received,
    Error,
}

/// Map of request id to status across all batches
pub type RequestLog = HashMap<Uuid, RequestStatus>;

/// One user-triggered action applied to a set of selected jobs
///
/// Tracks how many responses (success and error alike) have arrived. When
/// every request has resolved the batch is complete and exactly one queue
/// reload is due. Batches are not retried or persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingBatch {
    num_jobs: usize,
    count: usize,
}

impl PendingBatch {
    pub fn new(num_jobs: usize) -> PendingBatch {
        PendingBatch { num_jobs, count: 0 }
    }

    /// Record one response arriving, success or error alike
    pub fn record_response(&mut self) {
        debug_assert!(self.count < self.num_jobs);
        self.count += 1;
    }

    pub fn is_complete(&self) -> bool {
        self.count == self.num_jobs
    }

    pub fn num_jobs(&self) -> usize {
        self.num_jobs
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_completes_after_all_responses() {
        let mut batch = PendingBatch::new(3);
        assert!(!batch.is_complete());
        batch.record_response();
        batch.record_response();
        assert!(!batch.is_complete());
        batch.record_response();
        assert!(batch.is_complete());
        assert_eq!(batch.count(), batch.num_jobs());
    }

    #[test]
    fn empty_batch_is_complete_immediately() {
        assert!(PendingBatch::new(0).is_complete());
    }
}
