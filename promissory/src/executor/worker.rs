use super::queue::JobQueue;

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// A worker thread of a [`ThreadPool`](super::ThreadPool).
///
/// Workers pull jobs from the shared queue until the queue tells them to
/// retire, either because the pool shut down or because they sat idle
/// above the core size for the keep-alive period.
pub(crate) struct Worker {
    /// Identifier used in log output.
    id: usize,

    queue: Arc<JobQueue>,
}

impl Worker {
    pub(crate) fn new(id: usize, queue: Arc<JobQueue>) -> Self {
        Self { id, queue }
    }

    /// Runs the worker loop on the current thread.
    ///
    /// A panicking job is logged and the loop continues; user code can
    /// never take a worker down.
    pub(crate) fn run(self) {
        log::debug!("worker {} started", self.id);

        while let Some(job) = self.queue.next() {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
                let message = payload
                    .downcast_ref::<&str>()
                    .copied()
                    .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
                    .unwrap_or("non-string panic payload");

                log::error!("worker {}: job panicked: {}", self.id, message);
            }
        }

        log::debug!("worker {} exited", self.id);
    }
}
