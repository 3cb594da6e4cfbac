use super::builder::ThreadPoolBuilder;
use super::queue::{Admission, JobQueue, Limits};
use super::worker::Worker;
use super::{Executor, Job};
use crate::error::{Error, Result};

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// A pool of worker threads.
///
/// `ThreadPool` is a cheap handle: clones share the same workers and queue.
/// Jobs submitted through [`Executor::execute`] are always queued and run on
/// a worker, never on the submitting thread.
///
/// The pool is shut down explicitly with [`shutdown`](Self::shutdown), or
/// implicitly when the last handle is dropped. Either way, jobs already
/// queued still run; new submissions are rejected.
#[derive(Clone)]
pub struct ThreadPool {
    inner: Arc<Inner>,
}

struct Inner {
    /// Queue shared with the workers. Workers only hold this, not `Inner`,
    /// so dropping the last handle is observable.
    queue: Arc<JobQueue>,

    /// Handles of started workers, pruned as they finish.
    handles: Mutex<Vec<JoinHandle<()>>>,

    next_id: AtomicUsize,

    thread_name: String,
}

impl ThreadPool {
    pub(crate) fn new(limits: Limits, thread_name: String) -> Self {
        Self {
            inner: Arc::new(Inner {
                queue: Arc::new(JobQueue::new(limits)),
                handles: Mutex::new(Vec::new()),
                next_id: AtomicUsize::new(0),
                thread_name,
            }),
        }
    }

    /// Returns a [`ThreadPoolBuilder`].
    pub fn builder() -> ThreadPoolBuilder {
        ThreadPoolBuilder::new()
    }

    /// Creates a pool of exactly `n` workers with an unbounded backlog.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn fixed(n: usize) -> Self {
        ThreadPoolBuilder::new().worker_threads(n).build()
    }

    /// Creates a pool keeping `core` workers, growing to `max` when the
    /// backlog of `max` jobs is full, and retiring extra workers after
    /// `keep_alive`.
    pub fn elastic(core: usize, max: usize, keep_alive: Duration) -> Self {
        ThreadPoolBuilder::new()
            .core_threads(core)
            .max_threads(max)
            .queue_capacity(max)
            .keep_alive(keep_alive)
            .build()
    }

    /// Stops accepting jobs.
    ///
    /// Queued jobs still run. Workers exit once the queue is drained.
    pub fn shutdown(&self) {
        if !self.inner.queue.is_shutdown() {
            log::debug!("shutting down {} pool", self.inner.thread_name);
        }
        self.inner.queue.shutdown();
    }

    /// Waits for all workers to exit.
    ///
    /// Call [`shutdown`](Self::shutdown) first, otherwise this waits for
    /// core workers that never exit. Must not be called from a job running
    /// on this pool.
    pub fn join(&self) {
        let handles = std::mem::take(&mut *self.inner.handles.lock());

        for handle in handles {
            let _ = handle.join();
        }
    }

    /// Shuts the pool down and waits for queued jobs to finish.
    pub fn shutdown_and_join(&self) {
        self.shutdown();
        self.join();
    }

    /// Returns `true` once [`shutdown`](Self::shutdown) has been called.
    pub fn is_shutdown(&self) -> bool {
        self.inner.queue.is_shutdown()
    }

    /// Number of live workers.
    pub fn worker_count(&self) -> usize {
        self.inner.queue.workers()
    }

    /// Number of jobs waiting for a worker.
    pub fn queued(&self) -> usize {
        self.inner.queue.len()
    }

    /// Starts a worker thread for a slot reserved by the queue.
    fn spawn_worker(&self) -> std::io::Result<()> {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let worker = Worker::new(id, self.inner.queue.clone());

        let handle = thread::Builder::new()
            .name(format!("{}-{}", self.inner.thread_name, id))
            .spawn(move || worker.run())?;

        let mut handles = self.inner.handles.lock();
        handles.retain(|h| !h.is_finished());
        handles.push(handle);

        Ok(())
    }
}

impl Executor for ThreadPool {
    fn execute(&self, job: Job) -> Result<()> {
        match self.inner.queue.offer(job) {
            Admission::Queued => Ok(()),
            Admission::Spawn => {
                if let Err(err) = self.spawn_worker() {
                    log::warn!("failed to start worker thread: {}", err);

                    // The job stays queued for the remaining workers, or for
                    // the worker started by the next submission.
                    self.inner.queue.abandon_worker();
                }
                Ok(())
            }
            Admission::Rejected => {
                log::warn!("{} pool rejected a job", self.inner.thread_name);
                Err(Error::Rejected)
            }
        }
    }
}

impl Drop for Inner {
    /// Shuts the queue down when the last handle goes away.
    ///
    /// Workers are not joined here: the last handle may well be dropped by
    /// a job running on one of them.
    fn drop(&mut self) {
        self.queue.shutdown();
    }
}

impl fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadPool")
            .field("name", &self.inner.thread_name)
            .field("workers", &self.worker_count())
            .field("queued", &self.queued())
            .field("shutdown", &self.is_shutdown())
            .finish()
    }
}
