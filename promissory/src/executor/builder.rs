use super::ThreadPool;
use super::queue::Limits;

use std::thread;
use std::time::Duration;

/// Default keep-alive of idle workers above the core size.
const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(60);

/// Default prefix of worker thread names.
const DEFAULT_THREAD_NAME: &str = "promissory-worker";

/// Builder for configuring and creating a [`ThreadPool`].
///
/// Two policies are covered:
/// - **fixed**: `worker_threads(n)` keeps exactly `n` workers around and
///   queues everything else without bound;
/// - **elastic**: `core_threads(c)` workers are kept, the pool grows up to
///   `max_threads(m)` once the backlog set by `queue_capacity` is full, and
///   workers above `c` retire after `keep_alive` without work.
///
/// # Examples
///
/// ```rust
/// use promissory::ThreadPoolBuilder;
/// use std::time::Duration;
///
/// let fixed = ThreadPoolBuilder::new().worker_threads(5).build();
///
/// let elastic = ThreadPoolBuilder::new()
///     .core_threads(4)
///     .max_threads(8)
///     .queue_capacity(64)
///     .keep_alive(Duration::from_secs(60))
///     .build();
/// # fixed.shutdown();
/// # elastic.shutdown();
/// ```
#[derive(Debug, Clone)]
pub struct ThreadPoolBuilder {
    core_threads: usize,
    max_threads: usize,
    queue_capacity: Option<usize>,
    keep_alive: Duration,
    thread_name: String,
}

impl ThreadPoolBuilder {
    /// Creates a builder for a fixed pool sized to the number of available
    /// logical CPUs, falling back to `1` if unavailable.
    pub fn new() -> Self {
        let threads = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Self {
            core_threads: threads,
            max_threads: threads,
            queue_capacity: None,
            keep_alive: DEFAULT_KEEP_ALIVE,
            thread_name: DEFAULT_THREAD_NAME.to_owned(),
        }
    }

    /// Uses a fixed pool of `n` workers.
    ///
    /// Sets both the core and maximum size to `n`.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn worker_threads(mut self, n: usize) -> Self {
        assert!(n > 0, "worker_threads must be > 0");

        self.core_threads = n;
        self.max_threads = n;
        self
    }

    /// Sets the number of workers kept alive even when idle.
    ///
    /// `0` is allowed: the pool then only holds workers while there is
    /// work, up to the maximum size.
    pub fn core_threads(mut self, n: usize) -> Self {
        self.core_threads = n;
        self
    }

    /// Sets the maximum number of workers.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn max_threads(mut self, n: usize) -> Self {
        assert!(n > 0, "max_threads must be > 0");

        self.max_threads = n;
        self
    }

    /// Bounds the number of queued jobs.
    ///
    /// Once the backlog is full, the pool grows towards the maximum size and
    /// rejects jobs when it is reached. The default backlog is unbounded,
    /// in which case the pool never grows past its core size.
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = Some(capacity);
        self
    }

    /// Sets how long a worker above the core size may stay idle before it
    /// exits.
    pub fn keep_alive(mut self, keep_alive: Duration) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    /// Sets the prefix of worker thread names. Workers are named
    /// `{prefix}-{id}`.
    pub fn thread_name(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name = prefix.into();
        self
    }

    /// Builds the pool.
    ///
    /// No thread is started until the first job is submitted.
    ///
    /// # Panics
    ///
    /// Panics if the maximum size is smaller than the core size.
    pub fn build(self) -> ThreadPool {
        assert!(
            self.max_threads >= self.core_threads,
            "max_threads must be >= core_threads"
        );

        let limits = Limits {
            core: self.core_threads,
            max: self.max_threads,
            capacity: self.queue_capacity,
            keep_alive: self.keep_alive,
        };

        ThreadPool::new(limits, self.thread_name)
    }
}

impl Default for ThreadPoolBuilder {
    /// Creates a default `ThreadPoolBuilder`.
    fn default() -> Self {
        Self::new()
    }
}
