use super::Job;

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::time::Duration;

/// What the pool should do with a job after offering it to the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Admission {
    /// The job was queued and an existing worker will pick it up.
    Queued,

    /// The job was queued and a new worker must be started for it.
    Spawn,

    /// The pool is shut down or saturated; the job was dropped.
    Rejected,
}

/// Sizing limits applied by [`JobQueue::offer`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct Limits {
    pub(crate) core: usize,
    pub(crate) max: usize,
    pub(crate) capacity: Option<usize>,
    pub(crate) keep_alive: Duration,
}

/// Mutable state of the pool, guarded by a single lock.
struct State {
    /// Jobs waiting for a worker.
    jobs: VecDeque<Job>,

    /// Live workers, including those about to start.
    workers: usize,

    /// Workers currently parked on the condvar.
    idle: usize,

    /// Set once by [`JobQueue::shutdown`].
    shutdown: bool,
}

/// Job queue shared between the pool handle and its workers.
///
/// The queue also does the worker accounting: admission decisions and the
/// "should this idle worker retire" decision are taken under the same lock
/// as the push and pop, so the pool can never end up with queued jobs and
/// no worker to run them.
pub(crate) struct JobQueue {
    state: Mutex<State>,

    /// Wakes parked workers when a job arrives or on shutdown.
    available: Condvar,

    limits: Limits,
}

impl JobQueue {
    pub(crate) fn new(limits: Limits) -> Self {
        Self {
            state: Mutex::new(State {
                jobs: VecDeque::new(),
                workers: 0,
                idle: 0,
                shutdown: false,
            }),
            available: Condvar::new(),
            limits,
        }
    }

    /// Offers a job to the pool.
    ///
    /// Admission order:
    /// 1. below `core` workers, queue and start a worker;
    /// 2. otherwise queue if the backlog has room;
    /// 3. otherwise start a worker if below `max`;
    /// 4. otherwise reject.
    ///
    /// On [`Admission::Spawn`] the worker slot is already reserved; the
    /// caller must either start the thread or call
    /// [`abandon_worker`](Self::abandon_worker).
    pub(crate) fn offer(&self, job: Job) -> Admission {
        let mut state = self.state.lock();

        if state.shutdown {
            return Admission::Rejected;
        }

        let has_room = self
            .limits
            .capacity
            .is_none_or(|capacity| state.jobs.len() < capacity);

        let admission = if state.workers < self.limits.core {
            Admission::Spawn
        } else if has_room {
            // A core size of zero still needs one worker to drain the queue.
            if state.workers == 0 {
                Admission::Spawn
            } else {
                Admission::Queued
            }
        } else if state.workers < self.limits.max {
            Admission::Spawn
        } else {
            return Admission::Rejected;
        };

        state.jobs.push_back(job);

        if admission == Admission::Spawn {
            state.workers += 1;
        } else if state.idle > 0 {
            self.available.notify_one();
        }

        admission
    }

    /// Releases a worker slot reserved by [`offer`](Self::offer) whose
    /// thread could not be started.
    ///
    /// The job stays queued. Another worker picks it up, or, if none is
    /// left, the next [`offer`](Self::offer) starts one for it.
    pub(crate) fn abandon_worker(&self) {
        let mut state = self.state.lock();
        state.workers -= 1;

        if state.idle > 0 {
            self.available.notify_one();
        }
    }

    /// Blocks the calling worker until a job is available.
    ///
    /// Returns `None` when the worker should exit: either the queue is shut
    /// down and drained, or the worker is above the core size and stayed
    /// idle for the keep-alive period. The worker is unregistered before
    /// `None` is returned.
    pub(crate) fn next(&self) -> Option<Job> {
        let mut state = self.state.lock();

        loop {
            if let Some(job) = state.jobs.pop_front() {
                return Some(job);
            }

            if state.shutdown {
                break;
            }

            state.idle += 1;

            if state.workers > self.limits.core {
                let timed_out = self
                    .available
                    .wait_for(&mut state, self.limits.keep_alive)
                    .timed_out();
                state.idle -= 1;

                if timed_out && state.jobs.is_empty() && state.workers > self.limits.core {
                    break;
                }
            } else {
                self.available.wait(&mut state);
                state.idle -= 1;
            }
        }

        state.workers -= 1;
        None
    }

    /// Stops admission and wakes every parked worker.
    ///
    /// Jobs already queued are still handed out by [`next`](Self::next).
    pub(crate) fn shutdown(&self) {
        self.state.lock().shutdown = true;
        self.available.notify_all();
    }

    pub(crate) fn is_shutdown(&self) -> bool {
        self.state.lock().shutdown
    }

    pub(crate) fn workers(&self) -> usize {
        self.state.lock().workers
    }

    pub(crate) fn len(&self) -> usize {
        self.state.lock().jobs.len()
    }
}
