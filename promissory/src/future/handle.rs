use super::Outcome;
use super::cell::{Cell, Continuation, ContinuationId, Status};
use crate::error::{Error, Failure, Result};

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

/// Handle to the eventual outcome of an asynchronous computation.
///
/// A `Future` is shared: cloning it is cheap, and every clone observes the
/// same single outcome. It moves from pending to either succeeded or failed
/// exactly once, through its [`Promise`](super::Promise).
///
/// Outcomes are read by blocking ([`get`](Self::get), [`wait`](Self::wait)),
/// by peeking ([`get_now`](Self::get_now), [`peek`](Self::peek)), or by
/// attaching continuations through the combinators.
///
/// # Lost failures
///
/// A future that fails while nobody reads it or attaches a continuation to
/// it drops its failure silently. This is inherent to fire-and-forget use:
/// keep a handle, or end chains with
/// [`when_complete`](Self::when_complete) or [`handle`](Self::handle), when
/// the error matters.
pub struct Future<T> {
    pub(crate) cell: Arc<Cell<T>>,
}

impl<T> Future<T> {
    pub(crate) fn from_cell(cell: Arc<Cell<T>>) -> Self {
        Self { cell }
    }

    /// Creates a future that has already succeeded with `value`.
    pub fn completed(value: T) -> Self {
        Self::from_cell(Arc::new(Cell::done(Ok(value))))
    }

    /// Creates a future that has already failed with `failure`.
    pub fn failed(failure: impl Into<Failure>) -> Self {
        Self::from_cell(Arc::new(Cell::done(Err(failure.into()))))
    }

    /// Returns `true` once the future has succeeded or failed.
    pub fn is_done(&self) -> bool {
        self.cell.status() != Status::Pending
    }

    /// Returns `true` if both handles refer to the same future.
    pub fn ptr_eq(&self, other: &Future<T>) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }

    /// Number of continuations still waiting on this future.
    pub fn pending_continuations(&self) -> usize {
        self.cell.pending_continuations()
    }
}

impl<T: Clone> Future<T> {
    /// Registers a raw continuation on the underlying cell.
    pub(crate) fn subscribe(&self, continuation: Continuation<T>) -> Option<ContinuationId> {
        self.cell.subscribe(continuation)
    }

    /// Registers a continuation and returns a back reference that can later
    /// detach it without keeping this future alive.
    pub(crate) fn subscribe_weak(&self, continuation: Continuation<T>) -> Option<Subscription<T>> {
        self.cell.subscribe(continuation).map(|id| Subscription {
            cell: Arc::downgrade(&self.cell),
            id,
        })
    }

    /// Blocks until the future completes or `timeout` elapses.
    ///
    /// # Errors
    ///
    /// - [`Error::Execution`] if the future failed;
    /// - [`Error::Timeout`] if it was still pending at the deadline.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use promissory::{ThreadPool, submit};
    /// use std::time::Duration;
    ///
    /// let pool = ThreadPool::fixed(2);
    /// let four = submit(&pool, || 3 + 1);
    ///
    /// assert_eq!(four.get(Duration::from_secs(1)).unwrap(), 4);
    /// # pool.shutdown();
    /// ```
    pub fn get(&self, timeout: Duration) -> Result<T> {
        // A deadline too far out to represent is no deadline at all.
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.wait();
        };

        match self.cell.wait_until(deadline) {
            Some(outcome) => unwrap_outcome(outcome),
            None => Err(Error::Timeout(timeout)),
        }
    }

    /// Blocks until the future completes.
    ///
    /// # Errors
    ///
    /// [`Error::Execution`] if the future failed.
    pub fn wait(&self) -> Result<T> {
        unwrap_outcome(self.cell.wait())
    }

    /// Returns the value without blocking, or `default` if the future is
    /// still pending.
    ///
    /// # Errors
    ///
    /// [`Error::Execution`] if the future already failed.
    pub fn get_now(&self, default: T) -> Result<T> {
        match self.cell.outcome() {
            Some(outcome) => unwrap_outcome(outcome),
            None => Ok(default),
        }
    }

    /// Returns a copy of the outcome, or `None` if the future is pending.
    pub fn peek(&self) -> Option<Outcome<T>> {
        self.cell.outcome()
    }
}

fn unwrap_outcome<T>(outcome: Outcome<T>) -> Result<T> {
    outcome.map_err(Error::Execution)
}

impl<T> Clone for Future<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T> fmt::Debug for Future<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.cell.status() {
            Status::Pending => "pending",
            Status::Succeeded => "succeeded",
            Status::Failed => "failed",
        };

        f.debug_struct("Future").field("state", &state).finish()
    }
}

/// Weak back reference from a combined future to one of its sources.
///
/// Holds the source cell weakly, so a combined future never keeps its
/// sources alive and no reference cycle can form through it.
pub(crate) struct Subscription<T> {
    cell: Weak<Cell<T>>,
    id: ContinuationId,
}

impl<T> Subscription<T> {
    /// Detaches the continuation if the source is still alive and pending.
    pub(crate) fn cancel(&self) {
        if let Some(cell) = self.cell.upgrade() {
            cell.unsubscribe(self.id);
        }
    }
}
