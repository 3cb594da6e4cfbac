use super::cell::{Cell, Status};
use super::{Future, Outcome};
use crate::error::{Failure, Result};

use std::fmt;
use std::sync::Arc;

/// The write side of a [`Future`].
///
/// A promise completes its future exactly once. Clones of a promise write
/// to the same future, so whichever clone settles it first wins and every
/// later attempt returns [`Error::AlreadyCompleted`](crate::Error::AlreadyCompleted).
///
/// Dropping every promise of a pending future leaves it pending forever.
///
/// # Examples
///
/// ```rust
/// use promissory::{Error, Promise};
///
/// let promise = Promise::new();
/// let future = promise.future();
///
/// promise.complete("done").unwrap();
/// assert!(matches!(promise.complete("again"), Err(Error::AlreadyCompleted)));
/// assert_eq!(future.get_now("pending").unwrap(), "done");
/// ```
pub struct Promise<T> {
    cell: Arc<Cell<T>>,
}

impl<T> Promise<T> {
    /// Creates a promise with a pending future.
    pub fn new() -> Self {
        Self {
            cell: Arc::new(Cell::pending()),
        }
    }

    /// Returns a handle to the future this promise completes.
    pub fn future(&self) -> Future<T> {
        Future::from_cell(self.cell.clone())
    }

    /// Returns `true` once the future has been completed.
    pub fn is_done(&self) -> bool {
        self.cell.status() != Status::Pending
    }
}

impl<T: Clone + 'static> Promise<T> {
    /// Completes the future with `value`.
    pub fn complete(&self, value: T) -> Result<()> {
        self.cell.settle(Ok(value))
    }

    /// Fails the future with `failure`.
    pub fn fail(&self, failure: impl Into<Failure>) -> Result<()> {
        self.cell.settle(Err(failure.into()))
    }

    /// Completes the future with a ready-made outcome.
    pub fn settle(&self, outcome: Outcome<T>) -> Result<()> {
        self.cell.settle(outcome)
    }
}

/// Creates a pending future together with its promise.
pub fn pending<T>() -> (Promise<T>, Future<T>) {
    let promise = Promise::new();
    let future = promise.future();
    (promise, future)
}

impl<T> Clone for Promise<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T> Default for Promise<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("done", &self.is_done())
            .finish()
    }
}
