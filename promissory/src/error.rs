//! Error types shared by futures, combinators and executors.
//!
//! Two layers are distinguished:
//! - [`Failure`] is the *content* of a failed future. It is type-erased and
//!   cheap to clone, so the same failure can be handed to every continuation
//!   attached to a future.
//! - [`Error`] is what the public API returns when an operation on a future
//!   or executor does not produce a value.

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by futures, promises and executors.
#[derive(Debug, Error)]
pub enum Error {
    /// The future was still pending when the deadline passed.
    #[error("future did not complete within {0:?}")]
    Timeout(Duration),

    /// The computation behind the future failed.
    #[error("execution failed: {0}")]
    Execution(Failure),

    /// A promise was completed a second time.
    #[error("future already completed")]
    AlreadyCompleted,

    /// The executor refused the job, usually because it was shut down or
    /// its backlog is full.
    #[error("executor rejected the job")]
    Rejected,
}

impl Error {
    /// Returns the underlying failure for [`Error::Execution`].
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Error::Execution(failure) => Some(failure),
            _ => None,
        }
    }

    /// Returns `true` if this error is a [`Error::Timeout`].
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }
}

/// The error carried by a failed future.
///
/// A `Failure` wraps any `std::error::Error` behind an `Arc`, so cloning it
/// is cheap and every observer of a future sees the same error instance.
///
/// Any error type converts into a `Failure` through [`From`], which lets
/// fallible user functions return `Result<T, E>` for their own `E`.
#[derive(Clone)]
pub struct Failure {
    inner: Arc<dyn StdError + Send + Sync + 'static>,
}

impl Failure {
    /// Creates a failure from a plain message.
    pub fn msg(message: impl fmt::Display) -> Self {
        Self::new(Message(message.to_string()))
    }

    /// Wraps an arbitrary error.
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(error),
        }
    }

    /// Builds a failure from a panic payload captured with
    /// [`std::panic::catch_unwind`].
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_owned()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_owned()
        };

        Self::new(Panicked(message))
    }

    /// Returns `true` if this failure was produced by a panic.
    pub fn is_panic(&self) -> bool {
        self.is::<Panicked>()
    }

    /// Returns `true` if the wrapped error is of type `E`.
    pub fn is<E: StdError + 'static>(&self) -> bool {
        self.inner.is::<E>()
    }

    /// Attempts to view the wrapped error as an `E`.
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }

    /// Returns `true` if both values share the same underlying error.
    pub fn ptr_eq(&self, other: &Failure) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Borrows the wrapped error.
    pub fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.inner
    }
}

impl<E> From<E> for Failure
where
    E: StdError + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Failure::new(error)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Failure").field(&self.inner).finish()
    }
}

/// Failure built from a bare message.
#[derive(Debug, Error)]
#[error("{0}")]
struct Message(String);

/// Failure built from a caught panic.
#[derive(Debug, Error)]
#[error("task panicked: {0}")]
struct Panicked(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("disk on fire")]
    struct DiskError;

    #[test]
    fn failure_keeps_concrete_type() {
        let failure = Failure::from(DiskError);

        assert!(failure.is::<DiskError>());
        assert!(failure.downcast_ref::<DiskError>().is_some());
        assert_eq!(failure.to_string(), "disk on fire");
    }

    #[test]
    fn clones_share_the_same_error() {
        let failure = Failure::msg("boom");
        let copy = failure.clone();

        assert!(failure.ptr_eq(&copy));
        assert_eq!(copy.to_string(), "boom");
    }

    #[test]
    fn panic_payloads_are_readable() {
        let payload = std::panic::catch_unwind(|| panic!("bad input")).unwrap_err();
        let failure = Failure::from_panic(payload);

        assert!(failure.is_panic());
        assert_eq!(failure.to_string(), "task panicked: bad input");
    }

    #[test]
    fn execution_error_exposes_failure() {
        let err = Error::Execution(Failure::msg("nope"));

        assert_eq!(err.failure().map(|f| f.to_string()), Some("nope".into()));
        assert!(!err.is_timeout());
        assert!(Error::Timeout(Duration::from_millis(5)).is_timeout());
    }
}
