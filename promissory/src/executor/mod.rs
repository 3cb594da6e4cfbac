//! Executors that run submitted jobs.
//!
//! The future engine only depends on the [`Executor`] trait: a job goes in,
//! and it runs at some later point on some thread. Nothing comes back out of
//! `execute` except the admission decision.
//!
//! Two implementations are provided:
//! - [`ThreadPool`]: a pool of worker threads with a fixed or elastic sizing
//!   policy. Jobs never run on the submitting thread.
//! - [`Immediate`]: runs the job right away on the calling thread. Used for
//!   continuations that should run on whichever thread completes a future.

mod builder;
mod pool;
mod queue;
mod worker;

pub use builder::ThreadPoolBuilder;
pub use pool::ThreadPool;

use crate::error::Result;

use std::sync::Arc;

/// A unit of work accepted by an [`Executor`].
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Something that can run jobs.
///
/// Implementations must either accept the job (and eventually run it exactly
/// once) or return [`Error::Rejected`](crate::Error::Rejected) and drop it
/// without running it.
pub trait Executor: Send + Sync {
    /// Submits `job` for execution.
    fn execute(&self, job: Job) -> Result<()>;
}

impl<E: Executor + ?Sized> Executor for Arc<E> {
    fn execute(&self, job: Job) -> Result<()> {
        (**self).execute(job)
    }
}

impl<E: Executor + ?Sized> Executor for &E {
    fn execute(&self, job: Job) -> Result<()> {
        (**self).execute(job)
    }
}

/// Executor that runs every job inline, on the thread that submits it.
///
/// When used as the executor of a combinator, the user function runs on the
/// thread that completed the source future (or on the attaching thread, if
/// the source was already complete). That thread is blocked until the
/// whole chain behind it has run, so prefer a [`ThreadPool`] for anything
/// but short callbacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Immediate;

impl Executor for Immediate {
    fn execute(&self, job: Job) -> Result<()> {
        job();
        Ok(())
    }
}
