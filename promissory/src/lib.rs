//! # Promissory
//!
//! **Promissory** provides single-assignment futures and promises for
//! thread-based code, together with a callback combinator engine and a
//! configurable worker pool to run it on.
//!
//! A [`Future`] is a shared handle to a result that does not exist yet. It
//! completes exactly once, with a value or a [`Failure`], through its
//! [`Promise`]. Instead of blocking on it, callers usually attach
//! continuations that run on an [`Executor`] when the result arrives:
//!
//! - **chaining**: `map`, `flat_map`, `for_each`, `then_run`, `when_complete`
//! - **recovery**: `recover`, `handle`
//! - **two sources**: [`zip`], [`race`] and their `accept`/`run` variants
//! - **many sources**: [`join_all`], [`collect_all`], [`race_any`]
//!
//! Blocking is still available through [`Future::get`] (with a timeout),
//! [`Future::wait`] and the non-blocking [`Future::get_now`].
//!
//! ## Quick Start
//!
//! ```rust
//! use promissory::{ThreadPool, submit, zip};
//! use std::time::Duration;
//!
//! let pool = ThreadPool::fixed(4);
//!
//! let a = submit(&pool, || 3 + 1);
//! let b = submit(&pool, || 10);
//! let sum = zip(&pool, &a, &b, |a, b| a + b);
//!
//! assert_eq!(sum.get(Duration::from_secs(1)).unwrap(), 14);
//!
//! pool.shutdown_and_join();
//! ```
//!
//! ## Modules
//!
//! - [`future`]: Futures, promises and constructors
//! - [`combinator`]: Chaining and combining futures
//! - [`executor`]: The executor trait, the thread pool and its builder
//!
//! ## Failures
//!
//! User functions may panic or, in the `try_` variants, return an error:
//! either way the resulting future fails and the worker thread carries on.
//! A failure nobody observes is lost, so keep a handle or end the chain with
//! [`Future::handle`] or [`Future::when_complete`] when it matters.

mod error;

pub mod combinator;
pub mod executor;
pub mod future;

pub use combinator::{
    accept_both, accept_either, collect_all, join_all, race, race_any, run_after_both,
    run_after_either, zip,
};
pub use error::{Error, Failure, Result};
pub use executor::{Executor, Immediate, Job, ThreadPool, ThreadPoolBuilder};
pub use future::{
    Future, Outcome, Promise, future_of, pending, submit, submit_void, try_submit,
};
