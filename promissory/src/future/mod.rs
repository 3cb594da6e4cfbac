//! Single-assignment futures and their promises.
//!
//! This module defines the value side of the engine:
//! - the shared cell holding a pending, succeeded or failed outcome plus the
//!   continuations waiting for it,
//! - [`Future`], the read handle, with blocking and non-blocking retrieval,
//! - [`Promise`], the write-once completion capability,
//! - the constructors that start work on an [`Executor`](crate::Executor).
//!
//! Chaining and combining futures lives in [`combinator`](crate::combinator).

mod cell;
mod handle;
mod promise;
mod spawn;

pub(crate) use handle::Subscription;
pub(crate) use spawn::{run_on, settle_on};

pub use handle::Future;
pub use promise::{Promise, pending};
pub use spawn::{future_of, submit, submit_void, try_submit};

use crate::error::Failure;

/// Terminal state of a future: its value or its failure.
pub type Outcome<T> = Result<T, Failure>;
