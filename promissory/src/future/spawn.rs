use super::{Future, Outcome, Promise};
use crate::error::Failure;
use crate::executor::Executor;

use std::panic::{self, AssertUnwindSafe};

/// Creates a future that has already succeeded with `value`.
///
/// No executor is involved.
pub fn future_of<T>(value: T) -> Future<T> {
    Future::completed(value)
}

/// Runs `work` on `executor` and returns a future of its result.
///
/// A panic inside `work` fails the future instead of reaching the worker.
/// If the executor rejects the job, the future fails with
/// [`Error::Rejected`](crate::Error::Rejected).
///
/// # Examples
///
/// ```rust
/// use promissory::{ThreadPool, submit};
/// use std::time::Duration;
///
/// let pool = ThreadPool::fixed(2);
/// let answer = submit(&pool, || 6 * 7);
///
/// assert_eq!(answer.get(Duration::from_secs(1)).unwrap(), 42);
/// # pool.shutdown();
/// ```
pub fn submit<T, F, E>(executor: &E, work: F) -> Future<T>
where
    T: Clone + Send + 'static,
    F: FnOnce() -> T + Send + 'static,
    E: Executor + ?Sized,
{
    let promise = Promise::new();
    let future = promise.future();

    settle_on(executor, promise, move || Ok(work()));
    future
}

/// Runs `work` on `executor` and returns a future that completes when it
/// returns.
pub fn submit_void<F, E>(executor: &E, work: F) -> Future<()>
where
    F: FnOnce() + Send + 'static,
    E: Executor + ?Sized,
{
    submit(executor, work)
}

/// Runs a fallible `work` on `executor`.
///
/// `Err` returned by `work` fails the future, as does a panic.
pub fn try_submit<T, X, F, E>(executor: &E, work: F) -> Future<T>
where
    T: Clone + Send + 'static,
    X: Into<Failure>,
    F: FnOnce() -> Result<T, X> + Send + 'static,
    E: Executor + ?Sized,
{
    let promise = Promise::new();
    let future = promise.future();

    settle_on(executor, promise, move || work().map_err(Into::into));
    future
}

/// Runs `job` on `executor` with access to `promise`.
///
/// The job is expected to settle the promise itself. A panic escaping the
/// job fails the promise, and so does a rejection by the executor; in both
/// cases a promise the job already settled is left as is.
pub(crate) fn run_on<T, E, J>(executor: &E, promise: Promise<T>, job: J)
where
    T: Clone + Send + 'static,
    E: Executor + ?Sized,
    J: FnOnce(&Promise<T>) + Send + 'static,
{
    let on_reject = promise.clone();

    let submitted = executor.execute(Box::new(move || {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| job(&promise))) {
            let _ = promise.fail(Failure::from_panic(payload));
        }
    }));

    if let Err(err) = submitted {
        let _ = on_reject.fail(err);
    }
}

/// Runs `job` on `executor` and settles `promise` with what it returns.
pub(crate) fn settle_on<T, E, J>(executor: &E, promise: Promise<T>, job: J)
where
    T: Clone + Send + 'static,
    E: Executor + ?Sized,
    J: FnOnce() -> Outcome<T> + Send + 'static,
{
    run_on(executor, promise, move |promise| {
        let _ = promise.settle(job());
    });
}
