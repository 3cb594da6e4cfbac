use crate::error::Failure;
use crate::executor::Executor;
use crate::future::{Future, Outcome, Promise, settle_on};

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Shared state of a [`zip`] waiting for its two sources.
struct Zip<A, B, U, F, E> {
    left: Mutex<Option<A>>,
    right: Mutex<Option<B>>,

    /// Sources that have not succeeded yet. The source bringing it to zero
    /// runs the combining function.
    remaining: AtomicUsize,

    f: Mutex<Option<F>>,
    promise: Promise<U>,
    executor: E,
}

impl<A, B, U, F, E> Zip<A, B, U, F, E>
where
    A: Send + 'static,
    B: Send + 'static,
    U: Clone + Send + 'static,
    F: FnOnce(A, B) -> U + Send + 'static,
    E: Executor,
{
    fn arrive(&self) {
        if self.remaining.fetch_sub(1, Ordering::AcqRel) != 1 {
            return;
        }

        let (Some(a), Some(b), Some(f)) = (
            self.left.lock().take(),
            self.right.lock().take(),
            self.f.lock().take(),
        ) else {
            return;
        };

        settle_on(&self.executor, self.promise.clone(), move || Ok(f(a, b)));
    }

    /// First failure wins; a later one finds the promise settled.
    fn fail(&self, failure: &Failure) {
        let _ = self.promise.fail(failure.clone());
    }
}

/// Combines the values of two futures once both succeed.
///
/// The returned future stays pending until both sources are complete. If
/// either fails, it fails with the first failure observed and `f` is never
/// called. Otherwise `f(a, b)` runs on `executor`.
///
/// # Examples
///
/// ```rust
/// use promissory::{ThreadPool, submit, zip};
/// use std::time::Duration;
///
/// let pool = ThreadPool::fixed(2);
/// let a = submit(&pool, || "Done".to_owned());
/// let b = submit(&pool, || " + done other".to_owned());
///
/// let both = zip(&pool, &a, &b, |a, b| a + &b);
/// assert_eq!(both.get(Duration::from_secs(1)).unwrap(), "Done + done other");
/// # pool.shutdown();
/// ```
pub fn zip<A, B, U, F, E>(executor: &E, left: &Future<A>, right: &Future<B>, f: F) -> Future<U>
where
    A: Clone + Send + 'static,
    B: Clone + Send + 'static,
    U: Clone + Send + 'static,
    F: FnOnce(A, B) -> U + Send + 'static,
    E: Executor + Clone + 'static,
{
    let promise = Promise::new();
    let future = promise.future();

    let zip = Arc::new(Zip {
        left: Mutex::new(None),
        right: Mutex::new(None),
        remaining: AtomicUsize::new(2),
        f: Mutex::new(Some(f)),
        promise,
        executor: executor.clone(),
    });

    let state = zip.clone();
    left.subscribe(Box::new(move |outcome: &Outcome<A>| match outcome {
        Ok(value) => {
            *state.left.lock() = Some(value.clone());
            state.arrive();
        }
        Err(failure) => state.fail(failure),
    }));

    let state = zip;
    right.subscribe(Box::new(move |outcome: &Outcome<B>| match outcome {
        Ok(value) => {
            *state.right.lock() = Some(value.clone());
            state.arrive();
        }
        Err(failure) => state.fail(failure),
    }));

    future
}

/// Consumes the values of two futures once both succeed.
pub fn accept_both<A, B, F, E>(executor: &E, left: &Future<A>, right: &Future<B>, f: F) -> Future<()>
where
    A: Clone + Send + 'static,
    B: Clone + Send + 'static,
    F: FnOnce(A, B) + Send + 'static,
    E: Executor + Clone + 'static,
{
    zip(executor, left, right, f)
}

/// Runs `f` once both futures succeed.
pub fn run_after_both<A, B, F, E>(
    executor: &E,
    left: &Future<A>,
    right: &Future<B>,
    f: F,
) -> Future<()>
where
    A: Clone + Send + 'static,
    B: Clone + Send + 'static,
    F: FnOnce() + Send + 'static,
    E: Executor + Clone + 'static,
{
    zip(executor, left, right, move |_, _| f())
}
