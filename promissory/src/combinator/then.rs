use crate::error::Failure;
use crate::executor::Executor;
use crate::future::{Future, Outcome, Promise, run_on};

use std::panic::{self, AssertUnwindSafe};

impl<T: Clone + Send + 'static> Future<T> {
    /// Transforms the value with `f` once this future succeeds.
    ///
    /// `f` runs on `executor`. If this future fails, the returned future
    /// fails with the same failure and `f` is never called. A panic in `f`
    /// fails the returned future.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use promissory::{ThreadPool, submit};
    /// use std::time::Duration;
    ///
    /// let pool = ThreadPool::fixed(2);
    /// let shout = submit(&pool, || "done".to_owned()).map(&pool, |s| s.to_uppercase());
    ///
    /// assert_eq!(shout.get(Duration::from_secs(1)).unwrap(), "DONE");
    /// # pool.shutdown();
    /// ```
    pub fn map<U, F, E>(&self, executor: &E, f: F) -> Future<U>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
        E: Executor + Clone + 'static,
    {
        self.try_map(executor, move |value| Ok::<U, Failure>(f(value)))
    }

    /// Like [`map`](Self::map), with a fallible `f`.
    ///
    /// An `Err` returned by `f` fails the returned future.
    pub fn try_map<U, X, F, E>(&self, executor: &E, f: F) -> Future<U>
    where
        U: Clone + Send + 'static,
        X: Into<Failure>,
        F: FnOnce(T) -> Result<U, X> + Send + 'static,
        E: Executor + Clone + 'static,
    {
        self.on_success(executor, move |value, promise| {
            let _ = promise.settle(f(value).map_err(Into::into));
        })
    }

    /// Chains a computation that itself returns a future.
    ///
    /// The returned future adopts the outcome of the future produced by `f`,
    /// without nesting.
    pub fn flat_map<U, F, E>(&self, executor: &E, f: F) -> Future<U>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> Future<U> + Send + 'static,
        E: Executor + Clone + 'static,
    {
        self.on_success(executor, move |value, promise| {
            f(value).forward(promise.clone());
        })
    }

    /// Consumes the value with `f` once this future succeeds.
    pub fn for_each<F, E>(&self, executor: &E, f: F) -> Future<()>
    where
        F: FnOnce(T) + Send + 'static,
        E: Executor + Clone + 'static,
    {
        self.map(executor, f)
    }

    /// Runs `f` once this future succeeds, ignoring the value.
    pub fn then_run<F, E>(&self, executor: &E, f: F) -> Future<()>
    where
        F: FnOnce() + Send + 'static,
        E: Executor + Clone + 'static,
    {
        self.map(executor, move |_| f())
    }

    /// Runs `f` with the outcome once this future completes either way.
    ///
    /// The returned future completes with the same outcome as this one,
    /// after `f` returned. If `f` panics while this future succeeded, the
    /// returned future fails with the panic instead; a failure of this
    /// future always wins over a panic in `f`.
    pub fn when_complete<F, E>(&self, executor: &E, f: F) -> Future<T>
    where
        F: FnOnce(&Outcome<T>) + Send + 'static,
        E: Executor + Clone + 'static,
    {
        let promise = Promise::new();
        let future = promise.future();
        let executor = executor.clone();

        self.subscribe(Box::new(move |outcome: &Outcome<T>| {
            let outcome = outcome.clone();

            run_on(&executor, promise, move |promise| {
                let observed = panic::catch_unwind(AssertUnwindSafe(|| f(&outcome)));

                let outcome = match (outcome, observed) {
                    (Ok(_), Err(payload)) => Err(Failure::from_panic(payload)),
                    (outcome, _) => outcome,
                };

                let _ = promise.settle(outcome);
            });
        }));

        future
    }

    /// Settles `promise` with the outcome of this future once known.
    pub(crate) fn forward(&self, promise: Promise<T>) {
        self.subscribe(Box::new(move |outcome: &Outcome<T>| {
            let _ = promise.settle(outcome.clone());
        }));
    }

    /// Runs `job` on `executor` with the value on success; propagates a
    /// failure to the returned future without calling `job`.
    fn on_success<U, E, J>(&self, executor: &E, job: J) -> Future<U>
    where
        U: Clone + Send + 'static,
        E: Executor + Clone + 'static,
        J: FnOnce(T, &Promise<U>) + Send + 'static,
    {
        let promise = Promise::new();
        let future = promise.future();
        let executor = executor.clone();

        self.subscribe(Box::new(move |outcome: &Outcome<T>| match outcome {
            Ok(value) => {
                let value = value.clone();
                run_on(&executor, promise, move |promise| job(value, promise));
            }
            Err(failure) => {
                let _ = promise.fail(failure.clone());
            }
        }));

        future
    }
}
