use crate::error::Failure;
use crate::executor::{Executor, Immediate};
use crate::future::{Future, Outcome, Promise, settle_on};

impl<T: Clone + Send + 'static> Future<T> {
    /// Replaces a failure with the value returned by `f`.
    ///
    /// A successful outcome passes through untouched. `f` runs on the thread
    /// that completes this future, so it should be short; use
    /// [`recover_on`](Self::recover_on) to move it to an executor.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use promissory::{Failure, ThreadPool, try_submit};
    /// use std::time::Duration;
    ///
    /// let pool = ThreadPool::fixed(1);
    /// let value = try_submit(&pool, || Err::<i32, _>(Failure::msg("boom")))
    ///     .recover(|_| -1);
    ///
    /// assert_eq!(value.get(Duration::from_secs(1)).unwrap(), -1);
    /// # pool.shutdown();
    /// ```
    pub fn recover<F>(&self, f: F) -> Future<T>
    where
        F: FnOnce(Failure) -> T + Send + 'static,
    {
        self.recover_on(&Immediate, f)
    }

    /// Like [`recover`](Self::recover), running `f` on `executor`.
    pub fn recover_on<F, E>(&self, executor: &E, f: F) -> Future<T>
    where
        F: FnOnce(Failure) -> T + Send + 'static,
        E: Executor + Clone + 'static,
    {
        let promise = Promise::new();
        let future = promise.future();
        let executor = executor.clone();

        self.subscribe(Box::new(move |outcome: &Outcome<T>| match outcome {
            Ok(value) => {
                let _ = promise.complete(value.clone());
            }
            Err(failure) => {
                let failure = failure.clone();
                settle_on(&executor, promise, move || Ok(f(failure)));
            }
        }));

        future
    }

    /// Maps either outcome to a new value.
    ///
    /// `f` runs on `executor` whether this future succeeded or failed, and
    /// the returned future succeeds with its result unless `f` panics.
    pub fn handle<U, F, E>(&self, executor: &E, f: F) -> Future<U>
    where
        U: Clone + Send + 'static,
        F: FnOnce(Outcome<T>) -> U + Send + 'static,
        E: Executor + Clone + 'static,
    {
        let promise = Promise::new();
        let future = promise.future();
        let executor = executor.clone();

        self.subscribe(Box::new(move |outcome: &Outcome<T>| {
            let outcome = outcome.clone();
            settle_on(&executor, promise, move || Ok(f(outcome)));
        }));

        future
    }
}
