use super::race_any;
use crate::executor::Executor;
use crate::future::Future;

/// Applies `f` to the value of whichever of two futures completes first.
///
/// Exactly one source wins. If the winner failed, the returned future fails
/// with its failure and `f` is not called; the other source's outcome is
/// discarded either way. `f` runs on `executor`.
///
/// # Examples
///
/// ```rust
/// use promissory::{Promise, ThreadPool, race};
/// use std::time::Duration;
///
/// let pool = ThreadPool::fixed(2);
/// let slow = Promise::new();
/// let fast = Promise::new();
///
/// let first = race(&pool, &slow.future(), &fast.future(), |s: &str| s.to_uppercase());
/// fast.complete("first").unwrap();
/// slow.complete("second").unwrap();
///
/// assert_eq!(first.get(Duration::from_secs(1)).unwrap(), "FIRST");
/// # pool.shutdown();
/// ```
pub fn race<T, U, F, E>(executor: &E, left: &Future<T>, right: &Future<T>, f: F) -> Future<U>
where
    T: Clone + Send + 'static,
    U: Clone + Send + 'static,
    F: FnOnce(T) -> U + Send + 'static,
    E: Executor + Clone + 'static,
{
    race_any(&[left.clone(), right.clone()]).map(executor, f)
}

/// Consumes the value of whichever of two futures completes first.
pub fn accept_either<T, F, E>(executor: &E, left: &Future<T>, right: &Future<T>, f: F) -> Future<()>
where
    T: Clone + Send + 'static,
    F: FnOnce(T) + Send + 'static,
    E: Executor + Clone + 'static,
{
    race(executor, left, right, f)
}

/// Runs `f` once the first of two futures completes successfully.
pub fn run_after_either<T, F, E>(
    executor: &E,
    left: &Future<T>,
    right: &Future<T>,
    f: F,
) -> Future<()>
where
    T: Clone + Send + 'static,
    F: FnOnce() + Send + 'static,
    E: Executor + Clone + 'static,
{
    race(executor, left, right, move |_| f())
}
