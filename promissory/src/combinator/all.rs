use crate::error::Failure;
use crate::future::{Future, Outcome, Promise, Subscription};

use parking_lot::Mutex;
use std::mem;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Fan-in state of [`join_all`] and [`collect_all`].
struct Gather<T, R> {
    /// Sources that have not completed yet, successfully or not.
    remaining: AtomicUsize,

    /// Values by source index, filled as sources succeed.
    values: Mutex<Vec<Option<T>>>,

    /// First failure observed.
    failure: Mutex<Option<Failure>>,

    promise: Promise<R>,
    finish: fn(Vec<Option<T>>) -> R,
}

impl<T, R> Gather<T, R>
where
    T: Clone + Send + 'static,
    R: Clone + Send + 'static,
{
    fn start(futures: &[Future<T>], keep_values: bool, finish: fn(Vec<Option<T>>) -> R) -> Future<R> {
        let promise = Promise::new();
        let future = promise.future();

        if futures.is_empty() {
            let _ = promise.complete(finish(Vec::new()));
            return future;
        }

        let slots = if keep_values { futures.len() } else { 0 };

        let gather = Arc::new(Gather {
            remaining: AtomicUsize::new(futures.len()),
            values: Mutex::new((0..slots).map(|_| None).collect()),
            failure: Mutex::new(None),
            promise,
            finish,
        });

        for (index, source) in futures.iter().enumerate() {
            let gather = gather.clone();

            source.subscribe(Box::new(move |outcome: &Outcome<T>| {
                gather.arrive(index, keep_values, outcome);
            }));
        }

        future
    }

    fn arrive(&self, index: usize, keep_values: bool, outcome: &Outcome<T>) {
        match outcome {
            Ok(value) if keep_values => self.values.lock()[index] = Some(value.clone()),
            Ok(_) => {}
            Err(failure) => {
                self.failure.lock().get_or_insert_with(|| failure.clone());
            }
        }

        if self.remaining.fetch_sub(1, Ordering::AcqRel) != 1 {
            return;
        }

        let outcome = match self.failure.lock().take() {
            Some(failure) => Err(failure),
            None => Ok((self.finish)(mem::take(&mut *self.values.lock()))),
        };

        let _ = self.promise.settle(outcome);
    }
}

/// Completes once every future in `futures` has completed.
///
/// The returned future never completes early: even after a failure it waits
/// for the remaining sources. It then fails with the first failure observed,
/// or succeeds if every source succeeded. An empty slice succeeds at once.
///
/// # Examples
///
/// ```rust
/// use promissory::{ThreadPool, join_all, submit};
/// use std::time::Duration;
///
/// let pool = ThreadPool::fixed(3);
/// let jobs: Vec<_> = (0..3).map(|i| submit(&pool, move || i * 2)).collect();
///
/// assert!(join_all(&jobs).get(Duration::from_secs(1)).is_ok());
/// # pool.shutdown();
/// ```
pub fn join_all<T>(futures: &[Future<T>]) -> Future<()>
where
    T: Clone + Send + 'static,
{
    Gather::start(futures, false, |_| ())
}

/// Like [`join_all`], yielding the values in input order.
pub fn collect_all<T>(futures: &[Future<T>]) -> Future<Vec<T>>
where
    T: Clone + Send + 'static,
{
    Gather::start(futures, true, |values| values.into_iter().flatten().collect())
}

/// Detach list of a [`race_any`], closed once a winner is picked.
struct Losers<T> {
    subscriptions: Vec<Subscription<T>>,
    closed: bool,
}

/// Shared state of a [`race_any`].
struct Race<T> {
    /// Claimed exactly once, by the first source to complete.
    won: AtomicBool,

    promise: Promise<T>,
    losers: Mutex<Losers<T>>,
}

impl<T: Clone + Send + 'static> Race<T> {
    fn arrive(&self, outcome: &Outcome<T>) {
        if self
            .won
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        let _ = self.promise.settle(outcome.clone());

        let subscriptions = {
            let mut losers = self.losers.lock();
            losers.closed = true;
            mem::take(&mut losers.subscriptions)
        };

        for subscription in subscriptions {
            subscription.cancel();
        }
    }

    fn track(&self, subscription: Subscription<T>) {
        let mut losers = self.losers.lock();

        if losers.closed {
            drop(losers);
            subscription.cancel();
        } else {
            losers.subscriptions.push(subscription);
        }
    }
}

/// Completes with the outcome of whichever future in `futures` completes
/// first, success or failure.
///
/// Exactly one source wins, even when several complete at the same
/// instant. Once it does, the race detaches from the others, so long-lived
/// losers do not accumulate dead continuations. Sources are only referenced
/// weakly. An empty slice yields a future that never completes.
pub fn race_any<T>(futures: &[Future<T>]) -> Future<T>
where
    T: Clone + Send + 'static,
{
    let promise = Promise::new();
    let future = promise.future();

    let race = Arc::new(Race {
        won: AtomicBool::new(false),
        promise,
        losers: Mutex::new(Losers {
            subscriptions: Vec::new(),
            closed: false,
        }),
    });

    for source in futures {
        if race.won.load(Ordering::Acquire) {
            break;
        }

        let state = race.clone();
        let subscription = source.subscribe_weak(Box::new(move |outcome: &Outcome<T>| {
            state.arrive(outcome);
        }));

        if let Some(subscription) = subscription {
            race.track(subscription);
        }
    }

    future
}
