use promissory::{
    Error, Failure, Immediate, Outcome, ThreadPool, future_of, pending, submit, submit_void,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

#[test]
fn test_map_transforms_value() {
    let pool = ThreadPool::fixed(2);

    let upper = submit(&pool, || "Terminado".to_owned()).map(&pool, |s| s.to_uppercase());

    assert_eq!(upper.get(TIMEOUT).unwrap(), "TERMINADO");
    pool.shutdown_and_join();
}

#[test]
fn test_map_short_circuits_on_failure() {
    let pool = ThreadPool::fixed(2);
    let calls = Arc::new(AtomicUsize::new(0));

    let (promise, source) = pending::<i32>();

    let c = calls.clone();
    let mapped = source.map(&pool, move |v| {
        c.fetch_add(1, Ordering::SeqCst);
        v * 2
    });

    promise.fail(Failure::msg("Error en el futuro")).unwrap();

    let err = mapped.get(TIMEOUT).unwrap_err();
    assert_eq!(err.failure().unwrap().to_string(), "Error en el futuro");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    pool.shutdown_and_join();
}

#[test]
fn test_map_failure_is_the_same_instance() {
    let pool = ThreadPool::fixed(1);
    let failure = Failure::msg("shared");

    let (promise, source) = pending::<i32>();
    let mapped = source.map(&pool, |v| v + 1);
    promise.fail(failure.clone()).unwrap();

    match mapped.get(TIMEOUT) {
        Err(Error::Execution(seen)) => assert!(seen.ptr_eq(&failure)),
        other => panic!("unexpected result: {:?}", other),
    }
    pool.shutdown_and_join();
}

#[test]
fn test_try_map_error_fails_result() {
    let pool = ThreadPool::fixed(1);

    let parsed = submit(&pool, || "not a number".to_owned())
        .try_map(&pool, |s| s.parse::<i32>());

    let err = parsed.get(TIMEOUT).unwrap_err();
    assert!(err.failure().unwrap().is::<std::num::ParseIntError>());
    pool.shutdown_and_join();
}

#[test]
fn test_map_panic_fails_result_and_spares_worker() {
    let pool = ThreadPool::fixed(1);

    let broken = submit(&pool, || 1).map(&pool, |_| -> i32 { panic!("mapper blew up") });

    assert!(broken.get(TIMEOUT).unwrap_err().failure().unwrap().is_panic());
    assert_eq!(submit(&pool, || 2).get(TIMEOUT).unwrap(), 2);
    pool.shutdown_and_join();
}

#[test]
fn test_map_attached_after_completion_still_fires() {
    let pool = ThreadPool::fixed(1);

    let source = submit(&pool, || 20);
    source.get(TIMEOUT).unwrap();

    let late = source.map(&pool, |v| v + 1);

    assert_eq!(late.get(TIMEOUT).unwrap(), 21);
    pool.shutdown_and_join();
}

#[test]
fn test_map_runs_on_pool_thread() {
    let pool = ThreadPool::builder()
        .worker_threads(1)
        .thread_name("mapper")
        .build();

    let name = submit(&pool, || ())
        .map(&pool, |_| thread::current().name().map(str::to_owned));

    assert_eq!(name.get(TIMEOUT).unwrap().as_deref(), Some("mapper-0"));
    pool.shutdown_and_join();
}

#[test]
fn test_map_with_immediate_runs_on_completing_thread() {
    let (promise, source) = pending::<u32>();

    let thread_id = source.map(&Immediate, |_| thread::current().id());
    promise.complete(1).unwrap();

    assert_eq!(thread_id.get_now(thread::current().id()).unwrap(), thread::current().id());
    assert!(thread_id.is_done());
}

#[test]
fn test_flat_map_adopts_inner_outcome() {
    let pool = ThreadPool::fixed(2);

    let inner_pool = pool.clone();
    let composed = submit(&pool, || "Terminado".to_owned()).flat_map(&pool, move |s| {
        submit(&inner_pool, move || s + " + Terminado other")
    });

    assert_eq!(composed.get(TIMEOUT).unwrap(), "Terminado + Terminado other");
    pool.shutdown_and_join();
}

#[test]
fn test_flat_map_propagates_inner_failure() {
    let pool = ThreadPool::fixed(2);

    let (inner, inner_future) = pending::<i32>();
    let composed = submit(&pool, || 1).flat_map(&pool, move |_| inner_future);

    inner.fail(Failure::msg("inner failed")).unwrap();

    let err = composed.get(TIMEOUT).unwrap_err();
    assert_eq!(err.failure().unwrap().to_string(), "inner failed");
    pool.shutdown_and_join();
}

#[test]
fn test_for_each_consumes_value() {
    let pool = ThreadPool::fixed(2);
    let seen = Arc::new(Mutex::new(None));

    let s = seen.clone();
    let done = submit(&pool, || "Terminado".to_owned()).for_each(&pool, move |value| {
        *s.lock().unwrap() = Some(value);
    });

    done.get(TIMEOUT).unwrap();
    assert_eq!(seen.lock().unwrap().as_deref(), Some("Terminado"));
    pool.shutdown_and_join();
}

#[test]
fn test_then_run_after_void_future() {
    let pool = ThreadPool::fixed(2);
    let order = Arc::new(Mutex::new(Vec::new()));

    let first = order.clone();
    let second = order.clone();

    let done = submit_void(&pool, move || first.lock().unwrap().push("runAsync"))
        .then_run(&pool, move || second.lock().unwrap().push("thenRun"));

    done.get(TIMEOUT).unwrap();
    assert_eq!(*order.lock().unwrap(), vec!["runAsync", "thenRun"]);
    pool.shutdown_and_join();
}

#[test]
fn test_when_complete_sees_both_outcomes() {
    let pool = ThreadPool::fixed(2);
    let seen = Arc::new(Mutex::new(Vec::new()));

    let s = seen.clone();
    let ok = submit(&pool, || 5).when_complete(&pool, move |outcome: &Outcome<i32>| {
        s.lock().unwrap().push(outcome.as_ref().ok().copied());
    });

    let s = seen.clone();
    let (promise, failing) = pending::<i32>();
    let failed = failing.when_complete(&pool, move |outcome: &Outcome<i32>| {
        s.lock().unwrap().push(outcome.as_ref().ok().copied());
    });
    promise.fail(Failure::msg("Error en el futuro 3")).unwrap();

    assert_eq!(ok.get(TIMEOUT).unwrap(), 5);
    assert!(failed.get(TIMEOUT).is_err());

    let mut seen = seen.lock().unwrap().clone();
    seen.sort();
    assert_eq!(seen, vec![None, Some(5)]);
    pool.shutdown_and_join();
}

#[test]
fn test_when_complete_panic_replaces_success() {
    let pool = ThreadPool::fixed(1);

    let observed = submit(&pool, || 1).when_complete(&pool, |_: &Outcome<i32>| panic!("observer"));

    assert!(observed.get(TIMEOUT).unwrap_err().failure().unwrap().is_panic());
    pool.shutdown_and_join();
}

#[test]
fn test_long_chain_completes() {
    let pool = ThreadPool::fixed(2);

    let mut future = submit(&pool, || 0u64);
    for _ in 0..1000 {
        future = future.map(&pool, |v| v + 1);
    }

    assert_eq!(future.get(TIMEOUT).unwrap(), 1000);
    pool.shutdown_and_join();
}

#[test]
fn test_long_failing_chain_propagates_failure() {
    let pool = ThreadPool::fixed(2);
    let (promise, source) = pending::<u64>();

    let mut future = source;
    for _ in 0..100_000 {
        future = future.map(&pool, |v| v + 1);
    }

    promise.fail(Failure::msg("boom")).unwrap();

    let err = future.get(TIMEOUT).unwrap_err();
    assert_eq!(err.failure().unwrap().to_string(), "boom");
    pool.shutdown_and_join();
}

#[test]
fn test_long_immediate_chain_completes() {
    let (promise, source) = pending::<u64>();

    let mut future = source;
    for _ in 0..100_000 {
        future = future.map(&Immediate, |v| v + 1);
    }

    promise.complete(0).unwrap();

    assert_eq!(future.get_now(0).unwrap(), 100_000);
}

#[test]
fn test_long_flat_map_chain_adopts_innermost_outcome() {
    let (promise, innermost) = pending::<u64>();

    let mut future = innermost;
    for _ in 0..100_000 {
        let inner = future;
        future = future_of(()).flat_map(&Immediate, move |_| inner);
    }

    promise.complete(7).unwrap();

    assert_eq!(future.get(TIMEOUT).unwrap(), 7);
}

#[test]
fn test_long_flat_map_chain_propagates_failure() {
    let (promise, innermost) = pending::<u64>();

    let mut future = innermost;
    for _ in 0..100_000 {
        let inner = future;
        future = future_of(()).flat_map(&Immediate, move |_| inner);
    }

    promise.fail(Failure::msg("innermost failed")).unwrap();

    let err = future.get(TIMEOUT).unwrap_err();
    assert_eq!(err.failure().unwrap().to_string(), "innermost failed");
}

#[test]
fn test_continuations_survive_dropped_handles() {
    let pool = ThreadPool::fixed(2);
    let (tx, rx) = std::sync::mpsc::channel();

    {
        let source = submit(&pool, || 41);
        let _ = source.map(&pool, |v| v + 1).for_each(&pool, move |v| {
            let _ = tx.send(v);
        });
    }

    assert_eq!(rx.recv_timeout(TIMEOUT).unwrap(), 42);
    pool.shutdown_and_join();
}
