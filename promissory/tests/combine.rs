use promissory::{
    Failure, Future, Promise, ThreadPool, accept_both, accept_either, pending, race, race_any,
    run_after_both, run_after_either, submit, zip,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

#[test]
fn test_zip_combines_values() {
    let pool = ThreadPool::fixed(4);

    let a = submit(&pool, || "Terminado".to_owned());
    let b = submit(&pool, || " Terminado other".to_owned());

    let combined = zip(&pool, &a, &b, |s1, s2| s1 + &s2);

    assert_eq!(combined.get(TIMEOUT).unwrap(), "Terminado Terminado other");
    pool.shutdown_and_join();
}

#[test]
fn test_zip_waits_for_both_sources() {
    let pool = ThreadPool::fixed(2);

    let (p1, f1) = pending::<i32>();
    let (p2, f2) = pending::<&str>();

    let combined = zip(&pool, &f1, &f2, |n, s| format!("{}{}", n, s));

    p1.complete(1).unwrap();
    assert!(combined.get(Duration::from_millis(50)).unwrap_err().is_timeout());
    assert!(!combined.is_done());

    p2.complete("a").unwrap();
    assert_eq!(combined.get(TIMEOUT).unwrap(), "1a");
    pool.shutdown_and_join();
}

#[test]
fn test_zip_fails_if_either_source_fails() {
    let pool = ThreadPool::fixed(2);
    let calls = Arc::new(AtomicUsize::new(0));

    let (p1, f1) = pending::<i32>();
    let (p2, f2) = pending::<i32>();

    let c = calls.clone();
    let combined = zip(&pool, &f1, &f2, move |a, b| {
        c.fetch_add(1, Ordering::SeqCst);
        a + b
    });

    p2.fail(Failure::msg("right failed")).unwrap();
    p1.complete(1).unwrap();

    let err = combined.get(TIMEOUT).unwrap_err();
    assert_eq!(err.failure().unwrap().to_string(), "right failed");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    pool.shutdown_and_join();
}

#[test]
fn test_zip_both_failing_surfaces_one_failure() {
    let pool = ThreadPool::fixed(2);

    let left: Future<i32> = Future::failed(Failure::msg("left"));
    let right: Future<i32> = Future::failed(Failure::msg("right"));

    let combined = zip(&pool, &left, &right, |a, b| a + b);

    let message = combined.get(TIMEOUT).unwrap_err().failure().unwrap().to_string();
    assert!(message == "left" || message == "right");
    pool.shutdown_and_join();
}

#[test]
fn test_accept_both_and_run_after_both() {
    let pool = ThreadPool::fixed(4);
    let log = Arc::new(Mutex::new(Vec::new()));

    let a = submit(&pool, || "Terminado".to_owned());
    let b = submit(&pool, || "Terminado other".to_owned());

    let l = log.clone();
    let accepted = accept_both(&pool, &a, &b, move |s1, s2| {
        l.lock().unwrap().push(format!("{} {}", s1, s2));
    });

    let l = log.clone();
    let ran = run_after_both(&pool, &a, &b, move || {
        l.lock().unwrap().push("both done".to_owned());
    });

    accepted.get(TIMEOUT).unwrap();
    ran.get(TIMEOUT).unwrap();

    let mut log = log.lock().unwrap().clone();
    log.sort();
    assert_eq!(log, vec!["Terminado Terminado other", "both done"]);
    pool.shutdown_and_join();
}

#[test]
fn test_race_adopts_first_completer() {
    let pool = ThreadPool::fixed(2);

    let (p1, f1) = pending::<&str>();
    let (p2, f2) = pending::<&str>();

    let first = race(&pool, &f1, &f2, |s| s.to_uppercase());

    p2.complete("x").unwrap();
    assert_eq!(first.get(TIMEOUT).unwrap(), "X");

    p1.complete("y").unwrap();
    assert_eq!(first.get(TIMEOUT).unwrap(), "X");
    pool.shutdown_and_join();
}

#[test]
fn test_race_propagates_first_failure() {
    let pool = ThreadPool::fixed(2);

    let (p1, f1) = pending::<i32>();
    let (p2, f2) = pending::<i32>();

    let first = race(&pool, &f1, &f2, |v| v * 10);

    p1.fail(Failure::msg("fast failure")).unwrap();
    p2.complete(3).unwrap();

    let err = first.get(TIMEOUT).unwrap_err();
    assert_eq!(err.failure().unwrap().to_string(), "fast failure");
    pool.shutdown_and_join();
}

#[test]
fn test_race_with_real_work() {
    let pool = ThreadPool::fixed(2);

    let slow = submit(&pool, || {
        thread::sleep(Duration::from_millis(300));
        "Segundo"
    });
    let fast = submit(&pool, || {
        thread::sleep(Duration::from_millis(10));
        "Primero"
    });

    let first = race(&pool, &slow, &fast, |s| s.to_uppercase());

    assert_eq!(first.get(TIMEOUT).unwrap(), "PRIMERO");
    pool.shutdown_and_join();
}

#[test]
fn test_race_simultaneous_completion_picks_one_winner() {
    let pool = ThreadPool::fixed(4);
    let calls = Arc::new(AtomicUsize::new(0));

    for _ in 0..50 {
        let (p1, f1) = pending::<u8>();
        let (p2, f2) = pending::<u8>();

        let c = calls.clone();
        let winner = race(&pool, &f1, &f2, move |v| {
            c.fetch_add(1, Ordering::SeqCst);
            v
        });

        let t1 = thread::spawn(move || p1.complete(1).unwrap());
        let t2 = thread::spawn(move || p2.complete(2).unwrap());
        t1.join().unwrap();
        t2.join().unwrap();

        let value = winner.get(TIMEOUT).unwrap();
        assert!(value == 1 || value == 2);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 50);
    pool.shutdown_and_join();
}

#[test]
fn test_accept_either_and_run_after_either() {
    let pool = ThreadPool::fixed(2);
    let seen = Arc::new(Mutex::new(Vec::new()));

    let (p1, f1) = pending::<&str>();
    let (p2, f2) = pending::<&str>();

    let s = seen.clone();
    let accepted = accept_either(&pool, &f1, &f2, move |v| s.lock().unwrap().push(v));

    let s = seen.clone();
    let ran = run_after_either(&pool, &f1, &f2, move || s.lock().unwrap().push("ran"));

    p2.complete("Primero").unwrap();
    accepted.get(TIMEOUT).unwrap();
    ran.get(TIMEOUT).unwrap();

    p1.complete("Segundo").unwrap();

    let mut seen = seen.lock().unwrap().clone();
    seen.sort();
    assert_eq!(seen, vec!["Primero", "ran"]);
    pool.shutdown_and_join();
}

#[test]
fn test_race_any_adopts_first_of_many() {
    let promises: Vec<Promise<usize>> = (0..5).map(|_| Promise::new()).collect();
    let futures: Vec<_> = promises.iter().map(Promise::future).collect();

    let any = race_any(&futures);
    assert!(!any.is_done());

    promises[3].complete(3).unwrap();
    promises[0].complete(0).unwrap();

    assert_eq!(any.get(TIMEOUT).unwrap(), 3);
}

#[test]
fn test_race_any_adopts_failure() {
    let (p1, f1) = pending::<i32>();
    let (_p2, f2) = pending::<i32>();

    let any = race_any(&[f1, f2]);
    p1.fail(Failure::msg("first to finish")).unwrap();

    assert_eq!(
        any.get(TIMEOUT).unwrap_err().failure().unwrap().to_string(),
        "first to finish"
    );
}

#[test]
fn test_race_any_detaches_from_losers() {
    let (winner, winner_future) = pending::<i32>();
    let (_loser, loser_future) = pending::<i32>();

    let any = race_any(&[winner_future, loser_future.clone()]);
    assert_eq!(loser_future.pending_continuations(), 1);

    winner.complete(1).unwrap();

    assert_eq!(any.get(TIMEOUT).unwrap(), 1);
    assert_eq!(loser_future.pending_continuations(), 0);
}

#[test]
fn test_race_any_with_completed_source_skips_the_rest() {
    let (_pending, never) = pending::<i32>();

    let any = race_any(&[Future::completed(7), never.clone()]);

    assert_eq!(any.get_now(0).unwrap(), 7);
    assert_eq!(never.pending_continuations(), 0);
}

#[test]
fn test_race_any_empty_never_completes() {
    let any = race_any::<i32>(&[]);

    assert!(any.get(Duration::from_millis(20)).unwrap_err().is_timeout());
}
