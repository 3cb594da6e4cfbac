use super::Outcome;
use crate::error::{Error, Result};

use parking_lot::{Condvar, Mutex};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::mem;
use std::time::Instant;

/// Callback fired once with the outcome of a cell.
pub(crate) type Continuation<T> = Box<dyn FnOnce(&Outcome<T>) + Send + 'static>;

/// Identifies a continuation registered on a [`Cell`].
///
/// Ids are handed out in registration order and never reused within a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ContinuationId(u64);

/// Coarse view of a cell's state that does not copy the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Status {
    Pending,
    Succeeded,
    Failed,
}

/// Lifecycle of a cell: `Pending` → `Done`, exactly once.
enum State<T> {
    Pending {
        /// Registered continuations, in registration order.
        continuations: Vec<(ContinuationId, Continuation<T>)>,
        next_id: u64,
    },
    Done(Outcome<T>),
}

/// A batch of continuations together with the outcome they receive.
type Batch = Box<dyn FnOnce()>;

thread_local! {
    /// Batches waiting to fire on this thread. `Some` while a drain loop is
    /// running further up the stack.
    static BATCHES: RefCell<Option<VecDeque<Batch>>> = const { RefCell::new(None) };
}

/// Clears the drain marker when the outermost drain loop exits, panics
/// included, so the thread never stays stuck in queueing mode.
struct Draining;

impl Drop for Draining {
    fn drop(&mut self) {
        let left = BATCHES.with(|batches| batches.borrow_mut().take());

        if let Some(left) = left.filter(|left| !left.is_empty()) {
            log::error!("dropping {} continuation batch(es) after a panic", left.len());
        }
    }
}

/// Runs `batch`, or queues it if this thread is already draining.
fn fire(batch: Batch) {
    let batch = BATCHES.with(|batches| {
        let mut batches = batches.borrow_mut();

        match batches.as_mut() {
            Some(queue) => {
                queue.push_back(batch);
                None
            }
            None => {
                *batches = Some(VecDeque::new());
                Some(batch)
            }
        }
    });

    let Some(batch) = batch else {
        return;
    };

    let _draining = Draining;
    batch();

    while let Some(next) = next_batch() {
        next();
    }
}

fn next_batch() -> Option<Batch> {
    BATCHES.with(|batches| batches.borrow_mut().as_mut()?.pop_front())
}

/// Single-assignment slot shared by a future, its promise and every
/// continuation attached to it.
///
/// The state and the continuation list sit behind the same lock. A
/// registration racing with completion therefore either lands in the list
/// before it is taken, or observes `Done` and fires on the spot; it is never
/// lost and never fired twice.
pub(crate) struct Cell<T> {
    state: Mutex<State<T>>,

    /// Signalled once, on the transition to `Done`.
    done: Condvar,
}

impl<T> Cell<T> {
    pub(crate) fn pending() -> Self {
        Self {
            state: Mutex::new(State::Pending {
                continuations: Vec::new(),
                next_id: 0,
            }),
            done: Condvar::new(),
        }
    }

    pub(crate) fn done(outcome: Outcome<T>) -> Self {
        Self {
            state: Mutex::new(State::Done(outcome)),
            done: Condvar::new(),
        }
    }

    pub(crate) fn status(&self) -> Status {
        match &*self.state.lock() {
            State::Pending { .. } => Status::Pending,
            State::Done(Ok(_)) => Status::Succeeded,
            State::Done(Err(_)) => Status::Failed,
        }
    }

    /// Removes a continuation that has not fired yet.
    ///
    /// Returns `true` if it was found.
    pub(crate) fn unsubscribe(&self, id: ContinuationId) -> bool {
        let mut state = self.state.lock();

        match &mut *state {
            State::Pending { continuations, .. } => {
                let before = continuations.len();
                continuations.retain(|(registered, _)| *registered != id);
                continuations.len() != before
            }
            State::Done(_) => false,
        }
    }

    /// Number of continuations waiting for the outcome.
    pub(crate) fn pending_continuations(&self) -> usize {
        match &*self.state.lock() {
            State::Pending { continuations, .. } => continuations.len(),
            State::Done(_) => 0,
        }
    }
}

impl<T: Clone + 'static> Cell<T> {
    /// Transitions the cell to `Done`.
    ///
    /// Blocked readers are woken and continuations are fired on the calling
    /// thread, in registration order, after the lock has been released. A
    /// settle reached from inside another cell's continuations only queues
    /// its batch; the outermost settle on the thread runs it, so a chain of
    /// futures unwinds iteratively instead of one stack frame per link.
    ///
    /// Returns [`Error::AlreadyCompleted`] if the cell was already done; the
    /// stored outcome is left untouched and nothing fires.
    pub(crate) fn settle(&self, outcome: Outcome<T>) -> Result<()> {
        let mut state = self.state.lock();

        let continuations = match &mut *state {
            State::Done(_) => return Err(Error::AlreadyCompleted),
            State::Pending { continuations, .. } => mem::take(continuations),
        };

        *state = State::Done(outcome.clone());
        drop(state);

        self.done.notify_all();

        log::trace!(
            "future {} with {} continuation(s)",
            if outcome.is_ok() { "succeeded" } else { "failed" },
            continuations.len()
        );

        if !continuations.is_empty() {
            fire(Box::new(move || {
                for (_, continuation) in continuations {
                    continuation(&outcome);
                }
            }));
        }

        Ok(())
    }
}

impl<T: Clone> Cell<T> {
    /// Registers a continuation.
    ///
    /// If the cell is still pending, the continuation is stored and its id is
    /// returned. Otherwise it runs immediately on the calling thread and
    /// `None` is returned.
    pub(crate) fn subscribe(&self, continuation: Continuation<T>) -> Option<ContinuationId> {
        let mut state = self.state.lock();

        let outcome = match &mut *state {
            State::Pending {
                continuations,
                next_id,
            } => {
                let id = ContinuationId(*next_id);
                *next_id += 1;
                continuations.push((id, continuation));
                return Some(id);
            }
            State::Done(outcome) => outcome.clone(),
        };

        drop(state);
        continuation(&outcome);
        None
    }

    /// Returns a copy of the outcome if the cell is done.
    pub(crate) fn outcome(&self) -> Option<Outcome<T>> {
        match &*self.state.lock() {
            State::Done(outcome) => Some(outcome.clone()),
            State::Pending { .. } => None,
        }
    }

    /// Blocks until the cell is done.
    pub(crate) fn wait(&self) -> Outcome<T> {
        let mut state = self.state.lock();

        loop {
            if let State::Done(outcome) = &*state {
                return outcome.clone();
            }

            self.done.wait(&mut state);
        }
    }

    /// Blocks until the cell is done or `deadline` passes.
    ///
    /// Returns `None` if the cell is still pending at the deadline.
    pub(crate) fn wait_until(&self, deadline: Instant) -> Option<Outcome<T>> {
        let mut state = self.state.lock();

        loop {
            if let State::Done(outcome) = &*state {
                return Some(outcome.clone());
            }

            if self.done.wait_until(&mut state, deadline).timed_out() {
                return match &*state {
                    State::Done(outcome) => Some(outcome.clone()),
                    State::Pending { .. } => None,
                };
            }
        }
    }
}
