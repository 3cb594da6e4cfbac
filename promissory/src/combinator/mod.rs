//! Combinators building new futures out of existing ones.
//!
//! Every combinator works the same way: it creates a fresh pending future,
//! registers a continuation on each source, and lets the continuation that
//! makes the result decidable perform the single transition. Nothing polls
//! and nothing blocks; attaching to a future that already completed fires
//! right away.
//!
//! Grouped by fan-in:
//! - one source, as methods on [`Future`](crate::Future): `map`, `try_map`,
//!   `flat_map`, `for_each`, `then_run`, `when_complete`, `recover`,
//!   `recover_on`, `handle`;
//! - two sources: [`zip`], [`accept_both`], [`run_after_both`], [`race`],
//!   [`accept_either`], [`run_after_either`];
//! - any number of sources: [`join_all`], [`collect_all`], [`race_any`].
//!
//! User functions run on the executor passed to the combinator. A panic
//! inside them fails the resulting future and never reaches the worker.

mod all;
mod both;
mod either;
mod recover;
mod then;

pub use all::{collect_all, join_all, race_any};
pub use both::{accept_both, run_after_both, zip};
pub use either::{accept_either, race, run_after_either};
