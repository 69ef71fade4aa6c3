#![warn(missing_docs, rust_2018_idioms)]
//! A completion-once futures-and-promises core.
//!
//! A [`Promise<T>`](promise::Promise) is written to exactly once; its paired
//! [`Future<T>`](future::Future) is a unique, move-only handle consumed by
//! every operation performed on it, and [`SharedFuture<T>`](shared_future::SharedFuture)
//! is the cloneable, multi-read counterpart for fan-out. Every callback
//! registered on a core runs through the [`Executor`](executor::Executor)
//! it was built with — never inline on the thread that completes it, except
//! for the explicit opt-in [`InlineExecutor`](executor::InlineExecutor).
//!
//! ```
//! use std::sync::Arc;
//! use pledge::executor::InlineExecutor;
//! use pledge::promise::Promise;
//!
//! let executor = Arc::new(InlineExecutor::new());
//! let mut promise = Promise::<i32>::new(executor);
//! let future = promise.future();
//! promise.try_success(7);
//! assert_eq!(future.get().unwrap(), 7);
//! ```

/// The error taxonomy shared across every module in this crate.
pub mod error;
/// The executor abstraction every core dispatches callbacks through.
pub mod executor;
/// The tagged uninitialized/value/failure outcome a core completes with.
pub mod try_value;

/// The write-once, reference-counted shared state behind a promise/future
/// pair.
pub mod core;
/// The write-side handle over a core.
pub mod promise;

/// The unique, move-only read-side handle over a core.
pub mod future;
/// The cloneable, multi-read counterpart to `Future`.
pub mod shared_future;

/// Free-standing combinators: `async`, `first_n`, `first_n_succ`.
pub mod combinators;

pub use combinators::{first_n, first_n_succ, r#async};
pub use error::{Error, Result};
pub use executor::{Executor, InlineExecutor, ThreadPoolExecutor};
pub use future::Future;
pub use promise::Promise;
pub use shared_future::SharedFuture;
pub use try_value::Try;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn inline() -> Arc<dyn Executor> {
        Arc::new(InlineExecutor::new())
    }

    /// A dropped promise with no one else writing to its core fails the
    /// paired future with `BrokenPromise` (spec scenario: broken promise).
    #[test]
    fn broken_promise_end_to_end() {
        let mut promise = Promise::<i32>::new(inline());
        let future = promise.future();
        drop(promise);
        assert!(matches!(future.get(), Err(Error::BrokenPromise)));
    }

    /// A guard that the value satisfies passes the value through; one it
    /// doesn't fails with `PredicateNotFulfilled` (spec scenario: guard
    /// pass/fail).
    #[test]
    fn guard_pass_and_fail_end_to_end() {
        let ok = Future::successful(inline(), 10).guard(|v| *v > 0);
        assert_eq!(ok.get().unwrap(), 10);

        let err = Future::successful(inline(), -1).guard(|v| *v > 0);
        assert!(matches!(err.get(), Err(Error::PredicateNotFulfilled)));
    }

    /// `first_n` over a mix of successes and failures returns exactly the
    /// first `n` completions it observes, each tagged with its index among
    /// the inputs (spec scenario: first_n, indices a subset of `{0,1,2,3}`).
    #[test]
    fn first_n_end_to_end() {
        let ex = inline();
        let futs = vec![
            Future::successful(ex.clone(), 1),
            Future::<i32>::failed(ex.clone(), Error::BrokenPromise),
            Future::successful(ex, 3),
        ];
        let got = first_n(inline(), futs, 3).get().unwrap();
        assert_eq!(got.len(), 3);
        let indices: Vec<usize> = got.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    /// `first_n_succ` skips failing inputs and collects exactly `n`
    /// successful values, each tagged with its input index (spec scenario:
    /// first_n_succ, indices `{0,2,3}` and values `{1,3,4}`).
    #[test]
    fn first_n_succ_end_to_end() {
        let ex = inline();
        let futs = vec![
            Future::<i32>::failed(ex.clone(), Error::BrokenPromise),
            Future::successful(ex.clone(), 2),
            Future::successful(ex, 3),
        ];
        let got = first_n_succ(inline(), futs, 2).get().unwrap();
        assert_eq!(got, vec![(1, 2), (2, 3)]);
    }

    /// A `SharedFuture` may be read many times, from many clones, all
    /// observing the same completed value (spec scenario: multi-read shared
    /// future).
    #[test]
    fn shared_future_multi_read_end_to_end() {
        let mut promise = Promise::<i32>::new(inline());
        let shared = promise.future().shared();
        let reads = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let r = reads.clone();
            let s = shared.clone();
            s.on_complete(move |t| {
                if t.has_value() {
                    r.fetch_add(1, Ordering::SeqCst);
                }
            });
        }

        promise.try_success(100);
        assert_eq!(reads.load(Ordering::SeqCst), 3);
        assert_eq!(shared.get().unwrap(), 100);
    }
}
