//! `Future<T>`: the unique, move-only read handle over a
//! [`crate::core::Core`].
//!
//! Every combinator here consumes `self` by value. That is this crate's
//! answer to spec.md's "move-invalidated handle" design note: reusing a
//! `Future` after an operation on it is a compile-time error, not a runtime
//! one, so [`Error::FutureIsInvalid`] and [`Error::OnlyOneCallbackPerFuture`]
//! stay in the public error taxonomy for API completeness but the safe API
//! in this file never constructs them.

use crate::core::Core;
use crate::error::Error;
use crate::executor::Executor;
use crate::promise::Promise;
use crate::try_value::Try;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Unique, move-only handle to a pending or completed asynchronous value.
pub struct Future<T>
where
    T: Clone + Send + 'static,
{
    pub(crate) core: Arc<Core<T>>,
}

impl<T> Future<T>
where
    T: Clone + Send + 'static,
{
    pub(crate) fn from_core(core: Arc<Core<T>>) -> Self {
        Future { core }
    }

    /// An already-completed, successful future bound to `executor`.
    pub fn successful(executor: Arc<dyn Executor>, v: T) -> Self {
        let core = Core::new(executor);
        core.try_complete(Try::new_value(v));
        Future { core }
    }

    /// An already-completed, failed future bound to `executor`.
    pub fn failed(executor: Arc<dyn Executor>, e: Error) -> Self {
        let core = Core::new(executor);
        core.try_complete(Try::new_failure(e));
        Future { core }
    }

    /// True once the underlying core has completed. Does not consume the
    /// future — the one operation in this module that doesn't, per
    /// spec.md's decision to keep readiness checks non-destructive.
    pub fn is_ready(&self) -> bool {
        self.core.is_ready()
    }

    /// Blocks the calling thread until the value is ready, then returns it.
    pub fn get(self) -> Result<T, Error> {
        self.core.get().get()
    }

    /// Registers `f` to run, via the bound executor, once this future
    /// completes.
    pub fn on_complete<F>(self, f: F)
    where
        F: FnOnce(&Try<T>) + Send + 'static,
    {
        self.core.on_complete(Box::new(f));
    }

    /// Like [`Future::on_complete`] but only invoked on success.
    pub fn on_success<F>(self, g: F)
    where
        F: FnOnce(T) + Send + 'static,
    {
        self.on_complete(move |t: &Try<T>| {
            if let Try::Value(v) = t {
                g(v.clone());
            }
        });
    }

    /// Like [`Future::on_complete`] but only invoked on failure.
    pub fn on_failure<F>(self, g: F)
    where
        F: FnOnce(Error) + Send + 'static,
    {
        self.on_complete(move |t: &Try<T>| {
            if let Try::Failure(e) = t {
                g(e.clone());
            }
        });
    }

    /// Maps this future's outcome through `f`, yielding a new future on the
    /// same executor. A panic inside `f` fails the resulting future instead
    /// of propagating.
    pub fn then<S, F>(self, f: F) -> Future<S>
    where
        S: Clone + Send + 'static,
        F: FnOnce(Try<T>) -> S + Send + 'static,
    {
        let executor = self.core.executor().clone();
        let mut promise = Promise::new(executor);
        let future = promise.future();

        self.core.on_complete(Box::new(move |t: &Try<T>| {
            let t = t.clone();
            match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| f(t))) {
                Ok(s) => {
                    promise.try_success(s);
                }
                Err(payload) => {
                    promise.try_failure(Error::from_panic(payload));
                }
            }
        }));

        future
    }

    /// Like [`Future::then`] but `f` itself returns a `Future<S>`, which is
    /// flattened into the result.
    pub fn then_with<S, F>(self, f: F) -> Future<S>
    where
        S: Clone + Send + 'static,
        F: FnOnce(Try<T>) -> Future<S> + Send + 'static,
    {
        let executor = self.core.executor().clone();
        let mut promise = Promise::new(executor);
        let future = promise.future();

        self.core.on_complete(Box::new(move |t: &Try<T>| {
            let t = t.clone();
            match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| f(t))) {
                Ok(inner) => promise.try_complete_with(inner),
                Err(payload) => {
                    promise.try_failure(Error::from_panic(payload));
                }
            }
        }));

        future
    }

    /// Succeeds with the same value if `p` returns `true`; otherwise fails
    /// with [`Error::PredicateNotFulfilled`]. A prior failure passes through
    /// unchanged.
    pub fn guard<F>(self, p: F) -> Future<T>
    where
        F: Fn(&T) -> bool + Send + 'static,
    {
        let executor = self.core.executor().clone();
        let mut promise = Promise::new(executor);
        let future = promise.future();

        self.core.on_complete(Box::new(move |t: &Try<T>| {
            match t.clone().get() {
                Err(e) => {
                    promise.try_failure(e);
                }
                Ok(v) => {
                    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| p(&v))) {
                        Ok(true) => {
                            promise.try_success(v);
                        }
                        Ok(false) => {
                            promise.try_failure(Error::PredicateNotFulfilled);
                        }
                        Err(payload) => {
                            promise.try_failure(Error::from_panic(payload));
                        }
                    }
                }
            }
        }));

        future
    }

    /// Yields this future's value on success; otherwise forwards `other`'s
    /// entire outcome, success or failure. `other` is not touched until this
    /// future's own outcome is known.
    pub fn or_else(self, other: Future<T>) -> Future<T> {
        self.then_with(move |t: Try<T>| match t {
            Try::Value(v) => Future::successful(other.core.executor().clone(), v),
            Try::Failure(_) | Try::Uninitialized => other,
        })
    }

    /// Yields whichever of `self`/`other` completes first, failure or
    /// success. If both are already complete at the call site, `self` wins
    /// the tie.
    pub fn first(self, other: Future<T>) -> Future<T> {
        let executor = self.core.executor().clone();
        let mut promise = Promise::new(executor);
        let future = promise.future();

        let mut left = promise.clone();
        self.core.on_complete(Box::new(move |t: &Try<T>| {
            left.try_complete(t.clone());
        }));

        let mut right = promise;
        other.core.on_complete(Box::new(move |t: &Try<T>| {
            right.try_complete(t.clone());
        }));

        future
    }

    /// Yields whichever of `self`/`other` completes successfully first. If
    /// both fail, yields the failure observed last (the one that completes
    /// the pair). If both are already complete at the call site, `self`
    /// wins the success tie.
    pub fn first_succ(self, other: Future<T>) -> Future<T> {
        let executor = self.core.executor().clone();
        let mut promise = Promise::new(executor);
        let future = promise.future();
        let fail_count = Arc::new(AtomicUsize::new(0));

        let mut left = promise.clone();
        let left_count = fail_count.clone();
        self.core.on_complete(Box::new(move |t: &Try<T>| {
            match t.clone().get() {
                Ok(v) => {
                    left.try_success(v);
                }
                Err(e) => {
                    if left_count.fetch_add(1, Ordering::SeqCst) + 1 == 2 {
                        left.try_failure(e);
                    }
                }
            }
        }));

        let mut right = promise;
        other.core.on_complete(Box::new(move |t: &Try<T>| {
            match t.clone().get() {
                Ok(v) => {
                    right.try_success(v);
                }
                Err(e) => {
                    if fail_count.fetch_add(1, Ordering::SeqCst) + 1 == 2 {
                        right.try_failure(e);
                    }
                }
            }
        }));

        future
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::InlineExecutor;

    fn executor() -> Arc<dyn Executor> {
        Arc::new(InlineExecutor::new())
    }

    #[test]
    fn successful_and_failed_are_immediately_ready() {
        let f = Future::successful(executor(), 1);
        assert!(f.is_ready());
        assert_eq!(f.get().unwrap(), 1);

        let f = Future::<i32>::failed(executor(), Error::BrokenPromise);
        assert!(matches!(f.get(), Err(Error::BrokenPromise)));
    }

    #[test]
    fn then_maps_value() {
        let f = Future::successful(executor(), 2).then(|t| t.get().unwrap() * 10);
        assert_eq!(f.get().unwrap(), 20);
    }

    #[test]
    fn then_catches_panics_as_failures() {
        let f = Future::successful(executor(), 1).then(|_: Try<i32>| -> i32 {
            panic!("boom");
        });
        assert!(matches!(f.get(), Err(Error::User(_))));
    }

    #[test]
    fn then_with_flattens() {
        let ex = executor();
        let f = Future::successful(ex.clone(), 3)
            .then_with(move |t| Future::successful(ex.clone(), t.get().unwrap() + 1));
        assert_eq!(f.get().unwrap(), 4);
    }

    #[test]
    fn guard_passes_through_on_true() {
        let f = Future::successful(executor(), 4).guard(|v| *v % 2 == 0);
        assert_eq!(f.get().unwrap(), 4);
    }

    #[test]
    fn guard_fails_on_false() {
        let f = Future::successful(executor(), 5).guard(|v| *v % 2 == 0);
        assert!(matches!(f.get(), Err(Error::PredicateNotFulfilled)));
    }

    #[test]
    fn guard_passes_existing_failure_through() {
        let f = Future::<i32>::failed(executor(), Error::BrokenPromise).guard(|_| true);
        assert!(matches!(f.get(), Err(Error::BrokenPromise)));
    }

    #[test]
    fn or_else_keeps_primary_success() {
        let ex = executor();
        let primary = Future::successful(ex.clone(), 1);
        let other = Future::successful(ex, 2);
        assert_eq!(primary.or_else(other).get().unwrap(), 1);
    }

    #[test]
    fn or_else_forwards_other_outcome_on_primary_failure() {
        let ex = executor();
        let primary = Future::<i32>::failed(ex.clone(), Error::BrokenPromise);
        let other = Future::successful(ex, 7);
        assert_eq!(primary.or_else(other).get().unwrap(), 7);
    }

    #[test]
    fn or_else_forwards_other_failure_when_both_fail() {
        let ex = executor();
        let primary = Future::<i32>::failed(ex.clone(), Error::BrokenPromise);
        let other = Future::<i32>::failed(ex, Error::PredicateNotFulfilled);
        assert!(matches!(
            primary.or_else(other).get(),
            Err(Error::PredicateNotFulfilled)
        ));
    }

    #[test]
    fn first_prefers_left_when_both_ready() {
        let ex = executor();
        let left = Future::successful(ex.clone(), 1);
        let right = Future::successful(ex, 2);
        assert_eq!(left.first(right).get().unwrap(), 1);
    }

    #[test]
    fn first_succ_skips_a_failing_left() {
        let ex = executor();
        let left = Future::<i32>::failed(ex.clone(), Error::BrokenPromise);
        let right = Future::successful(ex, 9);
        assert_eq!(left.first_succ(right).get().unwrap(), 9);
    }

    #[test]
    fn first_succ_reports_last_failure_when_both_fail() {
        let ex = executor();
        let left = Future::<i32>::failed(ex.clone(), Error::BrokenPromise);
        let right = Future::<i32>::failed(ex, Error::PredicateNotFulfilled);
        assert!(matches!(
            left.first_succ(right).get(),
            Err(Error::PredicateNotFulfilled)
        ));
    }
}
