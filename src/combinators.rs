//! Free-standing combinators: `async`, `first_n`, `first_n_succ`.
//!
//! Grounded on `future_impl.h`'s free `async`/`firstN`/`firstNSucc`
//! functions, but the fan-in counting in `first_n`/`first_n_succ` below uses
//! one mutex-guarded accumulator rather than that file's separate atomics —
//! the atomic-counter version has a real race (a completer can observe "we
//! have enough" before an earlier completer has finished writing its slot);
//! a single lock closes that window at the cost of one lock per completion,
//! which is cheap next to dispatching through an executor anyway.

use crate::error::Error;
use crate::executor::Executor;
use crate::future::Future;
use crate::promise::Promise;
use crate::try_value::Try;
use std::sync::{Arc, Mutex};

/// Runs `work` on `executor`, returning a future for its result. A panic
/// inside `work` fails the returned future instead of propagating.
#[allow(non_snake_case)]
pub fn r#async<T, F>(executor: Arc<dyn Executor>, work: F) -> Future<T>
where
    T: Clone + Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let mut promise = Promise::new(executor.clone());
    let future = promise.future();

    executor.add(Box::new(move || {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(work)) {
            Ok(v) => {
                promise.try_success(v);
            }
            Err(payload) => {
                promise.try_failure(Error::from_panic(payload));
            }
        }
    }));

    future
}

struct FirstNState<T> {
    results: Vec<(usize, Try<T>)>,
    filled: usize,
}

/// Collects the first `n` completions (successes or failures alike, in
/// completion order) out of `futs`, each tagged with its position in
/// `futs`. Fails immediately with [`Error::NotEnoughFutures`] if fewer than
/// `n` futures were supplied.
pub fn first_n<T>(
    executor: Arc<dyn Executor>,
    futs: Vec<Future<T>>,
    n: usize,
) -> Future<Vec<(usize, Try<T>)>>
where
    T: Clone + Send + 'static,
{
    let available = futs.len();
    let mut promise = Promise::new(executor);
    let future = promise.future();

    if n > available {
        promise.try_failure(Error::NotEnoughFutures {
            available,
            required: n,
        });
        return future;
    }
    if n == 0 {
        promise.try_success(Vec::new());
        return future;
    }

    let state = Arc::new(Mutex::new(FirstNState {
        results: Vec::with_capacity(n),
        filled: 0,
    }));
    let promise = Arc::new(Mutex::new(Some(promise)));

    for (i, f) in futs.into_iter().enumerate() {
        let state = state.clone();
        let promise = promise.clone();
        f.on_complete(move |t: &Try<T>| {
            let mut guard = state.lock().unwrap();
            if guard.filled >= n {
                return;
            }
            guard.results.push((i, t.clone()));
            guard.filled += 1;
            if guard.filled == n {
                let results = std::mem::take(&mut guard.results);
                drop(guard);
                if let Some(mut p) = promise.lock().unwrap().take() {
                    p.try_success(results);
                }
            }
        });
    }

    future
}

struct FirstNSuccState<T> {
    values: Vec<(usize, T)>,
    failed: usize,
    last_failure: Option<Error>,
}

/// Collects the first `n` *successful* completions out of `futs`, each
/// tagged with its position in `futs`. Fails with the last observed failure
/// as soon as too many inputs have failed for `n` successes to still be
/// reachable. Fails immediately with [`Error::NotEnoughFutures`] if fewer
/// than `n` futures were supplied.
pub fn first_n_succ<T>(
    executor: Arc<dyn Executor>,
    futs: Vec<Future<T>>,
    n: usize,
) -> Future<Vec<(usize, T)>>
where
    T: Clone + Send + 'static,
{
    let total = futs.len();
    let mut promise = Promise::new(executor);
    let future = promise.future();

    if n > total {
        promise.try_failure(Error::NotEnoughFutures {
            available: total,
            required: n,
        });
        return future;
    }
    if n == 0 {
        promise.try_success(Vec::new());
        return future;
    }

    let state = Arc::new(Mutex::new(FirstNSuccState {
        values: Vec::with_capacity(n),
        failed: 0,
        last_failure: None,
    }));
    let promise = Arc::new(Mutex::new(Some(promise)));

    for (i, f) in futs.into_iter().enumerate() {
        let state = state.clone();
        let promise = promise.clone();
        f.on_complete(move |t: &Try<T>| {
            let mut guard = state.lock().unwrap();
            if guard.values.len() >= n {
                return;
            }
            match t.clone().get() {
                Ok(v) => {
                    guard.values.push((i, v));
                    if guard.values.len() == n {
                        let values = std::mem::take(&mut guard.values);
                        drop(guard);
                        if let Some(mut p) = promise.lock().unwrap().take() {
                            p.try_success(values);
                        }
                    }
                }
                Err(e) => {
                    guard.failed += 1;
                    guard.last_failure = Some(e);
                    // Upper bound on reachable successes: every future that
                    // hasn't failed yet (still pending or already
                    // succeeded) could in principle be a success.
                    let max_possible_successes = total - guard.failed;
                    if max_possible_successes < n {
                        let last = guard.last_failure.clone().unwrap();
                        drop(guard);
                        if let Some(mut p) = promise.lock().unwrap().take() {
                            p.try_failure(last);
                        }
                    }
                }
            }
        });
    }

    future
}
