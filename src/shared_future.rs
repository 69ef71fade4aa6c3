//! `SharedFuture<T>`: a cloneable, multi-read view over a
//! [`crate::core::Core`].
//!
//! Where [`crate::future::Future`] enforces "at most one read" by consuming
//! `self` on every operation, `SharedFuture` wraps the same kind of core but
//! hands out a fresh, disposable [`Future`] snapshot for every operation
//! instead of owning the core exclusively. Since [`crate::core::Core`]'s
//! `on_complete`/`get`/`is_ready` all take `&self` already, fan-out falls out
//! for free — no secondary forwarding core is needed.

use crate::core::Core;
use crate::error::Error;
use crate::future::Future;
use crate::try_value::Try;
use std::sync::Arc;

/// Cloneable, multi-read handle to a pending or completed asynchronous
/// value. Any number of clones may independently call `get`, register
/// callbacks, or build derived futures.
pub struct SharedFuture<T>
where
    T: Clone + Send + 'static,
{
    core: Arc<Core<T>>,
}

impl<T> SharedFuture<T>
where
    T: Clone + Send + 'static,
{
    pub(crate) fn from_core(core: Arc<Core<T>>) -> Self {
        SharedFuture { core }
    }

    /// Draws a fresh, single-use [`Future`] snapshot sharing this value's
    /// underlying core. Every public operation below is built on top of
    /// this.
    fn as_future(&self) -> Future<T> {
        Future::from_core(self.core.clone())
    }

    /// True once the underlying core has completed.
    pub fn is_ready(&self) -> bool {
        self.core.is_ready()
    }

    /// Blocks the calling thread until the value is ready, then returns a
    /// clone of it. Safe to call from many threads and many times.
    pub fn get(&self) -> Result<T, Error> {
        self.core.get().get()
    }

    /// Registers `f` to run, via the bound executor, once this value
    /// completes. May be called any number of times, from any clone.
    pub fn on_complete<F>(&self, f: F)
    where
        F: FnOnce(&Try<T>) + Send + 'static,
    {
        self.as_future().on_complete(f);
    }

    /// Like [`SharedFuture::on_complete`] but only invoked on success.
    pub fn on_success<F>(&self, g: F)
    where
        F: FnOnce(T) + Send + 'static,
    {
        self.as_future().on_success(g);
    }

    /// Like [`SharedFuture::on_complete`] but only invoked on failure.
    pub fn on_failure<F>(&self, g: F)
    where
        F: FnOnce(Error) + Send + 'static,
    {
        self.as_future().on_failure(g);
    }

    /// Maps this value's outcome through `f` into an independent
    /// [`Future`]. See [`Future::then`].
    pub fn then<S, F>(&self, f: F) -> Future<S>
    where
        S: Clone + Send + 'static,
        F: FnOnce(Try<T>) -> S + Send + 'static,
    {
        self.as_future().then(f)
    }

    /// See [`Future::guard`].
    pub fn guard<F>(&self, p: F) -> Future<T>
    where
        F: Fn(&T) -> bool + Send + 'static,
    {
        self.as_future().guard(p)
    }

    /// See [`Future::or_else`]. `other` is consumed; this value is only
    /// snapshotted.
    pub fn or_else(&self, other: Future<T>) -> Future<T> {
        self.as_future().or_else(other)
    }

    /// See [`Future::first`]. `other` is consumed; this value is only
    /// snapshotted.
    pub fn first(&self, other: Future<T>) -> Future<T> {
        self.as_future().first(other)
    }

    /// See [`Future::first_succ`]. `other` is consumed; this value is only
    /// snapshotted.
    pub fn first_succ(&self, other: Future<T>) -> Future<T> {
        self.as_future().first_succ(other)
    }
}

impl<T> Clone for SharedFuture<T>
where
    T: Clone + Send + 'static,
{
    fn clone(&self) -> Self {
        SharedFuture {
            core: self.core.clone(),
        }
    }
}

impl<T> Future<T>
where
    T: Clone + Send + 'static,
{
    /// Converts this unique future into a cloneable, multi-read
    /// [`SharedFuture`].
    pub fn shared(self) -> SharedFuture<T> {
        SharedFuture::from_core(self.core)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::InlineExecutor;
    use crate::promise::Promise;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    fn executor() -> Arc<dyn crate::executor::Executor> {
        Arc::new(InlineExecutor::new())
    }

    #[test]
    fn clones_all_observe_the_same_value() {
        let shared = Future::successful(executor(), 9).shared();
        let a = shared.clone();
        let b = shared.clone();
        assert_eq!(a.get().unwrap(), 9);
        assert_eq!(b.get().unwrap(), 9);
        assert_eq!(shared.get().unwrap(), 9);
    }

    #[test]
    fn every_clone_can_register_its_own_callback() {
        let mut promise = Promise::<i32>::new(executor());
        let shared = promise.future().shared();
        let hits = Arc::new(AtomicUsize::new(0));

        for _ in 0..4 {
            let h = hits.clone();
            shared.on_complete(move |_| {
                h.fetch_add(1, Ordering::SeqCst);
            });
        }

        promise.try_success(1);
        assert_eq!(hits.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn get_is_safe_from_many_threads() {
        let mut promise = Promise::<i32>::new(Arc::new(
            crate::executor::ThreadPoolExecutor::with_threads(2),
        ));
        let shared = promise.future().shared();
        promise.try_success(5);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let s = shared.clone();
                thread::spawn(move || s.get().unwrap())
            })
            .collect();

        for h in handles {
            assert_eq!(h.join().unwrap(), 5);
        }
    }
}
