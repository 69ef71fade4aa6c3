//! `Promise<T>`: the write-side handle over a [`crate::core::Core`].

use crate::core::{break_if_pending, Core};
use crate::error::Error;
use crate::executor::Executor;
use crate::future::Future;
use crate::try_value::Try;
use std::sync::Arc;

/// Write handle to a [`Core`]. Cheaply cloneable — every clone counts as a
/// live writer, and the core is only failed with
/// [`Error::BrokenPromise`] once the *last* clone drops while still
/// pending. This mirrors spec.md's note that a primary `Promise` is
/// single-writer in the common case but multiple `Promise` handles to one
/// core are legitimate (the shared-future fan-out state writes through one
/// such extra handle).
pub struct Promise<T>
where
    T: Clone + Send + 'static,
{
    core: Arc<Core<T>>,
}

impl<T> Promise<T>
where
    T: Clone + Send + 'static,
{
    /// Creates a new promise backed by a fresh, pending core bound to
    /// `executor`.
    pub fn new(executor: Arc<dyn Executor>) -> Self {
        Self::from_core(Core::new(executor))
    }

    /// Wraps an existing core as a new write handle, incrementing its
    /// promise count.
    pub(crate) fn from_core(core: Arc<Core<T>>) -> Self {
        core.increment_promise_count();
        Promise { core }
    }

    /// Yields the paired read-side [`Future`] over this promise's core.
    pub fn future(&mut self) -> Future<T> {
        Future::from_core(self.core.clone())
    }

    /// Completes the core with `v` if still pending. Delegates to
    /// [`Core::try_complete`].
    pub fn try_complete(&mut self, v: Try<T>) -> bool {
        self.core.try_complete(v)
    }

    /// Completes the core successfully with `v`.
    pub fn try_success(&mut self, v: T) -> bool {
        self.try_complete(Try::new_value(v))
    }

    /// Fails the core with `e`.
    pub fn try_failure(&mut self, e: Error) -> bool {
        self.try_complete(Try::new_failure(e))
    }

    /// Forwards `f`'s eventual outcome — success or failure — into this
    /// promise. `f` is kept alive by the forwarding callback until it
    /// fires.
    pub fn try_complete_with(mut self, f: Future<T>) {
        f.on_complete(move |t: &Try<T>| {
            self.try_complete(t.clone());
        });
    }

    /// Like [`Promise::try_complete_with`] but only forwards `f`'s
    /// successful outcomes.
    pub fn try_success_with(mut self, f: Future<T>) {
        f.on_complete(move |t: &Try<T>| {
            if t.has_value() {
                self.try_complete(t.clone());
            }
        });
    }

    /// Like [`Promise::try_complete_with`] but only forwards `f`'s
    /// failures.
    pub fn try_failure_with(mut self, f: Future<T>) {
        f.on_complete(move |t: &Try<T>| {
            if t.has_exception() {
                self.try_complete(t.clone());
            }
        });
    }
}

impl<T> Clone for Promise<T>
where
    T: Clone + Send + 'static,
{
    fn clone(&self) -> Self {
        Promise::from_core(self.core.clone())
    }
}

impl<T> Drop for Promise<T>
where
    T: Clone + Send + 'static,
{
    fn drop(&mut self) {
        if self.core.decrement_promise_count() == 0 {
            break_if_pending(&self.core);
        }
    }
}
