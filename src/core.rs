//! `Core<T>`: the write-once, reference-counted shared state a
//! [`crate::promise::Promise`] writes to and a [`crate::future::Future`] (or
//! [`crate::shared_future::SharedFuture`]) reads from.
//!
//! Backed by a single `std::sync::Mutex` + `std::sync::Condvar` — spec.md's
//! "synchronisation strategy A" — which is also exactly what the original
//! C++ `lock/core.h` variant this crate's behavior was distilled from does
//! with `std::mutex`/`std::condition_variable`. The alternative MVar-based
//! strategy B is not built; see DESIGN.md for why.

use crate::error::Error;
use crate::executor::Executor;
use crate::try_value::Try;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};

/// A one-shot function invoked with a borrowed reference to a completed
/// `Try<T>`. Dispatched by a `Core`'s bound [`Executor`], never inline.
pub type Callback<T> = Box<dyn FnOnce(&Try<T>) + Send + 'static>;

enum State<T> {
    Pending(Vec<Callback<T>>),
    Completed(Try<T>),
}

/// Write-once shared state. Always accessed through `Arc<Core<T>>` since
/// `Promise`, `Future`, `SharedFuture`, and in-flight callbacks all need to
/// independently extend its lifetime.
pub struct Core<T> {
    executor: Arc<dyn Executor>,
    state: Mutex<State<T>>,
    condvar: Condvar,
    promise_count: AtomicUsize,
}

impl<T> Core<T>
where
    T: Clone + Send + 'static,
{
    /// Creates a new, pending `Core` bound to `executor`.
    pub fn new(executor: Arc<dyn Executor>) -> Arc<Self> {
        Arc::new(Core {
            executor,
            state: Mutex::new(State::Pending(Vec::new())),
            condvar: Condvar::new(),
            promise_count: AtomicUsize::new(0),
        })
    }

    /// The executor callbacks on this core are dispatched through.
    pub fn executor(&self) -> &Arc<dyn Executor> {
        &self.executor
    }

    /// Completes the core with `v` if it is still pending, draining every
    /// registered callback to the executor in registration order. Returns
    /// `false`, leaving the state untouched, if the core was already
    /// completed.
    pub fn try_complete(&self, v: Try<T>) -> bool {
        let callbacks = {
            let mut guard = self.state.lock().unwrap();
            if matches!(&*guard, State::Completed(_)) {
                return false;
            }
            let old = std::mem::replace(&mut *guard, State::Completed(v.clone()));
            self.condvar.notify_all();
            match old {
                State::Pending(cbs) => cbs,
                State::Completed(_) => unreachable!("checked above"),
            }
        };

        log::trace!(
            "core completed, dispatching {} queued callback(s)",
            callbacks.len()
        );
        for cb in callbacks {
            let value = v.clone();
            self.executor.add(Box::new(move || cb(&value)));
        }
        true
    }

    /// Registers `cb`. If the core is already completed, `cb` is submitted
    /// to the executor immediately (still never inline); otherwise it is
    /// appended to the pending queue and fires on the eventual completion.
    pub fn on_complete(&self, cb: Callback<T>) {
        let mut guard = self.state.lock().unwrap();
        match &mut *guard {
            State::Pending(cbs) => {
                cbs.push(cb);
            }
            State::Completed(v) => {
                let v = v.clone();
                drop(guard);
                log::trace!("core already completed, dispatching callback immediately");
                self.executor.add(Box::new(move || cb(&v)));
            }
        }
    }

    /// Blocks the calling thread until the core completes, then returns a
    /// clone of the completed `Try<T>`. The only blocking operation this
    /// crate exposes.
    pub fn get(&self) -> Try<T> {
        let guard = self.state.lock().unwrap();
        let guard = self
            .condvar
            .wait_while(guard, |s| matches!(s, State::Pending(_)))
            .unwrap();
        match &*guard {
            State::Completed(v) => v.clone(),
            State::Pending(_) => unreachable!("wait_while only exits once Completed"),
        }
    }

    /// True once the core has completed (with either a value or a failure).
    pub fn is_ready(&self) -> bool {
        matches!(&*self.state.lock().unwrap(), State::Completed(_))
    }

    /// Registers one more live `Promise` handle writing to this core.
    pub fn increment_promise_count(&self) {
        self.promise_count.fetch_add(1, Ordering::SeqCst);
    }

    /// Releases one `Promise` handle, returning the number of handles that
    /// remain. A caller that observes `0` was the last writer and should
    /// fail the core with [`Error::BrokenPromise`] if it is still pending.
    pub fn decrement_promise_count(&self) -> usize {
        self.promise_count.fetch_sub(1, Ordering::SeqCst) - 1
    }
}

/// Fails `core` with [`Error::BrokenPromise`] if it is still pending.
/// Shared by `Promise::drop` and the shared-future fan-out core's last
/// writer.
pub(crate) fn break_if_pending<T>(core: &Arc<Core<T>>)
where
    T: Clone + Send + 'static,
{
    core.try_complete(Try::new_failure(Error::BrokenPromise));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::InlineExecutor;
    use std::sync::atomic::AtomicUsize as StdAtomicUsize;
    use std::sync::Arc;

    fn inline_core<T: Clone + Send + 'static>() -> Arc<Core<T>> {
        Core::new(Arc::new(InlineExecutor::new()))
    }

    #[test]
    fn write_once_second_try_complete_returns_false() {
        let core = inline_core::<i32>();
        assert!(core.try_complete(Try::new_value(1)));
        assert!(!core.try_complete(Try::new_value(2)));
        assert_eq!(core.get().get().unwrap(), 1);
    }

    #[test]
    fn on_complete_after_completion_still_fires() {
        let core = inline_core::<i32>();
        core.try_complete(Try::new_value(10));

        let fired = Arc::new(StdAtomicUsize::new(0));
        let f = fired.clone();
        core.on_complete(Box::new(move |t| {
            f.fetch_add(*t.get_ref().unwrap() as usize + 1, Ordering::SeqCst);
        }));
        assert_eq!(fired.load(Ordering::SeqCst), 11);
    }

    #[test]
    fn callbacks_fire_in_registration_order() {
        let core = inline_core::<i32>();
        let order = Arc::new(Mutex::new(Vec::new()));

        for i in 0..5 {
            let order = order.clone();
            core.on_complete(Box::new(move |_| order.lock().unwrap().push(i)));
        }

        core.try_complete(Try::new_value(0));
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn is_ready_reflects_completion() {
        let core = inline_core::<i32>();
        assert!(!core.is_ready());
        core.try_complete(Try::new_value(1));
        assert!(core.is_ready());
    }

    #[test]
    fn get_blocks_until_completion_across_threads() {
        let core = Core::<i32>::new(Arc::new(crate::executor::ThreadPoolExecutor::with_threads(2)));
        let producer = core.clone();
        std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(20));
            producer.try_complete(Try::new_value(99));
        });

        assert_eq!(core.get().get().unwrap(), 99);
    }
}
