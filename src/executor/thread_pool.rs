//! A fixed-size thread-pool executor.

use super::{Executor, Task};
use crossbeam::deque::{Injector, Steal};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// A pool of worker threads pulling tasks off a shared
/// [`crossbeam::deque::Injector`].
///
/// Grounded on this codebase's work-stealing scheduler
/// (`concurrency::scheduler::Scheduler::worker_loop`/`find_task`), stripped
/// down to the one queue every worker shares — the executor contract this
/// crate needs is FIFO-ish best-effort dispatch, not full work-stealing
/// between per-worker local queues.
pub struct ThreadPoolExecutor {
    injector: Arc<Injector<Task>>,
    running: Arc<AtomicBool>,
    workers: Vec<JoinHandle<()>>,
}

impl ThreadPoolExecutor {
    /// Spawns a pool sized to the number of logical CPUs (via
    /// [`num_cpus::get`]).
    pub fn new() -> Self {
        Self::with_threads(num_cpus::get().max(1))
    }

    /// Spawns a pool with exactly `num_threads` worker threads.
    pub fn with_threads(num_threads: usize) -> Self {
        let injector = Arc::new(Injector::new());
        let running = Arc::new(AtomicBool::new(true));
        let workers = (0..num_threads.max(1))
            .map(|id| {
                let injector = injector.clone();
                let running = running.clone();
                thread::Builder::new()
                    .name(format!("pledge-worker-{id}"))
                    .spawn(move || Self::worker_loop(&injector, &running))
                    .expect("failed to spawn pledge worker thread")
            })
            .collect();

        ThreadPoolExecutor {
            injector,
            running,
            workers,
        }
    }

    fn worker_loop(injector: &Injector<Task>, running: &AtomicBool) {
        while running.load(Ordering::Acquire) {
            match injector.steal() {
                Steal::Success(task) => {
                    log::trace!("pledge thread pool: executing submitted task");
                    task();
                }
                Steal::Empty => thread::yield_now(),
                Steal::Retry => continue,
            }
        }

        // Drain whatever is left so tasks queued just before shutdown still
        // run, matching the "work continues to be completed" guarantee
        // futures/promises give even once a handle has been dropped.
        loop {
            match injector.steal() {
                Steal::Success(task) => task(),
                Steal::Empty => break,
                Steal::Retry => continue,
            }
        }
    }
}

impl Default for ThreadPoolExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor for ThreadPoolExecutor {
    fn add(&self, work: Task) {
        self.injector.push(work);
    }
}

impl Drop for ThreadPoolExecutor {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
        for worker in self.workers.drain(..) {
            if let Err(e) = worker.join() {
                log::warn!("pledge thread pool: worker thread panicked: {e:?}");
            }
        }
    }
}
