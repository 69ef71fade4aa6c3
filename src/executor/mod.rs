//! The executor abstraction every [`crate::core::Core`] is bound to.
//!
//! An executor is the sole place user callbacks run. `Core` never invokes a
//! callback inline on the thread that completes it; it hands the callback
//! to `Executor::add` instead. The one sanctioned exception is
//! [`InlineExecutor`], which is documented as running its task synchronously
//! — that's executor-layer transparency, not a `Core`-layer inline dispatch.

mod inline;
mod thread_pool;

pub use inline::InlineExecutor;
pub use thread_pool::ThreadPoolExecutor;

/// A unit of deferrable work submitted to an [`Executor`].
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Submits work for later execution.
///
/// Implementations make no ordering guarantee between distinct submissions
/// beyond what individual callers impose (see `Core`'s FIFO-within-a-core
/// dispatch rule); they only guarantee that `add` eventually runs `work`
/// exactly once.
pub trait Executor: Send + Sync {
    /// Submits `work` for execution. Returns immediately; `work` may run
    /// on any thread the executor manages, at any later time.
    fn add(&self, work: Task);
}

impl<E: Executor + ?Sized> Executor for std::sync::Arc<E> {
    fn add(&self, work: Task) {
        (**self).add(work)
    }
}
