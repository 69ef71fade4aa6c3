//! An executor that runs submitted work synchronously.

use super::{Executor, Task};

/// Runs every submitted task synchronously, on the calling thread, before
/// `add` returns.
///
/// This is the one place in this crate where "dispatch via the executor"
/// and "run inline" coincide — by explicit, documented choice of the caller
/// who picked this executor, not as a shortcut `Core` takes on its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineExecutor;

impl InlineExecutor {
    /// Creates a new inline executor.
    pub fn new() -> Self {
        InlineExecutor
    }
}

impl Executor for InlineExecutor {
    fn add(&self, work: Task) {
        work();
    }
}
