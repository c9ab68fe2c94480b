// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::Debug;

/// A unit of work enqueued on a [`TaskProcessor`](crate::TaskProcessor).
///
/// A `Task` is nothing more than a boxed closure: the handler and its data are a single
/// `FnOnce`, so there is no separate opaque data pointer to keep alive — whatever the task
/// needs, it owns by capture. The processor runs the closure to completion exactly once and
/// then drops it; the closure's return value, if any, is discarded.
pub(crate) struct Task {
    job: Box<dyn FnOnce() + Send + 'static>,
}

impl Task {
    pub(crate) fn new(job: impl FnOnce() + Send + 'static) -> Self {
        Self { job: Box::new(job) }
    }

    /// Runs the task's handler to completion.
    ///
    /// A handler that panics is not caught here; per the task processor contract, handlers
    /// must not unwind across the processor boundary.
    pub(crate) fn run(self) {
        (self.job)();
    }
}

impl Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task").finish_non_exhaustive()
    }
}
