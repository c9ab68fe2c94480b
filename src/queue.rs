// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::VecDeque;
use std::fmt::Debug;

use parking_lot::Mutex;

use crate::task::Task;

/// A strict FIFO queue of [`Task`]s, internal to a single processor.
///
/// All mutation goes through a single mutex; there is no separate "length" field to keep in
/// sync, since `VecDeque::is_empty` is definitionally `length == 0`.
pub(crate) struct TaskQueue {
    tasks: Mutex<VecDeque<Task>>,
}

impl TaskQueue {
    pub(crate) fn new() -> Self {
        Self { tasks: Mutex::new(VecDeque::new()) }
    }

    /// Appends `task` to the tail of the queue.
    ///
    /// Returns whether the queue was empty *before* this task was appended — the signal a
    /// listener's `task_pushed` uses to decide whether to wake a worker.
    pub(crate) fn enqueue(&self, task: Task) -> bool {
        let mut tasks = self.tasks.lock();
        let was_empty = tasks.is_empty();
        tasks.push_back(task);
        was_empty
    }

    /// Removes and returns the task at the head of the queue, if any.
    pub(crate) fn dequeue(&self) -> Option<Task> {
        self.tasks.lock().pop_front()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.tasks.lock().is_empty()
    }

    /// Discards all residual tasks without running them, returning how many were discarded.
    ///
    /// Used on shutdown: queued-but-not-yet-executing tasks never run (§7 of the spec this
    /// crate implements), so their closures are simply dropped here.
    pub(crate) fn discard_all(&self) -> usize {
        let mut tasks = self.tasks.lock();
        let discarded = tasks.len();
        tasks.clear();
        discarded
    }
}

impl Debug for TaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskQueue")
            .field("len", &self.tasks.lock().len())
            .finish()
    }
}
