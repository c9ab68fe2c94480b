// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use crate::error::TaskProcessorError;
use crate::listener::{Listener, ListenerFactory};
use crate::queue::TaskQueue;

pub(crate) struct Inner {
    name: Box<str>,
    queue: TaskQueue,
    listener: Box<dyn Listener>,
    alive: AtomicBool,
}

impl Inner {
    /// Allocates a listener, then constructs the shared processor state bound to it.
    ///
    /// `factory.alloc()` runs before any allocation happens here, so a failed listener
    /// initialization never leaves a half-constructed processor behind.
    pub(crate) fn new(name: Box<str>, factory: &dyn ListenerFactory) -> Result<Arc<Self>, TaskProcessorError> {
        let Some(listener) = factory.alloc() else {
            return Err(TaskProcessorError::ListenerInit(name.to_string()));
        };

        let inner = Arc::new_cyclic(move |weak| {
            listener.bind(ProcessorHandle { inner: Weak::clone(weak), name: name.clone() });
            Self {
                name,
                queue: TaskQueue::new(),
                listener,
                alive: AtomicBool::new(true),
            }
        });
        tracing::debug!(name = %inner.name, "task processor created");
        Ok(inner)
    }

    pub(crate) fn push(&self, job: impl FnOnce() + Send + 'static) -> Result<(), TaskProcessorError> {
        if !self.alive.load(Ordering::Acquire) {
            return Err(TaskProcessorError::NotAlive(self.name.to_string()));
        }
        let was_empty = self.queue.enqueue(crate::task::Task::new(job));
        self.listener.task_pushed(was_empty);
        Ok(())
    }

    /// Dequeues and runs at most one task.
    ///
    /// Returns `true` if a task ran and the queue still has more work, `false` if there was
    /// nothing to do or the queue is now empty.
    pub(crate) fn execute(&self) -> bool {
        let Some(task) = self.queue.dequeue() else {
            return false;
        };
        task.run();
        if self.queue.is_empty() {
            self.listener.emptied();
            false
        } else {
            true
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Whether the queue currently holds any unstarted task, without dequeuing one.
    pub(crate) fn has_pending_work(&self) -> bool {
        !self.queue.is_empty()
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::Release);
        tracing::debug!(name = %self.name, "task processor shutting down");
        self.listener.shutdown();
        let discarded = self.queue.discard_all();
        if discarded > 0 {
            tracing::warn!(name = %self.name, discarded, "discarded residual tasks on shutdown");
        }
        // `self.listener` drops next, after `shutdown` has returned above — destroy strictly
        // follows shutdown by construction, not by convention.
    }
}

/// A named, reference-counted, serialized task queue.
///
/// Cloning a `TaskProcessor` is `reference()`; dropping the last clone is `unreference()`.
/// When the last clone drops, the processor stops accepting pushes, its listener's
/// [`shutdown`](Listener::shutdown) runs, any residual queued tasks are discarded without
/// running, and the listener itself is then dropped.
#[derive(Clone)]
pub struct TaskProcessor(Arc<Inner>);

impl TaskProcessor {
    pub(crate) fn from_inner(inner: Arc<Inner>) -> Self {
        Self(inner)
    }

    /// Enqueues `job` for serialized execution on this processor.
    ///
    /// Fails with [`TaskProcessorError::NotAlive`] if the processor has already begun
    /// shutting down. Otherwise the task is appended to the queue and the bound listener's
    /// `task_pushed` callback runs synchronously before this call returns.
    pub fn push(&self, job: impl FnOnce() + Send + 'static) -> Result<(), TaskProcessorError> {
        self.0.push(job)
    }

    /// Dequeues and runs at most one task.
    ///
    /// Returns `true` if a task ran and the queue still holds more work, `false` if nothing
    /// was dequeued or the queue is now empty. Most callers never need to call this
    /// directly — it exists for listener implementations that drive execution themselves.
    pub fn execute(&self) -> bool {
        self.0.execute()
    }

    /// The processor's name, stable for its entire lifetime.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.name()
    }

    /// Whether the processor is still accepting pushes.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.0.is_alive()
    }

    /// The number of outstanding handles to this processor, including this one.
    #[must_use]
    pub fn reference_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    /// A non-owning back-reference a [`Listener`] can use to drive execution.
    #[must_use]
    pub fn handle(&self) -> ProcessorHandle {
        ProcessorHandle { inner: Arc::downgrade(&self.0), name: self.0.name.clone() }
    }
}

impl Debug for TaskProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskProcessor")
            .field("name", &self.0.name)
            .field("alive", &self.0.is_alive())
            .field("ref_count", &self.reference_count())
            .finish()
    }
}

/// A non-owning, [`Weak`]-backed reference to a [`TaskProcessor`], handed to a [`Listener`]
/// at bind time.
///
/// Upgrading succeeds for as long as at least one `TaskProcessor` handle is alive and fails
/// from the moment the last one drops — which is exactly when the back-reference becomes
/// unsafe to use per the processor's shutdown contract. No separate "is shutting down" flag
/// is needed: a failed upgrade already means "stop".
#[derive(Clone, Debug)]
pub struct ProcessorHandle {
    inner: Weak<Inner>,
    name: Box<str>,
}

impl ProcessorHandle {
    /// Drives one [`TaskProcessor::execute`] call through the back-reference.
    ///
    /// Returns `false`, with no effect, once the processor is gone.
    #[must_use]
    pub fn execute(&self) -> bool {
        self.inner.upgrade().is_some_and(|inner| inner.execute())
    }

    /// Enqueues `job` through the back-reference, as [`TaskProcessor::push`] would.
    ///
    /// Fails with [`TaskProcessorError::NotAlive`] once the processor this handle refers to
    /// is gone — the one path through which that error variant is actually reachable, since
    /// a live `TaskProcessor` handle can never observe its own processor as not alive.
    pub fn push(&self, job: impl FnOnce() + Send + 'static) -> Result<(), TaskProcessorError> {
        match self.inner.upgrade() {
            Some(inner) => inner.push(job),
            None => Err(TaskProcessorError::NotAlive(self.name.to_string())),
        }
    }

    /// Whether the processor's queue currently holds any unstarted task, without dequeuing
    /// one. Returns `false`, with no other effect, once the processor is gone.
    pub(crate) fn has_pending_work(&self) -> bool {
        self.inner.upgrade().is_some_and(|inner| inner.has_pending_work())
    }

    /// Whether the processor this handle refers to is still alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.inner.upgrade().is_some_and(|inner| inner.is_alive())
    }

    /// The processor's name, if it still exists.
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.inner.upgrade().map(|inner| inner.name().to_string())
    }
}
