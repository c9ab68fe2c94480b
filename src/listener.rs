// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::processor::ProcessorHandle;

/// Constructs a [`Listener`] for a new [`TaskProcessor`](crate::TaskProcessor).
///
/// A factory is supplied to [`Registry::create_with_listener`](crate::Registry::create_with_listener)
/// rather than a listener instance directly because listener construction is fallible and
/// the processor's back-reference is not available until after a listener has allocated its
/// private state — see [`Listener::bind`].
pub trait ListenerFactory: Send + Sync {
    /// Allocates a new listener's private state.
    ///
    /// Called exactly once, before the listener is bound to a processor. Returning `None`
    /// aborts the enclosing `create_with_listener` call with
    /// [`TaskProcessorError::ListenerInit`](crate::TaskProcessorError::ListenerInit).
    fn alloc(&self) -> Option<Box<dyn Listener>>;
}

/// A strategy object notified of a [`TaskProcessor`]'s queue transitions.
///
/// Implementations receive a [`ProcessorHandle`] at bind time if they need to drive
/// [`TaskProcessor::execute`](crate::TaskProcessor::execute) themselves (a dedicated worker
/// thread, a shared thread pool, or the pushing thread itself are all valid strategies —
/// see [`DefaultListener`](crate::DefaultListener), [`PooledListener`](crate::PooledListener),
/// and [`InlineListener`](crate::InlineListener)).
///
/// All callbacks are declared infallible: a listener that cannot do its job must handle
/// that internally (log, drop the work, retry out of band). The core never inspects or
/// retries a listener callback.
pub trait Listener: Send + Sync {
    /// Binds the listener to its owning processor.
    ///
    /// Called exactly once, immediately after a successful [`ListenerFactory::alloc`] and
    /// before any other listener callback. `handle` is a non-owning back-reference: it must
    /// not be used to keep the processor alive, and it stops resolving once [`shutdown`](Self::shutdown)
    /// has returned.
    fn bind(&self, handle: ProcessorHandle);

    /// A task was pushed to the processor.
    ///
    /// Called synchronously from within `push`, after the task is enqueued and visible to
    /// any other thread. `was_empty` is the empty→non-empty edge signal: it is true exactly
    /// when the queue held no other task immediately before this one.
    fn task_pushed(&self, was_empty: bool);

    /// The processor's queue has just become empty.
    ///
    /// Called synchronously from within `execute`, immediately after a dequeue that leaves
    /// the queue empty. May be skipped entirely for an activity that never finds the queue
    /// empty, and — per the core's ordering guarantees — may fire immediately before a
    /// racing push becomes visible; listeners must tolerate that as a spurious wakeup.
    fn emptied(&self);

    /// The processor is shutting down.
    ///
    /// Called exactly once, as the processor's last strong reference is dropped. Must block
    /// until the listener has fully quiesced (any worker thread joined, any in-flight
    /// dispatch drained) — once this returns, no further listener callback is permitted and
    /// the bound [`ProcessorHandle`] no longer upgrades.
    fn shutdown(&self);
}
