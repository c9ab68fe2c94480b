// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! [`InlineListener`]: executes tasks on the pushing thread, with no dedicated worker.

use std::fmt::Debug;
use std::sync::OnceLock;

use crate::listener::{Listener, ListenerFactory};
use crate::processor::ProcessorHandle;

/// Creates [`InlineListener`] instances.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineListenerFactory;

impl ListenerFactory for InlineListenerFactory {
    fn alloc(&self) -> Option<Box<dyn Listener>> {
        Some(Box::new(InlineListener { handle: OnceLock::new() }))
    }
}

/// Drains the queue synchronously, on the caller's own thread, inside `task_pushed`.
///
/// This is the simplest listener that satisfies the contract in [`Listener`]: no worker
/// thread, no pool, no scheduling delay. It is well suited to tests and to callers who want
/// strictly synchronous task processing.
///
/// # Reentrancy caveat
///
/// Because draining happens inline, a task that pushes another task onto the same processor
/// runs that new task *nested inside* the call to `push`, before `push` returns to the
/// original handler — unlike [`DefaultListener`](crate::DefaultListener), where a reentrant
/// push is merely queued and runs only after the current handler has returned. Both
/// orderings are conforming: the core's contract requires a reentrant push to succeed
/// without deadlock, not a particular interleaving with the caller's stack.
pub struct InlineListener {
    handle: OnceLock<ProcessorHandle>,
}

impl Listener for InlineListener {
    fn bind(&self, handle: ProcessorHandle) {
        let _ = self.handle.set(handle);
    }

    fn task_pushed(&self, _was_empty: bool) {
        if let Some(handle) = self.handle.get() {
            while handle.execute() {}
        }
    }

    fn emptied(&self) {}

    fn shutdown(&self) {}
}

impl Debug for InlineListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InlineListener").finish_non_exhaustive()
    }
}
