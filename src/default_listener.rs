// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The built-in [`DefaultListener`]: one dedicated worker thread per processor.

use std::fmt::Debug;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::{Condvar, Mutex};

use crate::listener::{Listener, ListenerFactory};
use crate::processor::ProcessorHandle;

#[derive(Default)]
struct WorkerFlags {
    wake: bool,
    terminate: bool,
}

struct WorkerState {
    flags: Mutex<WorkerFlags>,
    condvar: Condvar,
}

/// Creates [`DefaultListener`] instances.
///
/// This is the listener [`Registry::get`](crate::Registry::get) uses when a processor is
/// created without an explicit listener.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultListenerFactory;

impl ListenerFactory for DefaultListenerFactory {
    fn alloc(&self) -> Option<Box<dyn Listener>> {
        Some(Box::new(DefaultListener {
            state: Arc::new(WorkerState {
                flags: Mutex::new(WorkerFlags::default()),
                condvar: Condvar::new(),
            }),
            worker: Mutex::new(None),
        }))
    }
}

/// Runs tasks sequentially on a single dedicated worker thread.
///
/// The worker alternates between two states: **idle**, parked on a condition variable, and
/// **running**, repeatedly calling [`TaskProcessor::execute`](crate::TaskProcessor::execute)
/// until it reports no further work. An empty→non-empty push wakes an idle worker; a
/// non-empty→non-empty push is a no-op, since the worker is already running or will observe
/// the new task on its next loop iteration. [`emptied`](Listener::emptied) is also a no-op —
/// the worker discovers emptiness through `execute`'s return value, not through a callback.
pub struct DefaultListener {
    state: Arc<WorkerState>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Listener for DefaultListener {
    fn bind(&self, handle: ProcessorHandle) {
        let state = Arc::clone(&self.state);
        let thread_name = handle.name().map_or_else(|| "taskline-worker".to_string(), |name| format!("taskline:{name}"));
        let builder = thread::Builder::new().name(thread_name);
        match builder.spawn(move || worker_loop(&handle, &state)) {
            Ok(join) => *self.worker.lock() = Some(join),
            Err(error) => tracing::warn!(%error, "failed to spawn default task processor worker thread"),
        }
    }

    fn task_pushed(&self, was_empty: bool) {
        if !was_empty {
            return;
        }
        let mut flags = self.state.flags.lock();
        flags.wake = true;
        self.state.condvar.notify_one();
    }

    fn emptied(&self) {}

    fn shutdown(&self) {
        {
            let mut flags = self.state.flags.lock();
            flags.terminate = true;
        }
        self.state.condvar.notify_one();
        if let Some(join) = self.worker.lock().take() {
            let _ = join.join();
        }
    }
}

impl Debug for DefaultListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultListener").finish_non_exhaustive()
    }
}

fn worker_loop(handle: &ProcessorHandle, state: &WorkerState) {
    loop {
        {
            let mut flags = state.flags.lock();
            while !flags.wake && !flags.terminate {
                state.condvar.wait(&mut flags);
            }
            if flags.terminate {
                return;
            }
            flags.wake = false;
        }

        while handle.execute() {}
    }
}
