// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! [`PooledListener`]: dispatches execution onto a shared [`threadpool::ThreadPool`].

use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::{Condvar, Mutex};
use threadpool::ThreadPool;

use crate::listener::{Listener, ListenerFactory};
use crate::processor::ProcessorHandle;

struct InFlight {
    count: Mutex<usize>,
    condvar: Condvar,
}

/// Creates [`PooledListener`] instances that all dispatch onto the same shared pool.
#[derive(Clone)]
pub struct PooledListenerFactory {
    pool: ThreadPool,
}

impl PooledListenerFactory {
    /// Creates a factory whose listeners dispatch onto a newly created pool with `threads`
    /// worker threads.
    #[must_use]
    pub fn new(threads: usize) -> Self {
        Self { pool: ThreadPool::new(threads) }
    }

    /// Creates a factory whose listeners share an existing pool, e.g. one also used for
    /// unrelated work elsewhere in the process.
    #[must_use]
    pub fn with_pool(pool: ThreadPool) -> Self {
        Self { pool }
    }
}

impl Debug for PooledListenerFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledListenerFactory").finish_non_exhaustive()
    }
}

impl ListenerFactory for PooledListenerFactory {
    fn alloc(&self) -> Option<Box<dyn Listener>> {
        Some(Box::new(PooledListener {
            pool: self.pool.clone(),
            handle: OnceLock::new(),
            scheduled: Arc::new(AtomicBool::new(false)),
            in_flight: Arc::new(InFlight { count: Mutex::new(0), condvar: Condvar::new() }),
        }))
    }
}

/// Dispatches a processor's execution onto a shared [`threadpool::ThreadPool`] rather than a
/// dedicated thread.
///
/// At most one drain job per processor is ever in flight at a time — `task_pushed` only
/// submits a new job on the empty→non-empty edge, and the submitted job keeps draining until
/// the queue is empty before releasing its "scheduled" claim. This preserves per-processor
/// FIFO execution even though the underlying thread pool is shared and unordered.
pub struct PooledListener {
    pool: ThreadPool,
    handle: OnceLock<ProcessorHandle>,
    scheduled: Arc<AtomicBool>,
    in_flight: Arc<InFlight>,
}

impl Listener for PooledListener {
    fn bind(&self, handle: ProcessorHandle) {
        let _ = self.handle.set(handle);
    }

    fn task_pushed(&self, was_empty: bool) {
        if !was_empty {
            return;
        }
        let Some(handle) = self.handle.get() else { return };
        if self.scheduled.swap(true, Ordering::AcqRel) {
            // A drain job is already claimed; it will observe this task before releasing its claim.
            return;
        }

        *self.in_flight.count.lock() += 1;
        let handle = handle.clone();
        let scheduled = Arc::clone(&self.scheduled);
        let in_flight = Arc::clone(&self.in_flight);
        self.pool.execute(move || {
            loop {
                while handle.execute() {}
                scheduled.store(false, Ordering::Release);

                // A push landing between the last (empty) `execute()` above and clearing
                // `scheduled` observes the claim still held and leaves its task for this job
                // to pick up instead of submitting its own. Recheck before exiting, and only
                // stop if nothing showed up or a racing push has already reclaimed the slot
                // and is submitting a fresh job of its own.
                if !handle.has_pending_work() || scheduled.swap(true, Ordering::AcqRel) {
                    break;
                }
            }

            let mut count = in_flight.count.lock();
            *count -= 1;
            if *count == 0 {
                in_flight.condvar.notify_all();
            }
        });
    }

    fn emptied(&self) {}

    fn shutdown(&self) {
        let mut count = self.in_flight.count.lock();
        while *count > 0 {
            self.in_flight.condvar.wait(&mut count);
        }
    }
}

impl Debug for PooledListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledListener").finish_non_exhaustive()
    }
}
