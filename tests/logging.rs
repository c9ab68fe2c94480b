// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(missing_docs, reason = "test code")]

//! Lifecycle logging, captured and asserted the way `tracing-test` is used elsewhere in the
//! corpus rather than left as an unexercised dev-dependency.

use std::sync::{Arc, Barrier};

use taskline::{GetPolicy, Registry};
use tracing_test::traced_test;

#[traced_test]
#[test]
fn creation_and_shutdown_are_logged() {
    let registry = Registry::new();
    let processor = registry.get("logged", GetPolicy::CreateIfMissing).unwrap();
    drop(processor);

    assert!(logs_contain("task processor created"));
    assert!(logs_contain("task processor shutting down"));
}

#[traced_test]
#[test]
fn discarded_residual_tasks_are_logged() {
    let registry = Registry::new();
    let processor = registry.get("logged-discard", GetPolicy::CreateIfMissing).unwrap();

    // Block the worker on the first task so the second is still queued, not yet dequeued,
    // when the processor's last handle drops below.
    let barrier = Arc::new(Barrier::new(2));
    let barrier_clone = Arc::clone(&barrier);
    processor.push(move || { barrier_clone.wait(); }).unwrap();
    processor.push(|| {}).unwrap();

    barrier.wait();
    drop(processor);

    assert!(logs_contain("discarded residual tasks on shutdown"));
}
