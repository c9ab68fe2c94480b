// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(missing_docs, reason = "test code")]

//! Registry-level invariants: singleton-by-name, name uniqueness, and empty-name rejection.

use std::sync::Arc;
use std::thread;

use taskline::{DefaultListenerFactory, GetPolicy, ProcessorHandle, Registry, TaskProcessor, TaskProcessorError};

static_assertions::assert_impl_all!(TaskProcessor: Send, Sync, Clone);
static_assertions::assert_impl_all!(ProcessorHandle: Send, Sync, Clone);
static_assertions::assert_impl_all!(Registry: Send, Sync);

#[test]
fn get_creates_and_shares_by_name() {
    let registry = Registry::new();

    let p1 = registry.get("A", GetPolicy::CreateIfMissing).unwrap();
    let p2 = registry.get("A", GetPolicy::CreateIfMissing).unwrap();

    assert_eq!(p1.name(), p2.name());
    assert_eq!(p1.reference_count(), 2);

    drop(p1);
    drop(p2);

    let result = registry.get("A", GetPolicy::RefIfExists);
    assert!(matches!(result, Err(TaskProcessorError::NotFound(name)) if name == "A"));
}

#[test]
fn ref_if_exists_does_not_create() {
    let registry = Registry::new();
    let result = registry.get("missing", GetPolicy::RefIfExists);
    assert!(matches!(result, Err(TaskProcessorError::NotFound(_))));
    assert!(registry.is_empty());
}

#[test]
fn empty_name_is_rejected() {
    let registry = Registry::new();
    assert_eq!(registry.get("", GetPolicy::CreateIfMissing).unwrap_err(), TaskProcessorError::InvalidName);
    assert_eq!(
        registry.create_with_listener("", &DefaultListenerFactory).unwrap_err(),
        TaskProcessorError::InvalidName
    );
}

#[test]
fn create_with_listener_rejects_duplicate_name() {
    let registry = Registry::new();
    let first = registry.create_with_listener("E", &DefaultListenerFactory).unwrap();

    let err = registry.create_with_listener("E", &DefaultListenerFactory).unwrap_err();
    assert!(matches!(err, TaskProcessorError::NameInUse(name) if name == "E"));

    // The first processor is still usable after the failed duplicate creation.
    let (tx, rx) = std::sync::mpsc::channel();
    first.push(move || tx.send(()).unwrap()).unwrap();
    rx.recv_timeout(std::time::Duration::from_secs(1)).unwrap();
}

#[test]
fn concurrent_get_same_name_yields_one_identity() {
    let registry = Arc::new(Registry::new());
    let handles: Vec<_> = (0..32)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || registry.get("shared", GetPolicy::CreateIfMissing).unwrap())
        })
        .collect();

    let processors: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for processor in &processors {
        assert_eq!(processor.name(), "shared");
    }
    assert_eq!(processors[0].reference_count(), 32);
}

#[test]
fn name_reusable_after_full_teardown() {
    let registry = Registry::new();
    let first = registry.get("recycled", GetPolicy::CreateIfMissing).unwrap();
    drop(first);

    let second = registry.get("recycled", GetPolicy::CreateIfMissing).unwrap();
    assert_eq!(second.reference_count(), 1);
}
