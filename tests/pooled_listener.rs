// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(missing_docs, reason = "test code")]
#![cfg(feature = "pooled")]

//! Tests specific to [`PooledListener`](taskline::PooledListener): FIFO ordering survives
//! dispatch onto a shared, unordered thread pool, and `shutdown` waits for in-flight drains.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use taskline::{PooledListenerFactory, Registry};

#[test]
fn order_is_preserved_despite_shared_pool() {
    let registry = Registry::new();
    let factory = PooledListenerFactory::new(4);
    let processor = registry.create_with_listener("pooled-order", &factory).unwrap();

    let results = Arc::new(Mutex::new(Vec::new()));
    for i in 0..500 {
        let results = Arc::clone(&results);
        processor.push(move || results.lock().unwrap().push(i)).unwrap();
    }

    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = Arc::clone(&counter);
    processor.push(move || { counter_clone.fetch_add(1, Ordering::SeqCst); }).unwrap();

    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while counter.load(Ordering::SeqCst) == 0 {
        assert!(std::time::Instant::now() < deadline, "pooled processor never drained");
        thread::sleep(Duration::from_millis(1));
    }

    assert_eq!(*results.lock().unwrap(), (0..500).collect::<Vec<_>>());
}

#[test]
fn shutdown_waits_for_in_flight_drain() {
    let registry = Registry::new();
    let factory = PooledListenerFactory::new(2);
    let processor = registry.create_with_listener("pooled-shutdown", &factory).unwrap();

    let ran = Arc::new(AtomicUsize::new(0));
    for _ in 0..50 {
        let ran = Arc::clone(&ran);
        processor
            .push(move || {
                thread::sleep(Duration::from_millis(1));
                ran.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
    }

    drop(processor);

    // `shutdown` blocks until the in-flight counter reaches zero, so by the time `drop`
    // returns above, every task that had already been claimed by the pool has finished.
    assert_eq!(ran.load(Ordering::SeqCst), 50);
}

#[test]
fn multiple_processors_share_one_pool() {
    let registry = Registry::new();
    let factory = PooledListenerFactory::new(2);
    let a = registry.create_with_listener("pooled-a", &factory).unwrap();
    let b = registry.create_with_listener("pooled-b", &factory).unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_a = Arc::clone(&seen);
    a.push(move || seen_a.lock().unwrap().push("a")).unwrap();
    let seen_b = Arc::clone(&seen);
    b.push(move || seen_b.lock().unwrap().push("b")).unwrap();

    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while seen.lock().unwrap().len() < 2 {
        assert!(std::time::Instant::now() < deadline, "pooled processors never drained");
        thread::sleep(Duration::from_millis(1));
    }

    let seen = seen.lock().unwrap();
    assert!(seen.contains(&"a"));
    assert!(seen.contains(&"b"));
}
