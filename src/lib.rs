// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

//! Named, reference-counted, serialized task queues with pluggable execution listeners.
//!
//! A [`TaskProcessor`] is a named, serial execution context: producers anywhere in the
//! process can look one up by name through the [`Registry`], [`push`](TaskProcessor::push)
//! work onto it, and trust that every pushed task runs to completion, in push order, one at
//! a time, regardless of how many producers share the name. How tasks actually get run —
//! on one dedicated thread, on a shared pool, or synchronously on the pushing thread — is a
//! property of the processor's [`Listener`], not of the caller.
//!
//! # Quick Start
//!
//! ```rust
//! use taskline::{GetPolicy, Registry};
//!
//! let registry = Registry::new();
//! let processor = registry.get("my-module", GetPolicy::CreateIfMissing).unwrap();
//!
//! processor.push(|| {
//!     println!("running on the processor's worker thread");
//! }).unwrap();
//! ```
//!
//! # Sharing a processor by name
//!
//! ```rust
//! use taskline::{GetPolicy, Registry};
//!
//! let registry = Registry::new();
//! let a = registry.get("shared", GetPolicy::CreateIfMissing).unwrap();
//! let b = registry.get("shared", GetPolicy::CreateIfMissing).unwrap();
//! assert_eq!(a.name(), b.name());
//! assert_eq!(a.reference_count(), 2);
//! ```
//!
//! # Custom listeners
//!
//! Supply a [`ListenerFactory`] to [`Registry::create_with_listener`] to control how tasks
//! are dispatched. This crate ships three: [`DefaultListenerFactory`] (one worker thread per
//! processor), [`PooledListenerFactory`] (dispatch onto a shared pool, feature `pooled`),
//! and [`InlineListenerFactory`] (run synchronously on the pushing thread).
//!
//! # Non-goals
//!
//! This crate does not persist queued work across restarts, schedule by priority or
//! fairness, support cancelling an already-enqueued task, coordinate across processes, or
//! apply back-pressure to producers. Once a task is enqueued it runs, unless its processor
//! is shut down first, in which case it is discarded without running.

#![doc(html_logo_url = "https://media.githubusercontent.com/media/microsoft/oxidizer/refs/heads/main/crates/taskline/logo.png")]
#![doc(html_favicon_url = "https://media.githubusercontent.com/media/microsoft/oxidizer/refs/heads/main/crates/taskline/favicon.ico")]

mod default_listener;
mod error;
mod inline_listener;
mod listener;
#[cfg(feature = "pooled")]
mod pooled_listener;
mod processor;
mod queue;
mod registry;
mod task;

pub use default_listener::{DefaultListener, DefaultListenerFactory};
pub use error::TaskProcessorError;
pub use inline_listener::{InlineListener, InlineListenerFactory};
pub use listener::{Listener, ListenerFactory};
#[cfg(feature = "pooled")]
#[cfg_attr(docsrs, doc(cfg(feature = "pooled")))]
pub use pooled_listener::{PooledListener, PooledListenerFactory};
pub use processor::{ProcessorHandle, TaskProcessor};
pub use registry::{GetPolicy, Registry};
