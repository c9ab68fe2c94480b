// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use thiserror::Error;

/// Errors returned by [`TaskProcessor`](crate::TaskProcessor) and
/// [`Registry`](crate::Registry) operations.
///
/// Every variant is returned synchronously from the call that produced it; none of these
/// propagate across threads, and nothing in this crate retries a failed operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TaskProcessorError {
    /// The processor has begun (or finished) shutting down and no longer accepts pushes.
    #[error("task processor \"{0}\" is no longer alive")]
    NotAlive(String),

    /// [`Registry::get`](crate::Registry::get) was called with
    /// [`GetPolicy::RefIfExists`](crate::GetPolicy::RefIfExists) for a name with no live
    /// processor.
    #[error("no task processor named \"{0}\" exists")]
    NotFound(String),

    /// [`Registry::create_with_listener`](crate::Registry::create_with_listener) was called
    /// with a name that already has a live processor.
    #[error("a task processor named \"{0}\" already exists")]
    NameInUse(String),

    /// A [`ListenerFactory::alloc`](crate::ListenerFactory::alloc) call returned `None`.
    #[error("listener initialization failed for task processor \"{0}\"")]
    ListenerInit(String),

    /// An empty name was supplied to a registry operation.
    #[error("task processor names must not be empty")]
    InvalidName,
}
