// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::{Arc, OnceLock, Weak};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry::{Occupied, Vacant};

use crate::default_listener::DefaultListenerFactory;
use crate::error::TaskProcessorError;
use crate::listener::ListenerFactory;
use crate::processor::{Inner, TaskProcessor};

/// Controls what [`Registry::get`] does when no processor exists under the requested name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetPolicy {
    /// Create a new processor with the default listener if one does not already exist.
    CreateIfMissing,
    /// Only return a reference to a processor that already exists.
    RefIfExists,
}

/// The process-wide, name-keyed table of live [`TaskProcessor`]s.
///
/// The table stores [`Weak`] references, not strong ones: the registry never keeps a
/// processor alive by itself. The moment a name's last `TaskProcessor` handle drops, the
/// corresponding entry's `Weak::upgrade` starts failing, which is indistinguishable — from
/// every other thread's point of view — from the entry having already been removed. A dead
/// entry is physically replaced the next time `get` or `create_with_listener` encounters it;
/// there is no separate sweep.
pub struct Registry {
    table: DashMap<Box<str>, Weak<Inner>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self { table: DashMap::new() }
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry").field("len", &self.table.len()).finish()
    }
}

impl Registry {
    /// The process-wide registry singleton.
    ///
    /// Initialized lazily on first use and torn down implicitly at process exit, same as
    /// any other `OnceLock`-backed global.
    #[must_use]
    pub fn global() -> &'static Registry {
        static REGISTRY: OnceLock<Registry> = OnceLock::new();
        REGISTRY.get_or_init(Registry::default)
    }

    /// Creates an empty registry, for tests that want isolation from the process-wide
    /// singleton.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a reference to the processor named `name`, creating it with the default
    /// listener if [`policy`](GetPolicy) is [`CreateIfMissing`](GetPolicy::CreateIfMissing)
    /// and no live processor exists.
    ///
    /// Concurrent callers requesting the same name always observe the same processor
    /// identity: lookup and insertion are atomic with respect to each other via the
    /// underlying map's per-shard locking.
    pub fn get(&self, name: &str, policy: GetPolicy) -> Result<TaskProcessor, TaskProcessorError> {
        if name.is_empty() {
            return Err(TaskProcessorError::InvalidName);
        }
        if let Some(processor) = self.upgrade(name) {
            return Ok(processor);
        }
        match policy {
            GetPolicy::RefIfExists => Err(TaskProcessorError::NotFound(name.to_string())),
            GetPolicy::CreateIfMissing => self.insert_new(name, &DefaultListenerFactory),
        }
    }

    /// Creates a processor named `name` bound to a caller-supplied listener.
    ///
    /// Fails with [`TaskProcessorError::NameInUse`] if a live processor already has this
    /// name.
    pub fn create_with_listener(&self, name: &str, factory: &dyn ListenerFactory) -> Result<TaskProcessor, TaskProcessorError> {
        if name.is_empty() {
            return Err(TaskProcessorError::InvalidName);
        }
        if self.upgrade(name).is_some() {
            return Err(TaskProcessorError::NameInUse(name.to_string()));
        }
        self.insert_new(name, factory)
    }

    /// The number of names currently tracked, including any not-yet-swept dead entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the registry currently tracks no names at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    fn upgrade(&self, name: &str) -> Option<TaskProcessor> {
        let inner = self.table.get(name)?.upgrade()?;
        Some(TaskProcessor::from_inner(inner))
    }

    fn insert_new(&self, name: &str, factory: &dyn ListenerFactory) -> Result<TaskProcessor, TaskProcessorError> {
        match self.table.entry(Box::from(name)) {
            Occupied(mut entry) => {
                if let Some(inner) = entry.get().upgrade() {
                    return Ok(TaskProcessor::from_inner(inner));
                }
                let inner = Inner::new(Box::from(name), factory)?;
                entry.insert(Arc::downgrade(&inner));
                Ok(TaskProcessor::from_inner(inner))
            }
            Vacant(entry) => {
                let inner = Inner::new(Box::from(name), factory)?;
                entry.insert(Arc::downgrade(&inner));
                Ok(TaskProcessor::from_inner(inner))
            }
        }
    }
}
