//! Listener handles and registry entries.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::dispatch::Invocation;
use crate::types::{ListenerFn, ListenerResult};

/// A cloneable handle to a listener callable.
///
/// Clones refer to the same callable. Two handles are equal exactly when they
/// are clones of one another, which is what removal by reference compares.
///
/// ```rust
/// use aemitter_core::Listener;
///
/// let a = Listener::new(|_| Ok(()));
/// let b = Listener::new(|_| Ok(()));
/// assert_eq!(a, a.clone());
/// assert_ne!(a, b);
/// ```
#[derive(Clone)]
pub struct Listener(Arc<ListenerFn>);

impl Listener {
    /// Wrap a callable into a listener handle
    pub fn new<F>(callable: F) -> Self
    where
        F: Fn(Invocation<'_>) -> ListenerResult + Send + Sync + 'static,
    {
        Self(Arc::new(callable))
    }

    /// Whether both handles refer to the same callable.
    pub fn same(&self, other: &Listener) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn call(&self, invocation: Invocation<'_>) -> ListenerResult {
        (self.0)(invocation)
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({:p})", Arc::as_ptr(&self.0))
    }
}

/// Unique identity of one registration.
///
/// Registering the same listener twice yields two entries with distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(Uuid);

impl EntryId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entry({})", &self.0.to_string()[..8])
    }
}

/// Whether an entry survives its first invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryMode {
    /// Fires on every publish until removed.
    Persistent,
    /// Removes itself from the registry right before its first invocation.
    Once,
}

/// The registry's stored unit: a listener plus its mode.
#[derive(Debug)]
pub(crate) struct ListenerEntry {
    id: EntryId,
    listener: Listener,
    mode: EntryMode,
}

impl ListenerEntry {
    pub(crate) fn new(listener: Listener, mode: EntryMode) -> Self {
        Self {
            id: EntryId::new(),
            listener,
            mode,
        }
    }

    pub(crate) fn id(&self) -> EntryId {
        self.id
    }

    pub(crate) fn listener(&self) -> &Listener {
        &self.listener
    }

    pub(crate) fn is_once(&self) -> bool {
        self.mode == EntryMode::Once
    }
}
