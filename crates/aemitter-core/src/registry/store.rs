//! The listener registry.
//!
//! Maps event names to ordered entry sequences. Sequences only grow at the
//! tail and removals keep the relative order of the remaining entries, so the
//! stored order is always the dispatch order.
//!
//! An event whose last entry is removed loses its key: an empty sequence and
//! an absent name are indistinguishable from the outside.
//!
//! The lock is never held while a listener runs. Dispatch copies the entry
//! sequence out ([`Registry::snapshot`]) and then releases it, so listeners may
//! subscribe and unsubscribe freely while a publish is in flight.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;

use super::entry::{EntryId, EntryMode, Listener, ListenerEntry};
use crate::config::EmitterConfig;

#[derive(Debug, Default)]
struct Table {
    events: HashMap<String, Vec<Arc<ListenerEntry>>>,
    /// Event names that already triggered the leak warning.
    warned: HashSet<String>,
}

/// Per-emitter listener bookkeeping
#[derive(Debug)]
pub(crate) struct Registry {
    name: String,
    max_listeners: Option<usize>,
    table: RwLock<Table>,
}

impl Registry {
    pub(crate) fn new(config: &EmitterConfig) -> Self {
        Self {
            name: config.name.clone(),
            max_listeners: config.max_listeners,
            table: RwLock::new(Table::default()),
        }
    }

    /// Append an entry for `listener` at the tail of `event`'s sequence.
    pub(crate) fn add(&self, event: &str, listener: Listener, mode: EntryMode) -> EntryId {
        let entry = Arc::new(ListenerEntry::new(listener, mode));
        let id = entry.id();

        let mut table = self.table.write();
        let entries = table.events.entry(event.to_string()).or_default();
        entries.push(entry);
        let count = entries.len();

        tracing::debug!(emitter = %self.name, event, entry = %id, ?mode, count, "listener added");

        if let Some(max) = self.max_listeners {
            if count > max && table.warned.insert(event.to_string()) {
                tracing::warn!(
                    emitter = %self.name,
                    event,
                    count,
                    max,
                    "possible listener leak: more listeners than configured maximum"
                );
            }
        }
        id
    }

    /// Remove the first entry registered from `listener`.
    ///
    /// Returns true if an entry was removed.
    pub(crate) fn remove_listener(&self, event: &str, listener: &Listener) -> bool {
        self.remove_first(event, |entry| entry.listener().same(listener))
    }

    /// Remove the entry with the given id, if it is still registered.
    pub(crate) fn remove_entry(&self, event: &str, id: EntryId) -> bool {
        self.remove_first(event, |entry| entry.id() == id)
    }

    fn remove_first(&self, event: &str, matches: impl Fn(&ListenerEntry) -> bool) -> bool {
        let mut table = self.table.write();
        let Some(entries) = table.events.get_mut(event) else {
            return false;
        };
        let Some(position) = entries.iter().position(|entry| matches(&**entry)) else {
            return false;
        };

        let removed = entries.remove(position);
        if entries.is_empty() {
            table.events.remove(event);
        }
        tracing::debug!(emitter = %self.name, event, entry = %removed.id(), "listener removed");
        true
    }

    /// Drop every entry for `event`. Returns how many were removed.
    pub(crate) fn clear_event(&self, event: &str) -> usize {
        let removed = self
            .table
            .write()
            .events
            .remove(event)
            .map_or(0, |entries| entries.len());
        tracing::debug!(emitter = %self.name, event, removed, "listeners cleared for event");
        removed
    }

    /// Drop every entry for every event. Returns how many were removed.
    pub(crate) fn clear(&self) -> usize {
        let mut table = self.table.write();
        let removed = table.events.values().map(Vec::len).sum();
        table.events.clear();
        table.warned.clear();
        tracing::debug!(emitter = %self.name, removed, "all listeners cleared");
        removed
    }

    /// Copy of the current entry sequence for `event`.
    pub(crate) fn snapshot(&self, event: &str) -> Vec<Arc<ListenerEntry>> {
        self.table
            .read()
            .events
            .get(event)
            .cloned()
            .unwrap_or_default()
    }

    /// Registered listeners for `event`, in registration order.
    pub(crate) fn listeners(&self, event: &str) -> Vec<Listener> {
        self.table
            .read()
            .events
            .get(event)
            .map(|entries| {
                entries
                    .iter()
                    .map(|entry| entry.listener().clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn len(&self, event: &str) -> usize {
        self.table.read().events.get(event).map_or(0, Vec::len)
    }

    /// Names with at least one registered entry, sorted.
    pub(crate) fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.table.read().events.keys().cloned().collect();
        names.sort();
        names
    }

    /// Entry counts per event, sorted by name.
    pub(crate) fn counts(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = self
            .table
            .read()
            .events
            .iter()
            .map(|(name, entries)| (name.clone(), entries.len()))
            .collect();
        counts.sort();
        counts
    }
}
