//! Listener registry: per-event ordered listener entries.

mod entry;
mod store;

pub use entry::Listener;

pub(crate) use entry::{EntryId, EntryMode, ListenerEntry};
pub(crate) use store::Registry;
