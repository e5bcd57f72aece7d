//! Synchronous fan-out.

use serde_json::Value;

use super::invocation::Invocation;
use crate::emitter::Emitter;
use crate::error::EmitterError;

/// Invoke every listener of `event`, in snapshot order, on the calling thread.
///
/// Once-entries are removed from the live registry before they run. The first
/// listener error stops the fan-out and is returned to the caller.
pub(crate) fn fan_out(emitter: &Emitter, event: &str, args: &[Value]) -> Result<(), EmitterError> {
    let registry = emitter.registry();
    let snapshot = registry.snapshot(event);
    tracing::trace!(
        emitter = %emitter.name(),
        event,
        listeners = snapshot.len(),
        "publishing"
    );

    for (index, entry) in snapshot.iter().enumerate() {
        if entry.is_once() {
            registry.remove_entry(event, entry.id());
        }

        entry
            .listener()
            .call(Invocation {
                emitter,
                event,
                args,
                next: None,
            })
            .map_err(|source| EmitterError::Listener {
                event: event.to_string(),
                index,
                source,
            })?;
    }
    Ok(())
}
