//! Type aliases for the callable shapes used throughout the crate.
//!
//! Listener and completion types are boxed trait objects with long bounds.
//! Naming them keeps signatures readable and keeps the bounds consistent
//! between the registry, the dispatcher and the public API.

use serde_json::Value;

use crate::dispatch::Invocation;

/// Arguments forwarded to every listener of one publish.
pub type Args = Vec<Value>;

/// What a listener body returns.
///
/// `Err` aborts a synchronous fan-out, or fails a waterfall step.
pub type ListenerResult = anyhow::Result<()>;

/// The callable stored behind a [`Listener`](crate::Listener) handle.
pub type ListenerFn = dyn Fn(Invocation<'_>) -> ListenerResult + Send + Sync;

/// Completion callback of a waterfall publish.
///
/// Receives `None` when every listener resolved its continuation, or the
/// first error any of them reported.
pub type CompletionFn = Box<dyn FnOnce(Option<anyhow::Error>) + Send>;
