//! Per-call listener context and the waterfall continuation.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::waterfall::Waterfall;
use crate::emitter::Emitter;

/// Everything a listener receives for one invocation.
///
/// `emitter` is the emitting instance (the listener's receiver). `next` is
/// present only when the publish runs as a waterfall: the listener must
/// resolve it, now or later, for the waterfall to advance.
///
/// ```rust
/// use aemitter_core::{Emitter, Evented, Invocation};
///
/// let emitter = Emitter::new();
/// emitter.on("greet", |Invocation { args, next, .. }| {
///     println!("hello {}", args[0]);
///     if let Some(next) = next {
///         next.done();
///     }
///     Ok(())
/// });
/// emitter.publish("greet", &["world".into()]).unwrap();
/// ```
pub struct Invocation<'a> {
    /// The emitter dispatching this call.
    pub emitter: &'a Emitter,
    /// The event name being published.
    pub event: &'a str,
    /// Arguments of the publish, without the completion callback.
    pub args: &'a [Value],
    /// Continuation of a waterfall publish; `None` in synchronous mode.
    pub next: Option<Next>,
}

impl Invocation<'_> {
    /// Whether this call is a step of a waterfall.
    pub fn is_waterfall(&self) -> bool {
        self.next.is_some()
    }

    /// Argument at `index`, if present.
    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }
}

impl fmt::Debug for Invocation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("emitter", &self.emitter.name())
            .field("event", &self.event)
            .field("args", &self.args)
            .field("next", &self.next)
            .finish()
    }
}

/// Continuation handed to each waterfall step.
///
/// Consumed when resolved, so a step resolves at most once. It is `Send`:
/// listeners may move it into a timer, a spawned task or another thread and
/// resolve it there. Dropping it unresolved stalls the waterfall for good.
pub struct Next {
    run: Option<Arc<Waterfall>>,
    step: usize,
}

impl Next {
    pub(crate) fn new(run: Arc<Waterfall>, step: usize) -> Self {
        Self {
            run: Some(run),
            step,
        }
    }

    /// Resolve successfully and let the next listener run.
    pub fn done(self) {
        self.resolve(None);
    }

    /// Abort the waterfall: remaining listeners are skipped and the
    /// completion receives `error`.
    pub fn fail(self, error: impl Into<anyhow::Error>) {
        self.resolve(Some(error.into()));
    }

    /// Resolve with an optional error, like calling `next(err)`.
    pub fn resolve(mut self, error: Option<anyhow::Error>) {
        if let Some(run) = self.run.take() {
            run.settle(self.step, error);
        }
    }

    /// Position of the listener this continuation belongs to.
    pub fn step(&self) -> usize {
        self.step
    }
}

impl Drop for Next {
    fn drop(&mut self) {
        if let Some(run) = &self.run {
            tracing::debug!(
                emitter = %run.emitter_name(),
                event = %run.event(),
                step = self.step,
                "continuation dropped unresolved"
            );
        }
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("step", &self.step)
            .field("resolved", &self.run.is_none())
            .finish()
    }
}
