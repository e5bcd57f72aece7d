//! Sequential asynchronous dispatch.
//!
//! A waterfall invokes the snapshot one listener at a time. Each step gets a
//! [`Next`] and the following step only starts once that continuation is
//! resolved, either during the listener call or at any later point from any
//! thread.
//!
//! ```text
//!  start ──► drive ──► step 0 ──next()──► step 1 ──next()──► ... ──► completion(None)
//!                         │                  │
//!                         └──next(err)───────┴──────────────────────► completion(Some(err))
//! ```
//!
//! Driving is a loop, not recursion: a continuation resolved while its
//! listener is still on the stack only marks the step as resumed, and the
//! loop that invoked the listener moves on once it returns. A continuation
//! resolved after the listener returned drives the loop itself. Long chains of
//! synchronously resolving listeners therefore run in constant stack depth.
//!
//! The completion is taken out of the shared state exactly once, either at the
//! end of the snapshot or on the first error, and never called with the lock held.
//!
//! A panicking listener unwinds to whoever is driving, but its step is left
//! pending rather than abandoned: a continuation it handed off before panicking
//! still advances the chain.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::Mutex;

use super::invocation::{Invocation, Next};
use crate::emitter::Emitter;
use crate::registry::ListenerEntry;
use crate::types::{Args, CompletionFn};

struct State {
    /// Index of the next step to invoke.
    cursor: usize,
    /// Step whose continuation is outstanding.
    pending: Option<usize>,
    /// A driver is currently inside a listener call.
    in_call: bool,
    /// The pending step resolved while its listener was still running.
    resumed: bool,
    /// `None` once the waterfall has finished.
    completion: Option<CompletionFn>,
}

/// One in-flight waterfall publish.
pub(crate) struct Waterfall {
    emitter: Emitter,
    event: String,
    args: Args,
    snapshot: Vec<Arc<ListenerEntry>>,
    state: Mutex<State>,
}

/// Begin a waterfall for `event` and return as soon as the first step has
/// been started (or the whole chain, if every step resolves synchronously).
pub(crate) fn start(emitter: &Emitter, event: &str, args: Args, completion: CompletionFn) {
    let snapshot = emitter.registry().snapshot(event);
    tracing::trace!(
        emitter = %emitter.name(),
        event,
        listeners = snapshot.len(),
        "publishing waterfall"
    );

    if snapshot.is_empty() {
        completion(None);
        return;
    }

    let run = Arc::new(Waterfall {
        emitter: emitter.clone(),
        event: event.to_string(),
        args,
        snapshot,
        state: Mutex::new(State {
            cursor: 0,
            pending: None,
            in_call: false,
            resumed: false,
            completion: Some(completion),
        }),
    });
    run.drive();
}

impl Waterfall {
    pub(crate) fn event(&self) -> &str {
        &self.event
    }

    pub(crate) fn emitter_name(&self) -> &str {
        self.emitter.name()
    }

    fn drive(self: &Arc<Self>) {
        loop {
            let (step, entry) = {
                let mut state = self.state.lock();
                if state.completion.is_none() {
                    return;
                }
                if state.cursor == self.snapshot.len() {
                    let completion = state.completion.take();
                    drop(state);
                    tracing::trace!(
                        emitter = %self.emitter.name(),
                        event = %self.event,
                        "waterfall completed"
                    );
                    if let Some(completion) = completion {
                        completion(None);
                    }
                    return;
                }
                let step = state.cursor;
                state.cursor += 1;
                state.pending = Some(step);
                state.in_call = true;
                state.resumed = false;
                (step, Arc::clone(&self.snapshot[step]))
            };

            if entry.is_once() {
                self.emitter.registry().remove_entry(&self.event, entry.id());
            }
            tracing::trace!(emitter = %self.emitter.name(), event = %self.event, step, "waterfall step");

            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                entry.listener().call(Invocation {
                    emitter: &self.emitter,
                    event: &self.event,
                    args: &self.args,
                    next: Some(Next::new(Arc::clone(self), step)),
                })
            }));
            let outcome = match outcome {
                Ok(outcome) => outcome,
                Err(payload) => {
                    // The step stays pending: its continuation may still
                    // resolve from another thread after the panic.
                    tracing::debug!(
                        emitter = %self.emitter.name(),
                        event = %self.event,
                        step,
                        "waterfall listener panicked"
                    );
                    if self.end_call() {
                        self.drive();
                    }
                    panic::resume_unwind(payload);
                }
            };
            if let Err(error) = outcome {
                self.settle(step, Some(error));
            }

            if !self.end_call() {
                return;
            }
        }
    }

    /// Leave the listener call. Returns whether its step already resolved.
    fn end_call(&self) -> bool {
        let mut state = self.state.lock();
        state.in_call = false;
        state.resumed
    }

    /// Resolve `step`. Ignored unless `step` is the outstanding one.
    pub(crate) fn settle(self: &Arc<Self>, step: usize, error: Option<anyhow::Error>) {
        let mut state = self.state.lock();
        if state.pending != Some(step) {
            return;
        }
        state.pending = None;

        match error {
            Some(error) => {
                let completion = state.completion.take();
                drop(state);
                tracing::trace!(
                    emitter = %self.emitter.name(),
                    event = %self.event,
                    step,
                    "waterfall aborted"
                );
                if let Some(completion) = completion {
                    completion(Some(error));
                }
            }
            None if state.in_call => state.resumed = true,
            None => {
                drop(state);
                self.drive();
            }
        }
    }
}
