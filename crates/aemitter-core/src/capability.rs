//! Composing the publish/subscribe capability onto other types.
//!
//! Any type becomes an event source by implementing [`Evented`], whose only
//! required method hands out the [`Emitter`] backing it. Everything else
//! (subscribe, publish, introspection) is provided.
//!
//! There are two ways to get there:
//! - **Embed**: the host keeps a [`Capability`] (or an `Emitter`) field and
//!   forwards [`Evented::emitter`] to it. Its own fields and methods are
//!   left alone.
//! - **Wrap**: [`Mixin<T>`] pairs any value with its own registry and derefs
//!   to the value.
//!
//! A [`Capability`] binds its registry on first use and keeps it, so
//! [`apply_capability`] can be called any number of times on the same host:
//! every application sees the same listeners.
//!
//! ```rust
//! use aemitter_core::{apply_capability, Capability, Emitter, Evented};
//!
//! struct Job {
//!     name: String,
//!     events: Capability,
//! }
//!
//! impl Evented for Job {
//!     fn emitter(&self) -> &Emitter {
//!         self.events.bind()
//!     }
//! }
//!
//! let job = apply_capability(Job { name: "build".into(), events: Capability::new() });
//! job.on("done", |_| Ok(()));
//!
//! let job = apply_capability(job);
//! assert!(job.has_listeners("done"));
//! assert_eq!(job.name, "build");
//! ```

use std::ops::{Deref, DerefMut};
use std::sync::OnceLock;

use serde_json::Value;

use crate::config::EmitterConfig;
use crate::dispatch::{self, Invocation, PendingPublish};
use crate::emitter::Emitter;
use crate::error::EmitterError;
use crate::registry::{EntryMode, Listener};
use crate::types::{Args, ListenerResult};

/// The publish/subscribe operation set.
pub trait Evented {
    /// The emitter whose registry backs this value.
    fn emitter(&self) -> &Emitter;

    /// Append `listener` to `event`; it fires on every publish until removed.
    ///
    /// The same listener may be registered several times and then fires once
    /// per registration.
    fn subscribe(&self, event: &str, listener: Listener) {
        self.emitter()
            .registry()
            .add(event, listener, EntryMode::Persistent);
    }

    /// Append `listener` to `event` for a single invocation.
    ///
    /// The entry is removed right before it first runs. Until then,
    /// [`Evented::unsubscribe`] with the same handle removes it.
    fn subscribe_once(&self, event: &str, listener: Listener) {
        self.emitter()
            .registry()
            .add(event, listener, EntryMode::Once);
    }

    /// Subscribe a closure and return its handle for later removal.
    fn on<F>(&self, event: &str, callable: F) -> Listener
    where
        F: Fn(Invocation<'_>) -> ListenerResult + Send + Sync + 'static,
        Self: Sized,
    {
        let listener = Listener::new(callable);
        self.subscribe(event, listener.clone());
        listener
    }

    /// Subscribe a closure for a single invocation and return its handle.
    fn once<F>(&self, event: &str, callable: F) -> Listener
    where
        F: Fn(Invocation<'_>) -> ListenerResult + Send + Sync + 'static,
        Self: Sized,
    {
        let listener = Listener::new(callable);
        self.subscribe_once(event, listener.clone());
        listener
    }

    /// Remove the first registration of `listener` for `event`.
    ///
    /// Returns false (and changes nothing) if it was not registered.
    fn unsubscribe(&self, event: &str, listener: &Listener) -> bool {
        self.emitter().registry().remove_listener(event, listener)
    }

    /// Remove every listener of `event`.
    fn unsubscribe_event(&self, event: &str) {
        self.emitter().registry().clear_event(event);
    }

    /// Remove every listener of every event.
    fn unsubscribe_all(&self) {
        self.emitter().registry().clear();
    }

    /// Invoke every listener of `event` now, in registration order.
    ///
    /// The first listener error stops the fan-out and is returned.
    fn publish(&self, event: &str, args: &[Value]) -> Result<(), EmitterError> {
        dispatch::fan_out(self.emitter(), event, args)
    }

    /// Run the listeners of `event` as a waterfall and report to `completion`.
    ///
    /// Each listener receives a [`Next`](crate::Next) and the following one
    /// starts only after it is resolved. `completion` runs exactly once: with
    /// `None` after the last step, or with the first step error. With no
    /// listeners it runs immediately.
    ///
    /// Returns as soon as the first step has been started; outcomes are only
    /// reported through `completion`.
    fn publish_with<F>(&self, event: &str, args: Args, completion: F)
    where
        F: FnOnce(Option<anyhow::Error>) + Send + 'static,
        Self: Sized,
    {
        dispatch::start_waterfall(self.emitter(), event, args, Box::new(completion));
    }

    /// Run the listeners of `event` as a waterfall and await its outcome.
    fn publish_async(&self, event: &str, args: Args) -> PendingPublish {
        let (tx, pending) = PendingPublish::channel(event);
        dispatch::start_waterfall(
            self.emitter(),
            event,
            args,
            Box::new(move |outcome| {
                let _ = tx.send(outcome);
            }),
        );
        pending
    }

    /// Listeners registered for `event`, in registration order.
    fn listeners(&self, event: &str) -> Vec<Listener> {
        self.emitter().registry().listeners(event)
    }

    /// Whether `event` has at least one listener.
    fn has_listeners(&self, event: &str) -> bool {
        self.listener_count(event) > 0
    }

    /// Number of registrations for `event`.
    fn listener_count(&self, event: &str) -> usize {
        self.emitter().registry().len(event)
    }

    /// Names of events with at least one listener, sorted.
    fn event_names(&self) -> Vec<String> {
        self.emitter().registry().event_names()
    }
}

impl Evented for Emitter {
    fn emitter(&self) -> &Emitter {
        self
    }
}

/// Lazily bound emitter slot for host types.
///
/// The first [`bind`](Capability::bind) creates the registry; later calls
/// return the same one.
#[derive(Debug, Default)]
pub struct Capability {
    config: EmitterConfig,
    emitter: OnceLock<Emitter>,
}

impl Capability {
    /// An unbound slot using the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// An unbound slot that will create its emitter from `config`
    pub fn with_config(config: EmitterConfig) -> Self {
        Self {
            config,
            emitter: OnceLock::new(),
        }
    }

    /// The bound emitter, created on first call.
    pub fn bind(&self) -> &Emitter {
        self.emitter
            .get_or_init(|| Emitter::with_config(self.config.clone()))
    }

    /// Whether a registry has been created yet.
    pub fn is_bound(&self) -> bool {
        self.emitter.get().is_some()
    }
}

/// Grant the capability to `target` and return it.
///
/// Binds the target's registry if it has none yet; if it already has one the
/// existing registry, with its listeners, is kept.
pub fn apply_capability<T: Evented>(target: T) -> T {
    let emitter = target.emitter();
    tracing::debug!(
        emitter = %emitter.name(),
        events = emitter.registry().counts().len(),
        "capability applied"
    );
    target
}

/// Any value paired with its own registry.
///
/// Derefs to the wrapped value, so its fields and methods stay reachable.
///
/// ```rust
/// use aemitter_core::{Evented, Mixin};
///
/// let mut counter = Mixin::new(0u32);
/// counter.on("tick", |_| Ok(()));
/// *counter += 1;
///
/// assert_eq!(*counter, 1);
/// assert!(counter.has_listeners("tick"));
/// ```
#[derive(Debug)]
pub struct Mixin<T> {
    target: T,
    events: Capability,
}

impl<T> Mixin<T> {
    /// Wrap `target` with a fresh registry
    pub fn new(target: T) -> Self {
        Self::with_config(target, EmitterConfig::default())
    }

    /// Wrap `target` with a fresh registry built from `config`
    pub fn with_config(target: T, config: EmitterConfig) -> Self {
        let events = Capability::with_config(config);
        events.bind();
        Self { target, events }
    }

    /// Unwrap the value, dropping the registry.
    pub fn into_inner(self) -> T {
        self.target
    }
}

impl<T> Evented for Mixin<T> {
    fn emitter(&self) -> &Emitter {
        self.events.bind()
    }
}

impl<T> Deref for Mixin<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.target
    }
}

impl<T> DerefMut for Mixin<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.target
    }
}

impl<T: Default> Default for Mixin<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
