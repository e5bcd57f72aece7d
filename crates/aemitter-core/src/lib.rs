//! # aemitter core
//!
//! In-process publish/subscribe: objects register named listeners and later
//! trigger every listener of a name, either synchronously or as a sequential
//! asynchronous waterfall that stops at the first error.
//!
//! ## Architecture
//!
//! 1. **Registry** ([`registry`]) - per event name, an ordered sequence of
//!    listener entries (persistent or once)
//! 2. **Dispatcher** ([`dispatch`]) - snapshots an event's entries and runs
//!    them as a synchronous fan-out or a continuation-driven waterfall
//! 3. **Capability** ([`capability`]) - the [`Evented`] trait, which grants the
//!    operation set to [`Emitter`], to host types embedding a [`Capability`],
//!    and to any value wrapped in a [`Mixin`]
//!
//! ## Usage
//!
//! ```rust
//! use aemitter_core::{json, Emitter, Evented};
//!
//! let emitter = Emitter::new();
//! emitter.on("job", |call| {
//!     if let Some(next) = call.next {
//!         next.done();
//!     }
//!     Ok(())
//! });
//!
//! // Synchronous fan-out
//! emitter.publish("job", &[json!("build")]).unwrap();
//!
//! // Waterfall with a completion callback
//! emitter.publish_with("job", vec![json!("build")], |err| {
//!     assert!(err.is_none());
//! });
//! ```

pub mod capability;
pub mod config;
pub mod dispatch;
pub mod emitter;
pub mod error;
pub mod registry;
pub mod types;

pub use capability::{apply_capability, Capability, Evented, Mixin};
pub use config::EmitterConfig;
pub use dispatch::{Invocation, Next, PendingPublish};
pub use emitter::{global, init_global, Emitter};
pub use error::{ConfigError, EmitterError};
pub use registry::Listener;
pub use types::{Args, CompletionFn, ListenerFn, ListenerResult};

// Re-exported for listener arguments and the `emit!` macro
pub use serde_json::{json, Value};
