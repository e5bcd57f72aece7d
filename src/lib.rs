//! # aemitter
//!
//! In-process publish/subscribe for Rust:
//! - Named listeners, persistent or single-shot
//! - Synchronous fan-out with error propagation to the publisher
//! - Sequential asynchronous waterfalls driven by explicit continuations
//! - A capability trait that turns any type into an event source
//!
//! ## Architecture
//!
//! aemitter is organized as a workspace:
//!
//! 1. **aemitter-core** - Registry, dispatcher, capability mixin, configuration
//! 2. **aemitter** - This facade: re-exports plus logging setup

pub use aemitter_core::{
    apply_capability, emit, global, init_global, json, on_event, Args, Capability,
    CompletionFn, ConfigError, Emitter, EmitterConfig, EmitterError, Evented, Invocation,
    Listener, ListenerFn, ListenerResult, Mixin, Next, PendingPublish, Value,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support (defaults to `info`)
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::debug!(version = VERSION, "logging initialized");
    Ok(())
}
