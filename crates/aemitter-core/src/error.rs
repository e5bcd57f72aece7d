//! Error types for aemitter
//!
//! Registry operations never fail: unknown event names and unknown listeners
//! degrade to no-ops or empty results. The only failures are:
//! - [`EmitterError`] for dispatch (a failing synchronous listener, or a
//!   waterfall whose continuations were all dropped unresolved)
//! - [`ConfigError`] for loading and validating [`EmitterConfig`](crate::EmitterConfig)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Dispatch error type
#[derive(Error, Debug)]
pub enum EmitterError {
    /// A listener failed during a synchronous fan-out.
    ///
    /// Listeners after `index` in the snapshot were not invoked.
    #[error("listener #{index} for '{event}' failed: {source}")]
    Listener {
        /// The event being published.
        event: String,
        /// Position of the failing listener in the publish snapshot.
        index: usize,
        /// The error returned by the listener.
        #[source]
        source: anyhow::Error,
    },

    /// Every continuation of an awaited waterfall was dropped without being resolved.
    #[error("waterfall for '{event}' stalled: continuation dropped unresolved")]
    Stalled {
        /// The event being published.
        event: String,
    },
}

impl EmitterError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            EmitterError::Listener { .. } => "listener_failed",
            EmitterError::Stalled { .. } => "waterfall_stalled",
        }
    }

    /// The event name the failed publish was dispatching.
    pub fn event(&self) -> &str {
        match self {
            EmitterError::Listener { event, .. } | EmitterError::Stalled { event } => event,
        }
    }
}

/// Errors related to emitter configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration text could not be parsed.
    #[error("TOML error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A configuration value is invalid.
    #[error("Invalid setting '{key}': {reason}")]
    Invalid { key: String, reason: String },
}
