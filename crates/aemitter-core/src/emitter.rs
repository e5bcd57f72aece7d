//! The emitter handle and the process-wide default instance.

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::config::EmitterConfig;
use crate::error::ConfigError;
use crate::registry::Registry;

struct Shared {
    config: EmitterConfig,
    registry: Registry,
}

/// A listener registry plus its dispatcher.
///
/// `Emitter` is a cheap handle: clones share one registry. All operations
/// take `&self` and the registry lock is never held while listeners run, so
/// listeners may subscribe, unsubscribe and publish re-entrantly.
///
/// The publish/subscribe operations come from the [`Evented`](crate::Evented) trait.
///
/// ```rust
/// use aemitter_core::{Emitter, Evented};
/// use std::sync::{Arc, Mutex};
///
/// let emitter = Emitter::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
///
/// let log = Arc::clone(&seen);
/// emitter.on("foo", move |call| {
///     log.lock().unwrap().push(call.args[0].clone());
///     Ok(())
/// });
///
/// emitter.publish("foo", &[1.into()]).unwrap();
/// emitter.publish("foo", &[2.into()]).unwrap();
/// assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
/// ```
#[derive(Clone)]
pub struct Emitter {
    shared: Arc<Shared>,
}

impl Emitter {
    /// Create an emitter with the default configuration
    pub fn new() -> Self {
        Self::with_config(EmitterConfig::default())
    }

    /// Create an emitter with a custom configuration
    pub fn with_config(config: EmitterConfig) -> Self {
        let registry = Registry::new(&config);
        Self {
            shared: Arc::new(Shared { config, registry }),
        }
    }

    /// Validate `config` and create an emitter from it
    pub fn try_with_config(config: EmitterConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    /// The configured name.
    pub fn name(&self) -> &str {
        &self.shared.config.name
    }

    /// Get the current configuration
    pub fn config(&self) -> &EmitterConfig {
        &self.shared.config
    }

    /// Whether both handles share one registry.
    pub fn same(&self, other: &Emitter) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    pub(crate) fn registry(&self) -> &Registry {
        &self.shared.registry
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("name", &self.name())
            .field("events", &self.registry().counts())
            .finish()
    }
}

/// Process-wide default emitter
static GLOBAL: OnceLock<Emitter> = OnceLock::new();

/// Get or initialize the process-wide emitter
pub fn global() -> &'static Emitter {
    GLOBAL.get_or_init(|| Emitter::with_config(EmitterConfig::named("global")))
}

/// Initialize the process-wide emitter with a custom configuration
///
/// Must be called before any call to [`global()`]. Returns the rejected
/// configuration if the emitter was already initialized.
pub fn init_global(config: EmitterConfig) -> Result<(), EmitterConfig> {
    GLOBAL
        .set(Emitter::with_config(config))
        .map_err(|emitter| emitter.config().clone())
}

/// Publish synchronously on the process-wide emitter.
///
/// Arguments are converted with `serde_json::json!`.
///
/// ```
/// use aemitter_core::{emit, global, Evented};
///
/// global().on("job.done", |call| {
///     assert_eq!(call.args[0], "build");
///     assert_eq!(call.args[1], 3);
///     Ok(())
/// });
/// emit!("job.done", "build", 3)?;
/// # Ok::<(), aemitter_core::EmitterError>(())
/// ```
#[macro_export]
macro_rules! emit {
    ($event:expr) => {
        $crate::Evented::publish($crate::global(), $event, &[])
    };
    ($event:expr, $($arg:expr),+ $(,)?) => {
        $crate::Evented::publish($crate::global(), $event, &[$($crate::json!($arg)),+])
    };
}

/// Subscribe a closure on the process-wide emitter.
///
/// Evaluates to the [`Listener`](crate::Listener) handle.
#[macro_export]
macro_rules! on_event {
    ($event:expr, $handler:expr) => {
        $crate::Evented::on($crate::global(), $event, $handler)
    };
}
