//! Emitter configuration
//!
//! [`EmitterConfig`] can be built in code or loaded from a TOML document:
//!
//! ```toml
//! name = "jobs"
//! max_listeners = 16
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for an [`Emitter`](crate::Emitter)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Label attached to every tracing event this emitter records.
    pub name: String,
    /// Per-event listener count above which a leak warning is logged once.
    ///
    /// Listeners are still registered past the limit.
    pub max_listeners: Option<usize>,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            name: "emitter".to_string(),
            max_listeners: None,
        }
    }
}

impl EmitterConfig {
    /// Default configuration with a custom name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Parse and validate a configuration from TOML text.
    ///
    /// Missing keys take their default values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "name".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.max_listeners == Some(0) {
            return Err(ConfigError::Invalid {
                key: "max_listeners".to_string(),
                reason: "must be at least 1 when set".to_string(),
            });
        }
        Ok(())
    }
}
