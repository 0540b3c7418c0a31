//! Servient configuration.
//!
//! Provides [`ServientConfig`], sizing the memory a servient works in.
//! Values are loaded from environment variables.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::line::DEFAULT_TARGET_BUFFER_BYTES;
use crate::thing::{DynamicThing, Lookup, SearchOrder};

/// Errors reported by [`ServientConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The scratch buffer has no room at all.
    #[error("scratch buffer must not be empty")]
    EmptyScratch,

    /// The target buffer would leave no room for payload content.
    #[error("target buffer ({target} bytes) must be smaller than the scratch buffer ({scratch} bytes)")]
    TargetBufferTooLarge {
        /// Configured target buffer size.
        target: usize,
        /// Configured scratch buffer size.
        scratch: usize,
    },
}

/// Servient configuration.
///
/// # Examples
///
/// ```
/// use servient_core::config::ServientConfig;
///
/// let config = ServientConfig::default();
/// assert_eq!(config.scratch_buffer_bytes, 512);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct ServientConfig {
    /// Size of the scratch buffer each request is decoded into.
    #[builder(default = 512)]
    pub scratch_buffer_bytes: usize,

    /// Part of the scratch buffer reserved for the request target.
    #[builder(default = DEFAULT_TARGET_BUFFER_BYTES)]
    pub target_buffer_bytes: usize,

    /// Memory set aside for the dynamic form registry.
    #[builder(default = 1024)]
    pub forms_buffer_bytes: usize,

    /// Whether the most recently registered form wins a lookup.
    #[builder(default = false)]
    pub newest_first: bool,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for ServientConfig {
    fn default() -> Self {
        Self {
            scratch_buffer_bytes: 512,
            target_buffer_bytes: DEFAULT_TARGET_BUFFER_BYTES,
            forms_buffer_bytes: 1024,
            newest_first: false,
            log_level: String::from("info"),
        }
    }
}

impl ServientConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables (falling back to defaults):
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `SERVIENT_SCRATCH_BUFFER_BYTES` | `512` |
    /// | `SERVIENT_TARGET_BUFFER_BYTES` | `32` |
    /// | `SERVIENT_FORMS_BUFFER_BYTES` | `1024` |
    /// | `SERVIENT_NEWEST_FIRST` | `false` |
    /// | `LOG_LEVEL` | `info` |
    ///
    /// Unparseable numbers keep their default.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(n) = env_usize("SERVIENT_SCRATCH_BUFFER_BYTES") {
            config.scratch_buffer_bytes = n;
        }
        if let Some(n) = env_usize("SERVIENT_TARGET_BUFFER_BYTES") {
            config.target_buffer_bytes = n;
        }
        if let Some(n) = env_usize("SERVIENT_FORMS_BUFFER_BYTES") {
            config.forms_buffer_bytes = n;
        }
        if let Ok(v) = std::env::var("SERVIENT_NEWEST_FIRST") {
            config.newest_first = parse_bool(&v);
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }

    /// Check that the buffer sizes leave room for both target and payload.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scratch_buffer_bytes == 0 {
            return Err(ConfigError::EmptyScratch);
        }
        if self.target_buffer_bytes >= self.scratch_buffer_bytes {
            return Err(ConfigError::TargetBufferTooLarge {
                target: self.target_buffer_bytes,
                scratch: self.scratch_buffer_bytes,
            });
        }
        Ok(())
    }

    /// Scan order selected by [`ServientConfig::newest_first`].
    #[must_use]
    pub fn search_order(&self) -> SearchOrder {
        if self.newest_first {
            SearchOrder::NewestFirst
        } else {
            SearchOrder::OldestFirst
        }
    }

    /// Lookup behavior for registries built from this configuration.
    #[must_use]
    pub fn lookup(&self) -> Lookup {
        Lookup::new().with_order(self.search_order())
    }

    /// How many forms fit into [`ServientConfig::forms_buffer_bytes`].
    #[must_use]
    pub fn forms_capacity(&self) -> usize {
        DynamicThing::slots_for(self.forms_buffer_bytes)
    }
}

fn env_usize(name: &str) -> Option<usize> {
    std::env::var(name).ok()?.trim().parse().ok()
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_create_default_config() {
        let config = ServientConfig::default();
        assert_eq!(config.scratch_buffer_bytes, 512);
        assert_eq!(config.target_buffer_bytes, 32);
        assert_eq!(config.forms_buffer_bytes, 1024);
        assert!(!config.newest_first);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.search_order(), SearchOrder::OldestFirst);
    }

    #[test]
    fn test_should_match_builder_defaults() {
        assert_eq!(ServientConfig::builder().build(), ServientConfig::default());
    }

    #[test]
    fn test_should_build_with_typed_builder() {
        let config = ServientConfig::builder()
            .scratch_buffer_bytes(128)
            .target_buffer_bytes(16)
            .forms_buffer_bytes(0)
            .newest_first(true)
            .log_level("debug".into())
            .build();

        assert_eq!(config.scratch_buffer_bytes, 128);
        assert_eq!(config.target_buffer_bytes, 16);
        assert_eq!(config.forms_capacity(), 0);
        assert_eq!(config.lookup().order, SearchOrder::NewestFirst);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_should_load_from_env() {
        let config = ServientConfig::from_env();
        assert!(!config.log_level.is_empty());
    }

    #[test]
    fn test_should_reject_target_buffer_filling_scratch() {
        let config = ServientConfig::builder()
            .scratch_buffer_bytes(32)
            .target_buffer_bytes(32)
            .build();
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigError::TargetBufferTooLarge {
                target: 32,
                scratch: 32
            }
        );

        let empty = ServientConfig::builder().scratch_buffer_bytes(0).build();
        assert_eq!(empty.validate().unwrap_err(), ConfigError::EmptyScratch);
    }

    #[test]
    fn test_should_size_registry_from_forms_buffer() {
        let config = ServientConfig::default();
        assert!(config.forms_capacity() > 0);
        assert_eq!(
            config.forms_capacity(),
            1024 / std::mem::size_of::<crate::form::Form<'static>>()
        );
    }

    #[test]
    fn test_should_serialize_to_camel_case_json() {
        let config = ServientConfig::default();
        let json = serde_json::to_string(&config).expect("test serialization");
        assert!(json.contains("scratchBufferBytes"));
        assert!(json.contains("newestFirst"));
    }

    #[test]
    fn test_should_parse_bool_values() {
        assert!(parse_bool("1"));
        assert!(parse_bool("TRUE"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool(""));
    }
}
