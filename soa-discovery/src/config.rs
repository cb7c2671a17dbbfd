//! Instance limits configuration

use crate::{DiscoveryError, Result};
use serde::Deserialize;
use std::env;

/// Default maximum payload size, in characters
///
/// Payloads are stored inline in coordination-service nodes, which are small.
pub const MAX_PAYLOAD_SIZE_IN_CHARACTERS: usize = 10 * 1024;

/// Environment variable overriding the payload limit
pub const MAX_PAYLOAD_SIZE_ENV: &str = "SOA_MAX_PAYLOAD_SIZE";

/// Limits applied when constructing service instances
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InstanceConfig {
    /// Maximum payload length in characters
    pub max_payload_size: usize,
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            max_payload_size: MAX_PAYLOAD_SIZE_IN_CHARACTERS,
        }
    }
}

impl InstanceConfig {
    /// Create config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum payload size
    pub fn with_max_payload_size(mut self, max_payload_size: usize) -> Self {
        self.max_payload_size = max_payload_size;
        self
    }

    /// Create config from environment variables
    ///
    /// Reads `SOA_MAX_PAYLOAD_SIZE`; unset means the default.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create config from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(MAX_PAYLOAD_SIZE_ENV) {
            config.max_payload_size = raw.trim().parse().map_err(|_| {
                DiscoveryError::config(format!(
                    "{} must be a non-negative integer, got '{}'",
                    MAX_PAYLOAD_SIZE_ENV, raw
                ))
            })?;
        }

        Ok(config)
    }
}
