//! Configuration for the funding-ID allocator

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Allocator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Name of the lock serializing allocation across workers
    pub lock_name: String,

    /// Lock-acquisition timeout in milliseconds
    pub lock_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lock_name: "funding-id-allocation".to_string(),
            lock_timeout_ms: 10_000,
        }
    }
}

impl Config {
    /// Lock-acquisition timeout
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(name) = std::env::var("FUNDING_LOCK_NAME") {
            config.lock_name = name;
        }

        if let Ok(timeout) = std::env::var("FUNDING_LOCK_TIMEOUT_MS") {
            config.lock_timeout_ms = timeout.parse().map_err(|_| {
                crate::Error::Config(format!("FUNDING_LOCK_TIMEOUT_MS '{}' is not a number", timeout))
            })?;
        }

        Ok(config)
    }
}
