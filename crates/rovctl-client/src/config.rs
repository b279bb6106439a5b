//! Client configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found.
    #[error("Configuration not found: {0}")]
    NotFound(String),

    /// Failed to read the configuration file.
    #[error("Read error: {0}")]
    Read(String),

    /// Configuration data is invalid.
    #[error("Invalid data: {0}")]
    Invalid(String),
}

/// Configuration for the remote-control client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    /// Rover host (optionally with port). The control endpoint path is
    /// fixed to `/ws`.
    pub host: String,

    /// Delay between reconnect attempts, in milliseconds. Attempts repeat
    /// indefinitely with no backoff growth and no retry cap.
    pub reconnect_delay_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            // Default ESP32 soft-AP address.
            host: "192.168.4.1".to_string(),
            reconnect_delay_ms: 2000,
        }
    }
}

impl ClientConfig {
    /// The reconnect delay as a [`Duration`].
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let text =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Read(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}
