//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while loading a machine configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed
    #[error("Failed to parse machine config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Hooks could never request a transition
    #[error("max_deferred_commands must be at least 1")]
    ZeroCommandLimit,
}
