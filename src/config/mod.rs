//! Machine configuration.
//!
//! Every field has a default, so a host only spells out what it changes:
//!
//! ```rust
//! use stackfsm::config::MachineConfig;
//!
//! let config = MachineConfig::from_json(r#"{ "history_capacity": 0 }"#).unwrap();
//! assert_eq!(config.history_capacity, 0);
//! assert_eq!(config.max_deferred_commands, MachineConfig::default().max_deferred_commands);
//! ```

use serde::{Deserialize, Serialize};

pub mod error;

pub use error::ConfigError;

/// Default number of transition records kept.
pub const DEFAULT_HISTORY_CAPACITY: usize = 64;

/// Default number of hook-requested transitions applied per machine call.
pub const DEFAULT_MAX_DEFERRED_COMMANDS: usize = 32;

/// Tunables for a [`Machine`](crate::machine::Machine).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Reject `change` by identifier when the replacement is already on the
    /// stack, the same way `push` does. Off by default.
    pub guard_change_by_id: bool,

    /// Transition records kept in the history ring. Zero disables history.
    pub history_capacity: usize,

    /// Hook-requested transitions applied after a single machine call before
    /// the rest are dropped.
    pub max_deferred_commands: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            guard_change_by_id: false,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            max_deferred_commands: DEFAULT_MAX_DEFERRED_COMMANDS,
        }
    }
}

impl MachineConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_deferred_commands == 0 {
            return Err(ConfigError::ZeroCommandLimit);
        }
        Ok(())
    }

    pub fn guard_change_by_id(mut self, enabled: bool) -> Self {
        self.guard_change_by_id = enabled;
        self
    }

    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn max_deferred_commands(mut self, limit: usize) -> Self {
        self.max_deferred_commands = limit;
        self
    }
}
