//! Build errors for machine construction.

use thiserror::Error;

/// Errors that can occur when building a machine.
///
/// [`MachineBuilder::build`](super::MachineBuilder::build) reports every
/// problem it finds, not just the first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("State [{id}] added more than once. Each identifier can only be registered once")]
    DuplicateState { id: String },

    #[error("Initial state [{id}] not registered. Add it with .state(id, state)")]
    UnknownInitialState { id: String },

    #[error("Invalid machine config: {0}")]
    InvalidConfig(String),
}
