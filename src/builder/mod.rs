//! Builder API for ergonomic machine construction.
//!
//! [`MachineBuilder`] collects configuration, a diagnostic sink and states,
//! then validates them all at once before creating the machine.

pub mod error;
pub mod machine;

pub use error::BuildError;
pub use machine::MachineBuilder;
