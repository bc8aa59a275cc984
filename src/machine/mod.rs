//! The stackable machine.
//!
//! A [`Machine`] owns every registered state in an arena and keeps a linked
//! stack over it. The bottom of the stack is a permanent, anonymous floor
//! state, so the machine always has a current state and popping an empty
//! stack is a reported no-op rather than a crash.

#[allow(clippy::module_inception)]
mod machine;
mod node;

pub use machine::Machine;
pub use node::{Lifecycle, StateHandle};
