//! Core types shared by the machine and its states.
//!
//! - State behaviour via the `State` trait
//! - Identifier bound via `StateId`
//! - Hook access to the owning machine via `Context`
//! - Bounded transition history

mod context;
mod history;
mod id;
mod state;

pub(crate) use context::Command;
pub(crate) use state::Floor;

pub use context::Context;
pub use history::{TransitionKind, TransitionLog, TransitionRecord};
pub use id::StateId;
pub use state::State;
