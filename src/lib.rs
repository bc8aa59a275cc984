//! Stackfsm: a stackable finite state machine
//!
//! Stackfsm manages mutually exclusive behaviour states for a single actor or
//! subsystem driven by a host loop. States are registered once, then pushed
//! on top of each other, popped back off, or changed in place. Only the top
//! of the stack is ticked and receives messages; the states beneath it are
//! suspended until they are woken up again.
//!
//! # Core Concepts
//!
//! - **State**: Lifecycle hooks via the `State` trait, all optional
//! - **Machine**: Registry plus linked stack with a permanent floor state
//! - **Context**: A state's handle on its machine, used to request transitions
//! - **Diagnostics**: Bad requests are reported to a sink, never panicked on
//!
//! # Example
//!
//! ```rust
//! use stackfsm::core::{Context, State};
//! use stackfsm::machine::Machine;
//!
//! #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
//! enum Mode {
//!     Patrol,
//!     Alert,
//! }
//!
//! #[derive(Debug)]
//! enum Event {
//!     Noise { loudness: u8 },
//! }
//!
//! struct Patrol;
//! struct Alert {
//!     ticks_left: u32,
//! }
//!
//! impl State<Mode, Event> for Patrol {
//!     fn on_message(&mut self, msg: &Event, ctx: &mut Context<'_, Mode>) {
//!         let Event::Noise { loudness } = msg;
//!         if *loudness > 5 {
//!             ctx.push(Mode::Alert);
//!         }
//!     }
//! }
//!
//! impl State<Mode, Event> for Alert {
//!     fn on_enter(&mut self, _ctx: &mut Context<'_, Mode>) {
//!         self.ticks_left = 2;
//!     }
//!
//!     fn on_update(&mut self, ctx: &mut Context<'_, Mode>) {
//!         self.ticks_left -= 1;
//!         if self.ticks_left == 0 {
//!             ctx.pop();
//!         }
//!     }
//! }
//!
//! let mut machine: Machine<Mode, Event> = Machine::new();
//! machine.register(Mode::Patrol, Patrol);
//! machine.register(Mode::Alert, Alert { ticks_left: 0 });
//! machine.push(&Mode::Patrol);
//!
//! machine.dispatch(&Event::Noise { loudness: 9 });
//! assert_eq!(machine.current_id(), Some(&Mode::Alert));
//!
//! machine.update();
//! machine.update();
//! assert_eq!(machine.current_id(), Some(&Mode::Patrol));
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod diagnostics;
pub mod machine;

// Re-export commonly used types
pub use builder::{BuildError, MachineBuilder};
pub use config::MachineConfig;
pub use crate::core::{Context, State, StateId, TransitionKind, TransitionLog, TransitionRecord};
pub use diagnostics::{DiagnosticSink, FsmError, RecordingSink, TracingSink};
pub use machine::{Lifecycle, Machine, StateHandle};
