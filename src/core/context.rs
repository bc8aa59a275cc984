//! Hook context: a state's view of its owning machine.
//!
//! Hooks cannot borrow the machine while it is mid-transition, so transition
//! requests made from inside a hook are queued and applied once the machine
//! call that fired the hook has finished.

use std::collections::VecDeque;
use uuid::Uuid;

/// Transition requested from inside a hook.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Command<Id> {
    Push(Id),
    Pop,
    Change(Id),
    PopTo(Id),
    Clear,
}

/// Context passed to every [`State`](super::State) hook.
///
/// # Example
///
/// ```rust
/// use stackfsm::core::{Context, State};
/// use stackfsm::machine::Machine;
///
/// struct Menu;
/// struct Options;
///
/// impl State<&'static str> for Menu {
///     fn on_enter(&mut self, ctx: &mut Context<'_, &'static str>) {
///         ctx.push("options");
///     }
/// }
///
/// impl State<&'static str> for Options {}
///
/// let mut machine: Machine<&'static str> = Machine::new();
/// machine.register("menu", Menu);
/// machine.register("options", Options);
///
/// assert!(machine.push(&"menu"));
/// assert_eq!(machine.current_id(), Some(&"options"));
/// assert_eq!(machine.depth(), 2);
/// ```
pub struct Context<'a, Id> {
    machine: Uuid,
    id: Option<&'a Id>,
    pending: &'a mut VecDeque<Command<Id>>,
}

impl<'a, Id> Context<'a, Id> {
    pub(crate) fn new(
        machine: Uuid,
        id: Option<&'a Id>,
        pending: &'a mut VecDeque<Command<Id>>,
    ) -> Self {
        Self {
            machine,
            id,
            pending,
        }
    }

    /// Identifier the running state was registered under.
    pub fn id(&self) -> Option<&Id> {
        self.id
    }

    /// Identity of the owning machine.
    pub fn machine_id(&self) -> Uuid {
        self.machine
    }

    /// Request a push by identifier.
    pub fn push(&mut self, id: Id) {
        self.pending.push_back(Command::Push(id));
    }

    /// Request a pop of the current state.
    pub fn pop(&mut self) {
        self.pending.push_back(Command::Pop);
    }

    /// Request the current state be replaced by `id`.
    pub fn change(&mut self, id: Id) {
        self.pending.push_back(Command::Change(id));
    }

    /// Request states above `id` be popped until it is current.
    pub fn pop_to(&mut self, id: Id) {
        self.pending.push_back(Command::PopTo(id));
    }

    /// Request every state be popped down to the floor.
    pub fn clear(&mut self) {
        self.pending.push_back(Command::Clear);
    }

    /// Number of requests waiting to be applied, including ones queued by
    /// earlier hooks in the same machine call.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}
