//! Arena storage for registered states.

use crate::core::State;
use uuid::Uuid;

/// Arena slot of the floor state.
pub(crate) const FLOOR: usize = 0;

/// Where a registered state currently sits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    /// Registered but not on the stack.
    Idle,
    /// Top of the stack.
    Active,
    /// On the stack underneath the active state.
    Suspended,
}

/// By-reference form of a registered state.
///
/// Returned by [`Machine::register`](super::Machine::register) and
/// [`Machine::handle`](super::Machine::handle). Only valid on the machine
/// that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StateHandle {
    pub(crate) machine: Uuid,
    pub(crate) index: usize,
}

/// One registered state plus its stack links.
///
/// `prev` and `next` are arena indices and never own anything.
pub(crate) struct Node<Id, M> {
    pub(crate) id: Option<Id>,
    pub(crate) state: Box<dyn State<Id, M>>,
    pub(crate) prev: Option<usize>,
    pub(crate) next: Option<usize>,
}

impl<Id, M> Node<Id, M> {
    pub(crate) fn new(id: Option<Id>, state: Box<dyn State<Id, M>>) -> Self {
        Self {
            id,
            state,
            prev: None,
            next: None,
        }
    }

    pub(crate) fn is_linked(&self) -> bool {
        self.prev.is_some() || self.next.is_some()
    }

    pub(crate) fn detach(&mut self) {
        self.prev = None;
        self.next = None;
    }
}
