//! State identifiers.

use std::fmt::Debug;
use std::hash::Hash;

/// Identifier used to register and look up states.
///
/// Any `Clone + Eq + Hash + Debug` type qualifies through the blanket
/// implementation; a closed host enum is the usual choice.
///
/// # Example
///
/// ```rust
/// use stackfsm::core::StateId;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Mode {
///     Idle,
///     Attack,
/// }
///
/// fn takes_id<Id: StateId>(_id: Id) {}
///
/// takes_id(Mode::Idle);
/// takes_id("menu");
/// takes_id(7u32);
/// ```
pub trait StateId: Clone + Eq + Hash + Debug + 'static {}

impl<T> StateId for T where T: Clone + Eq + Hash + Debug + 'static {}
