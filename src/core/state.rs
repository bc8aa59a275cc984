//! Lifecycle hooks implemented by machine states.
//!
//! A state is a unit of behaviour owned by a [`Machine`](crate::machine::Machine).
//! Every hook has an empty default body, so concrete states override only
//! what they need.

use super::context::Context;

/// Behaviour of a single state on a stackable machine.
///
/// `Id` is the identifier type of the owning machine and `M` the message
/// type accepted by [`Machine::dispatch`](crate::machine::Machine::dispatch).
///
/// Hook order per transition:
///
/// - push: `on_suspend` on the old top, then `on_enter` on the new top
/// - pop: `on_exit` on the old top, then `on_wake_up` on the state beneath
/// - change: `on_exit` on the old top, then `on_enter` on the replacement
///
/// # Example
///
/// ```rust
/// use stackfsm::core::{Context, State};
///
/// #[derive(Default)]
/// struct Patrol {
///     ticks: u32,
/// }
///
/// impl State<&'static str> for Patrol {
///     fn name(&self) -> &str {
///         "Patrol"
///     }
///
///     fn on_update(&mut self, ctx: &mut Context<'_, &'static str>) {
///         self.ticks += 1;
///         if self.ticks == 3 {
///             ctx.change("chase");
///         }
///     }
/// }
/// ```
pub trait State<Id, M = ()> {
    /// Name used in log output. Defaults to the implementing type's name.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Called right after this state becomes current through a push or a change.
    fn on_enter(&mut self, _ctx: &mut Context<'_, Id>) {}

    /// Called right before this state stops being current through a pop or a change.
    fn on_exit(&mut self, _ctx: &mut Context<'_, Id>) {}

    /// Called when another state is pushed on top of this one.
    fn on_suspend(&mut self, _ctx: &mut Context<'_, Id>) {}

    /// Called when this state becomes current again after a pop.
    fn on_wake_up(&mut self, _ctx: &mut Context<'_, Id>) {}

    /// Per-tick hook, only called on the current state.
    fn on_update(&mut self, _ctx: &mut Context<'_, Id>) {}

    /// Fixed-step tick hook, only called on the current state.
    fn on_fixed_update(&mut self, _ctx: &mut Context<'_, Id>) {}

    /// Synchronous message handler, only called on the current state.
    fn on_message(&mut self, _msg: &M, _ctx: &mut Context<'_, Id>) {}
}

/// Permanent bottom of every stack. Has no identifier and does nothing.
pub(crate) struct Floor;

impl<Id, M> State<Id, M> for Floor {
    fn name(&self) -> &str {
        "<floor>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use uuid::Uuid;

    struct Silent;

    impl State<u8, String> for Silent {}

    struct Counter {
        hits: usize,
    }

    impl State<u8, String> for Counter {
        fn name(&self) -> &str {
            "Counter"
        }

        fn on_message(&mut self, msg: &String, _ctx: &mut Context<'_, u8>) {
            self.hits += msg.len();
        }
    }

    #[test]
    fn default_hooks_do_nothing() {
        let mut pending = VecDeque::new();
        let mut ctx = Context::new(Uuid::new_v4(), Some(&1u8), &mut pending);
        let mut state = Silent;

        state.on_enter(&mut ctx);
        state.on_exit(&mut ctx);
        state.on_suspend(&mut ctx);
        state.on_wake_up(&mut ctx);
        state.on_update(&mut ctx);
        state.on_fixed_update(&mut ctx);
        state.on_message(&"ping".to_string(), &mut ctx);

        assert_eq!(ctx.pending(), 0);
    }

    #[test]
    fn default_name_is_type_name() {
        let state = Silent;
        let name = <Silent as State<u8, String>>::name(&state);
        assert!(name.ends_with("Silent"));
    }

    #[test]
    fn overridden_hooks_run() {
        let mut pending = VecDeque::new();
        let mut ctx = Context::new(Uuid::new_v4(), None, &mut pending);
        let mut state = Counter { hits: 0 };

        state.on_message(&"abc".to_string(), &mut ctx);
        state.on_message(&"de".to_string(), &mut ctx);

        assert_eq!(state.hits, 5);
        assert_eq!(state.name(), "Counter");
    }

    #[test]
    fn floor_is_named() {
        let floor = Floor;
        assert_eq!(<Floor as State<u8>>::name(&floor), "<floor>");
    }
}
