//! Stack machine that drives registered states through their lifecycle hooks.

use super::node::{Lifecycle, Node, StateHandle, FLOOR};
use crate::config::MachineConfig;
use crate::core::{
    Command, Context, Floor, State, StateId, TransitionKind, TransitionLog, TransitionRecord,
};
use crate::diagnostics::{DiagnosticSink, FsmError, Operation, TracingSink};
use chrono::Utc;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use uuid::Uuid;

#[derive(Clone, Copy)]
enum Hook {
    Enter,
    Exit,
    Suspend,
    WakeUp,
    Update,
    FixedUpdate,
}

/// Stackable finite state machine.
///
/// States are registered once under an identifier and then pushed, popped
/// and changed. Only the top of the stack receives ticks and messages.
///
/// # Example
///
/// ```rust
/// use stackfsm::core::{Context, State};
/// use stackfsm::machine::{Lifecycle, Machine};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum Mode {
///     Explore,
///     Inventory,
/// }
///
/// struct Explore;
/// struct Inventory;
///
/// impl State<Mode> for Explore {}
/// impl State<Mode> for Inventory {}
///
/// let mut machine: Machine<Mode> = Machine::new();
/// machine.register(Mode::Explore, Explore);
/// machine.register(Mode::Inventory, Inventory);
///
/// assert!(machine.push(&Mode::Explore));
/// assert!(machine.push(&Mode::Inventory));
/// assert_eq!(machine.lifecycle(&Mode::Explore), Some(Lifecycle::Suspended));
///
/// machine.pop();
/// assert_eq!(machine.current_id(), Some(&Mode::Explore));
/// assert_eq!(machine.lifecycle(&Mode::Inventory), Some(Lifecycle::Idle));
/// ```
pub struct Machine<Id: StateId, M = ()> {
    id: Uuid,
    config: MachineConfig,
    registry: HashMap<Id, usize>,
    nodes: Vec<Node<Id, M>>,
    current: usize,
    pending: VecDeque<Command<Id>>,
    history: TransitionLog<Id>,
    sink: Box<dyn DiagnosticSink>,
}

impl<Id: StateId, M: 'static> Machine<Id, M> {
    /// Create a machine with the default configuration, reporting to `tracing`.
    pub fn new() -> Self {
        Self::with_config(MachineConfig::default())
    }

    /// Create a machine with an explicit configuration.
    ///
    /// The configuration is not validated here; a `max_deferred_commands`
    /// of zero is raised to one so hooks can still request a transition.
    /// Use [`MachineBuilder`](crate::builder::MachineBuilder) to have invalid
    /// values rejected instead.
    pub fn with_config(mut config: MachineConfig) -> Self {
        config.max_deferred_commands = config.max_deferred_commands.max(1);
        Self {
            id: Uuid::new_v4(),
            history: TransitionLog::with_capacity(config.history_capacity),
            config,
            registry: HashMap::new(),
            nodes: vec![Node::new(None, Box::new(Floor))],
            current: FLOOR,
            pending: VecDeque::new(),
            sink: Box::new(TracingSink),
        }
    }

    /// Replace the diagnostic sink.
    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.set_sink(sink);
        self
    }

    pub fn set_sink(&mut self, sink: impl DiagnosticSink + 'static) {
        self.replace_sink(Box::new(sink));
    }

    pub(crate) fn replace_sink(&mut self, sink: Box<dyn DiagnosticSink>) {
        self.sink = sink;
    }

    /// Register `state` under `id`.
    ///
    /// Returns `None` and reports [`FsmError::DuplicateRegistration`] if `id`
    /// is already taken; the earlier state stays bound.
    pub fn register(&mut self, id: Id, state: impl State<Id, M> + 'static) -> Option<StateHandle> {
        self.register_boxed(id, Box::new(state))
    }

    pub fn register_boxed(&mut self, id: Id, state: Box<dyn State<Id, M>>) -> Option<StateHandle> {
        if self.registry.contains_key(&id) {
            self.report(FsmError::duplicate(&id));
            return None;
        }

        let index = self.nodes.len();
        tracing::trace!(machine = %self.id, id = ?id, state = state.name(), "state registered");
        self.nodes.push(Node::new(Some(id.clone()), state));
        self.registry.insert(id, index);
        Some(self.handle_at(index))
    }

    /// Push the state registered under `id`.
    ///
    /// Fails with `false` if `id` is unknown or the state is already on a
    /// stack.
    pub fn push(&mut self, id: &Id) -> bool {
        let pushed = self.try_push(id);
        self.drain();
        pushed
    }

    /// Push a state by handle, suspending the current one.
    ///
    /// Unlike [`push`](Self::push) this does not check whether the state is
    /// already on the stack.
    pub fn push_handle(&mut self, handle: StateHandle) {
        if let Some(index) = self.resolve(handle, Operation::Push) {
            self.link_push(index);
        }
        self.drain();
    }

    /// Pop the current state and wake the one beneath.
    ///
    /// With only the floor left this reports [`FsmError::EmptyStackPop`] and
    /// fires no hooks.
    pub fn pop(&mut self) {
        self.unlink_pop();
        self.drain();
    }

    /// Replace the current state with the one registered under `id`.
    ///
    /// The replacement is not checked for being on the stack already unless
    /// `MachineConfig::guard_change_by_id` is set. Without the guard, a
    /// replacement that is suspended lower down is taken out of its old slot
    /// and entered again at the top, so every state appears on the stack at
    /// most once.
    pub fn change(&mut self, id: &Id) -> bool {
        let changed = self.try_change(id);
        self.drain();
        changed
    }

    /// Replace the current state by handle without changing stack depth.
    pub fn change_handle(&mut self, handle: StateHandle) {
        if let Some(index) = self.resolve(handle, Operation::Change) {
            self.link_change(index);
        }
        self.drain();
    }

    /// Pop every state above `id` so that it becomes current.
    ///
    /// Each popped state gets `on_exit`; only `id` gets `on_wake_up`.
    /// Returns `true` without firing anything if `id` is already current.
    pub fn pop_to(&mut self, id: &Id) -> bool {
        let popped = self.try_pop_to(id);
        self.drain();
        popped
    }

    /// Pop every state down to the floor.
    ///
    /// Each popped state gets `on_exit`; nothing is woken if the floor was
    /// already current.
    pub fn clear(&mut self) {
        self.unwind_to(FLOOR);
        self.drain();
    }

    /// Forward a frame tick to the current state.
    pub fn update(&mut self) {
        self.fire(self.current, Hook::Update);
        self.drain();
    }

    /// Forward a fixed-step tick to the current state.
    pub fn fixed_update(&mut self) {
        self.fire(self.current, Hook::FixedUpdate);
        self.drain();
    }

    /// Deliver `msg` to the current state only.
    pub fn dispatch(&mut self, msg: &M) {
        let node = &mut self.nodes[self.current];
        let mut ctx = Context::new(self.id, node.id.as_ref(), &mut self.pending);
        node.state.on_message(msg, &mut ctx);
        self.drain();
    }

    pub fn machine_id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn history(&self) -> &TransitionLog<Id> {
        &self.history
    }

    /// Identifier of the current state, `None` while only the floor is left.
    pub fn current_id(&self) -> Option<&Id> {
        self.nodes[self.current].id.as_ref()
    }

    pub fn current_handle(&self) -> Option<StateHandle> {
        (self.current != FLOOR).then(|| self.handle_at(self.current))
    }

    pub fn handle(&self, id: &Id) -> Option<StateHandle> {
        self.registry.get(id).map(|&index| self.handle_at(index))
    }

    pub fn is_registered(&self, id: &Id) -> bool {
        self.registry.contains_key(id)
    }

    /// Number of registered states.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Registered identifiers, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &Id> {
        self.registry.keys()
    }

    pub fn state_name(&self, id: &Id) -> Option<&str> {
        let &index = self.registry.get(id)?;
        Some(self.nodes[index].state.name())
    }

    pub fn lifecycle(&self, id: &Id) -> Option<Lifecycle> {
        let &index = self.registry.get(id)?;
        Some(if index == self.current {
            Lifecycle::Active
        } else if self.nodes[index].is_linked() {
            Lifecycle::Suspended
        } else {
            Lifecycle::Idle
        })
    }

    /// Number of states above the floor.
    pub fn depth(&self) -> usize {
        self.chain().len()
    }

    /// Identifiers on the stack, bottom first.
    pub fn stack(&self) -> Vec<&Id> {
        self.chain()
            .into_iter()
            .rev()
            .filter_map(|index| self.nodes[index].id.as_ref())
            .collect()
    }

    fn try_push(&mut self, id: &Id) -> bool {
        let Some(&index) = self.registry.get(id) else {
            self.report(FsmError::unknown(Operation::Push, id));
            return false;
        };
        if self.nodes[index].prev.is_some() {
            self.report(FsmError::already_active(Operation::Push, id));
            return false;
        }

        self.link_push(index);
        true
    }

    fn try_change(&mut self, id: &Id) -> bool {
        let Some(&index) = self.registry.get(id) else {
            self.report(FsmError::unknown(Operation::Change, id));
            return false;
        };
        if self.config.guard_change_by_id && self.nodes[index].prev.is_some() {
            self.report(FsmError::already_active(Operation::Change, id));
            return false;
        }

        self.link_change(index);
        true
    }

    fn try_pop_to(&mut self, id: &Id) -> bool {
        let Some(&target) = self.registry.get(id) else {
            self.report(FsmError::unknown(Operation::PopTo, id));
            return false;
        };
        if target == self.current {
            return true;
        }
        if !self.chain().contains(&target) {
            self.report(FsmError::not_on_stack(id));
            return false;
        }

        self.unwind_to(target)
    }

    fn link_push(&mut self, index: usize) {
        let below = self.current;
        self.fire(below, Hook::Suspend);

        self.nodes[index].prev = Some(below);
        self.nodes[below].next = Some(index);
        self.current = index;

        self.fire(index, Hook::Enter);
        self.log_transition(TransitionKind::Push, below, index);
    }

    fn unlink_pop(&mut self) -> bool {
        if self.current == FLOOR {
            self.report(FsmError::EmptyStackPop);
            return false;
        }

        self.drop_top();
        self.fire(self.current, Hook::WakeUp);
        true
    }

    /// Exit the current state and make the entry beneath it current without
    /// waking it. The caller must not call this on the floor.
    fn drop_top(&mut self) {
        let top = self.current;
        let below = self.beneath();

        self.fire(top, Hook::Exit);
        self.release(top);
        self.current = below;
        self.log_transition(TransitionKind::Pop, top, below);
    }

    fn link_change(&mut self, index: usize) {
        let old = self.current;
        // A replacement that is already lower on the stack moves to the top.
        if index != old {
            self.splice_out(index);
        }

        // The floor is never replaced; changing from it links above it.
        let below = if old == FLOOR {
            FLOOR
        } else {
            let below = self.beneath();
            self.fire(old, Hook::Exit);
            self.release(old);
            below
        };

        self.nodes[index].prev = Some(below);
        self.nodes[below].next = Some(index);
        self.current = index;

        self.fire(index, Hook::Enter);
        self.log_transition(TransitionKind::Change, old, index);
    }

    /// Exit states from the top until `target` is current, then wake it.
    ///
    /// Returns `false` and reports [`FsmError::NotOnStack`] if the floor is
    /// reached first. Nothing is woken unless at least one state was popped.
    fn unwind_to(&mut self, target: usize) -> bool {
        let mut popped = false;

        while self.current != target {
            if self.current == FLOOR {
                // Only the floor has no id, and the floor is never missed.
                let error = match &self.nodes[target].id {
                    Some(id) => FsmError::not_on_stack(id),
                    None => FsmError::EmptyStackPop,
                };
                self.report(error);
                return false;
            }
            self.drop_top();
            popped = true;
        }

        if popped {
            self.fire(self.current, Hook::WakeUp);
        }
        true
    }

    /// Apply hook-requested transitions in request order.
    fn drain(&mut self) {
        let limit = self.config.max_deferred_commands;
        let mut applied = 0;

        while let Some(command) = self.pending.pop_front() {
            if applied == limit {
                let dropped = self.pending.len() + 1;
                self.pending.clear();
                self.report(FsmError::CommandLimitExceeded { limit, dropped });
                break;
            }
            applied += 1;

            match command {
                Command::Push(id) => {
                    self.try_push(&id);
                }
                Command::Pop => {
                    self.unlink_pop();
                }
                Command::Change(id) => {
                    self.try_change(&id);
                }
                Command::PopTo(id) => {
                    self.try_pop_to(&id);
                }
                Command::Clear => {
                    self.unwind_to(FLOOR);
                }
            }
        }
    }

    fn fire(&mut self, index: usize, hook: Hook) {
        let node = &mut self.nodes[index];
        let mut ctx = Context::new(self.id, node.id.as_ref(), &mut self.pending);
        let state = &mut node.state;

        match hook {
            Hook::Enter => state.on_enter(&mut ctx),
            Hook::Exit => state.on_exit(&mut ctx),
            Hook::Suspend => state.on_suspend(&mut ctx),
            Hook::WakeUp => state.on_wake_up(&mut ctx),
            Hook::Update => state.on_update(&mut ctx),
            Hook::FixedUpdate => state.on_fixed_update(&mut ctx),
        }
    }

    fn log_transition(&mut self, kind: TransitionKind, from: usize, to: usize) {
        let from = self.nodes[from].id.clone();
        let to = self.nodes[to].id.clone();
        let depth = self.depth();

        tracing::debug!(
            machine = %self.id,
            kind = %kind,
            from = ?from,
            to = ?to,
            depth,
            "State transition"
        );

        self.history.record(TransitionRecord {
            kind,
            from,
            to,
            depth,
            timestamp: Utc::now(),
        });
    }

    fn resolve(&mut self, handle: StateHandle, operation: Operation) -> Option<usize> {
        if handle.machine != self.id || handle.index == FLOOR || handle.index >= self.nodes.len()
        {
            self.report(FsmError::ForeignHandle { operation });
            return None;
        }
        Some(handle.index)
    }

    /// Arena indices from the current state down to, not including, the
    /// floor. Stops at a missing link or at an index already walked, so a
    /// chain made cyclic through [`push_handle`](Self::push_handle) still
    /// ends.
    fn chain(&self) -> Vec<usize> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = Some(self.current);

        while let Some(index) = cursor {
            if index == FLOOR || !seen.insert(index) {
                break;
            }
            chain.push(index);
            cursor = self.nodes[index].prev;
        }
        chain
    }

    /// The entry that becomes current once the top is gone. A chain that
    /// ends early rests on the floor.
    fn beneath(&self) -> usize {
        self.chain().get(1).copied().unwrap_or(FLOOR)
    }

    /// Detach `index` and drop every link that still points at it.
    fn release(&mut self, index: usize) {
        self.nodes[index].detach();
        for node in &mut self.nodes {
            if node.prev == Some(index) {
                node.prev = None;
            }
            if node.next == Some(index) {
                node.next = None;
            }
        }
    }

    /// Take `index` out of the middle of the stack, joining its neighbours.
    fn splice_out(&mut self, index: usize) {
        let (prev, next) = (self.nodes[index].prev, self.nodes[index].next);
        self.release(index);

        if let (Some(prev), Some(next)) = (prev, next) {
            if prev != index && next != index {
                self.nodes[prev].next = Some(next);
                self.nodes[next].prev = Some(prev);
            }
        }
    }

    fn handle_at(&self, index: usize) -> StateHandle {
        StateHandle {
            machine: self.id,
            index,
        }
    }

    fn report(&mut self, error: FsmError) {
        self.sink.report(self.id, &error);
    }
}

impl<Id: StateId, M: 'static> Default for Machine<Id, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Id: StateId, M: 'static> fmt::Debug for Machine<Id, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("id", &self.id)
            .field("current", &self.current_id())
            .field("stack", &self.stack())
            .field("registered", &self.registry.len())
            .finish()
    }
}
