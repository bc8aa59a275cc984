//! End-to-end lifecycle scenarios driven through the public API.

use stackfsm::core::{Context, State, TransitionKind};
use stackfsm::diagnostics::{FsmError, Operation, RecordingSink};
use stackfsm::{Lifecycle, Machine, MachineBuilder, MachineConfig};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum Mode {
    Idle,
    Walk,
    Menu,
}

#[derive(Debug)]
enum Msg {
    Damage(u32),
    OpenMenu,
}

type Journal = Rc<RefCell<Vec<String>>>;

struct Actor {
    journal: Journal,
    health: u32,
}

impl Actor {
    fn new(journal: &Journal) -> Self {
        Self {
            journal: Rc::clone(journal),
            health: 100,
        }
    }

    fn log(&self, ctx: &Context<'_, Mode>, hook: &str) {
        let id = ctx.id().map(|id| format!("{id:?}")).unwrap_or_default();
        self.journal.borrow_mut().push(format!("{id}:{hook}"));
    }
}

impl State<Mode, Msg> for Actor {
    fn on_enter(&mut self, ctx: &mut Context<'_, Mode>) {
        self.log(ctx, "enter");
    }

    fn on_exit(&mut self, ctx: &mut Context<'_, Mode>) {
        self.log(ctx, "exit");
    }

    fn on_suspend(&mut self, ctx: &mut Context<'_, Mode>) {
        self.log(ctx, "suspend");
    }

    fn on_wake_up(&mut self, ctx: &mut Context<'_, Mode>) {
        self.log(ctx, "wake");
    }

    fn on_message(&mut self, msg: &Msg, ctx: &mut Context<'_, Mode>) {
        match msg {
            Msg::Damage(amount) => {
                self.health = self.health.saturating_sub(*amount);
                self.log(ctx, &format!("health={}", self.health));
            }
            Msg::OpenMenu => ctx.push(Mode::Menu),
        }
    }
}

fn drain(journal: &Journal) -> Vec<String> {
    std::mem::take(&mut *journal.borrow_mut())
}

fn machine_with(journal: &Journal, sink: &RecordingSink) -> Machine<Mode, Msg> {
    let mut machine: Machine<Mode, Msg> = Machine::new().with_sink(sink.clone());
    machine.register(Mode::Idle, Actor::new(journal));
    machine.register(Mode::Walk, Actor::new(journal));
    machine.register(Mode::Menu, Actor::new(journal));
    machine
}

#[test]
fn push_push_pop_scenario() {
    let journal = Journal::default();
    let sink = RecordingSink::new();
    let mut machine = machine_with(&journal, &sink);

    assert!(machine.push(&Mode::Idle));
    assert_eq!(drain(&journal), vec!["Idle:enter"]);

    assert!(machine.push(&Mode::Walk));
    assert_eq!(drain(&journal), vec!["Idle:suspend", "Walk:enter"]);
    assert_eq!(machine.current_id(), Some(&Mode::Walk));

    machine.pop();
    assert_eq!(drain(&journal), vec!["Walk:exit", "Idle:wake"]);
    assert_eq!(machine.current_id(), Some(&Mode::Idle));
    assert_eq!(machine.lifecycle(&Mode::Walk), Some(Lifecycle::Idle));

    // Walk was detached by the pop, Idle still sits on the floor.
    assert!(machine.push(&Mode::Walk));
    machine.pop();
    drain(&journal);
    assert!(!machine.push(&Mode::Idle));
    assert_eq!(
        sink.take(),
        vec![FsmError::AlreadyActive {
            operation: Operation::Push,
            id: "Idle".to_string()
        }]
    );
    assert!(drain(&journal).is_empty());
}

#[test]
fn messages_go_to_the_top_state_only() {
    let journal = Journal::default();
    let sink = RecordingSink::new();
    let mut machine = machine_with(&journal, &sink);
    machine.push(&Mode::Idle);
    machine.push(&Mode::Walk);
    drain(&journal);

    machine.dispatch(&Msg::Damage(30));
    machine.dispatch(&Msg::Damage(30));
    assert_eq!(drain(&journal), vec!["Walk:health=70", "Walk:health=40"]);

    machine.pop();
    drain(&journal);
    machine.dispatch(&Msg::Damage(10));
    assert_eq!(drain(&journal), vec!["Idle:health=90"]);
}

#[test]
fn message_handler_can_push_a_state() {
    let journal = Journal::default();
    let sink = RecordingSink::new();
    let mut machine = machine_with(&journal, &sink);
    machine.push(&Mode::Walk);
    drain(&journal);

    machine.dispatch(&Msg::OpenMenu);

    assert_eq!(drain(&journal), vec!["Walk:suspend", "Menu:enter"]);
    assert_eq!(machine.stack(), vec![&Mode::Walk, &Mode::Menu]);

    // Menu is already on the stack, a second request is refused.
    machine.dispatch(&Msg::OpenMenu);
    assert_eq!(machine.depth(), 2);
    assert_eq!(sink.len(), 1);
}

#[test]
fn change_preserves_what_lies_beneath() {
    let journal = Journal::default();
    let sink = RecordingSink::new();
    let mut machine = machine_with(&journal, &sink);
    machine.push(&Mode::Idle);
    machine.push(&Mode::Walk);

    assert!(machine.change(&Mode::Menu));
    assert_eq!(machine.depth(), 2);

    machine.pop();
    assert_eq!(machine.current_id(), Some(&Mode::Idle));

    let kinds: Vec<_> = machine.history().records().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TransitionKind::Push,
            TransitionKind::Push,
            TransitionKind::Change,
            TransitionKind::Pop,
        ]
    );
}

#[test]
fn builder_takes_config_from_json() {
    let config = MachineConfig::from_json(r#"{ "guard_change_by_id": true }"#).unwrap();
    let journal = Journal::default();
    let sink = RecordingSink::new();

    let Ok(mut machine) = MachineBuilder::<Mode, Msg>::new()
        .config(config)
        .sink(sink.clone())
        .state(Mode::Idle, Actor::new(&journal))
        .state(Mode::Walk, Actor::new(&journal))
        .initial(Mode::Idle)
        .build()
    else {
        panic!("Expected machine to build");
    };

    machine.push(&Mode::Walk);
    assert!(!machine.change(&Mode::Idle));
    assert_eq!(machine.stack(), vec![&Mode::Idle, &Mode::Walk]);
    assert_eq!(sink.len(), 1);
}
