//! Builder for constructing stack machines.

use crate::builder::error::BuildError;
use crate::config::MachineConfig;
use crate::core::{State, StateId};
use crate::diagnostics::DiagnosticSink;
use crate::machine::Machine;
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for constructing machines with a fluent API.
///
/// # Example
///
/// ```rust
/// use stackfsm::builder::MachineBuilder;
/// use stackfsm::core::State;
///
/// struct Title;
/// struct Playing;
///
/// impl State<&'static str> for Title {}
/// impl State<&'static str> for Playing {}
///
/// let Ok(machine) = MachineBuilder::<&'static str>::new()
///     .state("title", Title)
///     .state("playing", Playing)
///     .initial("title")
///     .build()
/// else {
///     panic!("machine should build");
/// };
///
/// assert_eq!(machine.current_id(), Some(&"title"));
/// assert_eq!(machine.len(), 2);
/// ```
pub struct MachineBuilder<Id: StateId, M = ()> {
    config: MachineConfig,
    sink: Option<Box<dyn DiagnosticSink>>,
    states: Vec<(Id, Box<dyn State<Id, M>>)>,
    initial: Option<Id>,
}

impl<Id: StateId, M: 'static> MachineBuilder<Id, M> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: MachineConfig::default(),
            sink: None,
            states: Vec::new(),
            initial: None,
        }
    }

    /// Set the configuration (optional, defaults apply otherwise).
    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the diagnostic sink (optional, defaults to `tracing`).
    pub fn sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Add a state under `id`.
    pub fn state(mut self, id: Id, state: impl State<Id, M> + 'static) -> Self {
        self.states.push((id, Box::new(state)));
        self
    }

    /// Push `id` once the machine is built (optional).
    pub fn initial(mut self, id: Id) -> Self {
        self.initial = Some(id);
        self
    }

    /// Build the machine.
    ///
    /// Returns every duplicate identifier, a missing initial state and an
    /// invalid config together.
    pub fn build(self) -> Result<Machine<Id, M>, NonEmptyVec<BuildError>> {
        if let Validation::Failure(errors) = self.validate() {
            return Err(errors);
        }

        let mut machine = Machine::with_config(self.config);
        if let Some(sink) = self.sink {
            machine.replace_sink(sink);
        }
        for (id, state) in self.states {
            machine.register_boxed(id, state);
        }
        if let Some(initial) = self.initial {
            machine.push(&initial);
        }
        Ok(machine)
    }

    fn validate(&self) -> Validation<(), NonEmptyVec<BuildError>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<BuildError>>> = Vec::new();

        checks.push(match self.config.validate() {
            Ok(()) => Validation::success(()),
            Err(err) => Validation::fail(BuildError::InvalidConfig(err.to_string())),
        });

        let mut seen = HashSet::new();
        for (id, _) in &self.states {
            let check = if seen.insert(id) {
                Validation::success(())
            } else {
                Validation::fail(BuildError::DuplicateState {
                    id: format!("{id:?}"),
                })
            };
            checks.push(check);
        }

        if let Some(initial) = &self.initial {
            let check = if seen.contains(initial) {
                Validation::success(())
            } else {
                Validation::fail(BuildError::UnknownInitialState {
                    id: format!("{initial:?}"),
                })
            };
            checks.push(check);
        }

        Validation::all_vec(checks).map(|_| ())
    }
}

impl<Id: StateId, M: 'static> Default for MachineBuilder<Id, M> {
    fn default() -> Self {
        Self::new()
    }
}
