//! Soft failures reported by the machine.

use std::fmt;
use thiserror::Error;

/// Machine operation that looked up a state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Push,
    Change,
    PopTo,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Push => write!(f, "push"),
            Self::Change => write!(f, "change to"),
            Self::PopTo => write!(f, "pop to"),
        }
    }
}

/// Errors detected while driving a machine.
///
/// None of these abort anything: the machine reports them to its
/// [`DiagnosticSink`](super::DiagnosticSink) and carries on, leaving the
/// stack as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsmError {
    #[error("Can't {operation} state, [{id}] does not exist in the registry")]
    UnknownIdentifier { operation: Operation, id: String },

    #[error("Can't {operation} state, [{id}] already in use")]
    AlreadyActive { operation: Operation, id: String },

    #[error("Can't register state, [{id}] already exists")]
    DuplicateRegistration { id: String },

    #[error("Can't pop state, nothing above the floor")]
    EmptyStackPop,

    #[error("Can't pop to state, [{id}] is not on the stack")]
    NotOnStack { id: String },

    #[error("Can't {operation} state, handle belongs to another machine")]
    ForeignHandle { operation: Operation },

    #[error("Deferred command limit ({limit}) exceeded, dropped {dropped} command(s)")]
    CommandLimitExceeded { limit: usize, dropped: usize },
}

impl FsmError {
    pub(crate) fn unknown(operation: Operation, id: &impl fmt::Debug) -> Self {
        Self::UnknownIdentifier {
            operation,
            id: format!("{id:?}"),
        }
    }

    pub(crate) fn already_active(operation: Operation, id: &impl fmt::Debug) -> Self {
        Self::AlreadyActive {
            operation,
            id: format!("{id:?}"),
        }
    }

    pub(crate) fn duplicate(id: &impl fmt::Debug) -> Self {
        Self::DuplicateRegistration {
            id: format!("{id:?}"),
        }
    }

    pub(crate) fn not_on_stack(id: &impl fmt::Debug) -> Self {
        Self::NotOnStack {
            id: format!("{id:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    enum Mode {
        Attack,
    }

    #[test]
    fn messages_name_the_identifier() {
        let err = FsmError::unknown(Operation::Push, &Mode::Attack);
        assert_eq!(
            err.to_string(),
            "Can't push state, [Attack] does not exist in the registry"
        );

        let err = FsmError::already_active(Operation::Change, &Mode::Attack);
        assert_eq!(err.to_string(), "Can't change to state, [Attack] already in use");

        let err = FsmError::duplicate(&"menu");
        assert_eq!(err.to_string(), "Can't register state, [\"menu\"] already exists");
    }

    #[test]
    fn stack_errors_display() {
        assert_eq!(
            FsmError::EmptyStackPop.to_string(),
            "Can't pop state, nothing above the floor"
        );
        assert_eq!(
            FsmError::not_on_stack(&4).to_string(),
            "Can't pop to state, [4] is not on the stack"
        );
        assert_eq!(
            FsmError::ForeignHandle {
                operation: Operation::Push
            }
            .to_string(),
            "Can't push state, handle belongs to another machine"
        );
        assert_eq!(
            FsmError::CommandLimitExceeded {
                limit: 8,
                dropped: 3
            }
            .to_string(),
            "Deferred command limit (8) exceeded, dropped 3 command(s)"
        );
    }
}
