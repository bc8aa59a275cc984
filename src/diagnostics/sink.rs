//! Where machine failures go.

use super::error::FsmError;
use std::cell::RefCell;
use std::rc::Rc;
use uuid::Uuid;

/// Receiver of soft failures detected by a machine.
///
/// Any `FnMut(Uuid, &FsmError)` closure is a sink.
pub trait DiagnosticSink {
    fn report(&mut self, machine: Uuid, error: &FsmError);
}

impl<F> DiagnosticSink for F
where
    F: FnMut(Uuid, &FsmError),
{
    fn report(&mut self, machine: Uuid, error: &FsmError) {
        self(machine, error)
    }
}

/// Default sink: emits every failure as a `tracing` warning.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, machine: Uuid, error: &FsmError) {
        tracing::warn!(machine = %machine, error = %error, "state machine request ignored");
    }
}

/// Sink that drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&mut self, _machine: Uuid, _error: &FsmError) {}
}

/// Sink that keeps every failure in a shared buffer.
///
/// Clones share the buffer, so one clone can be handed to the machine while
/// another is kept for inspection.
///
/// # Example
///
/// ```rust
/// use stackfsm::diagnostics::{FsmError, RecordingSink};
/// use stackfsm::machine::Machine;
///
/// let sink = RecordingSink::new();
/// let mut machine: Machine<u8> = Machine::new().with_sink(sink.clone());
///
/// machine.pop();
/// assert_eq!(sink.errors(), vec![FsmError::EmptyStackPop]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    errors: Rc<RefCell<Vec<FsmError>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn errors(&self) -> Vec<FsmError> {
        self.errors.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.errors.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.borrow().is_empty()
    }

    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<FsmError> {
        std::mem::take(&mut *self.errors.borrow_mut())
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&mut self, _machine: Uuid, error: &FsmError) {
        self.errors.borrow_mut().push(error.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_shares_buffer_between_clones() {
        let sink = RecordingSink::new();
        let mut handed_out = sink.clone();

        handed_out.report(Uuid::new_v4(), &FsmError::EmptyStackPop);

        assert_eq!(sink.len(), 1);
        assert_eq!(sink.errors(), vec![FsmError::EmptyStackPop]);
    }

    #[test]
    fn take_drains_buffer() {
        let mut sink = RecordingSink::new();
        sink.report(Uuid::new_v4(), &FsmError::EmptyStackPop);

        assert_eq!(sink.take().len(), 1);
        assert!(sink.is_empty());
    }

    #[test]
    fn closures_are_sinks() {
        let machine = Uuid::new_v4();
        let mut seen = Vec::new();
        {
            let mut sink = |id: Uuid, err: &FsmError| seen.push((id, err.clone()));
            sink.report(machine, &FsmError::EmptyStackPop);
        }
        assert_eq!(seen, vec![(machine, FsmError::EmptyStackPop)]);
    }

    #[test]
    fn null_and_tracing_sinks_accept_reports() {
        NullSink.report(Uuid::new_v4(), &FsmError::EmptyStackPop);
        TracingSink.report(Uuid::new_v4(), &FsmError::EmptyStackPop);
    }
}
