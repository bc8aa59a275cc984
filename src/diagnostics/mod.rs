//! Failure reporting.
//!
//! The machine never panics on a bad request. It reports an [`FsmError`] to
//! an injectable [`DiagnosticSink`] and leaves the stack untouched.

mod error;
mod sink;

pub use error::{FsmError, Operation};
pub use sink::{DiagnosticSink, NullSink, RecordingSink, TracingSink};
