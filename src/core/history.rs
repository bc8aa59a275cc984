//! Transition history tracking.
//!
//! The machine appends one record per successful push, pop or change. The
//! log is a bounded ring: once full, the oldest record is dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

/// Kind of stack transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionKind {
    Push,
    Pop,
    Change,
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Push => write!(f, "push"),
            Self::Pop => write!(f, "pop"),
            Self::Change => write!(f, "change"),
        }
    }
}

/// Record of a single stack transition.
///
/// `None` in `from` or `to` stands for the floor.
///
/// # Example
///
/// ```rust
/// use stackfsm::core::{TransitionKind, TransitionRecord};
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     kind: TransitionKind::Push,
///     from: None,
///     to: Some("menu"),
///     depth: 1,
///     timestamp: Utc::now(),
/// };
/// assert!(record.from.is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord<Id> {
    /// What happened
    pub kind: TransitionKind,
    /// The state that was current before the transition
    pub from: Option<Id>,
    /// The state that is current after the transition
    pub to: Option<Id>,
    /// Number of states above the floor after the transition
    pub depth: usize,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

/// Bounded, ordered history of stack transitions.
///
/// A capacity of zero disables recording entirely.
///
/// # Example
///
/// ```rust
/// use stackfsm::core::{TransitionKind, TransitionLog, TransitionRecord};
/// use chrono::Utc;
///
/// let mut log = TransitionLog::with_capacity(2);
/// for (from, to) in [(None, Some(1)), (Some(1), Some(2)), (Some(2), Some(3))] {
///     log.record(TransitionRecord {
///         kind: TransitionKind::Push,
///         from,
///         to,
///         depth: 0,
///         timestamp: Utc::now(),
///     });
/// }
///
/// assert_eq!(log.len(), 2);
/// assert_eq!(log.path(), vec![Some(&1), Some(&2), Some(&3)]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitionLog<Id> {
    capacity: usize,
    records: VecDeque<TransitionRecord<Id>>,
}

impl<Id> TransitionLog<Id> {
    /// Create an empty log holding at most `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            records: VecDeque::with_capacity(capacity.min(256)),
        }
    }

    /// Append a record, evicting the oldest one when full.
    pub fn record(&mut self, record: TransitionRecord<Id>) {
        if self.capacity == 0 {
            return;
        }
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Get the path of states traversed.
    ///
    /// Returns the `from` of the oldest retained record followed by the `to`
    /// of every record. `None` entries are the floor.
    pub fn path(&self) -> Vec<Option<&Id>> {
        let mut path = Vec::new();
        if let Some(first) = self.records.front() {
            path.push(first.from.as_ref());
        }
        for record in &self.records {
            path.push(record.to.as_ref());
        }
        path
    }

    /// Time between the oldest and newest retained records.
    ///
    /// Returns `None` if the log is empty.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.records.front(), self.records.back()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Retained records, oldest first.
    pub fn records(&self) -> impl Iterator<Item = &TransitionRecord<Id>> {
        self.records.iter()
    }

    /// Most recent record.
    pub fn last(&self) -> Option<&TransitionRecord<Id>> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
