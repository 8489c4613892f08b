//! The desk journal: every state change the engine makes.
//!
//! RULE: the engine only appends to its in-memory journal; it never writes
//! anywhere. Callers drain the journal and persist it through the store.

use crate::types::{ComplaintId, SessionId, Severity, Timestamp};
use serde::{Deserialize, Serialize};

/// Variants are only ever appended, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeskEvent {
    ComplaintSubmitted {
        at:       Timestamp,
        id:       ComplaintId,
        severity: Severity,
        queue:    QueueKind,
    },
    DuplicateSuspected {
        at:          Timestamp,
        id:          ComplaintId,
        existing_id: ComplaintId,
    },
    ComplaintServed {
        at:    Timestamp,
        id:    ComplaintId,
        queue: QueueKind,
    },
    ComplaintDeleted {
        at: Timestamp,
        id: ComplaintId,
    },
    QueuesRebuilt {
        at:       Timestamp,
        priority: usize,
        fallback: usize,
    },
    SessionRestored {
        at:      Timestamp,
        records: usize,
        next_id: ComplaintId,
    },
}

impl DeskEvent {
    /// Stable name for the `event_type` column.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::ComplaintSubmitted { .. } => "complaint_submitted",
            Self::DuplicateSuspected { .. } => "duplicate_suspected",
            Self::ComplaintServed { .. }    => "complaint_served",
            Self::ComplaintDeleted { .. }   => "complaint_deleted",
            Self::QueuesRebuilt { .. }      => "queues_rebuilt",
            Self::SessionRestored { .. }    => "session_restored",
        }
    }

    pub fn at(&self) -> Timestamp {
        match self {
            Self::ComplaintSubmitted { at, .. }
            | Self::DuplicateSuspected { at, .. }
            | Self::ComplaintServed { at, .. }
            | Self::ComplaintDeleted { at, .. }
            | Self::QueuesRebuilt { at, .. }
            | Self::SessionRestored { at, .. } => *at,
        }
    }
}

/// Which of the two dispatch queues a complaint went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueKind {
    Priority,
    Fallback,
}

/// A persisted journal row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    pub session_id: SessionId,
    pub seq:        u64,
    pub event_type: String,
    pub payload:    String,
    pub created_at: Timestamp,
}
