//! Snapshot serialization: the full record list to/from JSON.
//!
//! A snapshot captures everything needed to resume a desk session: the
//! records in insertion order and the next id to hand out. Queues and the
//! duplicate index are not stored; they are rebuilt on restore.

use crate::{
    complaint::Complaint,
    types::{ComplaintId, SessionId, Timestamp},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeskSnapshot {
    pub session_id: SessionId,
    pub taken_at:   Timestamp,
    pub next_id:    ComplaintId,
    pub records:    Vec<Complaint>,
}

impl DeskSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
