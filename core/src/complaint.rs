//! The complaint entity and the two keys derived from it.
//!
//! Every field except `status` is fixed at creation. Queues and the
//! duplicate index hold keys derived from those immutable fields, never
//! copies of the record itself.

use crate::types::{ComplaintId, ComplaintKind, ComplaintStatus, Severity, Timestamp};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complaint {
    pub id:          ComplaintId,
    pub kind:        ComplaintKind,
    pub area:        String,
    pub description: String,
    pub severity:    Severity,
    pub timestamp:   Timestamp,
    pub status:      ComplaintStatus,
}

impl Complaint {
    pub fn is_pending(&self) -> bool {
        self.status == ComplaintStatus::Pending
    }

    pub fn dispatch_key(&self) -> DispatchKey {
        DispatchKey {
            id:        self.id,
            severity:  self.severity,
            timestamp: self.timestamp,
        }
    }

    pub fn duplicate_key(&self) -> DuplicateKey {
        DuplicateKey::from_parts(&self.area, &self.description)
    }
}

impl fmt::Display for Complaint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {} | Type: {} | Area: {} | Severity: {} | Time: {} | Status: {}\nDesc: {}",
            self.id,
            self.kind,
            self.area,
            self.severity,
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.status,
            self.description,
        )
    }
}

/// Handle into the record store carrying the immutable fields that decide
/// dispatch order.
///
/// `Ord` ranks the most urgent complaint greatest: higher severity first,
/// then the older timestamp, then the lower id (ids follow arrival order).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchKey {
    pub id:        ComplaintId,
    pub severity:  Severity,
    pub timestamp: Timestamp,
}

impl Ord for DispatchKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.severity
            .cmp(&other.severity)
            .then_with(|| other.timestamp.cmp(&self.timestamp))
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for DispatchKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Normalized (area, description) pair used for near-duplicate detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DuplicateKey(String);

impl DuplicateKey {
    pub const SEPARATOR: char = '|';
    pub const ESCAPE: char = '\\';

    /// Trim, case-fold and escape each part, then join on the separator.
    /// Escaping keeps ("a|b", "c"), ("a", "b|c") and ("ab", "c") distinct.
    pub fn from_parts(area: &str, description: &str) -> Self {
        let area = Self::normalize(area);
        let description = Self::normalize(description);
        Self(format!("{area}{}{description}", Self::SEPARATOR))
    }

    fn normalize(part: &str) -> String {
        let folded = part.trim().to_lowercase();
        let mut out = String::with_capacity(folded.len());
        for c in folded.chars() {
            if c == Self::ESCAPE || c == Self::SEPARATOR {
                out.push(Self::ESCAPE);
            }
            out.push(c);
        }
        out
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DuplicateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
