//! Shared primitive types used across the complaint desk.

use crate::error::{DeskError, DeskResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A complaint identifier. Assigned from 1 upwards, never reused.
pub type ComplaintId = u64;

/// The canonical session identifier used by the persistence layer.
pub type SessionId = String;

/// Creation time of a complaint. Drives FIFO order and the severity tie-break.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Complaint severity on a 1–5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Severity(u8);

impl Severity {
    pub const MIN: Severity = Severity(1);
    pub const MAX: Severity = Severity(5);

    pub fn new(value: u8) -> DeskResult<Self> {
        if (Self::MIN.0..=Self::MAX.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DeskError::invalid(
                "severity",
                format!("{value} is outside [{}, {}]", Self::MIN.0, Self::MAX.0),
            ))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Severity {
    type Error = DeskError;

    fn try_from(value: u8) -> DeskResult<Self> {
        Self::new(value)
    }
}

impl From<Severity> for u8 {
    fn from(s: Severity) -> u8 {
        s.0
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Complaint category as offered on the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintKind {
    Water,
    Electricity,
    Garbage,
    Traffic,
    Other,
}

impl ComplaintKind {
    pub const ALL: [ComplaintKind; 5] = [
        Self::Water,
        Self::Electricity,
        Self::Garbage,
        Self::Traffic,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Water => "water",
            Self::Electricity => "electricity",
            Self::Garbage => "garbage",
            Self::Traffic => "traffic",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ComplaintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ComplaintKind {
    type Err = DeskError;

    fn from_str(s: &str) -> DeskResult<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| DeskError::invalid("type", format!("unknown complaint type '{s}'")))
    }
}

/// Lifecycle state of a complaint. `Processed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplaintStatus {
    Pending,
    Processed,
}

impl ComplaintStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processed => "Processed",
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = DeskError;

    fn from_str(s: &str) -> DeskResult<Self> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Processed" => Ok(Self::Processed),
            other => Err(DeskError::invalid("status", format!("unknown status '{other}'"))),
        }
    }
}
