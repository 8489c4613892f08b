use crate::types::{ComplaintId, ComplaintKind};
use serde::{Deserialize, Serialize};

/// Every request the presentation layer may send to the desk.
/// Variants are only ever appended, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum DeskCommand {
    // ── Intake ────────────────────────────────────
    /// `force` files the complaint even when a duplicate is suspected.
    Submit {
        kind:        ComplaintKind,
        area:        String,
        description: String,
        severity:    u8,
        #[serde(default)]
        force:       bool,
    },
    CheckDuplicate {
        area:        String,
        description: String,
    },

    // ── Dispatch ──────────────────────────────────
    ServeNext {
        #[serde(default = "default_use_priority")]
        use_priority: bool,
    },
    Delete { id: ComplaintId },
    Rebuild,

    // ── Reads ─────────────────────────────────────
    Search { id: ComplaintId },
    AllRecords,
    PendingReport,
    Export {
        #[serde(default)]
        path: Option<String>,
    },

    Quit,
}

fn default_use_priority() -> bool {
    true
}
