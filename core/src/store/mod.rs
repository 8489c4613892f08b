//! SQLite persistence layer.
//!
//! RULE: only store/ talks to the database.
//! The engine never calls the store; the runner moves records, journal
//! entries and snapshots across after each batch of operations.

use crate::{
    error::{DeskError, DeskResult},
    snapshot::DeskSnapshot,
    types::Timestamp,
};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, types::Type, Connection, OptionalExtension};

mod complaint;
mod event;

pub struct DeskStore {
    conn: Connection,
}

impl DeskStore {
    /// Open (or create) the desk database at `path`.
    pub fn open(path: &str) -> DeskResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only matters for real files; :memory: ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> DeskResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> DeskResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Session ────────────────────────────────────────────────

    pub fn insert_session(&self, session_id: &str, version: &str, started_at: Timestamp) -> DeskResult<()> {
        self.conn.execute(
            "INSERT INTO session (session_id, version, started_at) VALUES (?1, ?2, ?3)",
            params![session_id, version, format_ts(started_at)],
        )?;
        Ok(())
    }

    pub fn session_exists(&self, session_id: &str) -> DeskResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM session WHERE session_id = ?1",
                params![session_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    // ── Snapshot ───────────────────────────────────────────────

    pub fn save_snapshot(&self, snapshot: &DeskSnapshot) -> DeskResult<()> {
        self.conn.execute(
            "INSERT INTO snapshot (session_id, taken_at, state_json) VALUES (?1, ?2, ?3)",
            params![
                snapshot.session_id,
                format_ts(snapshot.taken_at),
                snapshot.to_json()?,
            ],
        )?;
        Ok(())
    }

    pub fn latest_snapshot(&self, session_id: &str) -> DeskResult<Option<DeskSnapshot>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT state_json FROM snapshot
                 WHERE session_id = ?1
                 ORDER BY id DESC LIMIT 1",
                params![session_id],
                |row| row.get(0),
            )
            .optional()?;
        json.map(|j| DeskSnapshot::from_json(&j).map_err(DeskError::from))
            .transpose()
    }
}

pub(crate) fn format_ts(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse an RFC 3339 column, reporting failures against column `idx`.
pub(crate) fn parse_ts(idx: usize, raw: &str) -> rusqlite::Result<Timestamp> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
