use super::{format_ts, parse_ts, DeskStore};
use crate::{
    engine::DispatchEngine,
    error::DeskResult,
    event::{DeskEvent, EventLogEntry},
};
use rusqlite::params;

impl DeskStore {
    // ── Event log ──────────────────────────────────────────────

    /// Append drained journal events after the session's last stored seq.
    pub fn append_events(&self, session_id: &str, events: &[DeskEvent]) -> DeskResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let last: i64 = tx.query_row(
            "SELECT COALESCE(MAX(seq), 0) FROM event_log WHERE session_id = ?1",
            params![session_id],
            |row| row.get(0),
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO event_log (session_id, seq, event_type, payload, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (i, event) in events.iter().enumerate() {
                stmt.execute(params![
                    session_id,
                    last + 1 + i as i64,
                    event.type_name(),
                    serde_json::to_string(event)?,
                    format_ts(event.at()),
                ])?;
            }
        }
        tx.commit()?;
        Ok(events.len())
    }

    /// Drain the engine's journal into the session's event log.
    pub fn flush_journal(&self, session_id: &str, engine: &mut DispatchEngine) -> DeskResult<usize> {
        let events = engine.drain_events();
        if events.is_empty() {
            return Ok(0);
        }
        let written = self.append_events(session_id, &events)?;
        log::debug!("store: flushed {written} journal events for session {session_id}");
        Ok(written)
    }

    pub fn events_for_session(&self, session_id: &str) -> DeskResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, session_id, seq, event_type, payload, created_at
             FROM event_log WHERE session_id = ?1
             ORDER BY seq ASC",
        )?;
        let entries = stmt
            .query_map(params![session_id], |row| {
                let created_at: String = row.get(5)?;
                Ok(EventLogEntry {
                    id:         Some(row.get(0)?),
                    session_id: row.get(1)?,
                    seq:        row.get::<_, i64>(2)? as u64,
                    event_type: row.get(3)?,
                    payload:    row.get(4)?,
                    created_at: parse_ts(5, &created_at)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}
