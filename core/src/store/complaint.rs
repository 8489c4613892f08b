use super::{format_ts, parse_ts, DeskStore};
use crate::{
    complaint::Complaint,
    error::DeskResult,
    types::{ComplaintKind, ComplaintStatus, Severity},
};
use rusqlite::{params, types::Type};

fn conversion<E>(idx: usize, ty: Type) -> impl FnOnce(E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    move |e| rusqlite::Error::FromSqlConversionFailure(idx, ty, Box::new(e))
}

// Helper function for mapping complaint rows
fn complaint_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<Complaint> {
    let kind: String = row.get(1)?;
    let severity: u8 = row.get(4)?;
    let created_at: String = row.get(5)?;
    let status: String = row.get(6)?;
    Ok(Complaint {
        id:          row.get::<_, i64>(0)? as u64,
        kind:        kind.parse::<ComplaintKind>().map_err(conversion(1, Type::Text))?,
        area:        row.get(2)?,
        description: row.get(3)?,
        severity:    Severity::new(severity).map_err(conversion(4, Type::Integer))?,
        timestamp:   parse_ts(5, &created_at)?,
        status:      status.parse::<ComplaintStatus>().map_err(conversion(6, Type::Text))?,
    })
}

impl DeskStore {
    // ── Complaint ──────────────────────────────────────────────

    /// Replace the session's stored records with `records`, keeping their
    /// order. Runs in one transaction.
    pub fn save_records<'a, I>(&self, session_id: &str, records: I) -> DeskResult<usize>
    where
        I: IntoIterator<Item = &'a Complaint>,
    {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM complaint WHERE session_id = ?1", params![session_id])?;
        let mut written = 0usize;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO complaint (
                    session_id, complaint_id, seq, kind, area, description,
                    severity, created_at, status
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for c in records {
                stmt.execute(params![
                    session_id,
                    c.id as i64,
                    written as i64,
                    c.kind.as_str(),
                    &c.area,
                    &c.description,
                    c.severity.get(),
                    format_ts(c.timestamp),
                    c.status.as_str(),
                ])?;
                written += 1;
            }
        }
        tx.commit()?;
        Ok(written)
    }

    /// Records for a session, in the order they were saved.
    pub fn load_records(&self, session_id: &str) -> DeskResult<Vec<Complaint>> {
        let mut stmt = self.conn.prepare(
            "SELECT complaint_id, kind, area, description, severity, created_at, status
             FROM complaint WHERE session_id = ?1
             ORDER BY seq ASC",
        )?;
        let rows = stmt.query_map(params![session_id], complaint_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn complaint_count(&self, session_id: &str, status: Option<ComplaintStatus>) -> DeskResult<i64> {
        let count = match status {
            Some(s) => self.conn.query_row(
                "SELECT COUNT(*) FROM complaint WHERE session_id = ?1 AND status = ?2",
                params![session_id, s.as_str()],
                |row| row.get(0),
            )?,
            None => self.conn.query_row(
                "SELECT COUNT(*) FROM complaint WHERE session_id = ?1",
                params![session_id],
                |row| row.get(0),
            )?,
        };
        Ok(count)
    }
}
