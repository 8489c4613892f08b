//! Flat row export of the record store.
//!
//! Format: one header line, then one line per record in insertion order:
//!   id,type,area,description,severity,timestamp,status
//! Commas inside free text are replaced with semicolons. There is no
//! quoting and no reader; the format is write-only.

use crate::{complaint::Complaint, error::DeskResult};
use chrono::SecondsFormat;
use std::io::Write;

pub const CSV_HEADER: &str = "id,type,area,description,severity,timestamp,status";

pub fn to_csv_row(c: &Complaint) -> String {
    format!(
        "{},{},{},{},{},{},{}",
        c.id,
        c.kind,
        sanitize(&c.area),
        sanitize(&c.description),
        c.severity,
        c.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        c.status,
    )
}

/// Write the header and every record. Returns the number of rows written.
pub fn write_csv<'a, W, I>(out: &mut W, records: I) -> DeskResult<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a Complaint>,
{
    writeln!(out, "{CSV_HEADER}")?;
    let mut rows = 0;
    for record in records {
        writeln!(out, "{}", to_csv_row(record))?;
        rows += 1;
    }
    out.flush()?;
    Ok(rows)
}

/// Convenience wrapper: export to a file path, replacing it.
pub fn write_csv_file<'a, I>(path: &str, records: I) -> DeskResult<usize>
where
    I: IntoIterator<Item = &'a Complaint>,
{
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    write_csv(&mut writer, records)
}

fn sanitize(text: &str) -> String {
    text.replace(',', ";").replace(['\n', '\r'], " ")
}
