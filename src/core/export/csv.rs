//! Semicolon-delimited text export
//!
//! UTF-8 with a byte order mark so spreadsheet tools detect the encoding.
//! Fields containing the delimiter, quotes or line breaks are quoted.

use super::columns::columns_for;
use crate::domain::{OutageRecord, PowerMapError, Result, SearchMode};
use ::csv::{Terminator, WriterBuilder};

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Renders rows as delimited text
///
/// # Errors
///
/// Returns `PowerMapError::Export` when a record cannot be written.
pub fn render_csv(mode: SearchMode, rows: &[OutageRecord]) -> Result<Vec<u8>> {
    let columns = columns_for(mode);
    let mut writer = WriterBuilder::new()
        .delimiter(b';')
        .terminator(Terminator::CRLF)
        .from_writer(BOM.to_vec());

    writer.write_record(columns.iter().map(|c| c.header()))?;
    for row in rows {
        writer.write_record(columns.iter().map(|c| c.value(row)))?;
    }

    writer
        .into_inner()
        .map_err(|e| PowerMapError::Export(format!("CSV flush failed: {}", e.error())))
}
