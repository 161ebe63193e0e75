//! Spreadsheet export

use super::columns::columns_for;
use crate::domain::{OutageRecord, Result, SearchMode};
use rust_xlsxwriter::{Format, Workbook};

const SHEET_NAME: &str = "Interrupcoes";

/// Renders rows as a single-sheet workbook
///
/// # Errors
///
/// Returns `PowerMapError::Export` when the workbook cannot be built, for
/// example when the rows exceed the sheet's row limit.
pub fn render_xlsx(mode: SearchMode, rows: &[OutageRecord]) -> Result<Vec<u8>> {
    let columns = columns_for(mode);
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, column) in columns.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, column.header(), &header)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let line = u32::try_from(i + 1).map_err(|_| {
            crate::domain::PowerMapError::Export(format!("too many rows: {}", rows.len()))
        })?;
        for (col, column) in columns.iter().enumerate() {
            let value = column.value(row);
            if !value.is_empty() {
                sheet.write_string(line, col as u16, value)?;
            }
        }
    }

    tracing::debug!(rows = rows.len(), %mode, "Workbook rendered");
    Ok(workbook.save_to_buffer()?)
}
