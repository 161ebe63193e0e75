//! File rendering for exports
//!
//! Two formats share one column layout per [`SearchMode`](crate::domain::SearchMode):
//! a spreadsheet (default) and semicolon-delimited text.

pub mod columns;
pub mod csv;
pub mod xlsx;

pub use columns::{columns_for, Column};
pub use self::csv::render_csv;
pub use xlsx::render_xlsx;

use crate::domain::PowerMapError;
use std::fmt;
use std::str::FromStr;

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Csv => "text/csv; charset=utf-8",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = PowerMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "xlsx" => Ok(ExportFormat::Xlsx),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(PowerMapError::Validation(format!(
                "Invalid export format '{other}'. Must be one of: xlsx, csv"
            ))),
        }
    }
}
