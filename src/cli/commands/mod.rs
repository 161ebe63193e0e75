//! CLI command implementations
//!
//! Exit codes: 0 success, 2 invalid input or configuration, 4 upstream
//! failure, 5 anything else.

pub mod export;
pub mod init;
pub mod search;
pub mod validate;

use crate::core::fetch::OutageQuery;
use crate::domain::{PowerMapError, Result};
use clap::Args;

/// Date range, term and mode shared by `search` and `export`
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// First day, YYYY-MM-DD
    #[arg(long)]
    pub start: String,

    /// Last day, YYYY-MM-DD (inclusive)
    #[arg(long)]
    pub end: String,

    /// Company name/abbreviation or consumer unit number to match
    #[arg(short, long)]
    pub term: Option<String>,

    /// Search mode: company (cia) or unit (uc)
    #[arg(short, long, default_value = "company")]
    pub mode: String,
}

impl QueryArgs {
    pub fn to_query(&self) -> Result<OutageQuery> {
        OutageQuery::parse(&self.start, &self.end, self.term.as_deref(), &self.mode)
    }
}

/// Maps a failure to the process exit code
pub fn exit_code(error: &PowerMapError) -> i32 {
    match error {
        PowerMapError::Validation(_) | PowerMapError::Configuration(_) => 2,
        PowerMapError::Upstream(_) => 4,
        _ => 5,
    }
}
