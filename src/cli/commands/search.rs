//! Search command implementation
//!
//! Prints one page of results as JSON on stdout.

use super::{exit_code, QueryArgs};
use crate::config::load_config_or_default;
use crate::core::service::{OutageService, SearchParams, DEFAULT_PAGE_SIZE};
use clap::Args;

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Page number, starting at 1
    #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
    pub page: i64,

    /// Rows per page (clamped to 10..=100)
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE as i64, allow_negative_numbers = true)]
    pub page_size: i64,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl SearchArgs {
    /// Execute the search command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        let query = match self.query.to_query() {
            Ok(q) => q,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(2);
            }
        };

        tracing::info!(
            start = %query.start,
            end = %query.end,
            mode = %query.mode,
            page = self.page,
            "Starting search command"
        );

        let service = OutageService::from_config(&config)?;
        let params = SearchParams::new(query)
            .with_page(self.page)
            .with_page_size(self.page_size);

        let page = match service.search(params).await {
            Ok(page) => page,
            Err(e) => {
                tracing::error!(error = %e, "Search failed");
                eprintln!("❌ Search failed: {e}");
                return Ok(exit_code(&e));
            }
        };

        let output = if self.pretty {
            serde_json::to_string_pretty(&page)?
        } else {
            serde_json::to_string(&page)?
        };
        println!("{output}");
        Ok(0)
    }
}
