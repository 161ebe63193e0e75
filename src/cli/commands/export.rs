//! Export command implementation
//!
//! Writes every matching outage to an `.xlsx` or `;`-delimited `.csv` file.

use super::{exit_code, QueryArgs};
use crate::config::load_config_or_default;
use crate::core::export::ExportFormat;
use crate::core::service::{ExportParams, OutageService};
use clap::Args;
use std::fs;
use std::path::PathBuf;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Keep only rows where any field contains this text
    #[arg(long)]
    pub filter: Option<String>,

    /// Output format (xlsx or csv)
    #[arg(short, long, default_value = "xlsx")]
    pub format: String,

    /// Output file or directory (defaults to export_<start>_<end>.<ext> in the current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        let params = match self.params() {
            Ok(p) => p,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(2);
            }
        };

        let service = OutageService::from_config(&config)?;
        println!("🚀 Fetching outages {} to {}...", params.query.start, params.query.end);

        let file = match service.export(params).await {
            Ok(f) => f,
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("❌ Export failed: {e}");
                return Ok(exit_code(&e));
            }
        };

        let path = match &self.output {
            Some(p) if p.is_dir() => p.join(&file.file_name),
            Some(p) => p.clone(),
            None => PathBuf::from(&file.file_name),
        };

        if path.exists() && !self.force {
            eprintln!("❌ File already exists: {}", path.display());
            eprintln!("   Use --force to overwrite");
            return Ok(2);
        }

        fs::write(&path, &file.bytes)?;
        tracing::info!(path = %path.display(), bytes = file.bytes.len(), "Export written");
        println!("✅ Wrote {} ({} bytes)", path.display(), file.bytes.len());
        Ok(0)
    }

    fn params(&self) -> crate::domain::Result<ExportParams> {
        let query = self.query.to_query()?;
        let format: ExportFormat = self.format.parse()?;
        Ok(ExportParams::new(query, format).with_filter(self.filter.as_deref()))
    }
}
