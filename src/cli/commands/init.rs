//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "powermap.toml")]
    pub output: String,

    /// Include every setting with its default and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing PowerMap configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} if the defaults do not fit", self.output);
                println!("  2. Validate configuration: powermap validate-config");
                println!("  3. Search: powermap search --start 2021-01-01 --end 2021-01-31 --term cemig");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# PowerMap Configuration File
# Every section is optional; missing values use the defaults.

[application]
log_level = "info"

[aneel]
base_url = "https://dadosabertos.aneel.gov.br"

[cache]
ttl_seconds = 1200
"#
        .to_string()
    }

    /// Generate configuration with every setting spelled out
    fn generate_config_with_examples() -> String {
        r#"# PowerMap Configuration File
# ANEEL power outage search and export
#
# Values of the form ${VAR} are replaced from the environment.
# POWERMAP_* environment variables override the file (see docs).

[application]
# trace, debug, info, warn or error
log_level = "info"

[aneel]
base_url = "https://dadosabertos.aneel.gov.br"
sql_path = "/api/3/action/datastore_search_sql"
search_path = "/api/3/action/datastore_search"
# user_agent = "PowerMap/5.1.0"

# Per-request timeouts in seconds
sql_timeout_seconds = 180
search_timeout_seconds = 300
connect_timeout_seconds = 60

# Upper bound of in-flight requests to the portal
max_concurrent_requests = 16

[aneel.retry]
# Retried statuses: 429, 500, 502, 503, 504
max_retries = 5
initial_delay_ms = 1000
max_delay_ms = 30000
backoff_multiplier = 2.0

# Datastore resource per calendar year; years without an entry return no rows
[aneel.resources]
2017 = "246e926b-a686-42fc-b55f-32e4046834de"
2018 = "8fcce0f2-4ea2-42ea-b7ac-00fd8feab03c"
2019 = "965d2abb-91fe-4fab-b463-8c84f2e02188"
2020 = "58201617-8364-4e7f-975d-21f8b8c7436f"
2021 = "42d778de-4a10-4b54-a00a-87c8ff35db6f"
2022 = "7d081751-3f4c-4ede-96b5-1bf2e46b61ca"
2023 = "cce72c2b-a4cb-4b98-818f-3ac56bbf2a78"
2024 = "cc091bb8-b308-46b2-98ec-c2fd58e7194b"
2025 = "1aa6ad85-05b8-4471-9ca4-316566214ba9"

[fallback]
# Month row search used when the SQL action is refused
initial_page_size = 1000
min_page_size = 250
max_attempts = 8

[query]
# Rows per structured query page
page_size = 10000

[cache]
ttl_seconds = 1200

[logging]
# JSON log files in addition to console output
local_enabled = false
local_path = "logs"
# daily, hourly or never
local_rotation = "daily"
"#
        .to_string()
    }
}
