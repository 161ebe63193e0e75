//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the PowerMap configuration file.

use crate::adapters::aneel::YearResourceMap;
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as part of loading
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let resources = match YearResourceMap::from_config(&config.aneel.resources) {
            Ok(r) => r,
            Err(e) => {
                println!("❌ Invalid resource table");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  ANEEL Base URL: {}", config.aneel.base_url);
        println!(
            "  Timeouts: sql {}s, search {}s, connect {}s",
            config.aneel.sql_timeout_seconds,
            config.aneel.search_timeout_seconds,
            config.aneel.connect_timeout_seconds
        );
        println!(
            "  Max Concurrent Requests: {}",
            config.aneel.max_concurrent_requests
        );
        println!("  Retries: {}", config.aneel.retry.max_retries);
        match (resources.years().next(), resources.years().last()) {
            (Some(first), Some(last)) => println!(
                "  Resources: {} years ({first}-{last})",
                resources.len()
            ),
            _ => println!("  Resources: none"),
        }
        println!("  Structured Page Size: {}", config.query.page_size);
        println!(
            "  Fallback Paging: {} -> {} rows, {} attempts",
            config.fallback.initial_page_size,
            config.fallback.min_page_size,
            config.fallback.max_attempts
        );
        println!("  Cache TTL: {}s", config.cache.ttl_seconds);
        println!();
        Ok(0)
    }
}
