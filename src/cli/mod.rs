//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for PowerMap using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// PowerMap - ANEEL power outage search and export
#[derive(Parser, Debug)]
#[command(name = "powermap")]
#[command(version, about, long_about = None)]
#[command(author = "PowerMap Contributors")]
pub struct Cli {
    /// Path to configuration file (defaults are used when it does not exist)
    #[arg(short, long, default_value = "powermap.toml", env = "POWERMAP_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "POWERMAP_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search outages and print one page as JSON
    Search(commands::search::SearchArgs),

    /// Export all matching outages to a spreadsheet or CSV file
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
