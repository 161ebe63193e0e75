//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::PowerMapConfig;
use crate::domain::errors::PowerMapError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into PowerMapConfig
/// 4. Applies environment variable overrides (POWERMAP_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use powermap::config::loader::load_config;
///
/// let config = load_config("powermap.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<PowerMapConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(PowerMapError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        PowerMapError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_str(&contents)
}

/// Loads configuration from TOML text, applying the same steps as [`load_config`]
pub fn load_config_str(contents: &str) -> Result<PowerMapConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: PowerMapConfig = toml::from_str(&contents)
        .map_err(|e| PowerMapError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        PowerMapError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Loads the file when it exists, otherwise falls back to defaults plus environment overrides
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<PowerMapConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(
        path = %path.display(),
        "Configuration file not found, using defaults"
    );
    load_config_str("")
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| PowerMapError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        // Comments are copied verbatim
        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(PowerMapError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|val| val.parse().ok())
}

/// Applies environment variable overrides using POWERMAP_* prefix
///
/// Environment variables follow the pattern: POWERMAP_<SECTION>_<KEY>
/// For example: POWERMAP_ANEEL_BASE_URL, POWERMAP_CACHE_TTL_SECONDS
fn apply_env_overrides(config: &mut PowerMapConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("POWERMAP_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Upstream overrides
    if let Ok(val) = std::env::var("POWERMAP_ANEEL_BASE_URL") {
        config.aneel.base_url = val;
    }
    if let Ok(val) = std::env::var("POWERMAP_ANEEL_USER_AGENT") {
        config.aneel.user_agent = val;
    }
    if let Some(secs) = env_parsed("POWERMAP_ANEEL_SQL_TIMEOUT_SECONDS") {
        config.aneel.sql_timeout_seconds = secs;
    }
    if let Some(secs) = env_parsed("POWERMAP_ANEEL_SEARCH_TIMEOUT_SECONDS") {
        config.aneel.search_timeout_seconds = secs;
    }
    if let Some(limit) = env_parsed("POWERMAP_ANEEL_MAX_CONCURRENT_REQUESTS") {
        config.aneel.max_concurrent_requests = limit;
    }
    if let Some(retries) = env_parsed("POWERMAP_ANEEL_RETRY_MAX_RETRIES") {
        config.aneel.retry.max_retries = retries;
    }

    // Fallback overrides
    if let Some(attempts) = env_parsed("POWERMAP_FALLBACK_MAX_ATTEMPTS") {
        config.fallback.max_attempts = attempts;
    }

    // Query overrides
    if let Some(size) = env_parsed("POWERMAP_QUERY_PAGE_SIZE") {
        config.query.page_size = size;
    }

    // Cache overrides
    if let Some(ttl) = env_parsed("POWERMAP_CACHE_TTL_SECONDS") {
        config.cache.ttl_seconds = ttl;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("POWERMAP_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("POWERMAP_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
