//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Searches standard locations for a config file
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! Required:
//! - `ORDERSHEET_APP_NAME`: Application name sent as the user agent
//! - `ORDERSHEET_CREDENTIALS_PATH`: Service-account JSON key path
//! - `ORDERSHEET_CUSTOMERS_SPREADSHEET_ID`: Spreadsheet with customer worksheets
//!
//! Optional:
//! - `ORDERSHEET_SHEETS_API_BASE`: Sheets API base URL
//! - `ORDERSHEET_BIND_ADDRESS`: Webhook listener address
//! - `ORDERSHEET_HANDLE_TTL_SECONDS`: Service handle lifetime
//! - `ORDERSHEET_HTTP_TIMEOUT_SECONDS`: Outbound request timeout
//! - `ORDERSHEET_HTTP_MAX_ATTEMPTS`: Attempts for idempotent requests
//!
//! ## File Locations
//! The loader searches the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./ordersheet.json` or `./ordersheet.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use ordersheet_domain::{CacheConfig, Config, ConfigError, GoogleConfig, HttpConfig, ServerConfig};

type Result<T> = std::result::Result<T, ConfigError>;

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns a `ConfigError` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<Config> {
    let config = match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            config
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)?
        }
    };
    validate(&config)?;
    Ok(config)
}

/// Load configuration from environment variables
///
/// The three required variables must be present; optional ones fall back to
/// defaults.
///
/// # Errors
/// Returns `ConfigError::Missing` if a required variable is unset and
/// `ConfigError::Invalid` if a numeric variable does not parse.
pub fn load_from_env() -> Result<Config> {
    let application_name = env_var("ORDERSHEET_APP_NAME")?;
    let credentials_path = PathBuf::from(env_var("ORDERSHEET_CREDENTIALS_PATH")?);
    let customers_spreadsheet_id = env_var("ORDERSHEET_CUSTOMERS_SPREADSHEET_ID")?;

    let mut google = GoogleConfig {
        application_name,
        credentials_path,
        customers_spreadsheet_id,
        sheets_api_base: ordersheet_domain::constants::DEFAULT_SHEETS_API_BASE.to_string(),
    };
    if let Some(base) = env_opt("ORDERSHEET_SHEETS_API_BASE") {
        google.sheets_api_base = base;
    }

    let mut server = ServerConfig::default();
    if let Some(address) = env_opt("ORDERSHEET_BIND_ADDRESS") {
        server.bind_address = address;
    }

    let mut cache = CacheConfig::default();
    if let Some(ttl) = env_parse::<u64>("ORDERSHEET_HANDLE_TTL_SECONDS")? {
        cache.handle_ttl_seconds = ttl;
    }

    let mut http = HttpConfig::default();
    if let Some(timeout) = env_parse::<u64>("ORDERSHEET_HTTP_TIMEOUT_SECONDS")? {
        http.timeout_seconds = timeout;
    }
    if let Some(attempts) = env_parse::<usize>("ORDERSHEET_HTTP_MAX_ATTEMPTS")? {
        http.max_attempts = attempts;
    }

    Ok(Config { google, server, cache, http })
}

/// Load configuration from a file
///
/// If `path` is `None`, searches the standard locations for a config file.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns a `ConfigError` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ConfigError::NotFound(p.display().to_string()));
            }
            p
        }
        None => find_config_path().ok_or_else(|| {
            ConfigError::NotFound("no config file in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ConfigError::Invalid(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ConfigError::Invalid(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ConfigError::Invalid(format!("Invalid JSON format: {}", e))),
        _ => Err(ConfigError::Invalid(format!("Unsupported config format: {}", extension))),
    }
}

/// Reject values that would only fail later at request time.
fn validate(config: &Config) -> Result<()> {
    if config.google.application_name.trim().is_empty() {
        return Err(ConfigError::Invalid("application name must not be empty".into()));
    }
    if config.google.customers_spreadsheet_id.trim().is_empty() {
        return Err(ConfigError::Invalid("customers spreadsheet id must not be empty".into()));
    }
    url::Url::parse(&config.google.sheets_api_base).map_err(|e| {
        ConfigError::Invalid(format!(
            "Invalid Sheets API base URL {}: {}",
            config.google.sheets_api_base, e
        ))
    })?;
    if config.cache.handle_ttl_seconds == 0 {
        return Err(ConfigError::Invalid("handle TTL must be greater than zero".into()));
    }
    if config.http.timeout_seconds == 0 {
        return Err(ConfigError::Invalid("HTTP timeout must be greater than zero".into()));
    }
    Ok(())
}

/// Find the first existing config file in the standard locations
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn find_config_path() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(vec![
            cwd.join("config.json"),
            cwd.join("config.toml"),
            cwd.join("ordersheet.json"),
            cwd.join("ordersheet.toml"),
            cwd.join("../config.json"),
            cwd.join("../config.toml"),
        ]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(vec![
                exe_dir.join("config.json"),
                exe_dir.join("config.toml"),
                exe_dir.join("ordersheet.json"),
                exe_dir.join("ordersheet.toml"),
            ]);
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| ConfigError::Missing(format!("environment variable {}", key)))
}

/// Get optional environment variable; blank counts as unset.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::Invalid(format!("Invalid {}: {}", key, e)))
        })
        .transpose()
}
