//! Configuration structures
//!
//! Loaded by `ordersheet-infra::config` from the environment or a TOML/JSON
//! file. The core only ever sees these values as opaque constructor inputs.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BIND_ADDRESS, DEFAULT_HANDLE_TTL, DEFAULT_SHEETS_API_BASE};

/// Root configuration for the ledger service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub google: GoogleConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Google project settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoogleConfig {
    /// Application name reported to Google (sent as the user agent)
    pub application_name: String,
    /// Path to the service-account JSON key
    pub credentials_path: PathBuf,
    /// Spreadsheet holding one worksheet per customer
    pub customers_spreadsheet_id: String,
    #[serde(default = "default_sheets_api_base")]
    pub sheets_api_base: String,
}

/// Inbound HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_address: DEFAULT_BIND_ADDRESS.to_string() }
    }
}

/// Service handle cache settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheConfig {
    pub handle_ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { handle_ttl_seconds: DEFAULT_HANDLE_TTL.as_secs() }
    }
}

/// Outbound HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    /// Total attempts for idempotent requests (initial try + retries)
    pub max_attempts: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_seconds: 30, max_attempts: 3 }
    }
}

fn default_sheets_api_base() -> String {
    DEFAULT_SHEETS_API_BASE.to_string()
}
