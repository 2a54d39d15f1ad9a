//! Shared fixtures for `ordersheet-infra` integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use ordersheet_domain::{CacheConfig, Config, GoogleConfig, HttpConfig, ServerConfig};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const PRIVATE_PEM: &str = include_str!("fixtures/test_rsa_key.pem");
pub const SPREADSHEET_ID: &str = "customers-sheet";
pub const TOKEN: &str = "ya29.integration";

/// A service-account key file on disk whose token URI points at `server`.
pub struct KeyFile {
    pub path: PathBuf,
    _dir: TempDir,
}

impl KeyFile {
    pub fn for_server(server: &MockServer) -> Self {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("service-account.json");
        let key = json!({
            "type": "service_account",
            "project_id": "ordersheet-test",
            "private_key_id": "test-key-id",
            "private_key": PRIVATE_PEM,
            "client_email": "ledger@ordersheet-test.iam.gserviceaccount.com",
            "token_uri": format!("{}/token", server.uri()),
        });
        std::fs::write(&path, key.to_string()).expect("key file should be written");
        Self { path, _dir: dir }
    }
}

/// Accept every assertion at `/token`.
pub async fn mount_token_endpoint(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": TOKEN,
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .mount(server)
        .await;
}

pub fn config(credentials_path: PathBuf, server: &MockServer) -> Config {
    Config {
        google: GoogleConfig {
            application_name: "order-ledger-test".into(),
            credentials_path,
            customers_spreadsheet_id: SPREADSHEET_ID.into(),
            sheets_api_base: server.uri(),
        },
        server: ServerConfig::default(),
        cache: CacheConfig::default(),
        http: HttpConfig { timeout_seconds: 5, max_attempts: 1 },
    }
}
