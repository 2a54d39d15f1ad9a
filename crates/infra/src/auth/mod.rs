//! Service-account authentication
//!
//! Loads the service-account key, signs JWT bearer assertions and exchanges
//! them for short-lived access tokens.

pub mod key;
pub mod provider;
pub mod token;

pub use key::{CredentialError, ServiceAccountKey};
pub use provider::{AccessTokenProvider, ServiceAccountTokenProvider};
pub use token::{AccessToken, TokenResponse};
