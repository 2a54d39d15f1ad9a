//! HTTP transport shared by the credential provider and the Sheets client.

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
