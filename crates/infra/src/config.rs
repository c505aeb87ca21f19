//! Environment configuration
//!
//! Loads adapter configuration from environment variables, with a `.env`
//! file picked up when present.
//!
//! ## Environment Variables
//! - `PROFILESYNC_API_KEY`: Identity Toolkit browser API key (required)
//! - `PROFILESYNC_PROJECT_ID`: Backend project id (required)
//! - `PROFILESYNC_STORAGE_BUCKET`: Asset bucket name (required)
//! - `PROFILESYNC_IDENTITY_URL`: Identity endpoint override (optional)
//! - `PROFILESYNC_FIRESTORE_URL`: Document-store endpoint override (optional)
//! - `PROFILESYNC_STORAGE_URL`: Asset endpoint override (optional)
//! - `PROFILESYNC_HTTP_TIMEOUT_SECS`: Request timeout (optional, default 30)
//! - `PROFILESYNC_HTTP_MAX_ATTEMPTS`: Retry budget (optional, default 3)
//!
//! The URL overrides exist for pointing the adapters at a local emulator or
//! a test server.

use std::time::Duration;

use profilesync_domain::{ProfileSyncError, Result};

const DEFAULT_IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com";
const DEFAULT_FIRESTORE_URL: &str = "https://firestore.googleapis.com";
const DEFAULT_STORAGE_URL: &str = "https://firebasestorage.googleapis.com";

/// Configuration shared by the remote adapters.
#[derive(Debug, Clone)]
pub struct InfraConfig {
    pub api_key: String,
    pub project_id: String,
    pub storage_bucket: String,
    pub identity_url: String,
    pub firestore_url: String,
    pub storage_url: String,
    pub http_timeout: Duration,
    pub http_max_attempts: usize,
}

impl InfraConfig {
    /// Load configuration from the environment (and `.env`, if present).
    pub fn load() -> Result<Self> {
        // Missing .env is fine; real deployments set variables directly.
        let _ = dotenvy::dotenv();

        Ok(Self {
            api_key: required("PROFILESYNC_API_KEY")?,
            project_id: required("PROFILESYNC_PROJECT_ID")?,
            storage_bucket: required("PROFILESYNC_STORAGE_BUCKET")?,
            identity_url: optional("PROFILESYNC_IDENTITY_URL", DEFAULT_IDENTITY_URL),
            firestore_url: optional("PROFILESYNC_FIRESTORE_URL", DEFAULT_FIRESTORE_URL),
            storage_url: optional("PROFILESYNC_STORAGE_URL", DEFAULT_STORAGE_URL),
            http_timeout: Duration::from_secs(parsed("PROFILESYNC_HTTP_TIMEOUT_SECS", 30)?),
            http_max_attempts: parsed("PROFILESYNC_HTTP_MAX_ATTEMPTS", 3)?,
        })
    }

    /// Configuration for tests: all endpoints point at `base_url`.
    pub fn for_endpoint(base_url: &str) -> Self {
        Self {
            api_key: "test-api-key".into(),
            project_id: "test-project".into(),
            storage_bucket: "test-bucket".into(),
            identity_url: base_url.trim_end_matches('/').into(),
            firestore_url: base_url.trim_end_matches('/').into(),
            storage_url: base_url.trim_end_matches('/').into(),
            http_timeout: Duration::from_secs(5),
            http_max_attempts: 1,
        }
    }
}

fn required(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| ProfileSyncError::Config(format!("missing environment variable {name}")))
}

fn optional(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parsed<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|_| ProfileSyncError::Config(format!("invalid value for {name}: {raw}"))),
        Err(_) => Ok(default),
    }
}
