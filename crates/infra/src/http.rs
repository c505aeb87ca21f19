//! Shared HTTP plumbing for the REST adapters.
//!
//! All three adapters speak short keyed JSON requests to Google-style
//! endpoints, so the client surface is deliberately small: one constructor
//! fed from [`InfraConfig`](crate::config::InfraConfig) limits, and a
//! `send` that retries server errors and transient transport failures with
//! exponential backoff. Status interpretation stays in the adapters; 4xx
//! responses are returned, not retried.

use std::time::Duration;

use profilesync_domain::{ProfileSyncError, Result};
use reqwest::{Client, Method, RequestBuilder, Response};
use tracing::debug;

use crate::errors::InfraError;

const BASE_BACKOFF: Duration = Duration::from_millis(200);

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_attempts: u32,
}

impl HttpClient {
    /// Build a client with a per-request timeout and a total attempt
    /// budget (initial try included). A budget of zero is treated as one.
    pub fn with_limits(timeout: Duration, max_attempts: usize) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .map_err(|err| ProfileSyncError::from(InfraError::from(err)))?;
        Ok(Self { client, max_attempts: (max_attempts.max(1)) as u32 })
    }

    /// Start a request against the underlying client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Send, retrying 5xx responses and transient transport errors.
    ///
    /// The builder is cloned per attempt, so bodies must be buffered (all
    /// the adapters send JSON or in-memory byte buffers).
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let mut attempt = 1;
        loop {
            let request = builder.try_clone().ok_or_else(|| {
                ProfileSyncError::Internal("request body is not retryable".into())
            })?;

            match request.send().await {
                Ok(response) if response.status().is_server_error() && attempt < self.max_attempts => {
                    debug!(attempt, status = %response.status(), "server error, will retry");
                }
                Ok(response) => return Ok(response),
                Err(err) if attempt < self.max_attempts && is_transient(&err) => {
                    debug!(attempt, error = %err, "transport error, will retry");
                }
                Err(err) => return Err(ProfileSyncError::from(InfraError::from(err))),
            }

            tokio::time::sleep(backoff(attempt)).await;
            attempt += 1;
        }
    }
}

fn backoff(completed_attempts: u32) -> Duration {
    BASE_BACKOFF.saturating_mul(1 << (completed_attempts - 1).min(8))
}

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}
