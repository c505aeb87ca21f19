//! Storage adapter
//!
//! REST adapter for the `AssetStore` port. Objects are uploaded with a
//! single media POST; the returned download token is folded into a public
//! `alt=media` URL, which is what the identity profile stores as the photo
//! URL.

use profilesync_core::AssetStore;
use profilesync_domain::{ProfileSyncError, Result};
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::config::InfraConfig;
use crate::http::HttpClient;
use crate::token::SessionToken;

pub struct StorageClient {
    http: HttpClient,
    base_url: String,
    bucket: String,
    token: SessionToken,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    download_tokens: Option<String>,
}

impl StorageClient {
    pub fn new(config: &InfraConfig, token: SessionToken) -> Result<Self> {
        let http = HttpClient::with_limits(config.http_timeout, config.http_max_attempts)?;
        Ok(Self {
            http,
            base_url: config.storage_url.trim_end_matches('/').to_string(),
            bucket: config.storage_bucket.clone(),
            token,
        })
    }

    fn object_url(&self, path: &str) -> String {
        format!(
            "{}/v0/b/{}/o/{}",
            self.base_url,
            self.bucket,
            urlencoding::encode(path)
        )
    }
}

#[async_trait::async_trait]
impl AssetStore for StorageClient {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn upload(&self, path: &str, content_type: &str, bytes: Vec<u8>) -> Result<String> {
        let token = self.token.require()?;
        let url = format!(
            "{}/v0/b/{}/o?uploadType=media&name={}",
            self.base_url,
            self.bucket,
            urlencoding::encode(path)
        );

        let request = self
            .http
            .request(Method::POST, url)
            .bearer_auth(token)
            .header("Content-Type", content_type)
            .body(bytes);

        let response = self.http.send(request).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.get("message")).cloned())
                .and_then(|m| m.as_str().map(str::to_string))
                .unwrap_or_else(|| format!("storage returned {status}"));
            return Err(ProfileSyncError::UploadFailed(body));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| ProfileSyncError::UploadFailed(format!("malformed upload response: {e}")))?;

        let mut download_url = format!("{}?alt=media", self.object_url(path));
        if let Some(token) = body.download_tokens {
            download_url.push_str("&token=");
            download_url.push_str(&token);
        }
        info!(path, "asset uploaded");
        Ok(download_url)
    }
}
