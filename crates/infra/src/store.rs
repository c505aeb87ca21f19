//! Firestore adapter
//!
//! REST adapter for the `DocumentStore` port. The merge-write contract maps
//! directly onto a document PATCH with an `updateMask` listing exactly the
//! keys present in the partial: masked keys are replaced, everything else
//! in the stored document is left untouched.

use profilesync_core::DocumentStore;
use profilesync_domain::{ProfileSyncError, Result};
use reqwest::{Method, Response, StatusCode};
use serde_json::{json, Map, Value};
use tracing::{debug, instrument};

use crate::config::InfraConfig;
use crate::http::HttpClient;
use crate::token::SessionToken;

pub struct FirestoreClient {
    http: HttpClient,
    base_url: String,
    project_id: String,
    token: SessionToken,
}

impl FirestoreClient {
    pub fn new(config: &InfraConfig, token: SessionToken) -> Result<Self> {
        let http = HttpClient::with_limits(config.http_timeout, config.http_max_attempts)?;
        Ok(Self {
            http,
            base_url: config.firestore_url.trim_end_matches('/').to_string(),
            project_id: config.project_id.clone(),
            token,
        })
    }

    fn document_url(&self, collection: &str, key: &str) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents/{}/{}",
            self.base_url, self.project_id, collection, key
        )
    }

    async fn remote_failure(response: Response) -> ProfileSyncError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        ProfileSyncError::RemoteUnavailable(format!("document store returned {status}: {body}"))
    }
}

#[async_trait::async_trait]
impl DocumentStore for FirestoreClient {
    #[instrument(skip(self))]
    async fn read(&self, collection: &str, key: &str) -> Result<Option<Value>> {
        let token = self.token.require()?;
        let request = self
            .http
            .request(Method::GET, self.document_url(collection, key))
            .bearer_auth(token);

        let response = self.http.send(request).await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!("document does not exist");
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::remote_failure(response).await);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProfileSyncError::Internal(format!("malformed document: {e}")))?;
        Ok(Some(decode_document(&body)))
    }

    #[instrument(skip(self, partial))]
    async fn merge_write(&self, collection: &str, key: &str, partial: &Value) -> Result<()> {
        let Value::Object(entries) = partial else {
            return Err(ProfileSyncError::Internal(
                "merge_write payload must be a JSON object".into(),
            ));
        };
        if entries.is_empty() {
            return Ok(());
        }

        let token = self.token.require()?;
        let mask: Vec<String> = entries
            .keys()
            .map(|k| ("updateMask.fieldPaths".to_string(), k.clone()))
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        let url = format!("{}?{}", self.document_url(collection, key), mask.join("&"));

        let body = json!({ "fields": encode_fields(entries) });
        debug!(keys = ?entries.keys().collect::<Vec<_>>(), "merge-writing document");

        let request = self.http.request(Method::PATCH, url).bearer_auth(token).json(&body);
        let response = self.http.send(request).await?;
        if !response.status().is_success() {
            return Err(Self::remote_failure(response).await);
        }
        Ok(())
    }
}

/// Encode a flat JSON object into the wire `fields` map.
fn encode_fields(entries: &Map<String, Value>) -> Value {
    let mut fields = Map::new();
    for (key, value) in entries {
        fields.insert(key.clone(), encode_value(value));
    }
    Value::Object(fields)
}

fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": Value::Null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::String(s) => json!({ "stringValue": s }),
        Value::Number(n) => {
            // Integers travel as strings on this wire.
            if let Some(i) = n.as_i64() {
                json!({ "integerValue": i.to_string() })
            } else {
                json!({ "doubleValue": n })
            }
        }
        other => json!({ "stringValue": other.to_string() }),
    }
}

/// Decode a wire document into the flat JSON object the core expects.
fn decode_document(body: &Value) -> Value {
    let mut result = Map::new();
    if let Some(fields) = body.get("fields").and_then(Value::as_object) {
        for (key, wire) in fields {
            result.insert(key.clone(), decode_value(wire));
        }
    }
    Value::Object(result)
}

fn decode_value(wire: &Value) -> Value {
    if let Some(s) = wire.get("stringValue").and_then(Value::as_str) {
        return Value::String(s.to_string());
    }
    if let Some(i) = wire.get("integerValue").and_then(Value::as_str) {
        if let Ok(parsed) = i.parse::<i64>() {
            return json!(parsed);
        }
    }
    if let Some(d) = wire.get("doubleValue") {
        return d.clone();
    }
    if let Some(b) = wire.get("booleanValue").and_then(Value::as_bool) {
        return Value::Bool(b);
    }
    Value::Null
}
