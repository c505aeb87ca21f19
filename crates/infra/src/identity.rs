//! Identity Toolkit adapter
//!
//! REST adapter for the `IdentityProvider` port against the Identity
//! Toolkit API (`accounts:signInWithPassword`, `accounts:signUp`,
//! `accounts:signInWithIdp`, `accounts:update`, `accounts:sendOobCode`).
//! All endpoints are keyed POSTs; failures come back as
//! `{"error": {"message": "CODE"}}` and are mapped onto the domain error
//! kinds here, at the boundary.

use profilesync_core::IdentityProvider;
use profilesync_domain::{AuthUser, ProfileSyncError, ProfileUpdate, Result};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use crate::config::InfraConfig;
use crate::http::HttpClient;
use crate::token::SessionToken;

/// The sensitive-update rejection code: the session's sign-in is too old
/// for an email or password change.
const CREDENTIAL_TOO_OLD: &str = "CREDENTIAL_TOO_OLD_LOGIN_AGAIN";
/// Same gate, reported by some endpoints under a different name.
const TOKEN_EXPIRED: &str = "TOKEN_EXPIRED";

pub struct FirebaseAuthClient {
    http: HttpClient,
    base_url: String,
    api_key: String,
    token: SessionToken,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    local_id: String,
    id_token: String,
    email: Option<String>,
    display_name: Option<String>,
    photo_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl FirebaseAuthClient {
    pub fn new(config: &InfraConfig, token: SessionToken) -> Result<Self> {
        let http = HttpClient::with_limits(config.http_timeout, config.http_max_attempts)?;
        Ok(Self {
            http,
            base_url: config.identity_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            token,
        })
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/v1/accounts:{}?key={}", self.base_url, action, self.api_key)
    }

    fn post(&self, action: &str, body: &serde_json::Value) -> RequestBuilder {
        self.http.request(Method::POST, self.endpoint(action)).json(body)
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Response> {
        let response = self.http.send(builder).await?;
        if response.status().is_success() {
            return Ok(response);
        }
        Err(self.map_failure(response).await)
    }

    /// Decode an error response into the domain error it stands for.
    async fn map_failure(&self, response: Response) -> ProfileSyncError {
        let status = response.status();
        let code = match response.json::<ApiErrorBody>().await {
            Ok(body) => body.error.message,
            Err(err) => {
                warn!(%status, error = %err, "identity error response had no error body");
                return ProfileSyncError::RemoteUnavailable(format!(
                    "identity endpoint returned {status}"
                ));
            }
        };

        debug!(%status, code, "identity request rejected");
        match code.as_str() {
            CREDENTIAL_TOO_OLD | TOKEN_EXPIRED => ProfileSyncError::RequiresRecentAuth,
            _ if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS => {
                ProfileSyncError::RemoteUnavailable(code)
            }
            _ => ProfileSyncError::Auth(code),
        }
    }

    async fn resolve_user(&self, response: Response) -> Result<AuthUser> {
        let body: AuthResponse = response
            .json()
            .await
            .map_err(|e| ProfileSyncError::Internal(format!("malformed auth response: {e}")))?;
        self.token.set(body.id_token);
        Ok(AuthUser {
            uid: body.local_id,
            email: body.email.unwrap_or_default(),
            display_name: body.display_name,
            photo_url: body.photo_url,
        })
    }
}

#[async_trait::async_trait]
impl IdentityProvider for FirebaseAuthClient {
    #[instrument(skip_all, fields(email = %email))]
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser> {
        let body = json!({ "email": email, "password": password, "returnSecureToken": true });
        let response = self.execute(self.post("signInWithPassword", &body)).await?;
        let user = self.resolve_user(response).await?;
        info!(uid = %user.uid, "signed in");
        Ok(user)
    }

    #[instrument(skip_all, fields(email = %email))]
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser> {
        let body = json!({ "email": email, "password": password, "returnSecureToken": true });
        let response = self.execute(self.post("signUp", &body)).await?;
        let user = self.resolve_user(response).await?;
        info!(uid = %user.uid, "account created");
        Ok(user)
    }

    #[instrument(skip_all)]
    async fn sign_in_federated(&self, provider_token: &str) -> Result<AuthUser> {
        let body = json!({
            "postBody": format!("id_token={provider_token}&providerId=google.com"),
            "requestUri": "http://localhost",
            "returnSecureToken": true,
        });
        let response = self.execute(self.post("signInWithIdp", &body)).await?;
        let user = self.resolve_user(response).await?;
        info!(uid = %user.uid, "federated sign-in complete");
        Ok(user)
    }

    async fn sign_out(&self) -> Result<()> {
        // Stateless tokens: dropping ours ends the session.
        self.token.clear();
        info!("signed out");
        Ok(())
    }

    #[instrument(skip_all)]
    async fn update_profile(&self, _uid: &str, update: &ProfileUpdate) -> Result<()> {
        let id_token = self.token.require()?;
        let mut body = json!({ "idToken": id_token, "returnSecureToken": true });
        if let Some(name) = &update.display_name {
            body["displayName"] = json!(name);
        }
        if let Some(url) = &update.photo_url {
            body["photoUrl"] = json!(url);
        }
        self.execute(self.post("update", &body)).await?;
        Ok(())
    }

    #[instrument(skip_all)]
    async fn update_email_pending_verification(&self, _uid: &str, new_email: &str) -> Result<()> {
        let id_token = self.token.require()?;
        let body = json!({
            "requestType": "VERIFY_AND_CHANGE_EMAIL",
            "idToken": id_token,
            "newEmail": new_email,
        });
        self.execute(self.post("sendOobCode", &body)).await?;
        Ok(())
    }

    #[instrument(skip_all)]
    async fn update_password(&self, _uid: &str, new_password: &str) -> Result<()> {
        let id_token = self.token.require()?;
        let body = json!({
            "idToken": id_token,
            "password": new_password,
            "returnSecureToken": true,
        });
        let response = self.execute(self.post("update", &body)).await?;
        // A password change rotates the token.
        if let Ok(body) = response.json::<AuthResponse>().await {
            self.token.set(body.id_token);
        }
        Ok(())
    }
}
