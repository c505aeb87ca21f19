//! Port interface for the remote identity provider
//!
//! This trait defines the boundary between core business logic and the
//! authentication backend. Sensitive updates (email, password) may be
//! rejected with `ProfileSyncError::RequiresRecentAuth`, which the caller
//! must surface as a re-login prompt rather than a generic failure.

use async_trait::async_trait;
use profilesync_domain::{AuthUser, ProfileUpdate, Result};

/// Trait for identity resolution and identity-side profile mutations
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Authenticate with email and password, resolving the stable user id
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser>;

    /// Create a new account with email and password
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser>;

    /// Authenticate with a federated provider credential (OAuth token
    /// obtained by the front end)
    async fn sign_in_federated(&self, provider_token: &str) -> Result<AuthUser>;

    /// End the current session on the provider side
    async fn sign_out(&self) -> Result<()>;

    /// Update display name and/or photo URL on the provider profile
    async fn update_profile(&self, uid: &str, update: &ProfileUpdate) -> Result<()>;

    /// Start the verify-then-change email flow; the address change only
    /// lands once the user confirms via the emailed link
    async fn update_email_pending_verification(&self, uid: &str, new_email: &str) -> Result<()>;

    /// Replace the account password
    async fn update_password(&self, uid: &str, new_password: &str) -> Result<()>;
}
