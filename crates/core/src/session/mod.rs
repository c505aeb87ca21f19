//! Session lifecycle
//!
//! One `ProfileSession` per signed-in user, constructed on identity
//! resolution and torn down on sign-out. The session owns the aggregate
//! store, the coalescer, and the orchestrator; nothing is shared across
//! users. Hydration runs inside `create`, before the session is handed to
//! the caller, so no user mutation can race it.

use std::sync::Arc;

use profilesync_domain::constants::USER_DOC_COLLECTION;
use profilesync_domain::{
    AuthUser, FieldEdit, FieldGroup, ProfileAggregate, ProfileSyncError, Result, SaveAttempt,
    StagedAvatar,
};
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};

use crate::auth::ports::IdentityProvider;
use crate::coalescer::{CoalescerConfig, SettingsCoalescer};
use crate::password;
use crate::profile::ProfileStore;
use crate::save::SaveOrchestrator;
use crate::store::ports::{AssetStore, DocumentStore};

/// The signed-in user's editing session.
pub struct ProfileSession {
    identity: Arc<dyn IdentityProvider>,
    store: ProfileStore,
    coalescer: SettingsCoalescer,
    orchestrator: SaveOrchestrator,
    sync_errors: mpsc::UnboundedReceiver<ProfileSyncError>,
}

impl std::fmt::Debug for ProfileSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileSession").finish_non_exhaustive()
    }
}

impl ProfileSession {
    /// Sign in with email and password and build the session.
    pub async fn sign_in(
        identity: Arc<dyn IdentityProvider>,
        documents: Arc<dyn DocumentStore>,
        assets: Arc<dyn AssetStore>,
        email: &str,
        password: &str,
    ) -> Result<Self> {
        let user = identity.sign_in(email, password).await?;
        Self::create(identity, documents, assets, user).await
    }

    /// Register a new account and build the session.
    ///
    /// The password policy is enforced locally before the provider is
    /// called, mirroring the registration form's submit gate.
    pub async fn sign_up(
        identity: Arc<dyn IdentityProvider>,
        documents: Arc<dyn DocumentStore>,
        assets: Arc<dyn AssetStore>,
        email: &str,
        candidate_password: &str,
    ) -> Result<Self> {
        if email.trim().is_empty() {
            return Err(ProfileSyncError::Validation("Email cannot be empty.".into()));
        }
        if !password::evaluate(candidate_password).is_valid() {
            return Err(ProfileSyncError::Validation(
                "Password does not meet the requirements.".into(),
            ));
        }
        let user = identity.sign_up(email, candidate_password).await?;
        Self::create(identity, documents, assets, user).await
    }

    /// Sign in with a federated provider credential and build the session.
    pub async fn sign_in_federated(
        identity: Arc<dyn IdentityProvider>,
        documents: Arc<dyn DocumentStore>,
        assets: Arc<dyn AssetStore>,
        provider_token: &str,
    ) -> Result<Self> {
        let user = identity.sign_in_federated(provider_token).await?;
        Self::create(identity, documents, assets, user).await
    }

    /// Build the session for an already-resolved user.
    pub async fn create(
        identity: Arc<dyn IdentityProvider>,
        documents: Arc<dyn DocumentStore>,
        assets: Arc<dyn AssetStore>,
        user: AuthUser,
    ) -> Result<Self> {
        Self::create_with_config(identity, documents, assets, user, CoalescerConfig::default())
            .await
    }

    /// Build the session with an explicit coalescer configuration.
    #[instrument(skip_all, fields(uid = %user.uid))]
    pub async fn create_with_config(
        identity: Arc<dyn IdentityProvider>,
        documents: Arc<dyn DocumentStore>,
        assets: Arc<dyn AssetStore>,
        user: AuthUser,
        coalescer_config: CoalescerConfig,
    ) -> Result<Self> {
        // A failed settings load falls back to defaults; the profile page
        // is still usable without the stored document.
        let remote_doc = match documents.read(USER_DOC_COLLECTION, &user.uid).await {
            Ok(doc) => doc,
            Err(err) => {
                warn!(error = %err, "failed to load settings document, using defaults");
                None
            }
        };

        let mut store = ProfileStore::new(user.clone());
        store.hydrate(remote_doc.as_ref());

        let (coalescer, sync_errors) = SettingsCoalescer::spawn(
            Arc::clone(&documents),
            USER_DOC_COLLECTION,
            user.uid.clone(),
            coalescer_config,
        );
        let orchestrator =
            SaveOrchestrator::new(Arc::clone(&identity), documents, assets);

        info!("profile session created");
        Ok(Self { identity, store, coalescer, orchestrator, sync_errors })
    }

    /// Unlock a field group for editing.
    pub fn unlock(&mut self, group: FieldGroup) {
        self.store.locks_mut().unlock(group);
    }

    /// Cancel an edit, discarding unsaved input.
    pub fn cancel(&mut self, group: FieldGroup) {
        self.store.cancel(group);
    }

    /// Apply one keystroke-level field edit. Settings edits are forwarded
    /// to the coalescer, which schedules the debounced remote write.
    pub fn edit(&mut self, edit: FieldEdit) -> Result<()> {
        if let Some(patch) = self.store.set_field(edit)? {
            self.coalescer.notify(patch);
        }
        Ok(())
    }

    /// Immutable view of the aggregate for rendering.
    pub fn snapshot(&self) -> ProfileAggregate {
        self.store.snapshot()
    }

    pub fn user(&self) -> &AuthUser {
        self.store.user()
    }

    /// Last recorded save error for a group, if any.
    pub fn last_error(&self, group: FieldGroup) -> Option<&ProfileSyncError> {
        self.store.locks().last_error(group)
    }

    /// Dismiss and return the group's recorded error. The group stays
    /// editable so the user can retry without unlocking again.
    pub fn take_error(&mut self, group: FieldGroup) -> Option<ProfileSyncError> {
        self.store.locks_mut().take_error(group)
    }

    pub fn is_editing(&self, group: FieldGroup) -> bool {
        self.store.locks().is_editing(group)
    }

    /// Explicit profile save (display name and/or staged avatar).
    pub async fn save_profile(&mut self, staged: Option<StagedAvatar>) -> Result<SaveAttempt> {
        self.orchestrator.save_profile(&mut self.store, staged).await
    }

    /// Explicit email save (verify-then-change flow).
    pub async fn save_email(&mut self) -> Result<SaveAttempt> {
        self.orchestrator.save_email(&mut self.store).await
    }

    /// Explicit password save. The caller must wipe its secret buffer when
    /// the returned attempt is successful.
    pub async fn save_password(&mut self, new_password: &str) -> Result<SaveAttempt> {
        self.orchestrator.save_password(&mut self.store, new_password).await
    }

    /// Explicit settings-confirm save.
    pub async fn save_settings(&mut self) -> Result<SaveAttempt> {
        self.orchestrator.save_settings(&mut self.store).await
    }

    /// Drain one reported debounced-flush failure, if any. Non-blocking;
    /// these errors never lock the UI or change edit states.
    pub fn next_sync_error(&mut self) -> Option<ProfileSyncError> {
        self.sync_errors.try_recv().ok()
    }

    /// Sign out on the provider and tear the session down. A pending
    /// debounced write is discarded, not flushed.
    pub async fn sign_out(mut self) -> Result<()> {
        let result = self.identity.sign_out().await;
        self.coalescer.shutdown().await;
        info!("profile session torn down");
        result
    }

    /// Tear down without a provider sign-out (e.g. surface unmount).
    pub async fn teardown(mut self) {
        self.coalescer.shutdown().await;
        info!("profile session torn down");
    }
}
