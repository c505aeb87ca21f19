//! Save orchestrator
//!
//! One pipeline per field group, each a short ordered sequence of steps
//! with per-step result capture. A step failure short-circuits later steps
//! but completed steps are not rolled back; the `SaveAttempt` records the
//! partial outcome for user-facing messaging. Local validation failures
//! block before any I/O and are returned as errors without creating an
//! attempt.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use profilesync_domain::catalog;
use profilesync_domain::constants::{AVATAR_PATH_PREFIX, PASSWORD_MIN_LEN, USER_DOC_COLLECTION};
use profilesync_domain::{
    FieldGroup, ProfileSyncError, ProfileUpdate, Result, SaveAttempt, SaveStep, SettingsPatch,
    StagedAvatar, StepStatus,
};
use serde_json::{json, Map, Value};
use tracing::{info, instrument, warn};

use crate::auth::ports::IdentityProvider;
use crate::profile::ProfileStore;
use crate::store::ports::{AssetStore, DocumentStore};

/// Sequences explicit saves against the identity provider, asset store, and
/// document store.
pub struct SaveOrchestrator {
    identity: Arc<dyn IdentityProvider>,
    documents: Arc<dyn DocumentStore>,
    assets: Arc<dyn AssetStore>,
    in_flight: Mutex<HashSet<FieldGroup>>,
}

impl SaveOrchestrator {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        documents: Arc<dyn DocumentStore>,
        assets: Arc<dyn AssetStore>,
    ) -> Self {
        Self { identity, documents, assets, in_flight: Mutex::new(HashSet::new()) }
    }

    /// Profile save: optional avatar upload, identity profile update, then a
    /// durability merge write of the same fields.
    ///
    /// An upload failure aborts before any identity mutation. A merge-write
    /// failure after a successful identity update is a partial failure: the
    /// identity provider is authoritative until the next successful sync.
    #[instrument(skip_all, fields(uid = %store.user().uid))]
    pub async fn save_profile(
        &self,
        store: &mut ProfileStore,
        staged: Option<StagedAvatar>,
    ) -> Result<SaveAttempt> {
        let _guard = self.begin(FieldGroup::Name)?;

        if let Some(avatar) = &staged {
            if !avatar.content_type.starts_with("image/") {
                return Err(ProfileSyncError::Validation("Please upload an image file.".into()));
            }
        }

        let mut attempt = SaveAttempt::begin(FieldGroup::Name);
        let snapshot = store.snapshot();
        let user = store.user().clone();

        let mut update = ProfileUpdate::default();
        let committed_name = user.display_name.clone().unwrap_or_default();
        if store.locks().is_editing(FieldGroup::Name) && snapshot.display_name != committed_name {
            update.display_name = Some(snapshot.display_name.clone());
        }

        // Step 1: upload the staged avatar, if any.
        match staged {
            Some(avatar) => {
                let path = avatar_path(&user.uid, &avatar.filename);
                match self.assets.upload(&path, &avatar.content_type, avatar.bytes).await {
                    Ok(url) => {
                        attempt.record(SaveStep::UploadAvatar, StepStatus::Succeeded);
                        update.photo_url = Some(url);
                    }
                    Err(err) => {
                        attempt.record(SaveStep::UploadAvatar, StepStatus::Failed);
                        let err = as_upload_failure(err);
                        warn!(error = %err, "avatar upload failed, aborting profile save");
                        store.locks_mut().record_error(FieldGroup::Name, err.clone());
                        return Ok(attempt.fail(err));
                    }
                }
            }
            None => attempt.record(SaveStep::UploadAvatar, StepStatus::Skipped),
        }

        if update.is_empty() {
            attempt.record(SaveStep::UpdateIdentity, StepStatus::Skipped);
            attempt.record(SaveStep::MergeDocument, StepStatus::Skipped);
            if store.locks().is_editing(FieldGroup::Name) {
                store.locks_mut().complete_commit(FieldGroup::Name);
            }
            return Ok(attempt.succeed("Profile unchanged."));
        }

        // Step 2: identity provider profile update.
        match self.identity.update_profile(&user.uid, &update).await {
            Ok(()) => {
                attempt.record(SaveStep::UpdateIdentity, StepStatus::Succeeded);
                store.record_identity_commit(&update);
            }
            Err(err) => {
                attempt.record(SaveStep::UpdateIdentity, StepStatus::Failed);
                store.locks_mut().record_error(FieldGroup::Name, err.clone());
                return Ok(attempt.fail(err));
            }
        }

        // Step 3: merge-write the same fields for durability.
        let partial = profile_document(&update);
        match self.documents.merge_write(USER_DOC_COLLECTION, &user.uid, &partial).await {
            Ok(()) => {
                attempt.record(SaveStep::MergeDocument, StepStatus::Succeeded);
                if store.locks().is_editing(FieldGroup::Name) {
                    store.locks_mut().complete_commit(FieldGroup::Name);
                }
                info!("profile save complete");
                Ok(attempt.succeed("Profile updated."))
            }
            Err(err) => {
                attempt.record(SaveStep::MergeDocument, StepStatus::Failed);
                warn!(error = %err, "profile document sync failed after identity update");
                store.locks_mut().record_error(FieldGroup::Name, err.clone());
                Ok(attempt.partial(
                    err,
                    "Profile updated, but saving it to your document failed; it will catch up on the next save.",
                ))
            }
        }
    }

    /// Email save: validates, short-circuits when unchanged, otherwise starts
    /// the verify-then-change flow. The local email stays as typed; the
    /// committed address only changes once the user confirms the link.
    #[instrument(skip_all, fields(uid = %store.user().uid))]
    pub async fn save_email(&self, store: &mut ProfileStore) -> Result<SaveAttempt> {
        let _guard = self.begin(FieldGroup::Email)?;

        if !store.locks().is_editing(FieldGroup::Email) {
            return Err(ProfileSyncError::FieldLocked(FieldGroup::Email));
        }

        let next_email = store.snapshot().email.trim().to_string();
        if next_email.is_empty() {
            return Err(ProfileSyncError::Validation("Email cannot be empty.".into()));
        }

        let mut attempt = SaveAttempt::begin(FieldGroup::Email);
        let user = store.user().clone();

        if next_email == user.email {
            attempt.record(SaveStep::SendVerification, StepStatus::Skipped);
            store.locks_mut().complete_commit(FieldGroup::Email);
            return Ok(attempt.succeed("Email unchanged."));
        }

        match self.identity.update_email_pending_verification(&user.uid, &next_email).await {
            Ok(()) => {
                attempt.record(SaveStep::SendVerification, StepStatus::Succeeded);
                store.locks_mut().complete_commit(FieldGroup::Email);
                info!("verification email requested");
                Ok(attempt.succeed(
                    "Verification email sent to the new address. Click the link to finish changing your email.",
                ))
            }
            Err(err) => {
                attempt.record(SaveStep::SendVerification, StepStatus::Failed);
                store.locks_mut().record_error(FieldGroup::Email, err.clone());
                Ok(attempt.fail(err))
            }
        }
    }

    /// Password save: local validation, then the provider update. The caller
    /// owns the secret buffer and must wipe it on success; a failed attempt
    /// never retries the raw value.
    #[instrument(skip_all, fields(uid = %store.user().uid))]
    pub async fn save_password(
        &self,
        store: &mut ProfileStore,
        new_password: &str,
    ) -> Result<SaveAttempt> {
        let _guard = self.begin(FieldGroup::Password)?;

        if !store.locks().is_editing(FieldGroup::Password) {
            return Err(ProfileSyncError::FieldLocked(FieldGroup::Password));
        }
        if new_password.is_empty() {
            return Err(ProfileSyncError::Validation("Enter a new password.".into()));
        }
        if new_password.chars().count() < PASSWORD_MIN_LEN {
            return Err(ProfileSyncError::Validation(format!(
                "Password must be at least {PASSWORD_MIN_LEN} characters."
            )));
        }

        let mut attempt = SaveAttempt::begin(FieldGroup::Password);
        let uid = store.user().uid.clone();

        match self.identity.update_password(&uid, new_password).await {
            Ok(()) => {
                attempt.record(SaveStep::UpdatePassword, StepStatus::Succeeded);
                store.locks_mut().complete_commit(FieldGroup::Password);
                info!("password updated");
                Ok(attempt.succeed("Password updated."))
            }
            Err(err) => {
                attempt.record(SaveStep::UpdatePassword, StepStatus::Failed);
                store.locks_mut().record_error(FieldGroup::Password, err.clone());
                Ok(attempt.fail(err))
            }
        }
    }

    /// Settings-confirm save: blocking validation of faculty and program,
    /// then one merge write of the full settings sub-object. Unlike the
    /// debounced path, this one refuses to run with incomplete settings.
    #[instrument(skip_all, fields(uid = %store.user().uid))]
    pub async fn save_settings(&self, store: &mut ProfileStore) -> Result<SaveAttempt> {
        let _guard = self.begin(FieldGroup::Settings)?;

        if !store.locks().is_editing(FieldGroup::Settings) {
            return Err(ProfileSyncError::FieldLocked(FieldGroup::Settings));
        }

        let settings = store.snapshot().settings;
        if settings.faculty.is_empty() {
            return Err(ProfileSyncError::Validation(
                "Please select a faculty before saving settings.".into(),
            ));
        }
        if settings.program.is_empty() {
            return Err(ProfileSyncError::Validation(
                "Please select a program before saving settings.".into(),
            ));
        }
        let programs = catalog::programs_for(&settings.faculty).ok_or_else(|| {
            ProfileSyncError::Validation(format!("Unknown faculty: {}", settings.faculty))
        })?;
        if !programs.contains(&settings.program.as_str()) {
            return Err(ProfileSyncError::Validation(format!(
                "{} is not a program offered by {}",
                settings.program, settings.faculty
            )));
        }

        let mut attempt = SaveAttempt::begin(FieldGroup::Settings);
        let uid = store.user().uid.clone();
        let partial = SettingsPatch::from(&settings).to_document();

        match self.documents.merge_write(USER_DOC_COLLECTION, &uid, &partial).await {
            Ok(()) => {
                attempt.record(SaveStep::MergeDocument, StepStatus::Succeeded);
                store.locks_mut().complete_commit(FieldGroup::Settings);
                info!("settings save complete");
                Ok(attempt.succeed("Settings saved."))
            }
            Err(err) => {
                attempt.record(SaveStep::MergeDocument, StepStatus::Failed);
                store.locks_mut().record_error(FieldGroup::Settings, err.clone());
                Ok(attempt.fail(err))
            }
        }
    }

    /// Rejects a commit for a group that already has one outstanding.
    fn begin(&self, group: FieldGroup) -> Result<InFlightGuard<'_>> {
        let mut set = match self.in_flight.lock() {
            Ok(set) => set,
            Err(poisoned) => poisoned.into_inner(),
        };
        if !set.insert(group) {
            return Err(ProfileSyncError::SaveInFlight(group));
        }
        Ok(InFlightGuard { set: &self.in_flight, group })
    }
}

struct InFlightGuard<'a> {
    set: &'a Mutex<HashSet<FieldGroup>>,
    group: FieldGroup,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut set = match self.set.lock() {
            Ok(set) => set,
            Err(poisoned) => poisoned.into_inner(),
        };
        set.remove(&self.group);
    }
}

fn avatar_path(uid: &str, filename: &str) -> String {
    let timestamp = Utc::now().timestamp_millis();
    format!("{AVATAR_PATH_PREFIX}/{uid}/{timestamp}_{filename}")
}

fn as_upload_failure(err: ProfileSyncError) -> ProfileSyncError {
    match err {
        ProfileSyncError::UploadFailed(_) => err,
        other => ProfileSyncError::UploadFailed(other.to_string()),
    }
}

fn profile_document(update: &ProfileUpdate) -> Value {
    let mut fields = Map::new();
    if let Some(name) = &update.display_name {
        fields.insert("displayName".into(), json!(name));
    }
    if let Some(url) = &update.photo_url {
        fields.insert("photoURL".into(), json!(url));
    }
    Value::Object(fields)
}
