//! Profile aggregate store
//!
//! Owns the canonical `ProfileAggregate` for the signed-in user together
//! with the edit-lock controller that gates every mutation. Hydration from
//! the remote document happens exactly once, at session start, before any
//! user input can arrive, so local mutation and remote hydration never
//! race.

use profilesync_domain::{
    AuthUser, FieldEdit, FieldGroup, ProfileAggregate, ProfileSyncError, ProfileUpdate, Result,
    SettingsPatch,
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::locks::EditLockController;

/// Canonical local view of one user's profile plus its edit locks.
#[derive(Debug)]
pub struct ProfileStore {
    user: AuthUser,
    aggregate: ProfileAggregate,
    locks: EditLockController,
    hydrated: bool,
}

impl ProfileStore {
    /// Seed the aggregate from the resolved identity. All groups locked.
    pub fn new(user: AuthUser) -> Self {
        let aggregate = ProfileAggregate {
            display_name: user.display_name.clone().unwrap_or_default(),
            email: user.email.clone(),
            avatar_url: user.photo_url.clone(),
            ..ProfileAggregate::default()
        };
        Self { user, aggregate, locks: EditLockController::new(), hydrated: false }
    }

    /// Apply the stored remote document over the defaults.
    ///
    /// Called once after sign-in resolves. An absent document keeps the
    /// defaults; a repeat call is ignored.
    pub fn hydrate(&mut self, remote_doc: Option<&Value>) {
        if self.hydrated {
            warn!("profile store already hydrated, ignoring repeat hydration");
            return;
        }
        self.hydrated = true;

        match remote_doc {
            Some(doc) => {
                self.aggregate.apply_document(doc);
                debug!(uid = %self.user.uid, "profile hydrated from remote document");
            }
            None => debug!(uid = %self.user.uid, "no remote document, defaults retained"),
        }
    }

    /// Apply one field edit.
    ///
    /// Fails with `FieldLocked` (and leaves the aggregate untouched) unless
    /// the owning group is unlocked. Returns the settings patch to forward
    /// to the coalescer when the edit touched a settings key.
    pub fn set_field(&mut self, edit: FieldEdit) -> Result<Option<SettingsPatch>> {
        let group = edit.group();
        if !self.locks.is_editing(group) {
            return Err(ProfileSyncError::FieldLocked(group));
        }

        let settings = &mut self.aggregate.settings;
        match edit {
            FieldEdit::DisplayName(name) => {
                self.aggregate.display_name = name;
                return Ok(None);
            }
            FieldEdit::Email(email) => {
                self.aggregate.email = email;
                return Ok(None);
            }
            FieldEdit::Faculty(faculty) => {
                // A program is only meaningful under the faculty it was
                // chosen with; keep it only when the faculty is unchanged.
                if settings.faculty != faculty {
                    settings.program.clear();
                }
                settings.faculty = faculty;
            }
            FieldEdit::Program(program) => settings.program = program,
            FieldEdit::Coop(coop) => settings.coop = coop,
            FieldEdit::GradTerm(term) => settings.grad_term = term,
            FieldEdit::GradYear(year) => settings.grad_year = year,
        }

        Ok(Some(SettingsPatch::from(&self.aggregate.settings)))
    }

    /// Immutable copy for rendering. Never exposes a mutable reference.
    pub fn snapshot(&self) -> ProfileAggregate {
        self.aggregate.clone()
    }

    pub fn user(&self) -> &AuthUser {
        &self.user
    }

    pub fn locks(&self) -> &EditLockController {
        &self.locks
    }

    pub fn locks_mut(&mut self) -> &mut EditLockController {
        &mut self.locks
    }

    /// Cancel an edit, relocking the group and restoring the
    /// last-committed value where one exists.
    ///
    /// Settings need no restore: the debounced path makes the local
    /// settings the committed state. The password buffer lives outside the
    /// aggregate entirely.
    pub fn cancel(&mut self, group: FieldGroup) {
        self.locks.cancel(group);
        match group {
            FieldGroup::Name => {
                self.aggregate.display_name = self.user.display_name.clone().unwrap_or_default();
            }
            FieldGroup::Email => self.aggregate.email = self.user.email.clone(),
            FieldGroup::Password | FieldGroup::Settings => {}
        }
    }

    /// Record a successful identity-provider profile update, making the new
    /// values the committed baseline for change detection and cancel.
    pub fn record_identity_commit(&mut self, update: &ProfileUpdate) {
        if let Some(name) = &update.display_name {
            self.user.display_name = Some(name.clone());
            self.aggregate.display_name = name.clone();
        }
        if let Some(url) = &update.photo_url {
            self.user.photo_url = Some(url.clone());
            self.aggregate.avatar_url = Some(url.clone());
        }
    }
}
