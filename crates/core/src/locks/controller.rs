//! Edit-lock controller
//!
//! One `Locked`/`Editing` state per field group, independent of the other
//! groups. Locking by default keeps sensitive fields (email, password) from
//! being edited accidentally and batches settings edits into one
//! confirmable unit. The lock exists to prevent logical races between user
//! intent and in-flight saves; it protects no memory.

use std::collections::HashMap;

use profilesync_domain::{EditState, FieldGroup, ProfileSyncError};
use tracing::debug;

const ALL_GROUPS: [FieldGroup; 4] =
    [FieldGroup::Name, FieldGroup::Email, FieldGroup::Password, FieldGroup::Settings];

/// Per-group edit-lock state machine with a per-group error slot.
#[derive(Debug, Default)]
pub struct EditLockController {
    states: HashMap<FieldGroup, EditState>,
    errors: HashMap<FieldGroup, ProfileSyncError>,
}

impl EditLockController {
    /// All groups start `Locked`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, group: FieldGroup) -> EditState {
        self.states.get(&group).copied().unwrap_or_default()
    }

    pub fn is_editing(&self, group: FieldGroup) -> bool {
        self.state(group) == EditState::Editing
    }

    /// `Locked -> Editing`. Allowed at any time; clears the group's last
    /// error so stale failures do not linger into a fresh edit.
    pub fn unlock(&mut self, group: FieldGroup) {
        debug!(?group, "unlocking field group");
        self.states.insert(group, EditState::Editing);
        self.errors.remove(&group);
    }

    /// `Editing -> Locked` after a successful save. A failed save must never
    /// call this: the group stays `Editing` so the user can retry or cancel.
    pub fn complete_commit(&mut self, group: FieldGroup) {
        debug!(?group, "commit complete, relocking field group");
        self.states.insert(group, EditState::Locked);
    }

    /// `Editing -> Locked`, discarding unsaved input. The caller is
    /// responsible for restoring the last-committed value.
    pub fn cancel(&mut self, group: FieldGroup) {
        debug!(?group, "edit cancelled");
        self.states.insert(group, EditState::Locked);
        self.errors.remove(&group);
    }

    /// Record a save failure against the group without changing its state.
    pub fn record_error(&mut self, group: FieldGroup, error: ProfileSyncError) {
        self.errors.insert(group, error);
    }

    pub fn last_error(&self, group: FieldGroup) -> Option<&ProfileSyncError> {
        self.errors.get(&group)
    }

    /// Remove and return the group's recorded error, leaving the lock state
    /// untouched. Lets a surfaced failure be dismissed without relocking.
    pub fn take_error(&mut self, group: FieldGroup) -> Option<ProfileSyncError> {
        self.errors.remove(&group)
    }

    /// Groups currently unlocked for editing.
    pub fn editing_groups(&self) -> Vec<FieldGroup> {
        ALL_GROUPS.into_iter().filter(|g| self.is_editing(*g)).collect()
    }
}
