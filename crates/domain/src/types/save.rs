//! Save-attempt capture
//!
//! Multi-step saves are not transactional: a step failure short-circuits
//! later steps but completed steps are not rolled back. `SaveAttempt`
//! records what actually happened so the caller can report the partial
//! outcome honestly.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ProfileSyncError;

use super::sync::FieldGroup;

/// One step of a save pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaveStep {
    UploadAvatar,
    UpdateIdentity,
    MergeDocument,
    SendVerification,
    UpdatePassword,
}

/// Result of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    Succeeded,
    Failed,
    /// The step had nothing to do (e.g. no staged avatar, unchanged name).
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    pub step: SaveStep,
    pub status: StepStatus,
}

/// Overall outcome of an explicit save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaveOutcome {
    Success,
    /// Some steps completed before a later one failed; completed steps stand.
    PartialFailure,
    Failure,
}

/// Ephemeral record of one explicit multi-step save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveAttempt {
    pub id: Uuid,
    pub group: FieldGroup,
    pub steps: Vec<StepResult>,
    pub outcome: SaveOutcome,
    /// Set when the outcome is not `Success`.
    pub error: Option<ProfileSyncError>,
    /// User-facing confirmation or informational message.
    pub message: Option<String>,
}

impl SaveAttempt {
    /// Starts recording a save for `group`. Outcome defaults to `Failure`
    /// until the pipeline marks it otherwise.
    pub fn begin(group: FieldGroup) -> Self {
        Self {
            id: Uuid::new_v4(),
            group,
            steps: Vec::new(),
            outcome: SaveOutcome::Failure,
            error: None,
            message: None,
        }
    }

    pub fn record(&mut self, step: SaveStep, status: StepStatus) {
        self.steps.push(StepResult { step, status });
    }

    pub fn succeed(mut self, message: impl Into<String>) -> Self {
        self.outcome = SaveOutcome::Success;
        self.message = Some(message.into());
        self
    }

    pub fn fail(mut self, error: ProfileSyncError) -> Self {
        self.outcome = SaveOutcome::Failure;
        self.error = Some(error);
        self
    }

    pub fn partial(mut self, error: ProfileSyncError, message: impl Into<String>) -> Self {
        self.outcome = SaveOutcome::PartialFailure;
        self.error = Some(error);
        self.message = Some(message.into());
        self
    }

    /// True when any step actually ran and succeeded before a failure.
    pub fn has_completed_steps(&self) -> bool {
        self.steps.iter().any(|s| s.status == StepStatus::Succeeded)
    }
}
