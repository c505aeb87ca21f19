//! Domain data types

pub mod profile;
pub mod save;
pub mod sync;

pub use profile::{
    AuthUser, CoopStatus, GradTerm, ProfileAggregate, ProfileSettings, ProfileUpdate,
    SettingsPatch, StagedAvatar,
};
pub use save::{SaveAttempt, SaveOutcome, SaveStep, StepResult, StepStatus};
pub use sync::{EditState, FieldEdit, FieldGroup, PendingWrite};
