//! Edit-lock and pending-write models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::profile::{CoopStatus, GradTerm, SettingsPatch};

/// Edit-lock granularity: one lock per field group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldGroup {
    Name,
    Email,
    Password,
    Settings,
}

/// State of one field group's edit lock.
///
/// Created `Locked`; while `Locked`, no user input may mutate the
/// corresponding aggregate field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EditState {
    #[default]
    Locked,
    Editing,
}

/// One outstanding debounce window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWrite {
    pub payload: SettingsPatch,
    pub scheduled_at: DateTime<Utc>,
}

/// One user edit to a single profile field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    DisplayName(String),
    Email(String),
    Faculty(String),
    Program(String),
    Coop(CoopStatus),
    GradTerm(Option<GradTerm>),
    GradYear(Option<i32>),
}

impl FieldEdit {
    /// The edit lock gating this field.
    pub fn group(&self) -> FieldGroup {
        match self {
            Self::DisplayName(_) => FieldGroup::Name,
            Self::Email(_) => FieldGroup::Email,
            Self::Faculty(_)
            | Self::Program(_)
            | Self::Coop(_)
            | Self::GradTerm(_)
            | Self::GradYear(_) => FieldGroup::Settings,
        }
    }
}
