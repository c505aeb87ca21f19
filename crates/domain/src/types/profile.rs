//! Profile aggregate types
//!
//! The canonical in-memory view of one user's editable state, plus the
//! partial-settings payload that flows to the remote document store.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Co-op enrollment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CoopStatus {
    #[default]
    Yes,
    No,
}

impl CoopStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "yes" => Some(Self::Yes),
            "no" => Some(Self::No),
            _ => None,
        }
    }
}

/// Graduation term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GradTerm {
    Fall,
    Winter,
    Spring,
}

impl GradTerm {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fall => "Fall",
            Self::Winter => "Winter",
            Self::Spring => "Spring",
        }
    }

    /// Parses the wire form; the empty string means "not chosen".
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Fall" => Some(Self::Fall),
            "Winter" => Some(Self::Winter),
            "Spring" => Some(Self::Spring),
            _ => None,
        }
    }
}

/// Settings sub-object of the profile, synced to the remote document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSettings {
    pub faculty: String,
    pub program: String,
    pub coop: CoopStatus,
    pub grad_term: Option<GradTerm>,
    pub grad_year: Option<i32>,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            faculty: String::new(),
            program: String::new(),
            coop: CoopStatus::Yes,
            grad_term: None,
            grad_year: None,
        }
    }
}

/// The canonical in-memory view of one user's editable state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProfileAggregate {
    pub display_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub settings: ProfileSettings,
}

impl ProfileAggregate {
    /// Avatar URL for rendering, falling back to the bundled default.
    pub fn avatar_or_default(&self) -> &str {
        self.avatar_url.as_deref().unwrap_or(crate::constants::DEFAULT_AVATAR_PATH)
    }

    /// Applies remote document values over the current state.
    ///
    /// Every key is read defensively: absent or ill-typed keys leave the
    /// corresponding field untouched.
    pub fn apply_document(&mut self, doc: &Value) {
        if let Some(name) = doc.get("displayName").and_then(Value::as_str) {
            self.display_name = name.to_string();
        }
        if let Some(url) = doc.get("photoURL").and_then(Value::as_str) {
            self.avatar_url = Some(url.to_string());
        }
        if let Some(faculty) = doc.get("faculty").and_then(Value::as_str) {
            self.settings.faculty = faculty.to_string();
        }
        if let Some(program) = doc.get("program").and_then(Value::as_str) {
            self.settings.program = program.to_string();
        }
        if let Some(coop) = doc.get("coop").and_then(Value::as_str).and_then(CoopStatus::parse) {
            self.settings.coop = coop;
        }
        if let Some(term) = doc.get("gradTerm").and_then(Value::as_str) {
            self.settings.grad_term = GradTerm::parse(term);
        }
        if let Some(year) = doc.get("gradYear") {
            match year {
                Value::Number(n) => {
                    if let Some(y) = n.as_i64() {
                        self.settings.grad_year = i32::try_from(y).ok();
                    }
                }
                Value::Null => self.settings.grad_year = None,
                _ => {}
            }
        }
    }
}

/// Partial `ProfileSettings`: the payload of one pending debounced write.
///
/// A field that is `None` at the outer level is absent from the payload and
/// will not be touched by the merge write. `grad_term`/`grad_year` carry an
/// inner `Option` so "clear this field" is representable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SettingsPatch {
    pub faculty: Option<String>,
    pub program: Option<String>,
    pub coop: Option<CoopStatus>,
    pub grad_term: Option<Option<GradTerm>>,
    pub grad_year: Option<Option<i32>>,
}

impl SettingsPatch {
    /// Field-wise merge: every key present in `newer` overwrites this patch.
    pub fn merge(&mut self, newer: Self) {
        if newer.faculty.is_some() {
            self.faculty = newer.faculty;
        }
        if newer.program.is_some() {
            self.program = newer.program;
        }
        if newer.coop.is_some() {
            self.coop = newer.coop;
        }
        if newer.grad_term.is_some() {
            self.grad_term = newer.grad_term;
        }
        if newer.grad_year.is_some() {
            self.grad_year = newer.grad_year;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.faculty.is_none()
            && self.program.is_none()
            && self.coop.is_none()
            && self.grad_term.is_none()
            && self.grad_year.is_none()
    }

    /// Wire form for a merge write: only the keys present in the patch.
    ///
    /// A cleared graduation term is written as the empty string and a cleared
    /// graduation year as null, matching the stored document shape.
    pub fn to_document(&self) -> Value {
        let mut fields = Map::new();
        if let Some(faculty) = &self.faculty {
            fields.insert("faculty".into(), json!(faculty));
        }
        if let Some(program) = &self.program {
            fields.insert("program".into(), json!(program));
        }
        if let Some(coop) = self.coop {
            fields.insert("coop".into(), json!(coop.as_str()));
        }
        if let Some(term) = self.grad_term {
            let wire = term.map_or("", GradTerm::as_str);
            fields.insert("gradTerm".into(), json!(wire));
        }
        if let Some(year) = self.grad_year {
            fields.insert("gradYear".into(), year.map_or(Value::Null, |y| json!(y)));
        }
        Value::Object(fields)
    }
}

impl From<&ProfileSettings> for SettingsPatch {
    /// Full-settings patch, as produced by every settings keystroke and by
    /// the explicit settings-confirm save.
    fn from(settings: &ProfileSettings) -> Self {
        Self {
            faculty: Some(settings.faculty.clone()),
            program: Some(settings.program.clone()),
            coop: Some(settings.coop),
            grad_term: Some(settings.grad_term),
            grad_year: Some(settings.grad_year),
        }
    }
}

/// Resolved identity for the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

/// Partial update sent to the identity provider's profile endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.photo_url.is_none()
    }
}

/// An avatar file picked by the user but not yet uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedAvatar {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}
