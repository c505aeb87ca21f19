//! Error types used throughout the subsystem

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::FieldGroup;

/// Main error type for ProfileSync
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum ProfileSyncError {
    /// Local policy or required-field violation. Never sent to a backend.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Mutation attempted while the owning field group is locked.
    #[error("Field group {0:?} is locked")]
    FieldLocked(FieldGroup),

    /// A commit for this group is already outstanding.
    #[error("A save for {0:?} is already in flight")]
    SaveInFlight(FieldGroup),

    /// Sensitive identity change rejected; the user must re-authenticate.
    #[error("For security, log out and log back in, then try again")]
    RequiresRecentAuth,

    /// Store or provider call failed (network or server error).
    #[error("Remote unavailable: {0}")]
    RemoteUnavailable(String),

    /// Avatar upload to the asset store failed.
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// Identity-provider rejection other than the recent-auth gate.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Infrastructure configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProfileSyncError {
    /// True for failures that block locally, before any I/O is issued.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::FieldLocked(_) | Self::SaveInFlight(_)
        )
    }
}

/// Result type alias for ProfileSync operations
pub type Result<T> = std::result::Result<T, ProfileSyncError>;
