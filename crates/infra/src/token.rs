//! Shared session token
//!
//! The identity adapter owns the sign-in flow but the document and asset
//! adapters authenticate with the same bearer token. `SessionToken` is the
//! one shared slot: the identity adapter writes it on sign-in and clears it
//! on sign-out; the other adapters only read.

use std::sync::{Arc, Mutex};

use profilesync_domain::{ProfileSyncError, Result};

#[derive(Debug, Clone, Default)]
pub struct SessionToken {
    inner: Arc<Mutex<Option<String>>>,
}

impl SessionToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, token: impl Into<String>) {
        *self.lock() = Some(token.into());
    }

    pub fn clear(&self) {
        *self.lock() = None;
    }

    /// Current bearer token, or an auth error when no session is active.
    pub fn require(&self) -> Result<String> {
        self.lock()
            .clone()
            .ok_or_else(|| ProfileSyncError::Auth("no active session".into()))
    }

    pub fn is_set(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
