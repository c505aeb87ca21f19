//! Shared in-memory test doubles for the collaborator ports.
//!
//! Call-recording mocks with configurable failures, so tests can assert
//! both outcomes and the exact calls (or absence of calls) issued.

// Not every test binary exercises every helper.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use profilesync_core::{AssetStore, DocumentStore, IdentityProvider};
use profilesync_domain::{AuthUser, ProfileSyncError, ProfileUpdate, Result};
use serde_json::{Map, Value};
use tokio::sync::Semaphore;

pub fn test_user() -> AuthUser {
    AuthUser {
        uid: "uid-123".into(),
        email: "jamie@uwaterloo.ca".into(),
        display_name: Some("Jamie".into()),
        photo_url: None,
    }
}

// =============================================================================
// Identity provider mock
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityCall {
    SignIn { email: String },
    SignUp { email: String },
    SignOut,
    UpdateProfile(ProfileUpdate),
    SendVerification { new_email: String },
    UpdatePassword,
}

#[derive(Default)]
pub struct MockIdentity {
    pub calls: Mutex<Vec<IdentityCall>>,
    pub fail_update_profile: Mutex<Option<ProfileSyncError>>,
    pub fail_send_verification: Mutex<Option<ProfileSyncError>>,
    pub fail_update_password: Mutex<Option<ProfileSyncError>>,
}

impl MockIdentity {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<IdentityCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: IdentityCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn take(failure: &Mutex<Option<ProfileSyncError>>) -> Result<()> {
        match failure.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl IdentityProvider for MockIdentity {
    async fn sign_in(&self, email: &str, _password: &str) -> Result<AuthUser> {
        self.record(IdentityCall::SignIn { email: email.into() });
        Ok(AuthUser { email: email.into(), ..test_user() })
    }

    async fn sign_up(&self, email: &str, _password: &str) -> Result<AuthUser> {
        self.record(IdentityCall::SignUp { email: email.into() });
        Ok(AuthUser { email: email.into(), display_name: None, ..test_user() })
    }

    async fn sign_in_federated(&self, _provider_token: &str) -> Result<AuthUser> {
        Ok(test_user())
    }

    async fn sign_out(&self) -> Result<()> {
        self.record(IdentityCall::SignOut);
        Ok(())
    }

    async fn update_profile(&self, _uid: &str, update: &ProfileUpdate) -> Result<()> {
        self.record(IdentityCall::UpdateProfile(update.clone()));
        Self::take(&self.fail_update_profile)
    }

    async fn update_email_pending_verification(&self, _uid: &str, new_email: &str) -> Result<()> {
        self.record(IdentityCall::SendVerification { new_email: new_email.into() });
        Self::take(&self.fail_send_verification)
    }

    async fn update_password(&self, _uid: &str, _new_password: &str) -> Result<()> {
        self.record(IdentityCall::UpdatePassword);
        Self::take(&self.fail_update_password)
    }
}

// =============================================================================
// Document store mock
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeCall {
    pub collection: String,
    pub key: String,
    pub partial: Value,
}

pub struct MockDocumentStore {
    pub documents: Mutex<Map<String, Value>>,
    pub merge_calls: Mutex<Vec<MergeCall>>,
    pub fail_reads: AtomicBool,
    pub fail_merge_writes: AtomicBool,
    /// When set, `merge_write` waits for a permit before returning, letting
    /// tests hold a flush in flight.
    pub merge_gate: Mutex<Option<Arc<Semaphore>>>,
}

impl MockDocumentStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            documents: Mutex::new(Map::new()),
            merge_calls: Mutex::new(Vec::new()),
            fail_reads: AtomicBool::new(false),
            fail_merge_writes: AtomicBool::new(false),
            merge_gate: Mutex::new(None),
        })
    }

    pub fn with_document(key: &str, doc: Value) -> Arc<Self> {
        let store = Self::new();
        store.documents.lock().unwrap().insert(key.into(), doc);
        store
    }

    pub fn merge_calls(&self) -> Vec<MergeCall> {
        self.merge_calls.lock().unwrap().clone()
    }

    pub fn gate(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.merge_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn document(&self, key: &str) -> Option<Value> {
        self.documents.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl DocumentStore for MockDocumentStore {
    async fn read(&self, _collection: &str, key: &str) -> Result<Option<Value>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ProfileSyncError::RemoteUnavailable("store offline".into()));
        }
        Ok(self.document(key))
    }

    async fn merge_write(&self, collection: &str, key: &str, partial: &Value) -> Result<()> {
        let gate = self.merge_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|e| ProfileSyncError::Internal(e.to_string()))?;
            permit.forget();
        }

        self.merge_calls.lock().unwrap().push(MergeCall {
            collection: collection.into(),
            key: key.into(),
            partial: partial.clone(),
        });

        if self.fail_merge_writes.load(Ordering::SeqCst) {
            return Err(ProfileSyncError::RemoteUnavailable("store offline".into()));
        }

        // Merge semantics: only the supplied keys change.
        let mut documents = self.documents.lock().unwrap();
        let doc = documents.entry(key.to_string()).or_insert_with(|| Value::Object(Map::new()));
        if let (Value::Object(target), Value::Object(source)) = (doc, partial) {
            for (k, v) in source {
                target.insert(k.clone(), v.clone());
            }
        }
        Ok(())
    }
}

// =============================================================================
// Asset store mock
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCall {
    pub path: String,
    pub content_type: String,
    pub len: usize,
}

#[derive(Default)]
pub struct MockAssetStore {
    pub uploads: Mutex<Vec<UploadCall>>,
    pub fail_uploads: AtomicBool,
}

impl MockAssetStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        let store = Self::new();
        store.fail_uploads.store(true, Ordering::SeqCst);
        store
    }

    pub fn uploads(&self) -> Vec<UploadCall> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssetStore for MockAssetStore {
    async fn upload(&self, path: &str, content_type: &str, bytes: Vec<u8>) -> Result<String> {
        self.uploads.lock().unwrap().push(UploadCall {
            path: path.into(),
            content_type: content_type.into(),
            len: bytes.len(),
        });

        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(ProfileSyncError::UploadFailed("storage rejected the object".into()));
        }
        Ok(format!("https://assets.example.com/{path}"))
    }
}

/// Let spawned tasks catch up without advancing the (possibly paused) clock.
pub async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}
