//! Port interfaces for the remote document store and the binary asset store

use async_trait::async_trait;
use profilesync_domain::Result;
use serde_json::Value;

/// Trait for the remote document store
///
/// `merge_write` must only update the keys present in `partial`, leaving all
/// other stored keys untouched. That guarantee is what lets the debounced
/// settings path and the explicit profile save write disjoint key sets
/// without clobbering each other.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read a document, or `None` when it does not exist
    async fn read(&self, collection: &str, key: &str) -> Result<Option<Value>>;

    /// Merge-write `partial` (a JSON object) into the document
    async fn merge_write(&self, collection: &str, key: &str, partial: &Value) -> Result<()>;
}

/// Trait for the binary asset store
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Upload `bytes` at `path` and return a public URL for the asset
    async fn upload(&self, path: &str, content_type: &str, bytes: Vec<u8>) -> Result<String>;
}
