//! # ProfileSync Infrastructure
//!
//! Remote adapters for the core ports.
//!
//! This crate contains:
//! - The identity-provider adapter (Identity Toolkit REST API)
//! - The document-store adapter (Firestore REST API, merge writes)
//! - The asset-store adapter (Storage REST API, avatar uploads)
//! - HTTP client plumbing and environment configuration
//!
//! ## Architecture
//! - Implements traits defined in `profilesync-core`
//! - Depends on `profilesync-domain` and `profilesync-core`
//! - Contains all "impure" code (network I/O)

pub mod assets;
pub mod config;
pub mod errors;
pub mod http;
pub mod identity;
pub mod store;
pub mod token;

pub use assets::StorageClient;
pub use config::InfraConfig;
pub use http::HttpClient;
pub use identity::FirebaseAuthClient;
pub use store::FirestoreClient;
pub use token::SessionToken;
