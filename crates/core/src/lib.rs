//! # ProfileSync Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces for the identity provider, document store,
//!   and asset store
//! - The password policy evaluator
//! - The per-field edit-lock controller
//! - The profile aggregate store
//! - The debounced settings write coalescer
//! - The multi-step save orchestrator and session lifecycle
//!
//! ## Architecture Principles
//! - Only depends on `profilesync-domain`
//! - No HTTP or platform code
//! - All external collaborators via traits
//! - Pure, testable business logic

pub mod auth;
pub mod coalescer;
pub mod locks;
pub mod password;
pub mod profile;
pub mod save;
pub mod session;
pub mod store;

// Re-export specific items to avoid ambiguity
pub use auth::ports::IdentityProvider;
pub use coalescer::{CoalescerConfig, SettingsCoalescer};
pub use locks::EditLockController;
pub use password::{evaluate, PasswordRule, PolicyReport, RuleEvaluation, RuleStatus};
pub use profile::ProfileStore;
pub use save::SaveOrchestrator;
pub use session::ProfileSession;
pub use store::ports::{AssetStore, DocumentStore};
