//! # ProfileSync Domain
//!
//! Business domain types for the profile synchronization subsystem.
//!
//! This crate contains:
//! - Profile aggregate and settings types
//! - Edit-lock, pending-write, and save-attempt models
//! - Domain error types and Result definitions
//! - Domain constants and the faculty/program catalog
//!
//! ## Architecture
//! - No dependencies on other ProfileSync crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod catalog;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
