//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! subsystem.

// Debounced settings sync
pub const SETTINGS_DEBOUNCE_MS: u64 = 400;
pub const COALESCER_JOIN_TIMEOUT_SECS: u64 = 5;

// Password policy bounds
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 12;

// Remote document store layout
pub const USER_DOC_COLLECTION: &str = "users";

// Asset store layout
pub const AVATAR_PATH_PREFIX: &str = "avatars";
pub const DEFAULT_AVATAR_PATH: &str = "/default.jpg";

// Graduation year picker horizon (current year plus ten)
pub const GRAD_YEAR_HORIZON: i32 = 10;
