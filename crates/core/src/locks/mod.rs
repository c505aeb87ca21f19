//! Per-field edit locking

mod controller;

pub use controller::EditLockController;
