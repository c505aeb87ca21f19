//! Profile aggregate store

mod store;

pub use store::ProfileStore;
