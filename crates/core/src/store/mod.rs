//! Remote document and asset store boundaries

pub mod ports;

pub use ports::{AssetStore, DocumentStore};
