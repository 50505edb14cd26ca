//! Storage and persistence layer
//!
//! - Named JSON document store
//! - Persisted vault data models

mod file_system;
pub mod models;

pub use file_system::{FileStore, VaultRepository, SECURITY_DOCUMENT, VAULT_DOCUMENT};
