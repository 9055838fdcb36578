//! Persistence hook for saving and loading designs.
//!
//! The core treats a saved design as an opaque snapshot of
//! [`DesignState`]; no schema versioning is applied.

mod memory;
mod file;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::state::DesignState;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Design not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for storage operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Trait for design storage backends, keyed by a user-chosen name.
pub trait Storage: Send + Sync {
    /// Save a design under `key`, replacing any previous one.
    fn save(&self, key: &str, design: &DesignState) -> BoxFuture<'_, StorageResult<()>>;

    /// Load the design saved under `key`.
    fn load(&self, key: &str) -> BoxFuture<'_, StorageResult<DesignState>>;

    /// Delete a saved design. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all saved keys.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    /// Check if a design is saved under `key`.
    fn exists(&self, key: &str) -> BoxFuture<'_, StorageResult<bool>>;
}
