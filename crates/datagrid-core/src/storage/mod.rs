//! Physical storage abstraction and implementations.
//!
//! The truncate pipeline addresses replicas through this interface:
//!
//! - **Filesystem**: a local vault directory
//! - **Memory**: in-memory storage (for testing and embedded use)

mod filesystem;
mod memory;

pub use filesystem::FilesystemStorage;
pub use memory::MemoryStorage;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Trait for physical storage backing replicas.
///
/// Paths are vault-relative physical paths as recorded in the catalog.
#[async_trait]
pub trait PhysicalStorage: Send + Sync {
    /// Write the full contents of an object.
    async fn write(&self, path: &str, data: Bytes) -> Result<()>;

    /// Read the full contents of an object.
    async fn read(&self, path: &str) -> Result<Bytes>;

    /// Resize an object to `length` bytes. Growing pads with zero bytes;
    /// shrinking discards trailing data irreversibly.
    async fn truncate(&self, path: &str, length: u64) -> Result<()>;

    /// Current physical size of an object.
    async fn size(&self, path: &str) -> Result<u64>;

    /// Whether an object exists.
    async fn exists(&self, path: &str) -> Result<bool>;
}

/// Physical storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Local filesystem vault rooted at `path`.
    Filesystem { path: PathBuf },
    /// In-memory storage.
    Memory,
}

/// Create a physical storage backend from configuration.
pub fn create_storage(config: &StorageConfig) -> Result<Arc<dyn PhysicalStorage>> {
    match config {
        StorageConfig::Filesystem { path } => Ok(Arc::new(FilesystemStorage::new(path.clone()))),
        StorageConfig::Memory => Ok(Arc::new(MemoryStorage::new())),
    }
}
