//! Catalog abstraction and implementations.
//!
//! The catalog is the durable source of truth for object and replica
//! metadata. The truncate pipeline mutates it exactly once per successful
//! request, at the reconcile commit point.

mod file;
mod memory;

pub use file::JsonFileCatalog;
pub use memory::MemoryCatalog;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::object::{DataObject, ReplicaStatus};
use crate::{Error, Result};

/// Trait for catalog access.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetch the catalog entry for `logical_path`.
    ///
    /// An unknown path reports [`Error::ReplicaNotFound`]: resolution
    /// against a nonexistent object yields no replica.
    async fn get_object(&self, logical_path: &str) -> Result<DataObject>;

    /// Register or replace a catalog entry.
    async fn put_object(&self, object: DataObject) -> Result<()>;

    /// Commit a replica's new size.
    ///
    /// Sets the size, clears the checksum (content changed), marks the
    /// replica at rest, and marks sibling replicas whose sizes now disagree
    /// as stale. Failure is [`Error::CatalogUpdate`] — the physical resize
    /// has already happened by the time this runs.
    async fn reconcile_replica(
        &self,
        logical_path: &str,
        replica_number: i32,
        new_size: i64,
    ) -> Result<()>;
}

/// Shared reconcile semantics applied by every catalog implementation.
pub(crate) fn apply_reconcile(
    object: &mut DataObject,
    replica_number: i32,
    new_size: i64,
) -> Result<()> {
    let exists = object.replicas.iter().any(|r| r.number == replica_number);
    if !exists {
        return Err(Error::CatalogUpdate(format!(
            "Replica {} of [{}] no longer exists.",
            replica_number, object.logical_path
        )));
    }

    for replica in &mut object.replicas {
        if replica.number == replica_number {
            replica.size = new_size;
            replica.checksum = None;
            replica.status = ReplicaStatus::AtRest;
        } else if replica.size != new_size && replica.status == ReplicaStatus::AtRest {
            replica.status = ReplicaStatus::Stale;
        }
    }

    Ok(())
}

/// Catalog configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum CatalogConfig {
    /// In-memory catalog; state is lost on exit.
    Memory,
    /// Catalog persisted as a JSON snapshot at `path`.
    File { path: PathBuf },
}

/// Create a catalog from configuration.
pub async fn create_catalog(config: &CatalogConfig) -> Result<Arc<dyn Catalog>> {
    match config {
        CatalogConfig::Memory => Ok(Arc::new(MemoryCatalog::new())),
        CatalogConfig::File { path } => Ok(Arc::new(JsonFileCatalog::open(path.clone()).await?)),
    }
}
