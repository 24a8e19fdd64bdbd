//! In-memory catalog for testing and embedded use.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{apply_reconcile, Catalog};
use crate::object::DataObject;
use crate::{Error, Result};

/// Catalog held entirely in memory.
#[derive(Default)]
pub struct MemoryCatalog {
    objects: RwLock<HashMap<String, DataObject>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn get_object(&self, logical_path: &str) -> Result<DataObject> {
        self.objects
            .read()
            .await
            .get(logical_path)
            .cloned()
            .ok_or_else(|| {
                Error::ReplicaNotFound(format!("No data object found at [{}].", logical_path))
            })
    }

    async fn put_object(&self, object: DataObject) -> Result<()> {
        self.objects
            .write()
            .await
            .insert(object.logical_path.clone(), object);
        Ok(())
    }

    async fn reconcile_replica(
        &self,
        logical_path: &str,
        replica_number: i32,
        new_size: i64,
    ) -> Result<()> {
        let mut objects = self.objects.write().await;
        let object = objects.get_mut(logical_path).ok_or_else(|| {
            Error::CatalogUpdate(format!("No data object found at [{}].", logical_path))
        })?;
        apply_reconcile(object, replica_number, new_size)
    }
}
