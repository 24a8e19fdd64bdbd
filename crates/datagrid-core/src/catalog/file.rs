//! Catalog persisted as a JSON snapshot file.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::RwLock;

use super::{apply_reconcile, Catalog};
use crate::object::DataObject;
use crate::{Error, Result};

const SNAPSHOT_VERSION: u32 = 1;

/// On-disk shape of the catalog.
#[derive(Debug, Serialize, Deserialize)]
struct CatalogSnapshot {
    version: u32,
    objects: Vec<DataObject>,
}

/// Catalog backed by a JSON snapshot file.
///
/// The whole snapshot is rewritten on every mutation; the write at the end
/// of `reconcile_replica` is the durable commit point.
#[derive(Debug)]
pub struct JsonFileCatalog {
    path: PathBuf,
    objects: RwLock<HashMap<String, DataObject>>,
}

impl JsonFileCatalog {
    /// Open the catalog at `path`, creating an empty one if the file does
    /// not exist yet.
    pub async fn open(path: PathBuf) -> Result<Self> {
        let objects = match fs::read(&path).await {
            Ok(data) => {
                let snapshot: CatalogSnapshot = serde_json::from_slice(&data).map_err(|e| {
                    Error::Catalog(format!(
                        "Failed to parse catalog snapshot {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                if snapshot.version != SNAPSHOT_VERSION {
                    return Err(Error::Catalog(format!(
                        "Unsupported catalog snapshot version: {}",
                        snapshot.version
                    )));
                }
                snapshot
                    .objects
                    .into_iter()
                    .map(|o| (o.logical_path.clone(), o))
                    .collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                return Err(Error::Catalog(format!(
                    "Failed to read catalog snapshot {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        Ok(Self {
            path,
            objects: RwLock::new(objects),
        })
    }

    async fn persist(&self, objects: &HashMap<String, DataObject>) -> Result<()> {
        let mut snapshot_objects: Vec<DataObject> = objects.values().cloned().collect();
        snapshot_objects.sort_by(|a, b| a.logical_path.cmp(&b.logical_path));

        let snapshot = CatalogSnapshot {
            version: SNAPSHOT_VERSION,
            objects: snapshot_objects,
        };

        let data = serde_json::to_vec_pretty(&snapshot)
            .map_err(|e| Error::Catalog(format!("Failed to serialize catalog snapshot: {}", e)))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::Catalog(format!("Failed to create catalog directory: {}", e))
            })?;
        }

        fs::write(&self.path, data).await.map_err(|e| {
            Error::Catalog(format!(
                "Failed to write catalog snapshot {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl Catalog for JsonFileCatalog {
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
        let mut objects = self.objects.write().await;
        objects.insert(object.logical_path.clone(), object);
        self.persist(&objects).await
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
        apply_reconcile(object, replica_number, new_size)?;

        // Reconcile failures must be reported as possible inconsistencies.
        self.persist(&objects)
            .await
            .map_err(|e| Error::CatalogUpdate(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{Replica, ReplicaStatus};
    use tempfile::TempDir;

    fn object(path: &str) -> DataObject {
        DataObject {
            logical_path: path.to_string(),
            replicas: vec![Replica {
                number: 0,
                hierarchy: "demo;ufs0".to_string(),
                physical_path: "obj.0".to_string(),
                size: 8,
                status: ReplicaStatus::AtRest,
                checksum: None,
            }],
            locked: false,
            special_collection: None,
        }
    }

    #[tokio::test]
    async fn test_reconcile_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let snapshot_path = temp_dir.path().join("catalog.json");

        {
            let catalog = JsonFileCatalog::open(snapshot_path.clone()).await.unwrap();
            catalog
                .put_object(object("/tempZone/home/alice/data"))
                .await
                .unwrap();
            catalog
                .reconcile_replica("/tempZone/home/alice/data", 0, 3)
                .await
                .unwrap();
        }

        let reopened = JsonFileCatalog::open(snapshot_path).await.unwrap();
        let fetched = reopened
            .get_object("/tempZone/home/alice/data")
            .await
            .unwrap();
        assert_eq!(fetched.replica_by_number(0).unwrap().size, 3);
    }

    #[tokio::test]
    async fn test_missing_file_opens_empty() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = JsonFileCatalog::open(temp_dir.path().join("catalog.json"))
            .await
            .unwrap();
        assert!(catalog.get_object("/tempZone/x").await.is_err());
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let snapshot_path = temp_dir.path().join("catalog.json");
        tokio::fs::write(&snapshot_path, b"not json").await.unwrap();

        let err = JsonFileCatalog::open(snapshot_path).await.unwrap_err();
        assert!(matches!(err, Error::Catalog(_)));
    }

    #[tokio::test]
    async fn test_unsupported_snapshot_version_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let snapshot_path = temp_dir.path().join("catalog.json");
        tokio::fs::write(&snapshot_path, br#"{"version": 99, "objects": []}"#)
            .await
            .unwrap();

        let err = JsonFileCatalog::open(snapshot_path).await.unwrap_err();
        assert!(matches!(err, Error::Catalog(_)));
    }
}
