//! In-memory storage for testing and embedded use.

use async_trait::async_trait;
use bytes::Bytes;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};
use std::sync::Arc;

use super::PhysicalStorage;
use crate::error::StorageError;
use crate::{Error, Result};

/// In-memory vault using object_store.
///
/// Does not persist data between runs.
pub struct MemoryStorage {
    store: Arc<InMemory>,
}

impl MemoryStorage {
    /// Create a new in-memory vault.
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemory::new()),
        }
    }

    async fn get_bytes(&self, path: &str) -> Result<Bytes> {
        let location = Path::from(path);
        let result = self.store.get(&location).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => {
                Error::Storage(StorageError::NotFound(path.to_string()))
            }
            _ => Error::Storage(StorageError::Backend(format!("Memory GET failed: {}", e))),
        })?;

        result.bytes().await.map_err(|e| {
            Error::Storage(StorageError::Backend(format!("Failed to read bytes: {}", e)))
        })
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PhysicalStorage for MemoryStorage {
    async fn write(&self, path: &str, data: Bytes) -> Result<()> {
        let location = Path::from(path);
        self.store
            .put(&location, PutPayload::from_bytes(data))
            .await
            .map_err(|e| {
                Error::Storage(StorageError::Backend(format!("Memory PUT failed: {}", e)))
            })?;
        Ok(())
    }

    async fn read(&self, path: &str) -> Result<Bytes> {
        self.get_bytes(path).await
    }

    async fn truncate(&self, path: &str, length: u64) -> Result<()> {
        let length = usize::try_from(length).map_err(|_| {
            Error::Storage(StorageError::Backend(format!(
                "Length [{}] exceeds addressable memory",
                length
            )))
        })?;
        let mut data = self.get_bytes(path).await?.to_vec();
        data.resize(length, 0);
        self.write(path, Bytes::from(data)).await
    }

    async fn size(&self, path: &str) -> Result<u64> {
        let location = Path::from(path);
        let meta = self.store.head(&location).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => {
                Error::Storage(StorageError::NotFound(path.to_string()))
            }
            _ => Error::Storage(StorageError::Backend(format!("Memory HEAD failed: {}", e))),
        })?;
        Ok(meta.size as u64)
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        let location = Path::from(path);
        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(Error::Storage(StorageError::Backend(format!(
                "Memory HEAD failed: {}",
                e
            )))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_and_read() {
        let storage = MemoryStorage::new();

        storage.write("obj.0", Bytes::from("content!")).await.unwrap();
        assert_eq!(storage.read("obj.0").await.unwrap(), Bytes::from("content!"));
    }

    #[tokio::test]
    async fn test_truncate_shrinks_and_grows() {
        let storage = MemoryStorage::new();
        storage.write("obj.0", Bytes::from("content!")).await.unwrap();

        storage.truncate("obj.0", 7).await.unwrap();
        assert_eq!(storage.read("obj.0").await.unwrap(), Bytes::from("content"));

        storage.truncate("obj.0", 9).await.unwrap();
        let data = storage.read("obj.0").await.unwrap();
        assert_eq!(data.len(), 9);
        assert_eq!(data[7], 0);
        assert_eq!(data[8], 0);
    }

    #[tokio::test]
    async fn test_truncate_missing_object_is_not_found() {
        let storage = MemoryStorage::new();
        let err = storage.truncate("no-such", 0).await.unwrap_err();
        assert!(matches!(err, Error::Storage(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_size_and_exists() {
        let storage = MemoryStorage::new();
        assert!(!storage.exists("obj.0").await.unwrap());

        storage.write("obj.0", Bytes::from("content!")).await.unwrap();
        assert!(storage.exists("obj.0").await.unwrap());
        assert_eq!(storage.size("obj.0").await.unwrap(), 8);
    }
}
