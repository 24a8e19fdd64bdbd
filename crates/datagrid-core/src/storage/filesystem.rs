//! Filesystem vault storage implementation.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::PhysicalStorage;
use crate::error::StorageError;
use crate::Result;

/// Filesystem-backed vault.
#[derive(Debug, Clone)]
pub struct FilesystemStorage {
    vault_root: PathBuf,
}

impl FilesystemStorage {
    /// Create a vault rooted at `vault_root`.
    pub fn new(vault_root: PathBuf) -> Self {
        Self { vault_root }
    }

    /// Convert a vault-relative physical path to a filesystem path.
    fn physical_to_fs_path(&self, path: &str) -> PathBuf {
        // Normalize to prevent escaping the vault root
        let normalized = path.trim_start_matches('/');
        self.vault_root.join(normalized)
    }

    fn map_io_error(path: &str, e: std::io::Error) -> StorageError {
        match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(path.to_string()),
            std::io::ErrorKind::PermissionDenied => StorageError::PermissionDenied(path.to_string()),
            _ => StorageError::Backend(format!("IO error on {}: {}", path, e)),
        }
    }
}

#[async_trait]
impl PhysicalStorage for FilesystemStorage {
    async fn write(&self, path: &str, data: Bytes) -> Result<()> {
        let fs_path = self.physical_to_fs_path(path);

        if let Some(parent) = fs_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::Backend(format!("Failed to create directories: {}", e))
            })?;
        }

        let mut file = fs::File::create(&fs_path)
            .await
            .map_err(|e| Self::map_io_error(path, e))?;
        file.write_all(&data)
            .await
            .map_err(|e| Self::map_io_error(path, e))?;
        file.flush()
            .await
            .map_err(|e| Self::map_io_error(path, e))?;

        Ok(())
    }

    async fn read(&self, path: &str) -> Result<Bytes> {
        let fs_path = self.physical_to_fs_path(path);
        let data = fs::read(&fs_path)
            .await
            .map_err(|e| Self::map_io_error(path, e))?;
        Ok(Bytes::from(data))
    }

    async fn truncate(&self, path: &str, length: u64) -> Result<()> {
        let fs_path = self.physical_to_fs_path(path);

        let file = fs::OpenOptions::new()
            .write(true)
            .open(&fs_path)
            .await
            .map_err(|e| Self::map_io_error(path, e))?;

        // set_len pads with zero bytes on grow and discards on shrink.
        file.set_len(length)
            .await
            .map_err(|e| Self::map_io_error(path, e))?;
        file.sync_all()
            .await
            .map_err(|e| Self::map_io_error(path, e))?;

        Ok(())
    }

    async fn size(&self, path: &str) -> Result<u64> {
        let fs_path = self.physical_to_fs_path(path);
        let metadata = fs::metadata(&fs_path)
            .await
            .map_err(|e| Self::map_io_error(path, e))?;
        Ok(metadata.len())
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        let fs_path = self.physical_to_fs_path(path);
        Ok(fs_path.exists())
    }
}
