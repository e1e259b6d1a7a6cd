//! Filesystem-backed content store

use crate::{validate_key, ContentReader, ContentStore};
use async_trait::async_trait;
use scorm_errors::{Error, StorageError};
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Content store rooted at a local directory
#[derive(Debug, Clone)]
pub struct LocalStore {
    base: PathBuf,
}

impl LocalStore {
    #[must_use]
    pub fn new<P: Into<PathBuf>>(base: P) -> Self {
        Self { base: base.into() }
    }

    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, Error> {
        validate_key(key)?;
        Ok(self.base.join(key))
    }
}

#[async_trait]
impl ContentStore for LocalStore {
    async fn write(&self, key: &str, bytes: &[u8]) -> Result<(), Error> {
        let dest_path = self.path_for(key)?;
        let parent_dir = dest_path.parent().ok_or_else(|| StorageError::InvalidPath {
            path: key.to_string(),
        })?;
        fs::create_dir_all(parent_dir)
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, key))?;

        // Readers never observe a half-written object
        let temp_path = parent_dir.join(format!(".{}.tmp", Uuid::new_v4()));
        if let Err(e) = fs::write(&temp_path, bytes).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(StorageError::from_io_with_path(&e, key).into());
        }

        if let Err(e) = fs::rename(&temp_path, &dest_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(StorageError::from_io_with_path(&e, key).into());
        }

        tracing::trace!(key, size = bytes.len(), "stored object");
        Ok(())
    }

    async fn open(&self, key: &str) -> Result<ContentReader, Error> {
        let path = self.path_for(key)?;
        let file = fs::File::open(&path)
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, key))?;
        Ok(Box::new(file))
    }

    async fn exists(&self, key: &str) -> Result<bool, Error> {
        let path = self.path_for(key)?;
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::from_io_with_path(&e, key).into()),
        }
    }
}
