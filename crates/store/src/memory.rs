//! In-memory content store

use crate::{validate_key, ContentReader, ContentStore};
use async_trait::async_trait;
use dashmap::DashMap;
use scorm_errors::{Error, StorageError};
use std::sync::Arc;

/// Content store kept entirely in memory, mainly for tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    objects: Arc<DashMap<String, Arc<[u8]>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored keys, sorted
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn write(&self, key: &str, bytes: &[u8]) -> Result<(), Error> {
        validate_key(key)?;
        self.objects.insert(key.to_string(), Arc::from(bytes));
        Ok(())
    }

    async fn open(&self, key: &str) -> Result<ContentReader, Error> {
        validate_key(key)?;
        let bytes = self
            .objects
            .get(key)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| StorageError::PathNotFound {
                path: key.to_string(),
            })?;
        Ok(Box::new(std::io::Cursor::new(bytes)))
    }

    async fn exists(&self, key: &str) -> Result<bool, Error> {
        validate_key(key)?;
        Ok(self.objects.contains_key(key))
    }
}
