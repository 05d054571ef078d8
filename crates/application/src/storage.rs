//! Blob storage for uploaded media.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// A file to store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreFile {
    /// Storage key, e.g. `videos/<video_id>/<name>`.
    pub id: String,
    pub data: Vec<u8>,
    pub mime_type: Option<String>,
}

/// A stored file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub data: Vec<u8>,
    pub mime_type: Option<String>,
}

/// Trait for blob storage.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Stores a file, replacing any file with the same id.
    async fn store(&self, file: StoreFile) -> Result<(), StorageError>;

    /// Loads a file.
    async fn get(&self, id: &str) -> Result<StoredFile, StorageError>;
}

/// In-memory storage for tests and storage-less deployments.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    files: Arc<RwLock<HashMap<String, StoredFile>>>,
}

impl InMemoryStorage {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored files.
    pub fn len(&self) -> usize {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true when no file is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    #[tracing::instrument(skip_all, fields(id = %file.id, size = file.data.len()))]
    async fn store(&self, file: StoreFile) -> Result<(), StorageError> {
        let stored = StoredFile {
            data: file.data,
            mime_type: file.mime_type,
        };
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(file.id, stored);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<StoredFile, StorageError> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_and_loads_files() {
        let storage = InMemoryStorage::new();
        storage
            .store(StoreFile {
                id: "videos/1/banner.png".to_string(),
                data: vec![1, 2, 3],
                mime_type: Some("image/png".to_string()),
            })
            .await
            .unwrap();

        let file = storage.get("videos/1/banner.png").await.unwrap();
        assert_eq!(file.data, [1, 2, 3]);
        assert_eq!(file.mime_type.as_deref(), Some("image/png"));
        assert_eq!(storage.len(), 1);
    }

    #[tokio::test]
    async fn unknown_file_is_not_found() {
        let err = InMemoryStorage::new().get("missing").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(id) if id == "missing"));
    }
}
