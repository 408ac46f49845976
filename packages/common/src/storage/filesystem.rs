use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;

use super::error::StorageError;
use super::key::StorageKey;
use super::traits::{BlobStore, DEFAULT_CONTENT_TYPE, StoredBlob};

#[derive(Serialize, Deserialize)]
struct BlobMeta {
    content_type: String,
}

/// Filesystem-backed blob store.
///
/// Layout under `base_path`:
/// `objects/{key}` holds the bytes, `meta/{key}.json` the metadata and
/// `.tmp/` the in-flight writes that are renamed into place.
pub struct FilesystemBlobStore {
    base_path: PathBuf,
    max_size: u64,
}

impl FilesystemBlobStore {
    /// Create a new filesystem blob store.
    pub async fn new(base_path: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(base_path.join("objects")).await?;
        fs::create_dir_all(base_path.join("meta")).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            max_size,
        })
    }

    fn object_path(&self, key: &StorageKey) -> PathBuf {
        self.base_path.join("objects").join(key.as_str())
    }

    fn meta_path(&self, key: &StorageKey) -> PathBuf {
        self.base_path
            .join("meta")
            .join(format!("{}.json", key.as_str()))
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }

    /// Write `data` to a temp file and rename it over `dest`.
    async fn write_atomic(&self, dest: &Path, data: &[u8]) -> Result<(), StorageError> {
        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&temp_path, dest).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for FilesystemBlobStore {
    async fn put(
        &self,
        key: &StorageKey,
        data: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError> {
        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

        let meta = serde_json::to_vec(&BlobMeta {
            content_type: content_type.to_owned(),
        })?;

        // Metadata lands first so a visible object always has its content type.
        self.write_atomic(&self.meta_path(key), &meta).await?;
        self.write_atomic(&self.object_path(key), data).await
    }

    async fn get(&self, key: &StorageKey) -> Result<StoredBlob, StorageError> {
        let data = match fs::read(self.object_path(key)).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(key.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let content_type = match fs::read(self.meta_path(key)).await {
            Ok(raw) => serde_json::from_slice::<BlobMeta>(&raw)?.content_type,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => DEFAULT_CONTENT_TYPE.to_owned(),
            Err(e) => return Err(e.into()),
        };

        Ok(StoredBlob { data, content_type })
    }

    async fn exists(&self, key: &StorageKey) -> Result<bool, StorageError> {
        Ok(fs::try_exists(self.object_path(key)).await?)
    }

    async fn delete(&self, key: &StorageKey) -> Result<bool, StorageError> {
        let removed = match fs::remove_file(self.object_path(key)).await {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };
        match fs::remove_file(self.meta_path(key)).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        Ok(removed)
    }
}
