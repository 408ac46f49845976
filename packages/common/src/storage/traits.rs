use async_trait::async_trait;

use super::error::StorageError;
use super::key::StorageKey;

/// Fallback content type for blobs stored without metadata.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Bytes of a stored blob together with the metadata written alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Name-addressed blob storage.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` under `key`, replacing any previous blob with that key.
    async fn put(
        &self,
        key: &StorageKey,
        data: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// Retrieve all bytes and the content type for a blob.
    async fn get(&self, key: &StorageKey) -> Result<StoredBlob, StorageError>;

    /// Check whether a blob exists.
    async fn exists(&self, key: &StorageKey) -> Result<bool, StorageError>;

    /// Delete a blob.
    ///
    /// Returns `true` if the blob was deleted, `false` if it did not exist.
    async fn delete(&self, key: &StorageKey) -> Result<bool, StorageError>;
}
