mod error;
mod key;
mod traits;

pub mod filesystem;
#[cfg(feature = "object-storage")]
pub mod object_store;

use std::sync::Arc;

pub use error::StorageError;
pub use key::StorageKey;
pub use traits::{BlobStore, DEFAULT_CONTENT_TYPE, StoredBlob};

use crate::config::{StorageBackend, StorageConfig};

/// Open the blob store selected by `config.backend`.
pub async fn open(config: &StorageConfig) -> Result<Arc<dyn BlobStore>, StorageError> {
    match config.backend {
        StorageBackend::Filesystem => {
            let store =
                filesystem::FilesystemBlobStore::new(config.data_dir.clone(), config.max_blob_size)
                    .await?;
            Ok(Arc::new(store))
        }
        #[cfg(feature = "object-storage")]
        StorageBackend::S3 => Ok(Arc::new(object_store::S3BlobStore::new(config)?)),
        #[cfg(not(feature = "object-storage"))]
        StorageBackend::S3 => Err(StorageError::Backend(
            "built without object-storage support".into(),
        )),
    }
}
