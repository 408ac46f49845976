use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, Region};
use tracing::debug;

use super::error::StorageError;
use super::key::StorageKey;
use super::traits::{BlobStore, DEFAULT_CONTENT_TYPE, StoredBlob};
use crate::config::StorageConfig;

/// Blob store backed by an S3-compatible bucket.
pub struct S3BlobStore {
    bucket: Box<Bucket>,
    max_size: u64,
}

impl S3BlobStore {
    /// Build a client for the configured bucket.
    ///
    /// Static credentials are used when both keys are configured; otherwise
    /// credentials come from the environment or the instance profile.
    pub fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        let region = match &config.endpoint {
            Some(endpoint) => Region::Custom {
                region: config.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => config
                .region
                .parse::<Region>()
                .map_err(|e| StorageError::Backend(format!("invalid region: {e}")))?,
        };

        let credentials = match (&config.access_key, &config.secret_key) {
            (Some(access), Some(secret)) => {
                Credentials::new(Some(access.as_str()), Some(secret.as_str()), None, None, None)
            }
            _ => Credentials::default(),
        }
        .map_err(|e| StorageError::Backend(format!("credentials: {e}")))?;

        let mut bucket = Bucket::new(&config.bucket, region, credentials)
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        if config.path_style {
            bucket = bucket.with_path_style();
        }

        Ok(Self {
            bucket,
            max_size: config.max_blob_size,
        })
    }
}

fn check_status(status: u16, key: &StorageKey) -> Result<(), StorageError> {
    match status {
        200..=299 => Ok(()),
        404 => Err(StorageError::NotFound(key.to_string())),
        other => Err(StorageError::Backend(format!(
            "unexpected status {other} for {key}"
        ))),
    }
}

fn backend(err: s3::error::S3Error) -> StorageError {
    StorageError::Backend(err.to_string())
}

#[async_trait]
impl BlobStore for S3BlobStore {
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

        let response = self
            .bucket
            .put_object_with_content_type(key.as_str(), data, content_type)
            .await
            .map_err(backend)?;
        debug!(key = %key, status = response.status_code(), "put object");
        check_status(response.status_code(), key)
    }

    async fn get(&self, key: &StorageKey) -> Result<StoredBlob, StorageError> {
        let response = self.bucket.get_object(key.as_str()).await.map_err(backend)?;
        check_status(response.status_code(), key)?;

        let content_type = response
            .headers()
            .get("content-type")
            .cloned()
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_owned());

        Ok(StoredBlob {
            data: response.bytes().to_vec(),
            content_type,
        })
    }

    async fn exists(&self, key: &StorageKey) -> Result<bool, StorageError> {
        let (_, status) = self.bucket.head_object(key.as_str()).await.map_err(backend)?;
        match check_status(status, key) {
            Ok(()) => Ok(true),
            Err(StorageError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn delete(&self, key: &StorageKey) -> Result<bool, StorageError> {
        // S3 deletes are idempotent and do not report whether the object existed.
        if !self.exists(key).await? {
            return Ok(false);
        }
        let response = self
            .bucket
            .delete_object(key.as_str())
            .await
            .map_err(backend)?;
        check_status(response.status_code(), key)?;
        Ok(true)
    }
}
