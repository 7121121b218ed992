//! Resume blob storage. The orchestrator only ever downloads by key.

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to download file '{path}': {message}")]
    Download { path: String, message: String },

    #[error("Failed to read body of '{path}': {message}")]
    Body { path: String, message: String },

    #[error("Download of '{path}' timed out after {secs}s")]
    Timeout { path: String, secs: u64 },
}

/// Blob download by storage path.
#[async_trait]
pub trait ResumeStorage: Send + Sync {
    async fn download(&self, path: &str) -> Result<Bytes, StorageError>;
}

/// S3 / MinIO backed resume storage.
#[derive(Clone)]
pub struct S3ResumeStorage {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ResumeStorage {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl ResumeStorage for S3ResumeStorage {
    async fn download(&self, path: &str) -> Result<Bytes, StorageError> {
        let object = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| StorageError::Download {
                path: path.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        let bytes = object
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Body {
                path: path.to_string(),
                message: e.to_string(),
            })?
            .into_bytes();

        debug!("Downloaded s3://{}/{} ({} bytes)", self.bucket, path, bytes.len());
        Ok(bytes)
    }
}
