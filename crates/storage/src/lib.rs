//! Blob storage for uploaded photos.
//!
//! Handlers talk to an `Arc<dyn BlobStore>` and never know which backend is
//! behind it:
//!
//! - [`local::LocalBlobStore`] -- files under a local directory, served by
//!   the API at `/uploads`. Default for development and tests.
//! - [`s3::S3BlobStore`] -- an S3 bucket (or an S3-compatible service via a
//!   custom endpoint) whose objects are publicly readable.

use std::sync::Arc;

use async_trait::async_trait;

pub mod config;
pub mod local;
pub mod s3;

pub use config::{S3Config, StorageConfig};
pub use local::LocalBlobStore;
pub use s3::S3BlobStore;

/// Errors from the blob storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The object key is empty, absolute, or escapes the storage root.
    #[error("Invalid object key '{0}'")]
    InvalidKey(String),

    /// Local filesystem failure.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The remote object store rejected or failed the request.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// A successfully stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    /// Publicly reachable URL of the object.
    pub url: String,
    pub size_bytes: u64,
}

/// Write/delete access to a public blob store.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` under `key`, replacing any existing object.
    async fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, StorageError>;

    /// Remove the object at `key`. Removing a missing object succeeds.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Public URL an object stored at `key` is (or would be) reachable at.
    fn public_url(&self, key: &str) -> String;
}

/// Build the configured backend.
pub async fn build_blob_store(config: &StorageConfig) -> Arc<dyn BlobStore> {
    match config {
        StorageConfig::Local {
            root,
            public_base_url,
        } => {
            tracing::info!(root = %root.display(), "Using local blob storage");
            Arc::new(LocalBlobStore::new(root.clone(), public_base_url.clone()))
        }
        StorageConfig::S3(s3) => {
            tracing::info!(bucket = %s3.bucket, region = %s3.region, "Using S3 blob storage");
            Arc::new(S3BlobStore::connect(s3).await)
        }
    }
}

/// Reject keys that are empty, absolute, or contain `..` / backslash segments.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let bad = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..");
    if bad {
        Err(StorageError::InvalidKey(key.to_string()))
    } else {
        Ok(())
    }
}

/// Join a base URL and an object key with exactly one `/` between them.
pub fn join_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key.trim_start_matches('/'))
}
