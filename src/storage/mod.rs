//! Storage abstraction layer
//!
//! Provides a unified, provider-addressed interface over S3 and local
//! filesystem storage. Backends implement [`StorageProcessor`]; the S3
//! backend additionally composes an [`ObjectStore`] client seam so the
//! processor logic stays independent of the AWS SDK.

use async_trait::async_trait;
use bytes::Bytes;

use crate::Result;

pub mod local;
pub mod repository;
pub mod s3;

/// Storage provider selector, supplied by the caller on every operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Local,
    S3,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Local => write!(f, "local"),
            Provider::S3 => write!(f, "s3"),
        }
    }
}

/// File-system processor contract implemented by every backend.
///
/// Batch operations run sequentially in the order given and abort on the
/// first failure; partial results are discarded, never returned.
#[async_trait]
pub trait StorageProcessor: Send + Sync {
    /// List the files directly under `prefix` (nested files excluded).
    async fn list(&self, prefix: &str, bucket: Option<&str>) -> Result<Vec<String>>;

    /// Read a whole file.
    async fn read(&self, path: &str, bucket: Option<&str>) -> Result<Bytes>;

    /// Read several files, failing fast on the first error.
    async fn read_batch(&self, paths: &[String], bucket: Option<&str>) -> Result<Vec<Bytes>>;

    /// Create or overwrite a file, creating missing parent structure.
    async fn write(
        &self,
        path: &str,
        data: Bytes,
        bucket: Option<&str>,
        content_type: Option<&str>,
    ) -> Result<()>;

    /// Write several files, failing fast on the first error.
    async fn write_batch(&self, entries: &[(String, Bytes)], bucket: Option<&str>) -> Result<()>;

    /// Delete a single file.
    async fn delete(&self, path: &str, bucket: Option<&str>) -> Result<()>;

    /// Delete several files.
    async fn delete_batch(&self, paths: &[String], bucket: Option<&str>) -> Result<()>;

    /// Delete every file under `prefix`; matching nothing is an error.
    async fn delete_files_by_prefix(&self, prefix: &str, bucket: Option<&str>) -> Result<()>;
}

/// Thin object-storage client contract composed by the S3 processor.
///
/// Correctness of an implementation is bounded by the wrapped service's
/// own contract; in particular `delete` follows S3 semantics and succeeds
/// for keys that do not exist.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch an entire object.
    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes>;

    /// Store an object, overwriting any previous value.
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: Option<&str>,
    ) -> Result<()>;

    /// List object keys under a prefix.
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>>;

    /// Delete a single object.
    async fn delete(&self, bucket: &str, key: &str) -> Result<()>;

    /// Delete a set of objects in one request.
    async fn delete_many(&self, bucket: &str, keys: &[String]) -> Result<()>;
}
