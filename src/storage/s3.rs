//! S3 storage backend
//!
//! Implements the processor contract over an [`ObjectStore`] client.
//! Paths are used verbatim as object keys and every operation requires
//! an explicit bucket. Fully-qualified `s3://bucket/key` URIs are
//! handled by the associated path helpers, not by the operations.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::{Error, Result};

use super::{ObjectStore, StorageProcessor};

/// Scheme prefix of a fully-qualified S3 path.
pub const S3_PATH_PREFIX: &str = "s3://";

/// S3-backed processor.
pub struct S3Processor {
    store: Arc<dyn ObjectStore>,
}

impl S3Processor {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Split a fully-qualified `s3://bucket/key` path into bucket and key.
    pub fn resolve_path(path: &str) -> Result<(String, String)> {
        let rest = path.strip_prefix(S3_PATH_PREFIX).ok_or_else(|| {
            Error::invalid_argument(format!("Path must start with '{}'", S3_PATH_PREFIX))
        })?;
        let (bucket, key) = rest.split_once('/').ok_or_else(|| {
            Error::invalid_argument(format!("Path must contain a bucket and key: '{}'", path))
        })?;
        Ok((bucket.to_string(), key.to_string()))
    }

    /// Strip the scheme prefix, mapping an S3-shaped path onto local storage.
    pub fn path_to_local(path: &str) -> Result<&str> {
        path.strip_prefix(S3_PATH_PREFIX).ok_or_else(|| {
            Error::invalid_argument(format!("Path must start with '{}'", S3_PATH_PREFIX))
        })
    }

    fn require_bucket<'a>(&self, bucket: Option<&'a str>) -> Result<&'a str> {
        bucket.ok_or_else(|| Error::invalid_argument("S3 operations require a bucket"))
    }
}

#[async_trait]
impl StorageProcessor for S3Processor {
    async fn list(&self, prefix: &str, bucket: Option<&str>) -> Result<Vec<String>> {
        let bucket = self.require_bucket(bucket)?;
        let keys = self.store.list(bucket, prefix).await?;
        // An object stored at exactly the prefix key denotes the
        // "directory" itself, not a file under it.
        Ok(keys.into_iter().filter(|key| key != prefix).collect())
    }

    async fn read(&self, path: &str, bucket: Option<&str>) -> Result<Bytes> {
        let bucket = self.require_bucket(bucket)?;
        self.store.get(bucket, path).await
    }

    async fn read_batch(&self, paths: &[String], bucket: Option<&str>) -> Result<Vec<Bytes>> {
        let bucket = self.require_bucket(bucket)?;
        let mut results = Vec::with_capacity(paths.len());
        for path in paths {
            results.push(self.store.get(bucket, path).await?);
        }
        Ok(results)
    }

    async fn write(
        &self,
        path: &str,
        data: Bytes,
        bucket: Option<&str>,
        content_type: Option<&str>,
    ) -> Result<()> {
        let bucket = self.require_bucket(bucket)?;
        self.store.put(bucket, path, data, content_type).await
    }

    async fn write_batch(&self, entries: &[(String, Bytes)], bucket: Option<&str>) -> Result<()> {
        let bucket = self.require_bucket(bucket)?;
        for (path, data) in entries {
            self.store.put(bucket, path, data.clone(), None).await?;
        }
        Ok(())
    }

    async fn delete(&self, path: &str, bucket: Option<&str>) -> Result<()> {
        let bucket = self.require_bucket(bucket)?;
        self.store.delete(bucket, path).await
    }

    async fn delete_batch(&self, paths: &[String], bucket: Option<&str>) -> Result<()> {
        let bucket = self.require_bucket(bucket)?;
        self.store.delete_many(bucket, paths).await
    }

    async fn delete_files_by_prefix(&self, prefix: &str, bucket: Option<&str>) -> Result<()> {
        let bucket = self.require_bucket(bucket)?;
        // Raw listing here: an object at the literal prefix key is
        // swept up along with everything under it.
        let keys = self.store.list(bucket, prefix).await?;
        if keys.is_empty() {
            return Err(Error::empty_prefix(prefix.to_string()));
        }
        self.store.delete_many(bucket, &keys).await
    }
}
