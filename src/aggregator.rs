//! Provider routing over the storage backends
//!
//! The aggregator is the single entry point for file operations. It
//! owns one processor per backend plus a rooted local processor used
//! to emulate S3 when that provider is disabled, and routes each call
//! by the requested provider and the S3 feature flag. Routing is a
//! pure decision; the fallback is the only automatic recovery path
//! and is logged at warning level every time it is taken.

use std::sync::Arc;

use bytes::Bytes;

use crate::config::StorageSection;
use crate::storage::local::LocalProcessor;
use crate::storage::s3::S3Processor;
use crate::storage::{ObjectStore, Provider, StorageProcessor};
use crate::Result;

/// Backend chosen for a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Local processor, paths used as given.
    Local,
    /// S3 processor.
    S3,
    /// Local processor emulating S3 under the configured root.
    LocalFallback,
}

/// Select the backend for `provider` given the S3 feature flag.
pub fn route(provider: Provider, s3_enabled: bool) -> Route {
    match provider {
        Provider::Local => Route::Local,
        Provider::S3 if s3_enabled => Route::S3,
        Provider::S3 => Route::LocalFallback,
    }
}

/// Entry point delegating file operations to the selected backend.
pub struct StorageAggregator {
    local: LocalProcessor,
    emulated: LocalProcessor,
    s3: S3Processor,
    s3_enabled: bool,
}

impl StorageAggregator {
    pub fn new(storage: &StorageSection, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            local: LocalProcessor::passthrough(),
            emulated: LocalProcessor::rooted(&storage.local_root),
            s3: S3Processor::new(store),
            s3_enabled: storage.use_s3,
        }
    }

    /// Whether S3 requests are served by the real backend.
    pub fn s3_enabled(&self) -> bool {
        self.s3_enabled
    }

    fn processor_for(&self, provider: Provider) -> &dyn StorageProcessor {
        match route(provider, self.s3_enabled) {
            Route::Local => &self.local,
            Route::S3 => &self.s3,
            Route::LocalFallback => {
                tracing::warn!("Provider {} is disabled. Using local file system.", provider);
                &self.emulated
            }
        }
    }

    /// Split a fully-qualified `s3://bucket/key` path into bucket and key.
    pub fn parse_s3_path(path: &str) -> Result<(String, String)> {
        S3Processor::resolve_path(path)
    }

    pub async fn list(
        &self,
        provider: Provider,
        prefix: &str,
        bucket: Option<&str>,
    ) -> Result<Vec<String>> {
        self.processor_for(provider).list(prefix, bucket).await
    }

    pub async fn read(
        &self,
        provider: Provider,
        path: &str,
        bucket: Option<&str>,
    ) -> Result<Bytes> {
        self.processor_for(provider).read(path, bucket).await
    }

    pub async fn read_batch(
        &self,
        provider: Provider,
        paths: &[String],
        bucket: Option<&str>,
    ) -> Result<Vec<Bytes>> {
        self.processor_for(provider).read_batch(paths, bucket).await
    }

    pub async fn write(
        &self,
        provider: Provider,
        path: &str,
        data: Bytes,
        bucket: Option<&str>,
        content_type: Option<&str>,
    ) -> Result<()> {
        self.processor_for(provider)
            .write(path, data, bucket, content_type)
            .await
    }

    pub async fn write_batch(
        &self,
        provider: Provider,
        entries: &[(String, Bytes)],
        bucket: Option<&str>,
    ) -> Result<()> {
        self.processor_for(provider)
            .write_batch(entries, bucket)
            .await
    }

    pub async fn delete(
        &self,
        provider: Provider,
        path: &str,
        bucket: Option<&str>,
    ) -> Result<()> {
        self.processor_for(provider).delete(path, bucket).await
    }

    pub async fn delete_batch(
        &self,
        provider: Provider,
        paths: &[String],
        bucket: Option<&str>,
    ) -> Result<()> {
        self.processor_for(provider)
            .delete_batch(paths, bucket)
            .await
    }

    pub async fn delete_files_by_prefix(
        &self,
        provider: Provider,
        prefix: &str,
        bucket: Option<&str>,
    ) -> Result<()> {
        self.processor_for(provider)
            .delete_files_by_prefix(prefix, bucket)
            .await
    }
}
