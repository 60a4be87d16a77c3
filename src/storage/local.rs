//! Local filesystem storage backend
//!
//! Runs in one of two modes fixed at construction: passthrough, where
//! paths are used as given (relative paths resolve against the process
//! working directory), or rooted, where every path is joined under a
//! root directory. The rooted mode backs S3 emulation: `bucket/key`
//! layouts map onto `root/bucket/key` on disk.

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;

use crate::{Error, Result};

use super::StorageProcessor;

/// Local filesystem processor.
pub struct LocalProcessor {
    root: Option<PathBuf>,
}

impl LocalProcessor {
    /// Processor that uses caller paths verbatim.
    pub fn passthrough() -> Self {
        Self { root: None }
    }

    /// Processor that resolves every path under `root`.
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        Self { root: Some(root.into()) }
    }

    fn resolve_path(&self, path: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(path),
            None => PathBuf::from(path),
        }
    }
}

/// Translate a missing-file IO error into [`Error::NotFound`] for `path`.
fn map_not_found(err: std::io::Error, path: &str) -> Error {
    if err.kind() == std::io::ErrorKind::NotFound {
        Error::not_found(path.to_string())
    } else {
        Error::Io(err)
    }
}

#[async_trait]
impl StorageProcessor for LocalProcessor {
    async fn list(&self, prefix: &str, _bucket: Option<&str>) -> Result<Vec<String>> {
        let dir = self.resolve_path(prefix);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            // A prefix nothing was ever written under lists as empty.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let base = prefix.trim_end_matches('/');
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            // Skip names that are not valid UTF-8; a lossy conversion
            // would produce keys that no longer address the file.
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(_) => continue,
            };
            // Keys stay in caller space so they can be passed straight
            // back into read/delete regardless of mode.
            if base.is_empty() {
                files.push(name);
            } else {
                files.push(format!("{}/{}", base, name));
            }
        }
        Ok(files)
    }

    async fn read(&self, path: &str, _bucket: Option<&str>) -> Result<Bytes> {
        let resolved = self.resolve_path(path);
        let data = fs::read(&resolved)
            .await
            .map_err(|e| map_not_found(e, path))?;
        Ok(Bytes::from(data))
    }

    async fn read_batch(&self, paths: &[String], bucket: Option<&str>) -> Result<Vec<Bytes>> {
        let mut results = Vec::with_capacity(paths.len());
        for path in paths {
            results.push(self.read(path, bucket).await?);
        }
        Ok(results)
    }

    async fn write(
        &self,
        path: &str,
        data: Bytes,
        _bucket: Option<&str>,
        _content_type: Option<&str>,
    ) -> Result<()> {
        let resolved = self.resolve_path(path);
        if let Some(parent) = resolved.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&resolved, &data).await?;
        Ok(())
    }

    async fn write_batch(&self, entries: &[(String, Bytes)], bucket: Option<&str>) -> Result<()> {
        for (path, data) in entries {
            self.write(path, data.clone(), bucket, None).await?;
        }
        Ok(())
    }

    async fn delete(&self, path: &str, _bucket: Option<&str>) -> Result<()> {
        let resolved = self.resolve_path(path);
        fs::remove_file(&resolved)
            .await
            .map_err(|e| map_not_found(e, path))
    }

    async fn delete_batch(&self, paths: &[String], bucket: Option<&str>) -> Result<()> {
        for path in paths {
            self.delete(path, bucket).await?;
        }
        Ok(())
    }

    async fn delete_files_by_prefix(&self, prefix: &str, bucket: Option<&str>) -> Result<()> {
        let files = self.list(prefix, bucket).await?;
        if files.is_empty() {
            return Err(Error::empty_prefix(prefix.to_string()));
        }
        self.delete_batch(&files, bucket).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_rooted_write_read_delete() {
        let dir = TempDir::new().unwrap();
        let processor = LocalProcessor::rooted(dir.path());

        processor
            .write("bucket/file.txt", Bytes::from("hello"), None, None)
            .await
            .unwrap();
        assert!(dir.path().join("bucket/file.txt").exists());

        let data = processor.read("bucket/file.txt", None).await.unwrap();
        assert_eq!(data, Bytes::from("hello"));

        processor.delete("bucket/file.txt", None).await.unwrap();
        assert!(!dir.path().join("bucket/file.txt").exists());
    }

    #[tokio::test]
    async fn test_passthrough_resolves_absolute_paths() {
        let dir = TempDir::new().unwrap();
        let processor = LocalProcessor::passthrough();
        let path = dir.path().join("file.txt");
        let path_str = path.to_string_lossy().into_owned();

        processor
            .write(&path_str, Bytes::from("data"), None, None)
            .await
            .unwrap();
        assert!(path.exists());

        let data = processor.read(&path_str, None).await.unwrap();
        assert_eq!(data, Bytes::from("data"));
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let processor = LocalProcessor::rooted(dir.path());

        let err = processor.read("absent.txt", None).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let processor = LocalProcessor::rooted(dir.path());

        let err = processor.delete("absent.txt", None).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_returns_direct_files_only() {
        let dir = TempDir::new().unwrap();
        let processor = LocalProcessor::rooted(dir.path());

        processor
            .write("docs/a.txt", Bytes::from("a"), None, None)
            .await
            .unwrap();
        processor
            .write("docs/b.txt", Bytes::from("b"), None, None)
            .await
            .unwrap();
        processor
            .write("docs/sub/c.txt", Bytes::from("c"), None, None)
            .await
            .unwrap();

        let mut files = processor.list("docs", None).await.unwrap();
        files.sort();
        assert_eq!(files, vec!["docs/a.txt", "docs/b.txt"]);
    }

    #[tokio::test]
    async fn test_list_keys_round_trip_into_read() {
        let dir = TempDir::new().unwrap();
        let processor = LocalProcessor::rooted(dir.path());

        processor
            .write("media/x.bin", Bytes::from("x"), None, None)
            .await
            .unwrap();

        let files = processor.list("media", None).await.unwrap();
        assert_eq!(files.len(), 1);
        let data = processor.read(&files[0], None).await.unwrap();
        assert_eq!(data, Bytes::from("x"));
    }

    #[tokio::test]
    async fn test_list_missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let processor = LocalProcessor::rooted(dir.path());

        let files = processor.list("nowhere", None).await.unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_batch_read_fails_fast() {
        let dir = TempDir::new().unwrap();
        let processor = LocalProcessor::rooted(dir.path());

        processor
            .write("ok.txt", Bytes::from("ok"), None, None)
            .await
            .unwrap();

        let paths = vec!["ok.txt".to_string(), "missing.txt".to_string()];
        let err = processor.read_batch(&paths, None).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_files_by_prefix_removes_all() {
        let dir = TempDir::new().unwrap();
        let processor = LocalProcessor::rooted(dir.path());

        processor
            .write("tmp/a.txt", Bytes::from("a"), None, None)
            .await
            .unwrap();
        processor
            .write("tmp/b.txt", Bytes::from("b"), None, None)
            .await
            .unwrap();

        processor.delete_files_by_prefix("tmp", None).await.unwrap();
        assert!(!dir.path().join("tmp/a.txt").exists());
        assert!(!dir.path().join("tmp/b.txt").exists());
    }

    #[tokio::test]
    async fn test_delete_files_by_prefix_empty_is_error() {
        let dir = TempDir::new().unwrap();
        let processor = LocalProcessor::rooted(dir.path());
        fs::create_dir_all(dir.path().join("empty")).await.unwrap();

        let err = processor
            .delete_files_by_prefix("empty", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EmptyPrefix(_)));

        let err = processor
            .delete_files_by_prefix("never-written", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EmptyPrefix(_)));
    }

    #[tokio::test]
    async fn test_write_overwrites_existing() {
        let dir = TempDir::new().unwrap();
        let processor = LocalProcessor::rooted(dir.path());

        processor
            .write("f.txt", Bytes::from("old"), None, None)
            .await
            .unwrap();
        processor
            .write("f.txt", Bytes::from("new"), None, None)
            .await
            .unwrap();

        let data = processor.read("f.txt", None).await.unwrap();
        assert_eq!(data, Bytes::from("new"));
    }
}
