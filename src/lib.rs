//! Filegate - A unified file storage gateway
//!
//! Filegate exposes one byte-oriented interface over local disk and
//! S3-compatible object storage. Callers address files by provider,
//! path, and an optional bucket; when the S3 provider is disabled the
//! gateway transparently emulates it on local disk under a configured
//! root directory.

pub mod aggregator;
pub mod api;
pub mod config;
pub mod error;
pub mod storage;

pub use error::{Error, Result};
