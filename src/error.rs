//! Error types for filegate

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No files found under prefix '{0}'")]
    EmptyPrefix(String),

    #[error("Storage backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    pub fn empty_prefix(prefix: impl Into<String>) -> Self {
        Error::EmptyPrefix(prefix.into())
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Error::BackendUnavailable(msg.into())
    }
}
