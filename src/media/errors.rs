//! Media-layer error types

use thiserror::Error;

/// Result type for media operations
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors reported by a volume or an open file on it.
#[derive(Debug, Clone, Error)]
pub enum MediaError {
    #[error("no such file: {0}")]
    NotFound(String),

    #[error("file already exists: {0}")]
    AlreadyExists(String),

    #[error("file handle is closed")]
    Closed,

    #[error("file is not open for writing")]
    ReadOnly,

    #[error("no space left on volume")]
    NoSpace,

    #[error("too many open files")]
    TooManyOpen,

    #[error("i/o error: {0}")]
    Io(String),
}
