//! Adapter error taxonomy
//!
//! The engine sees a small closed set of outcome codes:
//! - `VFS_CANTOPEN`: the file could not be created or opened
//! - `VFS_IOERR`: short read, stat/truncate failure, malformed temp name
//! - `VFS_FULL`: seek failure, or a write that could not place all bytes;
//!   doubles as the generic "cannot position/complete" signal
//! - `VFS_MISUSE`: a caller violated the open-flag contract; reported
//!   instead of proceeding with undefined behavior

use thiserror::Error;

/// Result type for adapter operations
pub type VfsResult<T> = Result<T, VfsError>;

/// Errors returned to the engine by the adapter.
#[derive(Debug, Clone, Error)]
pub enum VfsError {
    #[error("cannot open: {0}")]
    CannotOpen(String),

    #[error("i/o error: {0}")]
    Io(String),

    #[error("volume full: {0}")]
    Full(String),

    #[error("contract violation: {0}")]
    Misuse(String),
}

impl VfsError {
    /// File could not be created or opened
    pub fn cannot_open(msg: impl Into<String>) -> Self {
        VfsError::CannotOpen(msg.into())
    }

    /// Generic I/O failure
    pub fn io(msg: impl Into<String>) -> Self {
        VfsError::Io(msg.into())
    }

    /// Medium out of space, or the cursor could not be positioned
    pub fn full(msg: impl Into<String>) -> Self {
        VfsError::Full(msg.into())
    }

    /// Caller broke the adapter contract
    pub fn misuse(msg: impl Into<String>) -> Self {
        VfsError::Misuse(msg.into())
    }

    /// Stable code string for this error
    pub fn code(&self) -> &'static str {
        match self {
            VfsError::CannotOpen(_) => "VFS_CANTOPEN",
            VfsError::Io(_) => "VFS_IOERR",
            VfsError::Full(_) => "VFS_FULL",
            VfsError::Misuse(_) => "VFS_MISUSE",
        }
    }
}
