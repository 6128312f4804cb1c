//! Shell error types

use thiserror::Error;

use crate::vfs::VfsError;

/// Result type for shell operations
pub type ShellResult<T> = Result<T, ShellError>;

/// Errors produced while executing a shell command line.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("command not found: {0}")]
    CommandNotFound(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("{0}")]
    Exec(String),

    #[error("output error: {0}")]
    Output(String),
}

impl From<VfsError> for ShellError {
    fn from(e: VfsError) -> Self {
        ShellError::Exec(e.to_string())
    }
}

impl From<std::io::Error> for ShellError {
    fn from(e: std::io::Error) -> Self {
        ShellError::Output(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vfs_error_becomes_exec() {
        let err: ShellError = VfsError::io("boom").into();
        assert!(matches!(err, ShellError::Exec(_)));
        assert!(format!("{}", err).contains("boom"));
    }

    #[test]
    fn test_usage_display() {
        let err = ShellError::Usage("stat <path>");
        assert_eq!(format!("{}", err), "usage: stat <path>");
    }
}
