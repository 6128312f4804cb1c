//! Engine-facing virtual-filesystem contract
//!
//! The engine performs no I/O of its own: it resolves an adapter once at
//! startup, calls the `Vfs` operations to create or query files, and then
//! drives every read/write/sync through the returned `VfsFile` until close.

use chrono::{DateTime, Utc};

use super::errors::VfsResult;
use super::flags::OpenFlags;

/// Lock level requested by the engine for a file.
///
/// Under the single-task discipline all levels are granted trivially.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LockLevel {
    Shared,
    Reserved,
    Pending,
    Exclusive,
}

/// Immutable description of an adapter, produced once per instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VfsDescriptor {
    /// Adapter name the engine registers the backend under.
    pub name: String,
    /// Contract version tag.
    pub version: u32,
    /// Size of one file-handle record in bytes.
    pub file_record_size: usize,
    /// Longest pathname the adapter accepts, in bytes.
    pub max_pathname: usize,
}

/// A pluggable filesystem backend.
pub trait Vfs {
    /// The bound file handle type produced by `open`.
    type File: VfsFile;

    /// The adapter's immutable descriptor.
    fn descriptor(&self) -> &VfsDescriptor;

    /// Open `path` with the requested flag set, or synthesize and open a
    /// private temporary file when no path is given.
    fn open(&self, path: Option<&str>, flags: OpenFlags) -> VfsResult<Self::File>;

    /// Remove the named file.
    fn delete(&self, path: &str) -> VfsResult<()>;

    /// Report whether the named file exists. Existence is the only
    /// granularity: any existing file is considered fully accessible.
    fn access(&self, path: &str) -> bool;

    /// Turn a possibly-relative pathname into an absolute one, capped at
    /// the descriptor's maximum pathname length.
    fn full_pathname(&self, path: &str) -> String;

    /// Block for roughly `micros` microseconds; returns the microseconds
    /// actually granted (rounded up to whole milliseconds).
    fn sleep(&self, micros: u64) -> u64;

    /// Current wall-clock time, UTC.
    fn current_time(&self) -> DateTime<Utc>;
}

/// One open file bound to an adapter.
pub trait VfsFile {
    /// Fill `buf` with file content starting at byte `offset`. Any region
    /// beyond end-of-file reads as zero bytes; a read that could not be
    /// satisfied entirely from real file content still fills the buffer
    /// contractually but reports an I/O error.
    fn read(&mut self, buf: &mut [u8], offset: u64) -> VfsResult<()>;

    /// Write all of `buf` at byte `offset`, extending the file as needed.
    fn write(&mut self, buf: &[u8], offset: u64) -> VfsResult<()>;

    /// Shrink or extend the file to `size`, rounded up to the configured
    /// chunk multiple when one is set.
    fn truncate(&mut self, size: u64) -> VfsResult<()>;

    /// Commit pending writes to stable storage.
    fn sync(&mut self) -> VfsResult<()>;

    /// Current file size in bytes.
    fn size(&self) -> VfsResult<u64>;

    /// Acquire a lock at `level`.
    fn lock(&mut self, level: LockLevel) -> VfsResult<()>;

    /// Release down to `level`.
    fn unlock(&mut self, level: LockLevel) -> VfsResult<()>;

    /// Whether any other connection holds a reserved lock.
    fn check_reserved_lock(&self) -> VfsResult<bool>;

    /// Sector size of the underlying medium in bytes.
    fn sector_size(&self) -> u32;

    /// Configure truncate alignment; zero clears it.
    fn set_chunk_size(&mut self, size: u64);

    /// Release the underlying handle. Exactly one close succeeds; the
    /// handle is unusable afterward.
    fn close(&mut self) -> VfsResult<()>;
}
