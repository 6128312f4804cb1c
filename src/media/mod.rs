//! Flash-media filesystem boundary
//!
//! The adapter performs all file I/O through the `Volume` and `VolumeFile`
//! traits defined here. The deployed target implements them on top of a
//! flash translation layer; this crate ships two implementations:
//!
//! - `RamDisk`: a fixed-geometry in-memory volume for tests and simulation
//! - `HostVolume`: a directory-backed volume for hosted development builds
//!
//! # Seek semantics
//!
//! Positioning past end-of-file **grows the file** to the seek target,
//! zero-filling the gap. This is the defining property of the boundary: it
//! is the mechanism by which writes extend a file, and the reason reads
//! must never seek beyond the current size.

mod errors;
mod host;
mod ramdisk;

pub use errors::{MediaError, MediaResult};
pub use host::{HostFile, HostVolume};
pub use ramdisk::{RamDisk, RamFile};

/// Mode requested for one underlying open call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Open an existing file for reading only.
    Read,
    /// Open an existing file for random-access read/write.
    Update,
    /// Open for appending, creating the file if it does not exist.
    AppendCreate,
    /// Create a new file, failing if the path already exists.
    CreateNew,
}

/// Metadata returned by a stat call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileInfo {
    /// Current file length in bytes.
    pub size: u64,
}

/// A mounted single-root volume.
///
/// Implementations use interior mutability where open/remove touch shared
/// volume state; the deployment model is single-task, so no operation is
/// ever issued concurrently.
pub trait Volume {
    /// The open-file handle type produced by this volume.
    type File: VolumeFile;

    /// Open `path` in the given mode.
    fn open(&self, path: &str, mode: OpenMode) -> MediaResult<Self::File>;

    /// Remove the file at `path`.
    fn remove(&self, path: &str) -> MediaResult<()>;

    /// Stat the file at `path` without opening it.
    fn stat(&self, path: &str) -> MediaResult<FileInfo>;
}

/// One open file on a volume.
pub trait VolumeFile {
    /// Position the cursor at `offset` bytes from the start of the file.
    ///
    /// Seeking past end-of-file grows the file to `offset`, zero-filling
    /// the gap. Growth beyond the volume capacity fails with `NoSpace`.
    fn seek(&mut self, offset: u64) -> MediaResult<()>;

    /// Read from the cursor into `buf`, returning the byte count actually
    /// read. Reading at or past end-of-file transfers zero bytes.
    fn read(&mut self, buf: &mut [u8]) -> MediaResult<usize>;

    /// Write `buf` at the cursor, returning the byte count actually
    /// written. A short count means the medium could not take more.
    fn write(&mut self, buf: &[u8]) -> MediaResult<usize>;

    /// Set the file length to exactly `size`, shrinking or zero-extending.
    fn truncate(&mut self, size: u64) -> MediaResult<()>;

    /// Stat this open file.
    fn stat(&self) -> MediaResult<FileInfo>;

    /// Close the handle. Further operations fail with `Closed`.
    fn close(&mut self) -> MediaResult<()>;
}
