//! Bound file handle and its per-handle operations
//!
//! A `FlashFile` owns the underlying media handle exclusively from open to
//! close. The handle slot is an `Option`: it is emptied exactly once, at
//! close, and every later operation reports an I/O error instead of
//! touching freed state.
//!
//! The two offset-addressed operations reconcile the engine's POSIX-like
//! expectations with the medium's grow-on-seek primitive:
//!
//! - reads never position the cursor at or beyond end-of-file, because
//!   that seek would grow the file; the unreadable tail of the buffer is
//!   zero-filled instead and the short transfer is reported
//! - writes always seek, because growing the file is exactly how a write
//!   past end-of-file extends it

use std::fmt;
use std::rc::Rc;

use crate::media::{FileInfo, MediaError, MediaResult, Volume, VolumeFile};

use super::adapter::{LockDiscipline, Shared};
use super::errors::{VfsError, VfsResult};
use super::traits::{LockLevel, VfsFile};

/// One open file bound to a `FlashVfs`.
pub struct FlashFile<V: Volume> {
    vfs: Rc<Shared<V>>,
    handle: Option<V::File>,
    path: String,
    read_only: bool,
    chunk_size: Option<u64>,
}

impl<V: Volume> FlashFile<V> {
    pub(crate) fn bind(
        vfs: Rc<Shared<V>>,
        handle: V::File,
        path: String,
        read_only: bool,
    ) -> Self {
        Self {
            vfs,
            handle: Some(handle),
            path,
            read_only,
            chunk_size: None,
        }
    }

    /// Path this handle was opened with.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether the open request was read-only.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Configured truncate alignment, if any.
    pub fn chunk_size(&self) -> Option<u64> {
        self.chunk_size
    }

    fn trace_op(&self, name: &str, detail: fmt::Arguments<'_>) {
        self.vfs.trace.op(&*self.vfs.clock, name, detail);
    }

    fn media_stat(&mut self) -> MediaResult<FileInfo> {
        match self.handle.as_mut() {
            Some(file) => file.stat(),
            None => Err(MediaError::Closed),
        }
    }

    fn media_seek(&mut self, offset: u64) -> MediaResult<()> {
        match self.handle.as_mut() {
            Some(file) => file.seek(offset),
            None => Err(MediaError::Closed),
        }
    }

    fn media_read(&mut self, buf: &mut [u8]) -> MediaResult<usize> {
        match self.handle.as_mut() {
            Some(file) => file.read(buf),
            None => Err(MediaError::Closed),
        }
    }

    fn media_write(&mut self, buf: &[u8]) -> MediaResult<usize> {
        match self.handle.as_mut() {
            Some(file) => file.write(buf),
            None => Err(MediaError::Closed),
        }
    }

    fn media_truncate(&mut self, size: u64) -> MediaResult<()> {
        match self.handle.as_mut() {
            Some(file) => file.truncate(size),
            None => Err(MediaError::Closed),
        }
    }
}

impl<V: Volume> VfsFile for FlashFile<V> {
    fn read(&mut self, buf: &mut [u8], offset: u64) -> VfsResult<()> {
        let amt = buf.len();
        let size = self
            .media_stat()
            .map_err(|e| VfsError::io(format!("stat {}: {}", self.path, e)))?
            .size;

        // Position the cursor only when the target lies inside the file.
        // Seeking at or past end-of-file would grow it, and a read must
        // never change the file size.
        let mut taken = 0;
        if offset < size {
            self.media_seek(offset)
                .map_err(|e| VfsError::full(format!("seek {} to {}: {}", self.path, offset, e)))?;
            taken = self
                .media_read(buf)
                .map_err(|e| VfsError::io(format!("read {}: {}", self.path, e)))?;
        }

        if taken < amt {
            // The unread tail must still hold the contractual content.
            buf[taken..].fill(0);
            self.trace_op(
                "READ",
                format_args!(
                    "file={} amt={} offset={} rc=VFS_IOERR taken={}",
                    self.path, amt, offset, taken
                ),
            );
            return Err(VfsError::io(format!(
                "short read on {}: {} of {} bytes at offset {}",
                self.path, taken, amt, offset
            )));
        }

        self.trace_op(
            "READ",
            format_args!("file={} amt={} offset={} rc=OK", self.path, amt, offset),
        );
        Ok(())
    }

    fn write(&mut self, buf: &[u8], offset: u64) -> VfsResult<()> {
        let amt = buf.len();
        let size = self
            .media_stat()
            .map_err(|e| VfsError::io(format!("stat {}: {}", self.path, e)))?
            .size;
        if offset > size {
            self.trace_op(
                "WRITE",
                format_args!(
                    "file={} seek over EOF size={} offset={}",
                    self.path, size, offset
                ),
            );
        }

        // Unlike read, always seek: positioning past end-of-file is the
        // mechanism that extends the file.
        self.media_seek(offset)
            .map_err(|e| VfsError::full(format!("seek {} to {}: {}", self.path, offset, e)))?;

        let wrote = self
            .media_write(buf)
            .map_err(|e| VfsError::full(format!("write {}: {}", self.path, e)))?;
        if wrote < amt {
            self.trace_op(
                "WRITE",
                format_args!(
                    "file={} amt={} offset={} rc=VFS_FULL wrote={}",
                    self.path, amt, offset, wrote
                ),
            );
            return Err(VfsError::full(format!(
                "short write on {}: {} of {} bytes at offset {}",
                self.path, wrote, amt, offset
            )));
        }

        self.trace_op(
            "WRITE",
            format_args!("file={} amt={} offset={} rc=OK", self.path, amt, offset),
        );
        Ok(())
    }

    fn truncate(&mut self, size: u64) -> VfsResult<()> {
        // A configured chunk size rounds the target up so the file always
        // holds a whole number of chunks. Callers that need the exact size
        // must leave chunking unset.
        let target = match self.chunk_size {
            Some(chunk) => ((size + chunk - 1) / chunk) * chunk,
            None => size,
        };

        self.media_seek(target)
            .map_err(|e| VfsError::io(format!("seek {} to {}: {}", self.path, target, e)))?;
        self.media_truncate(target)
            .map_err(|e| VfsError::io(format!("truncate {} to {}: {}", self.path, target, e)))?;

        self.trace_op(
            "TRUNCATE",
            format_args!("file={} size={} target={} rc=OK", self.path, size, target),
        );
        Ok(())
    }

    fn sync(&mut self) -> VfsResult<()> {
        // Durability ordering is the medium's own responsibility; any
        // write-barrier behavior lives below this boundary.
        Ok(())
    }

    fn size(&self) -> VfsResult<u64> {
        let file = match self.handle.as_ref() {
            Some(file) => file,
            None => {
                return Err(VfsError::io(format!("file {} is closed", self.path)));
            }
        };
        file.stat()
            .map(|info| info.size)
            .map_err(|e| VfsError::io(format!("stat {}: {}", self.path, e)))
    }

    fn lock(&mut self, _level: LockLevel) -> VfsResult<()> {
        match self.vfs.lock_discipline {
            LockDiscipline::SingleTask => Ok(()),
            LockDiscipline::Mutual => Err(VfsError::misuse(
                "mutual-exclusion mode is configured but no lock implementation is supplied",
            )),
        }
    }

    fn unlock(&mut self, _level: LockLevel) -> VfsResult<()> {
        match self.vfs.lock_discipline {
            LockDiscipline::SingleTask => Ok(()),
            LockDiscipline::Mutual => Err(VfsError::misuse(
                "mutual-exclusion mode is configured but no lock implementation is supplied",
            )),
        }
    }

    fn check_reserved_lock(&self) -> VfsResult<bool> {
        match self.vfs.lock_discipline {
            // No other task can hold a reserved lock, so a stale journal
            // found on the volume is always rolled back.
            LockDiscipline::SingleTask => Ok(false),
            LockDiscipline::Mutual => Err(VfsError::misuse(
                "mutual-exclusion mode is configured but no lock implementation is supplied",
            )),
        }
    }

    fn sector_size(&self) -> u32 {
        self.vfs.sector_size
    }

    fn set_chunk_size(&mut self, size: u64) {
        self.chunk_size = if size == 0 { None } else { Some(size) };
    }

    fn close(&mut self) -> VfsResult<()> {
        match self.handle.take() {
            Some(mut file) => {
                file.close()
                    .map_err(|e| VfsError::io(format!("close {}: {}", self.path, e)))?;
                self.trace_op("CLOSE", format_args!("file={} rc=OK", self.path));
                Ok(())
            }
            None => Err(VfsError::io(format!(
                "file {} is already closed",
                self.path
            ))),
        }
    }
}

impl<V: Volume> Drop for FlashFile<V> {
    fn drop(&mut self) {
        if let Some(mut file) = self.handle.take() {
            let _ = file.close();
        }
    }
}
