//! RAM-backed volume with fixed flash-like geometry
//!
//! Mirrors the deployed medium closely enough to exercise every adapter
//! path: a flat single-root namespace, a byte capacity derived from sector
//! geometry, a bounded open-file budget, and the grow-on-seek behavior of
//! the real flash filesystem.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::errors::{MediaError, MediaResult};
use super::{FileInfo, OpenMode, Volume, VolumeFile};

/// Default sector size in bytes, matching the flash erase granularity.
pub const DEFAULT_SECTOR_SIZE: u32 = 4096;
/// Default sector count (16 MiB volume at the default sector size).
pub const DEFAULT_SECTOR_COUNT: u64 = 4096;
/// Default maximum number of simultaneously open files.
pub const DEFAULT_MAX_OPEN_FILES: usize = 10;

struct RamState {
    files: HashMap<String, Vec<u8>>,
    open_count: usize,
    capacity: u64,
    max_open: usize,
}

impl RamState {
    fn used(&self) -> u64 {
        self.files.values().map(|d| d.len() as u64).sum()
    }

    /// Grow the file at `path` to `len`, zero-filling. Fails with NoSpace
    /// if the growth would exceed the volume capacity.
    fn grow(&mut self, path: &str, len: u64) -> MediaResult<()> {
        let used = self.used();
        let capacity = self.capacity;
        let data = self
            .files
            .get_mut(path)
            .ok_or_else(|| MediaError::NotFound(path.to_string()))?;
        let current = data.len() as u64;
        if len <= current {
            return Ok(());
        }
        if used + (len - current) > capacity {
            return Err(MediaError::NoSpace);
        }
        data.resize(len as usize, 0);
        Ok(())
    }
}

/// In-memory volume shared by all handles opened on it.
#[derive(Clone)]
pub struct RamDisk {
    state: Rc<RefCell<RamState>>,
    sector_size: u32,
}

impl RamDisk {
    /// Create a volume with the default geometry.
    pub fn new() -> Self {
        Self::with_geometry(DEFAULT_SECTOR_SIZE, DEFAULT_SECTOR_COUNT)
    }

    /// Create a volume with `sector_count` sectors of `sector_size` bytes.
    pub fn with_geometry(sector_size: u32, sector_count: u64) -> Self {
        Self {
            state: Rc::new(RefCell::new(RamState {
                files: HashMap::new(),
                open_count: 0,
                capacity: sector_size as u64 * sector_count,
                max_open: DEFAULT_MAX_OPEN_FILES,
            })),
            sector_size,
        }
    }

    /// Cap the number of simultaneously open files.
    pub fn with_file_budget(self, max_open: usize) -> Self {
        self.state.borrow_mut().max_open = max_open;
        self
    }

    /// Sector size of the simulated medium.
    pub fn sector_size(&self) -> u32 {
        self.sector_size
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> u64 {
        self.state.borrow().capacity
    }

    fn open_handle(&self, path: &str, writable: bool, at_end: bool) -> MediaResult<RamFile> {
        let mut state = self.state.borrow_mut();
        if state.open_count >= state.max_open {
            return Err(MediaError::TooManyOpen);
        }
        let pos = if at_end {
            state
                .files
                .get(path)
                .map(|d| d.len() as u64)
                .unwrap_or(0)
        } else {
            0
        };
        state.open_count += 1;
        Ok(RamFile {
            state: Rc::clone(&self.state),
            path: path.to_string(),
            pos,
            writable,
            open: true,
        })
    }
}

impl Default for RamDisk {
    fn default() -> Self {
        Self::new()
    }
}

impl Volume for RamDisk {
    type File = RamFile;

    fn open(&self, path: &str, mode: OpenMode) -> MediaResult<RamFile> {
        let exists = self.state.borrow().files.contains_key(path);
        match mode {
            OpenMode::Read => {
                if !exists {
                    return Err(MediaError::NotFound(path.to_string()));
                }
                self.open_handle(path, false, false)
            }
            OpenMode::Update => {
                if !exists {
                    return Err(MediaError::NotFound(path.to_string()));
                }
                self.open_handle(path, true, false)
            }
            OpenMode::AppendCreate => {
                if !exists {
                    self.state
                        .borrow_mut()
                        .files
                        .insert(path.to_string(), Vec::new());
                }
                self.open_handle(path, true, true)
            }
            OpenMode::CreateNew => {
                if exists {
                    return Err(MediaError::AlreadyExists(path.to_string()));
                }
                self.state
                    .borrow_mut()
                    .files
                    .insert(path.to_string(), Vec::new());
                self.open_handle(path, true, false)
            }
        }
    }

    fn remove(&self, path: &str) -> MediaResult<()> {
        match self.state.borrow_mut().files.remove(path) {
            Some(_) => Ok(()),
            None => Err(MediaError::NotFound(path.to_string())),
        }
    }

    fn stat(&self, path: &str) -> MediaResult<FileInfo> {
        self.state
            .borrow()
            .files
            .get(path)
            .map(|d| FileInfo {
                size: d.len() as u64,
            })
            .ok_or_else(|| MediaError::NotFound(path.to_string()))
    }
}

/// One open file on a `RamDisk`.
pub struct RamFile {
    state: Rc<RefCell<RamState>>,
    path: String,
    pos: u64,
    writable: bool,
    open: bool,
}

impl RamFile {
    fn ensure_open(&self) -> MediaResult<()> {
        if self.open {
            Ok(())
        } else {
            Err(MediaError::Closed)
        }
    }
}

impl VolumeFile for RamFile {
    fn seek(&mut self, offset: u64) -> MediaResult<()> {
        self.ensure_open()?;
        let len = self.stat()?.size;
        if offset > len {
            self.state.borrow_mut().grow(&self.path, offset)?;
        }
        self.pos = offset;
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> MediaResult<usize> {
        self.ensure_open()?;
        let state = self.state.borrow();
        let data = state
            .files
            .get(&self.path)
            .ok_or_else(|| MediaError::NotFound(self.path.clone()))?;
        if self.pos >= data.len() as u64 {
            return Ok(0);
        }
        let start = self.pos as usize;
        let count = buf.len().min(data.len() - start);
        buf[..count].copy_from_slice(&data[start..start + count]);
        drop(state);
        self.pos += count as u64;
        Ok(count)
    }

    fn write(&mut self, buf: &[u8]) -> MediaResult<usize> {
        self.ensure_open()?;
        if !self.writable {
            return Err(MediaError::ReadOnly);
        }
        let mut state = self.state.borrow_mut();
        let used = state.used();
        let free = state.capacity.saturating_sub(used);
        let data = state
            .files
            .get_mut(&self.path)
            .ok_or_else(|| MediaError::NotFound(self.path.clone()))?;
        let len = data.len() as u64;
        let end = self.pos + buf.len() as u64;
        let growth = end.saturating_sub(len);
        // Take only what fits; the caller sees a short count when the
        // medium runs out mid-write.
        let shortfall = growth.saturating_sub(free);
        let count = (buf.len() as u64).saturating_sub(shortfall) as usize;
        if count == 0 {
            return Ok(0);
        }
        let new_end = self.pos + count as u64;
        if new_end > len {
            data.resize(new_end as usize, 0);
        }
        data[self.pos as usize..new_end as usize].copy_from_slice(&buf[..count]);
        drop(state);
        self.pos = new_end;
        Ok(count)
    }

    fn truncate(&mut self, size: u64) -> MediaResult<()> {
        self.ensure_open()?;
        if !self.writable {
            return Err(MediaError::ReadOnly);
        }
        let mut state = self.state.borrow_mut();
        let len = match state.files.get(&self.path) {
            Some(data) => data.len() as u64,
            None => return Err(MediaError::NotFound(self.path.clone())),
        };
        if size > len {
            state.grow(&self.path, size)?;
        } else if let Some(data) = state.files.get_mut(&self.path) {
            data.truncate(size as usize);
        }
        Ok(())
    }

    fn stat(&self) -> MediaResult<FileInfo> {
        self.ensure_open()?;
        self.state
            .borrow()
            .files
            .get(&self.path)
            .map(|d| FileInfo {
                size: d.len() as u64,
            })
            .ok_or_else(|| MediaError::NotFound(self.path.clone()))
    }

    fn close(&mut self) -> MediaResult<()> {
        self.ensure_open()?;
        self.open = false;
        self.state.borrow_mut().open_count -= 1;
        Ok(())
    }
}

impl Drop for RamFile {
    fn drop(&mut self) {
        if self.open {
            self.open = false;
            self.state.borrow_mut().open_count -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disk() -> RamDisk {
        RamDisk::with_geometry(512, 16)
    }

    #[test]
    fn test_open_missing_for_update_fails() {
        let result = disk().open("/a", OpenMode::Update);
        assert!(matches!(result, Err(MediaError::NotFound(_))));
    }

    #[test]
    fn test_append_create_then_update() {
        let d = disk();
        {
            let mut f = d.open("/a", OpenMode::AppendCreate).unwrap();
            assert_eq!(f.write(b"abc").unwrap(), 3);
            f.close().unwrap();
        }
        let mut f = d.open("/a", OpenMode::Update).unwrap();
        let mut buf = [0u8; 3];
        assert_eq!(f.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf, b"abc");
    }

    #[test]
    fn test_create_new_conflicts() {
        let d = disk();
        d.open("/a", OpenMode::CreateNew).unwrap();
        let result = d.open("/a", OpenMode::CreateNew);
        assert!(matches!(result, Err(MediaError::AlreadyExists(_))));
    }

    #[test]
    fn test_seek_past_end_grows_file() {
        let d = disk();
        let mut f = d.open("/a", OpenMode::CreateNew).unwrap();
        f.seek(100).unwrap();
        assert_eq!(f.stat().unwrap().size, 100);
        assert_eq!(d.stat("/a").unwrap().size, 100);
    }

    #[test]
    fn test_seek_within_does_not_grow() {
        let d = disk();
        let mut f = d.open("/a", OpenMode::CreateNew).unwrap();
        f.write(b"0123456789").unwrap();
        f.seek(4).unwrap();
        assert_eq!(f.stat().unwrap().size, 10);
    }

    #[test]
    fn test_grown_gap_reads_zero() {
        let d = disk();
        let mut f = d.open("/a", OpenMode::CreateNew).unwrap();
        f.seek(8).unwrap();
        f.seek(0).unwrap();
        let mut buf = [0xFFu8; 8];
        assert_eq!(f.read(&mut buf).unwrap(), 8);
        assert_eq!(buf, [0u8; 8]);
    }

    #[test]
    fn test_read_at_eof_transfers_nothing() {
        let d = disk();
        let mut f = d.open("/a", OpenMode::CreateNew).unwrap();
        f.write(b"xy").unwrap();
        let mut buf = [0u8; 4];
        assert_eq!(f.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_seek_beyond_capacity_is_no_space() {
        let d = disk();
        let mut f = d.open("/a", OpenMode::CreateNew).unwrap();
        let result = f.seek(d.capacity() + 1);
        assert!(matches!(result, Err(MediaError::NoSpace)));
    }

    #[test]
    fn test_write_short_when_volume_fills() {
        let d = RamDisk::with_geometry(16, 1);
        let mut f = d.open("/a", OpenMode::CreateNew).unwrap();
        let wrote = f.write(&[7u8; 32]).unwrap();
        assert_eq!(wrote, 16);
        let wrote = f.write(&[7u8; 4]).unwrap();
        assert_eq!(wrote, 0);
    }

    #[test]
    fn test_read_only_handle_rejects_write() {
        let d = disk();
        d.open("/a", OpenMode::CreateNew).unwrap().close().unwrap();
        let mut f = d.open("/a", OpenMode::Read).unwrap();
        assert!(matches!(f.write(b"x"), Err(MediaError::ReadOnly)));
    }

    #[test]
    fn test_truncate_shrinks_and_extends() {
        let d = disk();
        let mut f = d.open("/a", OpenMode::CreateNew).unwrap();
        f.write(b"0123456789").unwrap();
        f.truncate(4).unwrap();
        assert_eq!(f.stat().unwrap().size, 4);
        f.truncate(20).unwrap();
        assert_eq!(f.stat().unwrap().size, 20);
    }

    #[test]
    fn test_open_budget_enforced() {
        let d = disk().with_file_budget(2);
        let _a = d.open("/a", OpenMode::CreateNew).unwrap();
        let _b = d.open("/b", OpenMode::CreateNew).unwrap();
        let result = d.open("/c", OpenMode::CreateNew);
        assert!(matches!(result, Err(MediaError::TooManyOpen)));
    }

    #[test]
    fn test_close_releases_budget() {
        let d = disk().with_file_budget(1);
        let mut a = d.open("/a", OpenMode::CreateNew).unwrap();
        a.close().unwrap();
        assert!(d.open("/b", OpenMode::CreateNew).is_ok());
    }

    #[test]
    fn test_drop_releases_budget() {
        let d = disk().with_file_budget(1);
        {
            let _a = d.open("/a", OpenMode::CreateNew).unwrap();
        }
        assert!(d.open("/b", OpenMode::CreateNew).is_ok());
    }

    #[test]
    fn test_double_close_fails() {
        let d = disk();
        let mut f = d.open("/a", OpenMode::CreateNew).unwrap();
        f.close().unwrap();
        assert!(matches!(f.close(), Err(MediaError::Closed)));
    }

    #[test]
    fn test_remove_missing_fails() {
        let result = disk().remove("/nothing");
        assert!(matches!(result, Err(MediaError::NotFound(_))));
    }
}
