//! Directory-backed volume for hosted builds
//!
//! Maps the single-root volume namespace onto a directory of the host
//! filesystem. Hosted seek does not grow files on its own, so positioning
//! past end-of-file extends the file length first to reproduce the flash
//! filesystem's behavior.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

use super::errors::{MediaError, MediaResult};
use super::{FileInfo, OpenMode, Volume, VolumeFile};

/// Volume rooted at a host directory.
#[derive(Debug, Clone)]
pub struct HostVolume {
    root: PathBuf,
}

impl HostVolume {
    /// Create a volume rooted at `root`. The directory must already exist.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }

    fn map_open_error(e: std::io::Error, path: &str) -> MediaError {
        match e.kind() {
            std::io::ErrorKind::NotFound => MediaError::NotFound(path.to_string()),
            std::io::ErrorKind::AlreadyExists => MediaError::AlreadyExists(path.to_string()),
            _ => MediaError::Io(e.to_string()),
        }
    }
}

impl Volume for HostVolume {
    type File = HostFile;

    fn open(&self, path: &str, mode: OpenMode) -> MediaResult<HostFile> {
        let full = self.resolve(path);
        let file = match mode {
            OpenMode::Read => OpenOptions::new().read(true).open(&full),
            OpenMode::Update => OpenOptions::new().read(true).write(true).open(&full),
            OpenMode::AppendCreate => OpenOptions::new()
                .read(true)
                .append(true)
                .create(true)
                .open(&full),
            OpenMode::CreateNew => OpenOptions::new()
                .read(true)
                .write(true)
                .create_new(true)
                .open(&full),
        }
        .map_err(|e| Self::map_open_error(e, path))?;

        Ok(HostFile { file: Some(file) })
    }

    fn remove(&self, path: &str) -> MediaResult<()> {
        std::fs::remove_file(self.resolve(path)).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MediaError::NotFound(path.to_string())
            } else {
                MediaError::Io(e.to_string())
            }
        })
    }

    fn stat(&self, path: &str) -> MediaResult<FileInfo> {
        let meta = std::fs::metadata(self.resolve(path)).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MediaError::NotFound(path.to_string())
            } else {
                MediaError::Io(e.to_string())
            }
        })?;
        Ok(FileInfo { size: meta.len() })
    }
}

/// One open file on a `HostVolume`.
#[derive(Debug)]
pub struct HostFile {
    file: Option<File>,
}

impl HostFile {
    fn inner(&mut self) -> MediaResult<&mut File> {
        self.file.as_mut().ok_or(MediaError::Closed)
    }
}

impl VolumeFile for HostFile {
    fn seek(&mut self, offset: u64) -> MediaResult<()> {
        let file = self.inner()?;
        let len = file
            .metadata()
            .map_err(|e| MediaError::Io(e.to_string()))?
            .len();
        if offset > len {
            file.set_len(offset)
                .map_err(|e| MediaError::Io(e.to_string()))?;
        }
        file.seek(SeekFrom::Start(offset))
            .map_err(|e| MediaError::Io(e.to_string()))?;
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> MediaResult<usize> {
        let file = self.inner()?;
        let mut total = 0;
        while total < buf.len() {
            match file.read(&mut buf[total..]) {
                Ok(0) => break,
                Ok(n) => total += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(MediaError::Io(e.to_string())),
            }
        }
        Ok(total)
    }

    fn write(&mut self, buf: &[u8]) -> MediaResult<usize> {
        let file = self.inner()?;
        file.write_all(buf)
            .map_err(|e| MediaError::Io(e.to_string()))?;
        Ok(buf.len())
    }

    fn truncate(&mut self, size: u64) -> MediaResult<()> {
        self.inner()?
            .set_len(size)
            .map_err(|e| MediaError::Io(e.to_string()))
    }

    fn stat(&self) -> MediaResult<FileInfo> {
        let file = self.file.as_ref().ok_or(MediaError::Closed)?;
        let meta = file
            .metadata()
            .map_err(|e| MediaError::Io(e.to_string()))?;
        Ok(FileInfo { size: meta.len() })
    }

    fn close(&mut self) -> MediaResult<()> {
        match self.file.take() {
            Some(file) => {
                drop(file);
                Ok(())
            }
            None => Err(MediaError::Closed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn volume() -> (TempDir, HostVolume) {
        let temp = TempDir::new().unwrap();
        let vol = HostVolume::new(temp.path());
        (temp, vol)
    }

    #[test]
    fn test_open_missing_for_update_fails() {
        let (_temp, vol) = volume();
        let result = vol.open("/a.dat", OpenMode::Update);
        assert!(matches!(result, Err(MediaError::NotFound(_))));
    }

    #[test]
    fn test_create_write_read_back() {
        let (_temp, vol) = volume();
        {
            let mut f = vol.open("/a.dat", OpenMode::CreateNew).unwrap();
            assert_eq!(f.write(b"hello").unwrap(), 5);
            f.close().unwrap();
        }
        let mut f = vol.open("/a.dat", OpenMode::Read).unwrap();
        let mut buf = [0u8; 5];
        assert_eq!(f.read(&mut buf).unwrap(), 5);
        assert_eq!(&buf, b"hello");
    }

    #[test]
    fn test_create_new_conflicts() {
        let (_temp, vol) = volume();
        vol.open("/a.dat", OpenMode::CreateNew).unwrap();
        let result = vol.open("/a.dat", OpenMode::CreateNew);
        assert!(matches!(result, Err(MediaError::AlreadyExists(_))));
    }

    #[test]
    fn test_seek_past_end_grows_file() {
        let (_temp, vol) = volume();
        let mut f = vol.open("/a.dat", OpenMode::CreateNew).unwrap();
        f.seek(64).unwrap();
        assert_eq!(f.stat().unwrap().size, 64);
        assert_eq!(vol.stat("/a.dat").unwrap().size, 64);
    }

    #[test]
    fn test_grown_gap_reads_zero() {
        let (_temp, vol) = volume();
        let mut f = vol.open("/a.dat", OpenMode::CreateNew).unwrap();
        f.seek(16).unwrap();
        f.seek(0).unwrap();
        let mut buf = [0xAAu8; 16];
        assert_eq!(f.read(&mut buf).unwrap(), 16);
        assert_eq!(buf, [0u8; 16]);
    }

    #[test]
    fn test_read_stops_at_eof() {
        let (_temp, vol) = volume();
        let mut f = vol.open("/a.dat", OpenMode::CreateNew).unwrap();
        f.write(b"xy").unwrap();
        f.seek(0).unwrap();
        let mut buf = [0u8; 8];
        assert_eq!(f.read(&mut buf).unwrap(), 2);
    }

    #[test]
    fn test_remove_missing_fails() {
        let (_temp, vol) = volume();
        let result = vol.remove("/nothing.dat");
        assert!(matches!(result, Err(MediaError::NotFound(_))));
    }

    #[test]
    fn test_stat_after_close_fails() {
        let (_temp, vol) = volume();
        let mut f = vol.open("/a.dat", OpenMode::CreateNew).unwrap();
        f.close().unwrap();
        assert!(matches!(f.stat(), Err(MediaError::Closed)));
    }
}
