//! Zero-extension and offset-addressing contract
//!
//! The engine relies on exact byte-offset semantics over a medium whose
//! seek primitive grows files. These scenarios pin the reconciliation:
//! reads never change a file's size and zero-fill everything past
//! end-of-file; writes extend through the seek mechanism and leave a
//! zero gap behind.
//!
//! Every scenario runs on both shipped volumes.

use flashvfs::media::{HostVolume, RamDisk, Volume};
use flashvfs::vfs::{FlashVfs, OpenFlags, Vfs, VfsError, VfsFile};
use tempfile::TempDir;

fn open_rw<V: Volume>(vfs: &FlashVfs<V>, path: &str) -> <FlashVfs<V> as Vfs>::File {
    vfs.open(Some(path), OpenFlags::READ_WRITE | OpenFlags::CREATE)
        .expect("open for read/write")
}

macro_rules! on_both_volumes {
    ($check:ident) => {
        $check(&FlashVfs::new(RamDisk::new()));
        let dir = TempDir::new().expect("temp dir");
        $check(&FlashVfs::new(HostVolume::new(dir.path())));
    };
}

#[test]
fn read_entirely_past_eof_yields_zeros_and_io_error() {
    fn check<V: Volume>(vfs: &FlashVfs<V>) {
        let mut file = open_rw(vfs, "/db.dat");
        file.write(b"ABC", 0).unwrap();

        let mut buf = [0x5Au8; 16];
        let result = file.read(&mut buf, 3);
        assert!(matches!(result, Err(VfsError::Io(_))));
        assert_eq!(buf, [0u8; 16]);

        let mut buf = [0x5Au8; 16];
        let result = file.read(&mut buf, 1000);
        assert!(matches!(result, Err(VfsError::Io(_))));
        assert_eq!(buf, [0u8; 16]);

        // The read must not have grown the file.
        assert_eq!(file.size().unwrap(), 3);
    }
    on_both_volumes!(check);
}

#[test]
fn read_overlapping_eof_yields_prefix_then_zeros() {
    fn check<V: Volume>(vfs: &FlashVfs<V>) {
        let mut file = open_rw(vfs, "/db.dat");
        file.write(b"ABCDEFGH", 0).unwrap();

        let mut buf = [0x5Au8; 8];
        let result = file.read(&mut buf, 5);
        assert!(matches!(result, Err(VfsError::Io(_))));
        assert_eq!(&buf[..3], b"FGH");
        assert_eq!(&buf[3..], &[0u8; 5]);
        assert_eq!(file.size().unwrap(), 8);
    }
    on_both_volumes!(check);
}

#[test]
fn write_past_eof_extends_and_gap_reads_zero() {
    fn check<V: Volume>(vfs: &FlashVfs<V>) {
        let mut file = open_rw(vfs, "/db.dat");
        file.write(b"AB", 0).unwrap();
        file.write(b"YZ", 30).unwrap();
        assert_eq!(file.size().unwrap(), 32);

        let mut gap = [0xFFu8; 28];
        file.read(&mut gap, 2).unwrap();
        assert_eq!(gap, [0u8; 28]);
    }
    on_both_volumes!(check);
}

#[test]
fn round_trip_preserves_bytes() {
    fn check<V: Volume>(vfs: &FlashVfs<V>) {
        let mut file = open_rw(vfs, "/db.dat");
        let payload = b"the quick brown fox";
        file.write(payload, 512).unwrap();

        let mut buf = vec![0u8; payload.len()];
        file.read(&mut buf, 512).unwrap();
        assert_eq!(&buf, payload);
    }
    on_both_volumes!(check);
}

#[test]
fn sparse_write_scenario_reads_back_with_zero_gap() {
    fn check<V: Volume>(vfs: &FlashVfs<V>) {
        let mut file = open_rw(vfs, "/db.dat");
        file.write(b"ABCDEFGHIJ", 0).unwrap();
        file.write(b"KLMNO", 20).unwrap();

        let mut buf = [0xEEu8; 25];
        file.read(&mut buf, 0).unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(b"ABCDEFGHIJ");
        expected.extend_from_slice(&[0u8; 10]);
        expected.extend_from_slice(b"KLMNO");
        assert_eq!(&buf[..], &expected[..]);
    }
    on_both_volumes!(check);
}

#[test]
fn truncate_with_chunk_size_rounds_up() {
    fn check<V: Volume>(vfs: &FlashVfs<V>) {
        let mut file = open_rw(vfs, "/db.dat");
        file.write(b"abc", 0).unwrap();
        file.set_chunk_size(4096);
        file.truncate(3).unwrap();
        assert_eq!(file.size().unwrap(), 4096);

        // A whole multiple stays put.
        file.truncate(4096).unwrap();
        assert_eq!(file.size().unwrap(), 4096);

        // One byte over rounds to the next chunk.
        file.truncate(4097).unwrap();
        assert_eq!(file.size().unwrap(), 8192);
    }
    on_both_volumes!(check);
}

#[test]
fn truncate_without_chunk_size_is_exact() {
    fn check<V: Volume>(vfs: &FlashVfs<V>) {
        let mut file = open_rw(vfs, "/db.dat");
        file.write(&[9u8; 100], 0).unwrap();
        file.truncate(3).unwrap();
        assert_eq!(file.size().unwrap(), 3);
        file.truncate(0).unwrap();
        assert_eq!(file.size().unwrap(), 0);
    }
    on_both_volumes!(check);
}

#[test]
fn truncate_interrupts_round_trip() {
    fn check<V: Volume>(vfs: &FlashVfs<V>) {
        let mut file = open_rw(vfs, "/db.dat");
        file.write(b"0123456789", 0).unwrap();
        file.truncate(4).unwrap();

        let mut buf = [0xAAu8; 10];
        let result = file.read(&mut buf, 0);
        assert!(matches!(result, Err(VfsError::Io(_))));
        assert_eq!(&buf[..4], b"0123");
        assert_eq!(&buf[4..], &[0u8; 6]);
    }
    on_both_volumes!(check);
}
