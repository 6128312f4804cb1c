//! Diagnostic shell sessions
//!
//! Drives the command interpreter end to end over a mounted adapter: each
//! scenario is a short session script with its expected output.

use flashvfs::media::{HostVolume, RamDisk, Volume};
use flashvfs::shell::{Shell, ShellError};
use flashvfs::vfs::FlashVfs;
use tempfile::TempDir;

fn exec<V: Volume>(shell: &Shell<'_, V>, line: &str) -> Result<String, ShellError> {
    let mut out = Vec::new();
    shell.exec(line, &mut out)?;
    Ok(String::from_utf8(out).expect("shell output is UTF-8"))
}

#[test]
fn session_write_stat_cat_rm() {
    let vfs = FlashVfs::new(RamDisk::new());
    let shell = Shell::new(&vfs);

    assert_eq!(exec(&shell, "exists /note.txt").unwrap(), "no\n");
    assert_eq!(
        exec(&shell, "write /note.txt hello from the shell").unwrap(),
        "wrote 20 bytes to /note.txt\n"
    );
    assert_eq!(exec(&shell, "stat /note.txt").unwrap(), "/note.txt: 20 bytes\n");
    assert_eq!(
        exec(&shell, "cat /note.txt").unwrap(),
        "hello from the shell\n"
    );
    assert_eq!(exec(&shell, "rm /note.txt").unwrap(), "deleted /note.txt\n");
    assert_eq!(exec(&shell, "exists /note.txt").unwrap(), "no\n");
}

#[test]
fn session_runs_identically_on_a_host_volume() {
    let dir = TempDir::new().unwrap();
    let vfs = FlashVfs::new(HostVolume::new(dir.path()));
    let shell = Shell::new(&vfs);

    exec(&shell, "write /note.txt persisted").unwrap();
    assert_eq!(exec(&shell, "cat /note.txt").unwrap(), "persisted\n");

    // The file really is on the host directory.
    let on_disk = std::fs::read_to_string(dir.path().join("note.txt")).unwrap();
    assert_eq!(on_disk, "persisted");
}

#[test]
fn trunc_applies_through_the_adapter() {
    let vfs = FlashVfs::new(RamDisk::new());
    let shell = Shell::new(&vfs);

    exec(&shell, "write /db.dat 0123456789").unwrap();
    assert_eq!(exec(&shell, "trunc /db.dat 4").unwrap(), "/db.dat: 4 bytes\n");
    assert_eq!(exec(&shell, "cat /db.dat").unwrap(), "0123\n");
}

#[test]
fn errors_surface_per_command_kind() {
    let vfs = FlashVfs::new(RamDisk::new());
    let shell = Shell::new(&vfs);

    assert!(matches!(
        exec(&shell, "defrag /db.dat"),
        Err(ShellError::CommandNotFound(_))
    ));
    assert!(matches!(exec(&shell, "write"), Err(ShellError::Usage(_))));
    assert!(matches!(
        exec(&shell, "cat /missing.txt"),
        Err(ShellError::Exec(_))
    ));
}

#[test]
fn info_prints_the_descriptor() {
    let vfs = FlashVfs::new(RamDisk::new());
    let shell = Shell::new(&vfs);

    let output = exec(&shell, "info").unwrap();
    assert!(output.contains("name:"));
    assert!(output.contains("flashvfs"));
    assert!(output.contains("max pathname:"));
    assert!(output.contains("256"));
}

#[test]
fn trace_command_toggles_and_reports() {
    let vfs = FlashVfs::new(RamDisk::new());
    let shell = Shell::new(&vfs);

    assert_eq!(exec(&shell, "trace on").unwrap(), "tracing enabled\n");
    assert!(vfs.trace().is_enabled());
    assert_eq!(exec(&shell, "trace off").unwrap(), "tracing disabled\n");
    assert!(!vfs.trace().is_enabled());
    assert!(matches!(
        exec(&shell, "trace maybe"),
        Err(ShellError::Usage(_))
    ));
}
