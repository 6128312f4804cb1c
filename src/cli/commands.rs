//! CLI command implementations
//!
//! Both commands mount a volume, wrap it in the adapter, and drive the
//! diagnostic shell over it - interactively from stdin, or for a single
//! command line. The configuration file is optional; a missing file means
//! the built-in defaults.

use std::io::{self, BufRead, Write};

use crate::config::Config;
use crate::media::{HostVolume, RamDisk, Volume};
use crate::shell::Shell;
use crate::vfs::FlashVfs;

use super::args::{Cli, Command, MountArgs};
use super::errors::{CliError, CliResult};

/// Parse arguments and dispatch.
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args())
}

/// Dispatch an already-parsed command.
pub fn run_command(cli: Cli) -> CliResult<()> {
    match cli.command {
        Command::Shell { mount } => {
            if mount.ram {
                interactive(&mount_ram(&mount)?)
            } else {
                interactive(&mount_host(&mount)?)
            }
        }
        Command::Exec { mount, line } => {
            if mount.ram {
                one_shot(&mount_ram(&mount)?, &line)
            } else {
                one_shot(&mount_host(&mount)?, &line)
            }
        }
    }
}

fn load_config(mount: &MountArgs) -> CliResult<Config> {
    let mut config = if mount.config.exists() {
        Config::load(&mount.config)?
    } else {
        Config::default()
    };
    if mount.trace {
        config.trace = true;
    }
    Ok(config)
}

fn mount_ram(mount: &MountArgs) -> CliResult<FlashVfs<RamDisk>> {
    let config = load_config(mount)?;
    let volume = RamDisk::with_geometry(config.sector_size, config.sector_count)
        .with_file_budget(config.max_open_files);
    Ok(FlashVfs::with_config(volume, &config))
}

fn mount_host(mount: &MountArgs) -> CliResult<FlashVfs<HostVolume>> {
    let config = load_config(mount)?;
    std::fs::create_dir_all(&mount.root)
        .map_err(|e| CliError::io_error(format!("create {}: {}", mount.root.display(), e)))?;
    let volume = HostVolume::new(&mount.root);
    Ok(FlashVfs::with_config(volume, &config))
}

/// Read-execute loop over stdin until EOF or an exit command.
fn interactive<V: Volume>(vfs: &FlashVfs<V>) -> CliResult<()> {
    let shell = Shell::new(vfs);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();

    loop {
        write!(stdout, "vfs> ")?;
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line == "exit" || line == "quit" {
            break;
        }
        if let Err(e) = shell.exec(line, &mut stdout) {
            writeln!(stdout, "*** {}", e)?;
        }
    }
    Ok(())
}

fn one_shot<V: Volume>(vfs: &FlashVfs<V>, line: &str) -> CliResult<()> {
    let shell = Shell::new(vfs);
    let mut stdout = io::stdout();
    shell.exec(line, &mut stdout)?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn mount_args(dir: &std::path::Path, ram: bool) -> MountArgs {
        MountArgs {
            config: dir.join("flashvfs.json"),
            ram,
            root: dir.join("data"),
            trace: false,
        }
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let mount = mount_args(dir.path(), true);
        let config = load_config(&mount).unwrap();
        assert_eq!(config.sector_size, 4096);
    }

    #[test]
    fn test_trace_flag_overrides_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut mount = mount_args(dir.path(), true);
        mount.trace = true;
        let vfs = mount_ram(&mount).unwrap();
        assert!(vfs.trace().is_enabled());
    }

    #[test]
    fn test_invalid_config_file_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let mount = mount_args(dir.path(), true);
        std::fs::write(&mount.config, r#"{"sector_size": 1000}"#).unwrap();
        let result = load_config(&mount);
        assert!(result.is_err());
    }

    #[test]
    fn test_mount_host_creates_backing_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let mount = mount_args(dir.path(), false);
        let _vfs = mount_host(&mount).unwrap();
        assert!(PathBuf::from(dir.path().join("data")).is_dir());
    }
}
