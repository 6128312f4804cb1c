//! Diagnostic command table and handlers
//!
//! Every command goes through the adapter surface - the same operations
//! the engine uses - so a shell session doubles as a live probe of the
//! adapter's behavior on the mounted volume.

use std::io::Write;

use crate::media::Volume;
use crate::vfs::{FlashVfs, OpenFlags, Vfs, VfsFile};

use super::errors::{ShellError, ShellResult};

pub(super) type Handler<V> = fn(&FlashVfs<V>, &[&str], &mut dyn Write) -> ShellResult<()>;

/// One entry of the shell command table.
pub struct CommandSpec<V: Volume> {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
    pub(super) run: Handler<V>,
}

pub(super) fn command_table<V: Volume>() -> Vec<CommandSpec<V>> {
    vec![
        CommandSpec {
            name: "info",
            usage: "info",
            help: "print the adapter descriptor",
            run: cmd_info,
        },
        CommandSpec {
            name: "exists",
            usage: "exists <path>",
            help: "report whether a file exists",
            run: cmd_exists,
        },
        CommandSpec {
            name: "stat",
            usage: "stat <path>",
            help: "print the size of a file",
            run: cmd_stat,
        },
        CommandSpec {
            name: "cat",
            usage: "cat <path>",
            help: "print the content of a file",
            run: cmd_cat,
        },
        CommandSpec {
            name: "write",
            usage: "write <path> <text>",
            help: "write text at the start of a file, creating it",
            run: cmd_write,
        },
        CommandSpec {
            name: "rm",
            usage: "rm <path>",
            help: "delete a file",
            run: cmd_rm,
        },
        CommandSpec {
            name: "trunc",
            usage: "trunc <path> <size>",
            help: "truncate a file to a size",
            run: cmd_trunc,
        },
        CommandSpec {
            name: "time",
            usage: "time",
            help: "print the adapter's current time",
            run: cmd_time,
        },
        CommandSpec {
            name: "trace",
            usage: "trace on|off",
            help: "toggle operation tracing",
            run: cmd_trace,
        },
    ]
}

fn cmd_info<V: Volume>(
    vfs: &FlashVfs<V>,
    args: &[&str],
    out: &mut dyn Write,
) -> ShellResult<()> {
    if !args.is_empty() {
        return Err(ShellError::Usage("info"));
    }
    let desc = vfs.descriptor();
    writeln!(out, "name:          {}", desc.name)?;
    writeln!(out, "version:       {}", desc.version)?;
    writeln!(out, "record size:   {} bytes", desc.file_record_size)?;
    writeln!(out, "max pathname:  {} bytes", desc.max_pathname)?;
    Ok(())
}

fn cmd_exists<V: Volume>(
    vfs: &FlashVfs<V>,
    args: &[&str],
    out: &mut dyn Write,
) -> ShellResult<()> {
    match args {
        &[path] => {
            let answer = if vfs.access(path) { "yes" } else { "no" };
            writeln!(out, "{}", answer)?;
            Ok(())
        }
        _ => Err(ShellError::Usage("exists <path>")),
    }
}

fn cmd_stat<V: Volume>(
    vfs: &FlashVfs<V>,
    args: &[&str],
    out: &mut dyn Write,
) -> ShellResult<()> {
    match args {
        &[path] => {
            let mut file = vfs.open(Some(path), OpenFlags::READ_ONLY)?;
            let size = file.size()?;
            file.close()?;
            writeln!(out, "{}: {} bytes", path, size)?;
            Ok(())
        }
        _ => Err(ShellError::Usage("stat <path>")),
    }
}

fn cmd_cat<V: Volume>(
    vfs: &FlashVfs<V>,
    args: &[&str],
    out: &mut dyn Write,
) -> ShellResult<()> {
    match args {
        &[path] => {
            let mut file = vfs.open(Some(path), OpenFlags::READ_ONLY)?;
            let size = file.size()?;
            let mut content = vec![0u8; size as usize];
            file.read(&mut content, 0)?;
            file.close()?;
            writeln!(out, "{}", String::from_utf8_lossy(&content))?;
            Ok(())
        }
        _ => Err(ShellError::Usage("cat <path>")),
    }
}

fn cmd_write<V: Volume>(
    vfs: &FlashVfs<V>,
    args: &[&str],
    out: &mut dyn Write,
) -> ShellResult<()> {
    if args.len() < 2 {
        return Err(ShellError::Usage("write <path> <text>"));
    }
    let path = args[0];
    let text = args[1..].join(" ");
    let mut file = vfs.open(Some(path), OpenFlags::READ_WRITE | OpenFlags::CREATE)?;
    file.write(text.as_bytes(), 0)?;
    file.close()?;
    writeln!(out, "wrote {} bytes to {}", text.len(), path)?;
    Ok(())
}

fn cmd_rm<V: Volume>(vfs: &FlashVfs<V>, args: &[&str], out: &mut dyn Write) -> ShellResult<()> {
    match args {
        &[path] => {
            vfs.delete(path)?;
            writeln!(out, "deleted {}", path)?;
            Ok(())
        }
        _ => Err(ShellError::Usage("rm <path>")),
    }
}

fn cmd_trunc<V: Volume>(
    vfs: &FlashVfs<V>,
    args: &[&str],
    out: &mut dyn Write,
) -> ShellResult<()> {
    match args {
        &[path, size] => {
            let size: u64 = size
                .parse()
                .map_err(|_| ShellError::Usage("trunc <path> <size>"))?;
            let mut file = vfs.open(Some(path), OpenFlags::READ_WRITE)?;
            file.truncate(size)?;
            let size = file.size()?;
            file.close()?;
            writeln!(out, "{}: {} bytes", path, size)?;
            Ok(())
        }
        _ => Err(ShellError::Usage("trunc <path> <size>")),
    }
}

fn cmd_time<V: Volume>(
    vfs: &FlashVfs<V>,
    args: &[&str],
    out: &mut dyn Write,
) -> ShellResult<()> {
    if !args.is_empty() {
        return Err(ShellError::Usage("time"));
    }
    writeln!(out, "{}", vfs.current_time().format("%d/%m/%y %H:%M:%S UTC"))?;
    Ok(())
}

fn cmd_trace<V: Volume>(
    vfs: &FlashVfs<V>,
    args: &[&str],
    out: &mut dyn Write,
) -> ShellResult<()> {
    match args {
        &["on"] => {
            vfs.trace().enable();
            writeln!(out, "tracing enabled")?;
            Ok(())
        }
        &["off"] => {
            vfs.trace().disable();
            writeln!(out, "tracing disabled")?;
            Ok(())
        }
        _ => Err(ShellError::Usage("trace on|off")),
    }
}
