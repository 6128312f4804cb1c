//! Diagnostic command shell
//!
//! A line-oriented command interpreter over a mounted adapter: commands
//! arrive as text, output goes to a caller-supplied sink, and every file
//! operation runs through the adapter's own contract. The deployed target
//! feeds this from a debug link serviced by a timer interrupt; hosted
//! builds feed it from stdin.

mod commands;
mod errors;

pub use commands::CommandSpec;
pub use errors::{ShellError, ShellResult};

use std::io::Write;

use crate::media::Volume;
use crate::vfs::FlashVfs;

use commands::command_table;

/// Command interpreter bound to one adapter.
pub struct Shell<'v, V: Volume> {
    vfs: &'v FlashVfs<V>,
    commands: Vec<CommandSpec<V>>,
}

impl<'v, V: Volume> Shell<'v, V> {
    /// Create a shell over `vfs` with the standard command table.
    pub fn new(vfs: &'v FlashVfs<V>) -> Self {
        Self {
            vfs,
            commands: command_table(),
        }
    }

    /// The command table, in display order.
    pub fn commands(&self) -> &[CommandSpec<V>] {
        &self.commands
    }

    /// Execute one command line, writing output to `out`.
    ///
    /// An empty line is a successful no-op. Errors are returned, not
    /// printed: the session loop decides how to surface them.
    pub fn exec(&self, line: &str, out: &mut dyn Write) -> ShellResult<()> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let (name, args) = match parts.split_first() {
            Some((name, args)) => (*name, args),
            None => return Ok(()),
        };

        if name == "help" {
            return self.print_help(out);
        }

        match self.commands.iter().find(|c| c.name == name) {
            Some(command) => (command.run)(self.vfs, args, out),
            None => Err(ShellError::CommandNotFound(name.to_string())),
        }
    }

    fn print_help(&self, out: &mut dyn Write) -> ShellResult<()> {
        writeln!(out, "{:<22} {}", "help", "list available commands")?;
        for command in &self.commands {
            writeln!(out, "{:<22} {}", command.usage, command.help)?;
        }
        Ok(())
    }
}
