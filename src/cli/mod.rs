//! CLI module for flashvfs
//!
//! Provides the command-line interface for:
//! - shell: mount a volume and serve an interactive diagnostic session
//! - exec: mount a volume, run one command line, exit

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command, MountArgs};
pub use commands::{run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
