//! CLI argument definitions using clap
//!
//! Commands:
//! - flashvfs shell [--config <path>] [--ram] [--root <dir>] [--trace]
//! - flashvfs exec  [--config <path>] [--ram] [--root <dir>] [--trace] <line>

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// flashvfs - flash-backed virtual filesystem adapter
#[derive(Parser, Debug)]
#[command(name = "flashvfs")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every volume-mounting command.
#[derive(Args, Debug)]
pub struct MountArgs {
    /// Path to configuration file
    #[arg(long, default_value = "./flashvfs.json")]
    pub config: PathBuf,

    /// Mount an in-memory RAM disk instead of a host directory
    #[arg(long)]
    pub ram: bool,

    /// Host directory backing the volume
    #[arg(long, default_value = "./data")]
    pub root: PathBuf,

    /// Enable operation tracing from the start
    #[arg(long)]
    pub trace: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open an interactive diagnostic shell over a volume
    Shell {
        #[command(flatten)]
        mount: MountArgs,
    },

    /// Execute a single shell command line and exit
    Exec {
        #[command(flatten)]
        mount: MountArgs,

        /// Command line to execute, e.g. "stat /db.dat"
        line: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
