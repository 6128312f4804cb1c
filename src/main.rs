//! flashvfs CLI entry point
//!
//! A minimal entrypoint: parse arguments, dispatch to the CLI module,
//! print errors to stderr, exit non-zero on failure. All logic lives in
//! the `cli` module.

use flashvfs::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
