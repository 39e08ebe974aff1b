//! tablegate CLI entry point
//!
//! Minimal entrypoint: parse arguments, dispatch to the CLI module, print
//! errors to stderr and exit non-zero on failure. Configuration loading and
//! server startup live in `cli::commands`.

use tablegate::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
