//! CLI module for tablegate
//!
//! Provides the command-line interface:
//! - serve: load config and run the gateway

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::run;
pub use errors::{CliError, CliResult};
