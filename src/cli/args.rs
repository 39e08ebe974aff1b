//! CLI argument definitions using clap
//!
//! Commands:
//! - tablegate serve --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tablegate - a thin REST gateway for a hosted table backend
#[derive(Parser, Debug)]
#[command(name = "tablegate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the gateway server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./tablegate.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
