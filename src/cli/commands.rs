//! CLI command dispatch

use std::path::Path;

use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::http_server::HttpServer;

use super::args::{Cli, Command};
use super::errors::CliResult;

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    match cli.command {
        Command::Serve { config } => serve(&config),
    }
}

fn serve(path: &Path) -> CliResult<()> {
    init_tracing();

    let config = AppConfig::load(path)?;
    tracing::info!(
        backend = %config.backend.base_url,
        tables = config.tables.len(),
        "configuration loaded"
    );

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(HttpServer::new(&config).start())?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tablegate=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
