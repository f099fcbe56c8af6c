//! rollbook - renders student records from the node service as PDF reports.
//!
//! Serves `GET /api/v1/students/{id}/report`. Upstream access, sessions and
//! rendering live in `rollbook-core`; this binary wires them to axum.

mod api;
mod app;
mod error;
mod state;

use std::io;

use anyhow::Result;
use rollbook_core::Config;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log file name prefix inside `LOG_DIR`
const LOG_FILE_PREFIX: &str = "rollbook.log";

/// Initialize the tracing subscriber for logging.
/// Returns the file writer guard, which must live as long as the process.
fn init_tracing(log_dir: Option<&str>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    let _guard = init_tracing(config.log_dir.as_deref());
    info!(node = %config.node.base_url, addr = %config.addr, "rollbook starting");

    app::run(config).await?;

    info!("rollbook shutting down");
    Ok(())
}
