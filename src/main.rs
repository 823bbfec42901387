use std::sync::Arc;

use anyhow::Result;
use rmcp::ServiceExt;

use mdbgate::server::AccessGateway;
use mdbgate::{Gateway, OdbcDriver, Registry};

const LOG_FILE: &str = "mdbgate.log";

#[tokio::main]
async fn main() -> Result<()> {
    let log = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(LOG_FILE)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("mdbgate=info,rmcp=info")),
        )
        .with_writer(Arc::new(log))
        .with_ansi(false)
        .init();

    let registry = Registry::from_env();
    banner(&registry);

    let driver = OdbcDriver::new()?;
    let server = AccessGateway::new(Gateway::new(registry, driver));

    // stdout carries the MCP frames, so the transport owns it from here on.
    let running = server
        .serve(rmcp::transport::stdio())
        .await
        .inspect_err(|e| tracing::error!("serve error: {e:?}"))?;
    running.waiting().await?;

    Ok(())
}

/// Startup banner on stderr: configured databases and the 32/64-bit driver
/// compatibility note.
fn banner(registry: &Registry) {
    eprintln!("Starting Access Database MCP Server...");
    eprintln!("Available databases: {}", registry.names().join(", "));
    for (name, path) in registry.iter() {
        eprintln!(
            "Database '{}': {} (exists: {})",
            name,
            path.display(),
            path.exists()
        );
    }

    if cfg!(target_pointer_width = "64") {
        eprintln!(
            "WARNING: This is a 64-bit build, which may not be compatible with 32-bit Access drivers."
        );
    } else {
        eprintln!("This is a 32-bit build, compatible with 32-bit Access database drivers.");
    }
    eprintln!("Server running... Press Ctrl+C to exit");
}
