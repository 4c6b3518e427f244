//! MCP Server Entry Point
//!
//! Loads configuration, initializes logging, and serves until the transport
//! closes or Ctrl-C is received.

use anyhow::{Context, Result};
use tracing::{error, info};

use amap_mcp_server::core::{Config, McpServer, TransportService, init_logging};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    // Keeps the file writer flushing until main returns.
    let _log_guard = init_logging(&config.logging).context("failed to initialize logging")?;

    info!("Starting {} v{}", config.server.name, config.server.version);

    let server = McpServer::new(config.clone()).context("failed to create the MCP server")?;
    info!(
        base_url = %config.amap.base_url,
        max_retries = config.amap.max_retries,
        "AMap client ready"
    );

    let transport = TransportService::new(config.transport);

    tokio::select! {
        result = transport.run(server) => {
            if let Err(e) = &result {
                error!("Transport failed: {}", e);
            }
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl-C");
        }
    }

    info!("Server shutting down");
    Ok(())
}
