//! AMap MCP Server Library
//!
//! An MCP (Model Context Protocol) server exposing two AMap (Gaode) web
//! services as tools: IP geolocation and nearby POI search.
//!
//! # Architecture
//!
//! - **amap**: the retrying HTTP client for the AMap REST API
//! - **core**: configuration, error handling, logging, the server handler
//!   and its transports
//! - **domains**: what the server exposes over MCP
//!   - **tools**: `locate_ip` and `search_nearby`
//!   - **prompts**: the `assistant` prompt
//!
//! # Example
//!
//! ```rust,no_run
//! use amap_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod amap;
pub mod core;
pub mod domains;

pub use amap::{AmapClient, AmapError, ClientConfig};
pub use core::{Config, Error, McpServer, Result};
