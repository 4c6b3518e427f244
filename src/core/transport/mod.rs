//! Transport layer for the MCP server.
//!
//! - **STDIO** (feature `stdio`, default): what MCP hosts expect
//! - **TCP** (feature `tcp`): rmcp sessions over raw sockets
//! - **HTTP** (feature `http`): JSON-RPC over POST, plus `GET /health`

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "tcp")]
pub mod tcp;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "tcp")]
pub use config::TcpConfig;

#[cfg(feature = "http")]
pub use config::HttpConfig;
