//! Error types and handling for the MCP server.
//!
//! Each layer has its own error enum; this module unifies them so startup
//! code can use a single `Result` type.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error from the AMap client, including invalid client settings.
    #[error("AMap error: {0}")]
    Amap(#[from] crate::amap::AmapError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors, e.g. creating the log directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
