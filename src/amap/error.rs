//! Errors raised by the AMap client.

use thiserror::Error;

/// Result type for AMap client operations.
pub type AmapResult<T> = Result<T, AmapError>;

/// Errors that can occur while talking to the AMap REST API.
///
/// Variants are split along the retry boundary: [`AmapError::is_transient`]
/// tells the client whether repeating the same request may succeed.
#[derive(Debug, Error)]
pub enum AmapError {
    /// The client configuration is unusable.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    /// A request parameter failed local validation. No request was sent.
    #[error("Invalid argument '{field}': {message}")]
    InvalidArgument {
        field: &'static str,
        message: String,
    },

    /// The request did not complete (connection refused, reset, DNS...).
    #[error("Connection to AMap failed: {0}")]
    Connection(#[source] reqwest::Error),

    /// The request exceeded the configured timeout.
    #[error("Request to AMap timed out")]
    Timeout,

    /// Upstream answered with a non-2xx HTTP status.
    #[error("AMap returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the JSON shape we expect.
    #[error("Malformed AMap response: {0}")]
    Decode(String),
}

impl AmapError {
    /// Create an "invalid argument" error.
    pub fn invalid_argument(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field,
            message: message.into(),
        }
    }

    /// Create an "invalid config" error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Whether retrying the unchanged request could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Connection(_) | Self::Timeout => true,
            Self::Status { status, .. } => *status >= 500,
            Self::InvalidConfig(_) | Self::InvalidArgument { .. } | Self::Decode(_) => false,
        }
    }
}

impl From<reqwest::Error> for AmapError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Connection(err)
        }
    }
}

impl From<serde_json::Error> for AmapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_errors_are_transient() {
        let err = AmapError::Status {
            status: 503,
            body: String::new(),
        };
        assert!(err.is_transient());
    }

    #[test]
    fn test_client_errors_are_not_transient() {
        let err = AmapError::Status {
            status: 404,
            body: "not found".to_string(),
        };
        assert!(!err.is_transient());
        assert!(!AmapError::Decode("eof".to_string()).is_transient());
        assert!(!AmapError::invalid_argument("radius", "too large").is_transient());
    }

    #[test]
    fn test_timeout_is_transient() {
        assert!(AmapError::Timeout.is_transient());
    }

    #[test]
    fn test_invalid_argument_message_names_field() {
        let err = AmapError::invalid_argument("page_size", "must be between 1 and 25");
        assert_eq!(
            err.to_string(),
            "Invalid argument 'page_size': must be between 1 and 25"
        );
    }
}
