//! Uniform tool response envelope.
//!
//! Every tool answers with `{success, data?, error?, meta?}` so clients can
//! branch on `success` without parsing error text.

use rmcp::model::{CallToolResult, Content};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Response envelope returned by every tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded.
    pub success: bool,

    /// The payload on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Human-readable failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Request echo and other context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            meta: None,
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: Map<String, Value>) -> Self {
        self.meta = Some(meta);
        self
    }
}

impl<T: Serialize> ApiResponse<T> {
    /// Convert into an MCP tool result carrying the envelope as structured content.
    ///
    /// Failed envelopes are flagged with `isError` so clients that ignore
    /// the payload still notice.
    pub fn into_call_tool_result(self) -> CallToolResult {
        match serde_json::to_value(&self) {
            Ok(value) => CallToolResult {
                content: vec![Content::text(value.to_string())],
                structured_content: Some(value),
                is_error: Some(!self.success),
                meta: None,
            },
            Err(e) => {
                warn!("Failed to encode tool response: {}", e);
                CallToolResult::error(vec![Content::text(format!(
                    "Failed to encode tool response: {}",
                    e
                ))])
            }
        }
    }
}
