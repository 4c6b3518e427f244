//! IP geolocation tool.
//!
//! Resolves an IP address (or the caller's own) to province, city, adcode
//! and bounding rectangle through the AMap `/v3/ip` endpoint.

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::Tool,
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, json};
use std::sync::Arc;
use tracing::{error, info, instrument};

use super::common::parse_params;
use crate::amap::{AmapClient, GeoResult};
use crate::domains::tools::ApiResponse;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the IP geolocation tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct LocateIpParams {
    /// IP address to locate.
    #[schemars(description = "IPv4 address to locate. Omit to locate the caller's own address.")]
    #[serde(default)]
    pub ip: Option<String>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// IP geolocation tool.
pub struct LocateIpTool;

impl LocateIpTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "locate_ip";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Locate the user by IP address. Returns province, city, adcode and the bounding rectangle of the city. Call this first to obtain coordinates for a nearby search.";

    /// Execute the tool logic.
    ///
    /// A successful lookup that located nothing (private or foreign IP) is
    /// still a success: the payload carries whatever upstream returned.
    #[instrument(skip_all, fields(ip = ?params.ip))]
    pub async fn execute(params: &LocateIpParams, client: &AmapClient) -> ApiResponse<GeoResult> {
        info!("Locate IP tool called");

        let ip = params.ip.as_deref().map(str::trim).filter(|ip| !ip.is_empty());

        let result = match client.locate_ip(ip).await {
            Ok(result) => result,
            Err(e) => {
                error!("Error locating IP {:?}: {}", ip, e);
                return ApiResponse::fail(e.to_string());
            }
        };

        if !result.is_ok() {
            let info = result
                .get("info")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown error");
            return ApiResponse::fail(format!(
                "AMap rejected the IP lookup (status {}): {}",
                result.status, info
            ));
        }

        if result.is_empty() {
            info!("IP lookup returned no location");
        }

        let mut meta = Map::new();
        meta.insert("ip".to_string(), json!(ip));

        ApiResponse::ok(result).with_meta(meta)
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        client: Arc<AmapClient>,
    ) -> Result<serde_json::Value, crate::domains::tools::ToolError> {
        use super::common::{call_result_json, parse_http_params};

        let params: LocateIpParams = parse_http_params(arguments)?;
        let result = Self::execute(&params, &client).await.into_call_tool_result();
        call_result_json(&result)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<LocateIpParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    pub fn create_route<S>(client: Arc<AmapClient>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let client = client.clone();
            async move {
                let params: LocateIpParams = parse_params(args)?;
                Ok(Self::execute(&params, &client).await.into_call_tool_result())
            }
            .boxed()
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
