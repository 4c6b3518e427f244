//! Tool Registry - tool listing and HTTP dispatch.

use std::sync::Arc;
#[cfg(feature = "http")]
use tracing::warn;

use rmcp::model::Tool;

use super::definitions::{LocateIpTool, SearchNearbyTool};
use crate::amap::AmapClient;

/// Tool registry - the list of available tools and their HTTP dispatch.
pub struct ToolRegistry {
    #[cfg_attr(not(feature = "http"), allow(dead_code))]
    client: Arc<AmapClient>,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(client: Arc<AmapClient>) -> Self {
        Self { client }
    }

    /// Get all tools as Tool models (metadata).
    pub fn get_all_tools() -> Vec<Tool> {
        vec![LocateIpTool::to_tool(), SearchNearbyTool::to_tool()]
    }

    /// Dispatch an HTTP tool call to the appropriate handler.
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, super::ToolError> {
        match name {
            LocateIpTool::NAME => LocateIpTool::http_handler(arguments, self.client.clone()).await,
            SearchNearbyTool::NAME => {
                SearchNearbyTool::http_handler(arguments, self.client.clone()).await
            }
            _ => {
                warn!("Unknown tool requested: {}", name);
                Err(super::ToolError::not_found(name))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(feature = "http")]
    use crate::amap::ClientConfig;

    #[cfg(feature = "http")]
    fn test_client() -> Arc<AmapClient> {
        let config = ClientConfig::new("http://127.0.0.1:9", "test-key");
        Arc::new(AmapClient::new(config).unwrap())
    }

    #[test]
    fn test_registry_tool_names() {
        let names: Vec<_> = ToolRegistry::get_all_tools()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        assert_eq!(names, vec!["locate_ip", "search_nearby"]);
    }

    #[test]
    fn test_get_all_tools_have_schemas() {
        for tool in ToolRegistry::get_all_tools() {
            assert!(tool.description.is_some());
            assert_eq!(
                tool.input_schema.get("type").and_then(|v| v.as_str()),
                Some("object")
            );
        }
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_locate_ip() {
        use crate::amap::stub::StubUpstream;

        let stub = StubUpstream::start(200, r#"{"status":"1","province":"Guangdong"}"#).await;
        let client = Arc::new(AmapClient::new(stub.client_config()).unwrap());
        let registry = ToolRegistry::new(client);

        let result = registry
            .call_tool("locate_ip", serde_json::json!({}))
            .await
            .unwrap();
        assert_eq!(result["isError"], false);
        assert_eq!(result["structuredContent"]["data"]["province"], "Guangdong");
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_invalid_arguments() {
        let registry = ToolRegistry::new(test_client());
        let result = registry
            .call_tool("search_nearby", serde_json::json!({"radius": 10}))
            .await;
        assert!(matches!(result, Err(super::super::ToolError::InvalidArguments(_))));
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_unknown() {
        let registry = ToolRegistry::new(test_client());
        let result = registry.call_tool("unknown", serde_json::json!({})).await;
        assert!(matches!(result, Err(super::super::ToolError::NotFound(_))));
    }
}
