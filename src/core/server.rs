//! MCP server handler.
//!
//! [`McpServer`] owns the shared AMap client and the prompt service, and
//! implements rmcp's `ServerHandler`. Tool routes are built in
//! `domains/tools/router.rs`; adding a tool does not touch this file.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, handler::server::tool::ToolRouter, model::*,
    service::RequestContext, tool_handler,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use crate::amap::AmapClient;
use crate::domains::{prompts::PromptService, tools::ToolRegistry, tools::build_tool_router};

/// Protocol version announced by the HTTP transport's `initialize`.
#[cfg_attr(not(feature = "http"), allow(dead_code))]
pub(crate) const PROTOCOL_VERSION: &str = "2024-11-05";

const INSTRUCTIONS: &str = "AMap (Gaode) location services. Use `locate_ip` to find \
the city of an IP address (or of the caller when no IP is given), then \
`search_nearby` with a 'lng,lat' centre to find points of interest such as \
restaurants, hotels or gas stations. Every tool returns \
{success, data, error, meta}.";

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    config: Arc<Config>,

    /// Shared AMap client; its connection pool is released when the last
    /// clone of the server is dropped.
    #[cfg_attr(not(feature = "http"), allow(dead_code))]
    client: Arc<AmapClient>,

    prompt_service: Arc<PromptService>,

    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a server, building the AMap client from `config.amap`.
    ///
    /// Fails when the API key is missing or the base URL is unusable.
    pub fn new(config: Config) -> super::Result<Self> {
        let client = AmapClient::new(config.amap.client_config()?)?;
        Ok(Self::with_client(config, Arc::new(client)))
    }

    /// Create a server around an existing client.
    pub fn with_client(config: Config, client: Arc<AmapClient>) -> Self {
        Self {
            config: Arc::new(config),
            prompt_service: Arc::new(PromptService::new()),
            tool_router: build_tool_router::<Self>(client.clone()),
            client,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Usage hints sent to clients on initialization.
    pub fn instructions(&self) -> &'static str {
        INSTRUCTIONS
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// Tool metadata in MCP wire shape.
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        ToolRegistry::get_all_tools()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name and return the serialized `CallToolResult`.
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, crate::domains::tools::ToolError> {
        ToolRegistry::new(self.client.clone())
            .call_tool(name, arguments)
            .await
    }

    /// Prompt metadata in MCP wire shape.
    pub async fn list_prompts(&self) -> Vec<serde_json::Value> {
        self.prompt_service
            .list_prompts()
            .await
            .into_iter()
            .map(|p| {
                serde_json::json!({
                    "name": p.name,
                    "description": p.description,
                    "arguments": p.arguments
                })
            })
            .collect()
    }

    /// Render a prompt. Non-string argument values are ignored.
    pub async fn get_prompt(
        &self,
        name: &str,
        arguments: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, String> {
        let args = arguments.and_then(|v| v.as_object().map(string_arguments));

        let result = self
            .prompt_service
            .get_prompt(name, args)
            .await
            .map_err(|e| e.to_string())?;

        Ok(serde_json::json!({
            "description": result.description,
            "messages": result.messages
        }))
    }
}

fn string_arguments(map: &serde_json::Map<String, serde_json::Value>) -> HashMap<String, String> {
    map.iter()
        .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
        .collect()
}

#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: self.name().into(),
                version: self.version().into(),
                ..Implementation::from_build_env()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .build(),
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        info!("Listing prompts");
        Ok(ListPromptsResult {
            prompts: self.prompt_service.list_prompts().await,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        info!("Getting prompt: {}", request.name);
        let arguments = request.arguments.as_ref().map(string_arguments);
        self.prompt_service
            .get_prompt(&request.name, arguments)
            .await
            .map_err(|e| McpError::invalid_params(e.to_string(), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amap::ClientConfig;

    fn test_server() -> McpServer {
        let client = AmapClient::new(ClientConfig::new("http://127.0.0.1:9", "test-key")).unwrap();
        McpServer::with_client(Config::default(), Arc::new(client))
    }

    #[test]
    fn test_new_requires_api_key() {
        let result = McpServer::new(Config::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_new_with_api_key() {
        let mut config = Config::default();
        config.amap.api_key = "abc123".to_string();
        let server = McpServer::new(config).unwrap();
        assert_eq!(server.name(), "amap-maps");
    }

    #[test]
    fn test_server_info() {
        let info = test_server().get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.prompts.is_some());
        assert!(info.capabilities.resources.is_none());
        assert!(info.instructions.unwrap().contains("search_nearby"));
    }

    #[test]
    fn test_server_info_reports_configured_name() {
        let info = test_server().get_info();
        assert_eq!(info.server_info.name, "amap-maps");
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));

        let mut config = Config::default();
        config.server.name = "amap-staging".to_string();
        let client = AmapClient::new(ClientConfig::new("http://127.0.0.1:9", "test-key")).unwrap();
        let server = McpServer::with_client(config, Arc::new(client));
        assert_eq!(server.get_info().server_info.name, "amap-staging");
    }

    #[test]
    fn test_list_tools() {
        let tools = test_server().list_tools();
        let names: Vec<_> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
        assert_eq!(names, vec!["locate_ip", "search_nearby"]);
    }

    #[tokio::test]
    async fn test_get_prompt_ignores_non_string_arguments() {
        let server = test_server();
        let args = serde_json::json!({"query": "parks", "location": 42});
        let result = server.get_prompt("assistant", Some(args)).await.unwrap();
        let text = result["messages"][0]["content"]["text"].as_str().unwrap();
        assert!(text.contains("parks"));
    }

    #[tokio::test]
    async fn test_get_prompt_missing_query() {
        let server = test_server();
        let result = server.get_prompt("assistant", None).await;
        assert!(result.unwrap_err().contains("query"));
    }
}
