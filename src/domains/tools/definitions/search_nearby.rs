//! Nearby POI search tool.
//!
//! Searches points of interest within a radius of a `lng,lat` centre through
//! the AMap `/v5/place/around` endpoint.

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
use crate::amap::{
    AmapClient, DEFAULT_PAGE_NUM, DEFAULT_PAGE_SIZE, DEFAULT_RADIUS, NearbyQuery, PoiResult,
};
use crate::domains::tools::ApiResponse;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the nearby search tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchNearbyParams {
    #[schemars(description = "Centre point as 'lng,lat', e.g. '116.397128,39.916527'")]
    pub location: String,

    #[schemars(description = "Search keywords, e.g. 'restaurant'")]
    #[serde(default)]
    pub keywords: Option<String>,

    #[schemars(description = "POI category codes, comma separated")]
    #[serde(default)]
    pub types: Option<String>,

    #[schemars(description = "Search radius in metres (0-50000, default 1000)", range(min = 0, max = 50000))]
    #[serde(default = "default_radius")]
    pub radius: i64,

    #[schemars(description = "Page number, starting at 1", range(min = 1))]
    #[serde(default = "default_page_num")]
    pub page_num: i64,

    #[schemars(description = "Results per page (1-25, default 20)", range(min = 1, max = 25))]
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_radius() -> i64 {
    DEFAULT_RADIUS
}

fn default_page_num() -> i64 {
    DEFAULT_PAGE_NUM
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl SearchNearbyParams {
    fn to_query(&self) -> NearbyQuery {
        NearbyQuery::new(self.location.trim())
            .keywords(self.keywords.clone().unwrap_or_default())
            .types(self.types.clone().unwrap_or_default())
            .radius(self.radius)
            .page(self.page_num, self.page_size)
    }
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Nearby POI search tool.
pub struct SearchNearbyTool;

impl SearchNearbyTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "search_nearby";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Search points of interest around a location. Takes a 'lng,lat' centre, optional keywords and category codes, and returns the POIs within the given radius, one page at a time.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(location = %params.location))]
    pub async fn execute(params: &SearchNearbyParams, client: &AmapClient) -> ApiResponse<PoiResult> {
        let query = params.to_query();
        info!(
            keywords = %query.keywords,
            types = %query.types,
            radius = query.radius,
            page_num = query.page_num,
            page_size = query.page_size,
            "Search nearby tool called"
        );

        let result = match client.search_nearby(&query).await {
            Ok(result) => result,
            Err(e) => {
                error!("Error searching nearby: {}", e);
                return ApiResponse::fail(e.to_string());
            }
        };

        if !result.is_ok() {
            let info = result
                .fields
                .get("info")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown error");
            return ApiResponse::fail(format!(
                "AMap rejected the nearby search (status {}): {}",
                result.status, info
            ));
        }

        if result.is_empty() {
            let page = if query.page_num > 1 {
                format!(" on page {}", query.page_num)
            } else {
                String::new()
            };
            return ApiResponse::fail(format!(
                "No POIs found{} within {} m of {}",
                page, query.radius, query.location
            ));
        }

        ApiResponse::ok(result).with_meta(query_meta(&query))
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        client: Arc<AmapClient>,
    ) -> Result<serde_json::Value, crate::domains::tools::ToolError> {
        use super::common::{call_result_json, parse_http_params};

        let params: SearchNearbyParams = parse_http_params(arguments)?;
        let result = Self::execute(&params, &client).await.into_call_tool_result();
        call_result_json(&result)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<SearchNearbyParams>(),
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
                let params: SearchNearbyParams = parse_params(args)?;
                Ok(Self::execute(&params, &client).await.into_call_tool_result())
            }
            .boxed()
        })
    }
}

/// Echo of the effective query, returned as envelope metadata.
fn query_meta(query: &NearbyQuery) -> Map<String, serde_json::Value> {
    let mut meta = Map::new();
    meta.insert("location".to_string(), json!(query.location));
    meta.insert("keywords".to_string(), json!(query.keywords));
    meta.insert("types".to_string(), json!(query.types));
    meta.insert("radius".to_string(), json!(query.radius));
    meta.insert("page_num".to_string(), json!(query.page_num));
    meta.insert("page_size".to_string(), json!(query.page_size));
    meta
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amap::stub::StubUpstream;

    fn params(json: &str) -> SearchNearbyParams {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_params_defaults() {
        let p = params(r#"{"location": "116.397128,39.916527"}"#);
        assert_eq!(p.radius, 1000);
        assert_eq!(p.page_num, 1);
        assert_eq!(p.page_size, 20);

        let query = p.to_query();
        assert_eq!(query.keywords, "");
        assert_eq!(query.types, "");
    }

    #[test]
    fn test_params_require_location() {
        assert!(serde_json::from_str::<SearchNearbyParams>(r#"{"keywords": "cafe"}"#).is_err());
    }

    #[tokio::test]
    async fn test_execute_returns_pois_and_meta() {
        let stub = StubUpstream::start(
            200,
            r#"{"status":"1","count":"1","pois":[{"name":"Station A","distance":"120"}]}"#,
        )
        .await;
        let client = AmapClient::new(stub.client_config()).unwrap();

        let p = params(
            r#"{"location":"113.1,22.9","keywords":"gas station","radius":3000,"page_num":1,"page_size":1}"#,
        );
        let response = SearchNearbyTool::execute(&p, &client).await;
        assert!(response.success);

        let data = response.data.unwrap();
        assert_eq!(data.pois.len(), 1);
        assert_eq!(data.pois[0]["name"], "Station A");

        let meta = response.meta.unwrap();
        assert_eq!(meta["keywords"], "gas station");
        assert_eq!(meta["radius"], 3000);
        assert_eq!(meta["page_size"], 1);
    }

    #[tokio::test]
    async fn test_execute_rejects_radius_locally() {
        let stub = StubUpstream::start(200, r#"{"status":"1","pois":[]}"#).await;
        let client = AmapClient::new(stub.client_config()).unwrap();

        let p = params(r#"{"location":"113.1,22.9","radius":60000}"#);
        let response = SearchNearbyTool::execute(&p, &client).await;
        assert!(!response.success);
        assert!(response.error.unwrap().contains("radius"));
        assert_eq!(stub.hits(), 0);
    }

    #[tokio::test]
    async fn test_execute_empty_result_is_soft_failure() {
        let stub = StubUpstream::start(200, r#"{"status":"1","count":"0","pois":[]}"#).await;
        let client = AmapClient::new(stub.client_config()).unwrap();

        let p = params(r#"{"location":"113.1,22.9","keywords":"unicorn"}"#);
        let response = SearchNearbyTool::execute(&p, &client).await;
        assert!(!response.success);
        assert!(response.error.unwrap().contains("No POIs found"));
    }

    #[tokio::test]
    async fn test_execute_empty_later_page_names_page() {
        let stub = StubUpstream::start(200, r#"{"status":"1","count":"0","pois":[]}"#).await;
        let client = AmapClient::new(stub.client_config()).unwrap();

        let p = params(r#"{"location":"113.1,22.9","keywords":"cafe","page_num":5}"#);
        let response = SearchNearbyTool::execute(&p, &client).await;
        assert!(!response.success);
        let error = response.error.unwrap();
        assert!(error.contains("on page 5"), "{}", error);
        assert!(error.contains("113.1,22.9"));
    }

    #[tokio::test]
    async fn test_execute_persistent_server_error() {
        let stub = StubUpstream::start(500, "internal error").await;
        let client = AmapClient::new(stub.client_config().with_max_retries(3)).unwrap();

        let p = params(r#"{"location":"113.1,22.9"}"#);
        let result = SearchNearbyTool::execute(&p, &client)
            .await
            .into_call_tool_result();

        assert_eq!(result.is_error, Some(true));
        assert_eq!(result.structured_content.unwrap()["success"], false);
        assert_eq!(stub.hits(), 3);
    }

    #[test]
    fn test_tool_metadata() {
        let tool = SearchNearbyTool::to_tool();
        assert_eq!(tool.name, "search_nearby");
        let schema = serde_json::to_value(&*tool.input_schema).unwrap();
        assert!(schema["properties"]["location"].is_object());
        assert!(schema["properties"]["radius"].is_object());
    }
}
