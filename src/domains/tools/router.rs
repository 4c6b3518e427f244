//! Tool Router - builds the rmcp ToolRouter.
//!
//! Each tool knows how to create its own route; this module only wires them
//! to the shared AMap client.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use super::definitions::{LocateIpTool, SearchNearbyTool};
use crate::amap::AmapClient;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(client: Arc<AmapClient>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(LocateIpTool::create_route(client.clone()))
        .with_route(SearchNearbyTool::create_route(client))
}
