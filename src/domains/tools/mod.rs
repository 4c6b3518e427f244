//! Tools domain module.
//!
//! Tools are the functions MCP clients can call. Each one wraps a single
//! [`AmapClient`](crate::amap::AmapClient) operation and answers with an
//! [`ApiResponse`] envelope.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `router.rs` - ToolRouter builder for STDIO/TCP transport
//! - `registry.rs` - Tool listing and HTTP dispatch
//! - `response.rs` - The `{success, data, error, meta}` envelope
//! - `error.rs` - Dispatch errors
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/`
//! 2. Define params, `execute()`, `http_handler()` and `create_route()`
//! 3. Export in `definitions/mod.rs`
//! 4. Add the route in `router.rs` and the entry in `registry.rs`

pub mod definitions;
mod error;
mod registry;
mod response;
pub mod router;

pub use error::ToolError;
pub use registry::ToolRegistry;
pub use response::ApiResponse;
pub use router::build_tool_router;
