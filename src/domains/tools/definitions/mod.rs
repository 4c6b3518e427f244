//! Tool definitions module.
//!
//! Each tool is defined in its own file with its parameters, `execute()`,
//! `http_handler()` and `create_route()`.

mod common;
pub mod locate_ip;
pub mod search_nearby;

pub use locate_ip::{LocateIpParams, LocateIpTool};
pub use search_nearby::{SearchNearbyParams, SearchNearbyTool};
