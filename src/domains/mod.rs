//! Domain logic exposed over MCP.
//!
//! - **tools**: `locate_ip` and `search_nearby`
//! - **prompts**: the `assistant` prompt

pub mod prompts;
pub mod tools;
