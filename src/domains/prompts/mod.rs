//! Prompts domain module.
//!
//! Prompts are template messages clients can fetch and fill in. This server
//! ships a single `assistant` prompt describing how to chain the tools.
//!
//! - `definitions/` - Individual prompt definitions (one file per prompt)
//! - `registry.rs` - Central prompt registration
//! - `service.rs` - Prompt listing and rendering
//! - `templates.rs` - Placeholder substitution

pub mod definitions;
mod error;
mod registry;
mod service;
pub mod templates;

pub use definitions::PromptDefinition;
pub use error::PromptError;
pub use registry::{get_all_prompts, prompt_names};
pub use service::PromptService;
pub use templates::PromptTemplate;
