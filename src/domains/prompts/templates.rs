//! Prompt templates.
//!
//! Templates use a small placeholder syntax:
//!
//! - `{{name}}` is replaced by the argument value (or removed if unset)
//! - `{{#if name}}...{{/if}}` is kept only when `name` is set and non-empty

use rmcp::model::PromptArgument;
use std::collections::HashMap;

use super::error::PromptError;

const IF_OPEN: &str = "{{#if ";
const IF_CLOSE: &str = "{{/if}}";

/// A prompt template that can be instantiated with arguments.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The unique name of the prompt.
    pub name: String,

    /// A description of what the prompt does.
    pub description: Option<String>,

    /// The arguments that this prompt accepts.
    pub arguments: Vec<PromptArgument>,

    /// The template string with placeholders.
    pub template: String,
}

impl PromptTemplate {
    /// Render the template with the given arguments.
    pub fn render(&self, arguments: &HashMap<String, String>) -> Result<String, PromptError> {
        let expanded = expand_conditionals(&self.template, arguments)?;
        Ok(substitute(&expanded, arguments))
    }
}

/// Resolve `{{#if name}}...{{/if}}` blocks. Blocks do not nest.
fn expand_conditionals(
    template: &str,
    arguments: &HashMap<String, String>,
) -> Result<String, PromptError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(IF_OPEN) {
        out.push_str(&rest[..start]);

        let after_open = &rest[start + IF_OPEN.len()..];
        let name_end = after_open
            .find("}}")
            .ok_or_else(|| PromptError::template("Unclosed {{#if}} tag"))?;
        let name = after_open[..name_end].trim();

        let body_and_rest = &after_open[name_end + 2..];
        let body_end = body_and_rest
            .find(IF_CLOSE)
            .ok_or_else(|| PromptError::template(format!("Missing {{{{/if}}}} for '{}'", name)))?;

        let is_set = arguments.get(name).is_some_and(|v| !v.trim().is_empty());
        if is_set {
            out.push_str(&body_and_rest[..body_end]);
        }

        rest = &body_and_rest[body_end + IF_CLOSE.len()..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Replace `{{name}}` placeholders; unknown ones are dropped.
fn substitute(template: &str, arguments: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                if let Some(value) = arguments.get(after[..end].trim()) {
                    out.push_str(value);
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}
