//! Prompt service implementation.
//!
//! Holds the registered templates and renders them on request.

use rmcp::model::{GetPromptResult, Prompt, PromptMessage, PromptMessageRole};
use std::collections::HashMap;
use tracing::{debug, info};

use super::error::PromptError;
use super::registry::get_all_prompts;
use super::templates::PromptTemplate;

/// Service for listing and instantiating prompts.
pub struct PromptService {
    /// Key: prompt name, Value: prompt template
    prompts: HashMap<String, PromptTemplate>,
}

impl PromptService {
    /// Create a PromptService with every prompt from the registry.
    pub fn new() -> Self {
        info!("Initializing PromptService");

        let prompts = get_all_prompts()
            .into_iter()
            .map(|template| {
                debug!("Registering prompt: {}", template.name);
                (template.name.clone(), template)
            })
            .collect();

        Self { prompts }
    }

    /// List all available prompts, sorted by name.
    pub async fn list_prompts(&self) -> Vec<Prompt> {
        let mut prompts: Vec<Prompt> = self
            .prompts
            .values()
            .map(|template| Prompt {
                name: template.name.clone(),
                title: None,
                description: template.description.clone(),
                arguments: Some(template.arguments.clone()),
                icons: None,
                meta: None,
            })
            .collect();
        prompts.sort_by(|a, b| a.name.cmp(&b.name));
        prompts
    }

    /// Get a prompt with arguments substituted.
    pub async fn get_prompt(
        &self,
        name: &str,
        arguments: Option<HashMap<String, String>>,
    ) -> Result<GetPromptResult, PromptError> {
        let template = self
            .prompts
            .get(name)
            .ok_or_else(|| PromptError::not_found(name))?;

        let arguments = arguments.unwrap_or_default();

        for arg in &template.arguments {
            if arg.required.unwrap_or(false) && !arguments.contains_key(&arg.name) {
                return Err(PromptError::missing_argument(&arg.name));
            }
        }

        let content = template.render(&arguments)?;

        Ok(GetPromptResult {
            description: template.description.clone(),
            messages: vec![PromptMessage::new_text(PromptMessageRole::User, content)],
        })
    }
}

impl Default for PromptService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::PromptMessageContent;

    fn text_of(result: &GetPromptResult) -> String {
        match &result.messages[0].content {
            PromptMessageContent::Text { text } => text.clone(),
            other => panic!("unexpected content: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_prompts() {
        let service = PromptService::new();
        let prompts = service.list_prompts().await;
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].name, "assistant");
    }

    #[tokio::test]
    async fn test_get_assistant_prompt() {
        let service = PromptService::new();

        let mut args = HashMap::new();
        args.insert("query".to_string(), "gas stations near me".to_string());

        let result = service.get_prompt("assistant", Some(args)).await.unwrap();
        let text = text_of(&result);
        assert!(text.contains("gas stations near me"));
        assert!(text.contains("locate_ip"));
        assert!(!text.contains("{{"));
        assert!(!text.contains("skip `locate_ip`"));
    }

    #[tokio::test]
    async fn test_get_assistant_prompt_with_location() {
        let service = PromptService::new();

        let mut args = HashMap::new();
        args.insert("query".to_string(), "coffee".to_string());
        args.insert("location".to_string(), "116.397128,39.916527".to_string());

        let result = service.get_prompt("assistant", Some(args)).await.unwrap();
        let text = text_of(&result);
        assert!(text.contains("116.397128,39.916527; skip `locate_ip`"));
    }

    #[tokio::test]
    async fn test_get_prompt_missing_required_argument() {
        let service = PromptService::new();
        let result = service.get_prompt("assistant", None).await;
        assert!(matches!(result, Err(PromptError::MissingArgument(_))));
    }

    #[tokio::test]
    async fn test_get_nonexistent_prompt() {
        let service = PromptService::new();
        let result = service.get_prompt("nonexistent", None).await;
        assert!(matches!(result, Err(PromptError::NotFound(_))));
    }
}
