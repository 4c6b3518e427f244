//! Map assistant prompt.

use super::PromptDefinition;
use rmcp::model::PromptArgument;

/// Guides the model through locate-then-search tool use.
pub struct AssistantPrompt;

impl PromptDefinition for AssistantPrompt {
    const NAME: &'static str = "assistant";
    const DESCRIPTION: &'static str =
        "AMap navigation assistant: IP geolocation and nearby POI search";

    fn template() -> &'static str {
        "You are an AMap navigation assistant skilled at IP geolocation and nearby \
point-of-interest search. Use the tools to fetch the information the user needs.\n\
## Steps\n\
1. Call `locate_ip` to obtain the user's location.\n\
2. If coordinates were obtained, call `search_nearby` with them and the search keywords.\n\
## Notes\n\
- Do not ask the user for coordinates; use `locate_ip` instead.\n\
- If the request already contains coordinates, search with them directly.\n\
{{#if location}}- The user's coordinates are {{location}}; skip `locate_ip`.\n{{/if}}\
The user's request:\n\n{{query}}\n"
    }

    fn arguments() -> Vec<PromptArgument> {
        vec![
            PromptArgument {
                name: "query".to_string(),
                title: None,
                description: Some("What the user is looking for".to_string()),
                required: Some(true),
            },
            PromptArgument {
                name: "location".to_string(),
                title: None,
                description: Some("Known coordinates as 'lng,lat', if any".to_string()),
                required: Some(false),
            },
        ]
    }
}
