//! Helpers shared by the tool definitions.

use rmcp::ErrorData as McpError;
use rmcp::model::JsonObject;
use serde::de::DeserializeOwned;

/// Decode rmcp call arguments into a parameter struct.
pub fn parse_params<T: DeserializeOwned>(args: JsonObject) -> Result<T, McpError> {
    serde_json::from_value(serde_json::Value::Object(args))
        .map_err(|e| McpError::invalid_params(e.to_string(), None))
}

/// Decode HTTP transport arguments into a parameter struct.
#[cfg(feature = "http")]
pub fn parse_http_params<T: DeserializeOwned>(
    arguments: serde_json::Value,
) -> Result<T, crate::domains::tools::ToolError> {
    // A bare `null` means "no arguments", which must still pick up defaults.
    let arguments = match arguments {
        serde_json::Value::Null => serde_json::json!({}),
        other => other,
    };
    serde_json::from_value(arguments)
        .map_err(|e| crate::domains::tools::ToolError::invalid_arguments(e.to_string()))
}

/// Serialize a tool result for the HTTP transport.
#[cfg(feature = "http")]
pub fn call_result_json(
    result: &rmcp::model::CallToolResult,
) -> Result<serde_json::Value, crate::domains::tools::ToolError> {
    serde_json::to_value(result)
        .map_err(|e| crate::domains::tools::ToolError::internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Params {
        name: String,
        #[serde(default)]
        count: u32,
    }

    #[test]
    fn test_parse_params() {
        let mut args = JsonObject::new();
        args.insert("name".to_string(), serde_json::json!("cafe"));
        let params: Params = parse_params(args).unwrap();
        assert_eq!(params.name, "cafe");
        assert_eq!(params.count, 0);
    }

    #[test]
    fn test_parse_params_missing_field() {
        let result = parse_params::<Params>(JsonObject::new());
        assert!(result.is_err());
    }
}
