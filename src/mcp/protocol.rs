/// MCP (Model Context Protocol) message structures and JSON-RPC handling
///
/// This module defines the JSON-RPC message format that Claude and other
/// MCP clients use to communicate with the tracker server. Standard error
/// codes come from `jsonrpc-core`; tracker-specific codes live in
/// [`error_codes`].

use jsonrpc_core::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::storage::StorageError;

/// MCP protocol version we support
pub const MCP_VERSION: &str = "2024-11-05";

/// JSON-RPC 2.0 request message
///
/// A message without an `id` is a notification and gets no response.
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    /// The method to call (e.g., "tools/call")
    pub method: String,
    pub params: Option<Value>,
}

/// JSON-RPC 2.0 response message
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,
    /// Request ID that we're responding to
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error information
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// MCP tool call parameters
#[derive(Debug, Deserialize)]
pub struct ToolCallParams {
    /// Name of the tool to call (e.g., "habit_toggle")
    pub name: String,
    /// Arguments to pass to the tool
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

/// MCP tool call result
///
/// Failures inside a tool are reported here with `isError` set, not as
/// JSON-RPC errors, so the client can show them to the model.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    pub content: Vec<ToolContent>,
    pub is_error: bool,
}

/// Content returned by a tool
#[derive(Debug, Serialize)]
pub struct ToolContent {
    /// Type of content (always "text" here)
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

/// MCP tool definition as listed by `tools/list`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON schema for the tool's arguments
    pub input_schema: Value,
}

/// MCP server capabilities
#[derive(Debug, Serialize)]
pub struct ServerCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    /// Whether the tool list can change at runtime
    pub list_changed: bool,
}

/// MCP initialization request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    pub protocol_version: String,
    #[serde(default)]
    pub capabilities: Value,
    pub client_info: Option<ClientInfo>,
}

/// Information about the MCP client
#[derive(Debug, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    #[serde(default)]
    pub version: String,
}

/// MCP initialization response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    pub server_info: ServerInfo,
}

#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

/// Application error codes, in the -32000 to -32099 server range
pub mod error_codes {
    /// The addressed record does not exist
    pub const NOT_FOUND: i64 = -32001;
    /// Input validation failed
    pub const VALIDATION_ERROR: i64 = -32003;
    /// Database or storage operation failed
    pub const STORAGE_ERROR: i64 = -32004;
}

impl JsonRpcResponse {
    /// Create a successful response
    pub fn success(id: Value, result: Value) -> Self {
        Self { jsonrpc: "2.0".to_string(), id, result: Some(result), error: None }
    }

    /// Create an error response with a standard JSON-RPC code
    pub fn error(id: Value, code: ErrorCode, message: impl Into<String>) -> Self {
        Self::error_with_code(id, code.code(), message, None)
    }

    pub fn error_with_code(id: Value, code: i64, message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError { code, message: message.into(), data }),
        }
    }
}

impl ToolCallResult {
    /// Create a successful tool result with text content
    pub fn success(text: String) -> Self {
        Self { content: vec![ToolContent { content_type: "text".to_string(), text }], is_error: false }
    }

    /// Create an error tool result
    pub fn error(error_message: impl std::fmt::Display) -> Self {
        Self {
            content: vec![ToolContent { content_type: "text".to_string(), text: format!("Error: {}", error_message) }],
            is_error: true,
        }
    }
}

/// Map a storage error to the code reported alongside it
pub fn storage_error_code(error: &StorageError) -> i64 {
    match error {
        StorageError::NotFound { .. } => error_codes::NOT_FOUND,
        StorageError::Domain(_) => error_codes::VALIDATION_ERROR,
        StorageError::Query(_) | StorageError::Connection(_) | StorageError::Migration(_) => {
            error_codes::STORAGE_ERROR
        }
        StorageError::Serialization(_) => ErrorCode::InternalError.code(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changes::Collection;
    use crate::domain::DomainError;
    use serde_json::json;

    #[test]
    fn test_notification_has_no_id() {
        let request: JsonRpcRequest =
            serde_json::from_value(json!({"jsonrpc": "2.0", "method": "notifications/initialized"})).unwrap();
        assert!(request.id.is_none());
    }

    #[test]
    fn test_wire_field_names() {
        let result = serde_json::to_value(ToolCallResult::error("boom")).unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(result["content"][0]["type"], "text");
        assert_eq!(result["content"][0]["text"], "Error: boom");

        let tool = ToolDefinition { name: "x".to_string(), description: "y".to_string(), input_schema: json!({}) };
        assert!(serde_json::to_value(tool).unwrap().get("inputSchema").is_some());

        let error = serde_json::to_value(JsonRpcResponse::error(json!(1), ErrorCode::MethodNotFound, "nope")).unwrap();
        assert_eq!(error["error"]["code"], -32601);
        assert!(error.get("result").is_none());
    }

    #[test]
    fn test_storage_error_codes() {
        let missing = StorageError::not_found(Collection::Todos, "abc");
        assert_eq!(storage_error_code(&missing), error_codes::NOT_FOUND);

        let invalid = StorageError::Domain(DomainError::validation("bad"));
        assert_eq!(storage_error_code(&invalid), error_codes::VALIDATION_ERROR);

        let migration = StorageError::Migration("newer".to_string());
        assert_eq!(storage_error_code(&migration), error_codes::STORAGE_ERROR);
    }
}
