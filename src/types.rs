use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declaration of a tool offered to the model for one generation request.
///
/// Immutable for the duration of that request; the schema is opaque to this
/// layer and is only re-serialized into the system prompt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDefinition {
    /// Name of the tool, unique within a request
    pub name: String,
    /// Human-readable description shown to the model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON-Schema-shaped argument document
    #[serde(rename = "inputSchema", skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            input_schema: None,
        }
    }
}

/// Tool call recovered from a completed fence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParsedToolCall {
    /// Call id from the model, or a generated `call_<millis>_<suffix>`
    pub tool_call_id: String,
    /// Name of the tool to invoke
    pub tool_name: String,
    /// Arguments payload; object-shaped when derived from object syntax
    pub args: Value,
}

/// Outcome of executing one tool call, ready for re-injection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolResult {
    /// Id of the call this result answers, when the call carried one
    pub tool_call_id: Option<String>,
    /// Name of the tool that ran
    pub tool_name: String,
    /// Output value; `None` is normalized to JSON `null` at serialization
    pub result: Option<Value>,
    /// True when `result` describes a failure
    pub is_error: bool,
}

/// One model turn, split into calls and remaining prose.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedResponse {
    /// Accepted call candidates across all fences, in order of appearance
    pub tool_calls: Vec<ParsedToolCall>,
    /// Original text minus fence spans, blank-line runs collapsed, trimmed
    pub text_content: String,
}

/// Result of one batch scan over the detector's buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FenceScan {
    /// Prose that can no longer be part of a fence, released to the caller
    pub prefix_text: String,
    /// The first complete fence, delimiters included, when one was found
    pub fence: Option<String>,
    /// Text after the closing marker; still buffered for the next scan
    pub remaining_text: String,
}
