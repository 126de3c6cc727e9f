//! Serialization of executed tool results back into fence text.

use serde::Serialize;
use serde_json::Value;

use crate::{
    fence::{FENCE_CLOSE, RESULT_FENCE_OPEN},
    types::ToolResult,
};

/// One line of the result fence. Serialized from a struct so the field
/// order is fixed; `id` is omitted entirely when absent, never emitted as
/// null.
#[derive(Serialize)]
struct ResultRecord<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    name: &'a str,
    result: &'a Value,
    error: bool,
}

/// Serializes [`ToolResult`] records into a `` ```tool_result `` fence to
/// append to the conversation before generation resumes.
pub struct ToolResultFormatter;

impl ToolResultFormatter {
    /// Format a batch of results as a single fence, one compact JSON object
    /// per record. An empty batch produces an empty string: no fence is
    /// emitted at all, which is distinct from an empty-but-present fence.
    pub fn format_results(results: &[ToolResult]) -> String {
        if results.is_empty() {
            return String::new();
        }

        let null = Value::Null;
        let lines: Vec<String> = results
            .iter()
            .filter_map(|r| {
                let record = ResultRecord {
                    id: r.tool_call_id.as_deref(),
                    name: &r.tool_name,
                    result: r.result.as_ref().unwrap_or(&null),
                    error: r.is_error,
                };
                match serde_json::to_string(&record) {
                    Ok(line) => Some(line),
                    Err(e) => {
                        tracing::warn!("Failed to serialize tool result: {}", e);
                        None
                    }
                }
            })
            .collect();

        format!(
            "{}\n{}\n{}",
            RESULT_FENCE_OPEN,
            lines.join("\n"),
            FENCE_CLOSE
        )
    }

    /// Single-result convenience: same one-line-fence output for exactly
    /// one record.
    pub fn format_result(result: &ToolResult) -> String {
        Self::format_results(std::slice::from_ref(result))
    }
}
