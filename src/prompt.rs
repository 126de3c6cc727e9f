//! Construction of the model-facing tool instructions.

use std::fmt::Write as _;

use crate::{
    fence::{CALL_FENCE_OPEN, FENCE_CLOSE, RESULT_FENCE_OPEN},
    types::ToolDefinition,
};

const DEFAULT_DESCRIPTION: &str = "No description provided.";

/// Options controlling the emitted calling convention.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptOptions {
    /// Permit multiple independent calls in one array per fence
    pub allow_parallel_tool_calls: bool,
}

/// Turns tool declarations into the instructional system prompt naming the
/// exact fence grammar the model must use.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPromptBuilder {
    options: PromptOptions,
}

impl SystemPromptBuilder {
    pub fn new(options: PromptOptions) -> Self {
        Self { options }
    }

    /// Build the augmented system prompt.
    ///
    /// With no tools there is nothing to instruct: the prior prompt is
    /// returned unchanged (whitespace-only input is treated as absent and
    /// collapses to an empty string). Otherwise the trimmed prior prompt,
    /// when non-blank, is prepended ahead of the instruction body.
    pub fn build(&self, prior_prompt: Option<&str>, tools: &[ToolDefinition]) -> String {
        let prior = prior_prompt.filter(|p| !p.trim().is_empty());

        if tools.is_empty() {
            return prior.unwrap_or("").to_string();
        }

        let body = self.instruction_body(tools);
        match prior {
            Some(prior) => format!("{}\n\n{}", prior.trim(), body),
            None => body,
        }
    }

    fn instruction_body(&self, tools: &[ToolDefinition]) -> String {
        let mut out = String::new();

        out.push_str(
            "You are a helpful assistant with access to external tools. \
             When a request requires information or actions you cannot produce \
             yourself, call the appropriate tool instead of guessing.\n\n",
        );

        out.push_str("# Available Tools\n");
        for tool in tools {
            let description = tool.description.as_deref().unwrap_or(DEFAULT_DESCRIPTION);
            let _ = write!(out, "\n## {}\n{}\n", tool.name, description);
            if let Some(schema) = &tool.input_schema {
                let schema = serde_json::to_string(schema).unwrap_or_else(|_| "{}".to_string());
                let _ = writeln!(out, "Input schema: {}", schema);
            }
        }

        let _ = write!(
            out,
            "\n# Calling Tools\n\n\
             To call a tool, emit a block that starts with the exact marker \
             {open} on its own line, contains the call as JSON, and ends with \
             a {close} line:\n\n\
             {open}\n\
             {{\"name\": \"tool_name\", \"arguments\": {{\"key\": \"value\"}}}}\n\
             {close}\n\n",
            open = CALL_FENCE_OPEN,
            close = FENCE_CLOSE,
        );

        if self.options.allow_parallel_tool_calls {
            let _ = write!(
                out,
                "You may call several independent tools at once by emitting a \
                 JSON array of calls in a single block:\n\n\
                 {open}\n\
                 [{{\"name\": \"first_tool\", \"arguments\": {{}}}}, \
                 {{\"name\": \"second_tool\", \"arguments\": {{}}}}]\n\
                 {close}\n\n",
                open = CALL_FENCE_OPEN,
                close = FENCE_CLOSE,
            );
        } else {
            out.push_str(
                "Call at most one tool at a time. After emitting a call, stop \
                 and wait for its result before continuing.\n\n",
            );
        }

        let _ = write!(
            out,
            "# Tool Results\n\n\
             After execution, results are appended in a {open} block with one \
             JSON object per line. Each object has the fields `id` (the call \
             id, when the call carried one), `name` (the tool that ran), \
             `result` (its output), and `error` (a boolean: true means \
             `result` describes a failure). Use the result to continue your \
             answer.",
            open = RESULT_FENCE_OPEN,
        );

        out
    }
}
