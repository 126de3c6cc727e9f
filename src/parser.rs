//! Parsing of completed fence bodies into structured tool calls.
//!
//! A single parser type handles every tolerated input grammar; the
//! provider-variant extras are switched on by an explicit [`CallGrammar`]
//! value rather than a parallel implementation.

use std::time::{SystemTime, UNIX_EPOCH};

use once_cell::sync::Lazy;
use rand::{distr::Alphanumeric, Rng};
use regex::Regex;
use serde_json::Value;

use crate::{
    errors::{ParserError, ParserResult},
    fence::{self, CALL_FENCE},
    types::{ParsedResponse, ParsedToolCall},
};

static BLANK_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("Valid blank-line pattern"));

/// Grammar set accepted when parsing a fence body.
///
/// Which set is authoritative for a backend is an explicit configuration
/// decision made by the caller, not inferred from anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallGrammar {
    /// Whole-body JSON (object or array) with a per-line JSON fallback
    #[default]
    Json,
    /// `Json` plus tag-wrapped payloads and the compact
    /// `[func_name(key="value")]` call literal
    Extended,
}

/// Turns the inner text of completed fences into zero or more structured
/// calls.
///
/// Degrades per candidate: an unparseable line or object is dropped without
/// discarding its siblings, and no input ever produces an error. A garbage
/// fence simply yields zero calls.
pub struct ToolCallParser {
    grammar: CallGrammar,
    /// Extended grammar: explicit call tag wrapping a JSON payload
    tag_pattern: Regex,
    /// Extended grammar: compact `[name(key=value, ...)]` literal
    literal_pattern: Regex,
}

impl ToolCallParser {
    pub fn new(grammar: CallGrammar) -> Self {
        let tag_pattern =
            Regex::new(r"(?is)<tool_call>\s*(.*?)\s*</tool_call>").expect("Valid tag pattern");
        let literal_pattern = Regex::new(r"(?s)^\[\s*([A-Za-z_][A-Za-z0-9_.-]*)\s*\((.*)\)\s*\]$")
            .expect("Valid literal pattern");

        Self {
            grammar,
            tag_pattern,
            literal_pattern,
        }
    }

    /// Parse one full model turn: every complete call fence contributes its
    /// accepted candidates, and `text_content` is the turn with all fence
    /// spans removed, blank-line runs collapsed, and the result trimmed.
    pub fn parse_response(&self, text: &str) -> ParsedResponse {
        let mut tool_calls = Vec::new();
        let mut text_content = String::with_capacity(text.len());
        let mut cursor = 0;

        for m in CALL_FENCE.find_iter(text) {
            text_content.push_str(&text[cursor..m.start()]);
            cursor = m.end();
            tool_calls.extend(self.parse_fence_body(fence::fence_body(m.as_str())));
        }
        text_content.push_str(&text[cursor..]);

        let text_content = BLANK_RUNS
            .replace_all(&text_content, "\n\n")
            .trim()
            .to_string();

        ParsedResponse {
            tool_calls,
            text_content,
        }
    }

    /// Parse the inner text of one completed fence under the ordered
    /// fallback: whole-body JSON first, then per-line JSON, then (extended
    /// grammar only) tag-wrapped payloads and the call literal. The first
    /// rule that yields candidates wins for the whole fence.
    pub fn parse_fence_body(&self, body: &str) -> Vec<ParsedToolCall> {
        let body = body.trim();
        if body.is_empty() {
            return Vec::new();
        }

        if let Ok(value) = serde_json::from_str::<Value>(body) {
            return self.calls_from_value(&value);
        }

        let line_calls = self.parse_json_lines(body);
        if !line_calls.is_empty() {
            return line_calls;
        }

        if self.grammar == CallGrammar::Extended {
            let tagged = self.parse_tagged(body);
            if !tagged.is_empty() {
                return tagged;
            }
            match self.parse_call_literal(body) {
                Ok(Some(call)) => return vec![call],
                Ok(None) => {}
                Err(e) => tracing::debug!("Call literal rejected: {}", e),
            }
        }

        tracing::warn!("Fence body yielded no tool calls");
        Vec::new()
    }

    /// Presence-only view of the fence matching logic: does `text` contain
    /// at least one complete call fence?
    pub fn has_tool_call_fence(&self, text: &str) -> bool {
        CALL_FENCE.is_match(text)
    }

    /// Extent-only view: the first complete fence span in `text`,
    /// delimiters included, without parsing any calls. Matches result
    /// fences as well, so formatted output can be re-extracted.
    pub fn extract_fence<'a>(&self, text: &'a str) -> Option<&'a str> {
        fence::first_fence(text)
    }

    /// Candidates from a whole-body JSON value: each array element, or the
    /// object itself.
    fn calls_from_value(&self, value: &Value) -> Vec<ParsedToolCall> {
        match value {
            Value::Array(items) => items
                .iter()
                .filter_map(|item| self.call_from_object(item))
                .collect(),
            Value::Object(_) => self.call_from_object(value).into_iter().collect(),
            _ => Vec::new(),
        }
    }

    /// Newline-separated JSON objects; lines that fail to parse are skipped,
    /// not fatal to the block.
    fn parse_json_lines(&self, body: &str) -> Vec<ParsedToolCall> {
        body.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| match serde_json::from_str::<Value>(line) {
                Ok(value) => self.call_from_object(&value),
                Err(e) => {
                    tracing::debug!("Skipping unparseable fence line: {}", e);
                    None
                }
            })
            .collect()
    }

    /// Extended grammar: payloads wrapped in an explicit call tag, each
    /// parsed as whole-body JSON.
    fn parse_tagged(&self, body: &str) -> Vec<ParsedToolCall> {
        self.tag_pattern
            .captures_iter(body)
            .filter_map(|cap| cap.get(1))
            .flat_map(|inner| match serde_json::from_str::<Value>(inner.as_str()) {
                Ok(value) => self.calls_from_value(&value),
                Err(e) => {
                    tracing::debug!("Skipping unparseable tagged payload: {}", e);
                    Vec::new()
                }
            })
            .collect()
    }

    /// Extended grammar: `[func_name(key="value", key2=value2)]`, parsed by
    /// splitting on top-level commas. One matching pair of surrounding
    /// quotes is stripped from each value; unquoted values fall back to
    /// JSON, then to the raw string.
    fn parse_call_literal(&self, body: &str) -> ParserResult<Option<ParsedToolCall>> {
        let Some(cap) = self.literal_pattern.captures(body) else {
            return Ok(None);
        };
        let name = cap
            .get(1)
            .ok_or_else(|| ParserError::ParsingFailed("Missing function name".to_string()))?
            .as_str();
        let arg_text = cap.get(2).map(|m| m.as_str()).unwrap_or("");

        let mut args = serde_json::Map::new();
        for part in split_top_level(arg_text) {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let Some((key, raw)) = part.split_once('=') else {
                tracing::debug!("Skipping malformed literal argument: {}", part);
                continue;
            };
            args.insert(key.trim().to_string(), literal_value(raw.trim()));
        }

        Ok(Some(ParsedToolCall {
            tool_call_id: generate_call_id(),
            tool_name: name.to_string(),
            args: Value::Object(args),
        }))
    }

    /// Resolve one object-shaped candidate into a call. A candidate missing
    /// a name is dropped silently; a missing id gets a generated one.
    fn call_from_object(&self, obj: &Value) -> Option<ParsedToolCall> {
        let Some(name) = obj.get("name").and_then(|v| v.as_str()) else {
            if obj.is_object() {
                tracing::warn!("Dropping call candidate without a tool name");
            }
            return None;
        };

        // Either field name is accepted for the arguments payload.
        let args = match obj.get("arguments").or_else(|| obj.get("parameters")) {
            Some(Value::String(s)) => {
                // Double-encoded arguments: parse the inner JSON, keep the
                // raw string when it is not JSON at all.
                serde_json::from_str::<Value>(s).unwrap_or_else(|_| Value::String(s.clone()))
            }
            Some(value) => value.clone(),
            None => Value::Object(serde_json::Map::new()),
        };

        let tool_call_id = obj
            .get("id")
            .and_then(|v| v.as_str())
            .map(String::from)
            .unwrap_or_else(generate_call_id);

        Some(ParsedToolCall {
            tool_call_id,
            tool_name: name.to_string(),
            args,
        })
    }
}

impl Default for ToolCallParser {
    fn default() -> Self {
        Self::new(CallGrammar::default())
    }
}

/// Generate a call id of the shape `call_<millis>_<random-suffix>`.
pub fn generate_call_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();
    format!("call_{}_{}", millis, suffix)
}

/// Split on commas that sit outside quotes and outside any bracket nesting.
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape = false;
    let mut start = 0;

    for (i, ch) in text.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < text.len() {
        parts.push(&text[start..]);
    }
    parts
}

/// Value of one literal argument: strip one matching pair of surrounding
/// quotes, otherwise try JSON, otherwise keep the raw string.
fn literal_value(raw: &str) -> Value {
    for quote in ['"', '\''] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            return Value::String(raw[1..raw.len() - 1].to_string());
        }
    }
    serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
