//! Text-embedded tool calling for backends that cannot emit structured
//! function calls natively.
//!
//! The model is instructed (via an augmented system prompt) to emit calls
//! inside a delimited fence block. This crate builds that prompt, recovers
//! fences from an incrementally delivered token stream, parses completed
//! fence bodies into structured calls, and serializes tool results back
//! into the same textual convention.

pub mod detector;
pub mod errors;
pub mod fence;
pub mod formatter;
pub mod parser;
pub mod prompt;
pub mod types;

pub use detector::{DetectorState, StreamingFenceDetector};
pub use errors::{ParserError, ParserResult};
pub use formatter::ToolResultFormatter;
pub use parser::{CallGrammar, ToolCallParser};
pub use prompt::{PromptOptions, SystemPromptBuilder};
pub use types::{FenceScan, ParsedResponse, ParsedToolCall, ToolDefinition, ToolResult};
