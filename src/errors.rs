use thiserror::Error;

/// Result type for fence parsing operations
pub type ParserResult<T> = Result<T, ParserError>;

/// Errors that can occur while parsing fence contents.
///
/// The public parse surface never propagates these for malformed model
/// output; they are used by internal fallible helpers, and a failing
/// candidate is dropped rather than failing its siblings.
#[derive(Debug, Error)]
pub enum ParserError {
    #[error("Parsing failed: {0}")]
    ParsingFailed(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}
