//! Wire grammar for tool fences.
//!
//! A fence is a code-fence-style block with a semantic tag, embedded in
//! otherwise free-form model text. Calls arrive in `` ```tool_call ``
//! blocks; executed results are re-injected in `` ```tool_result `` blocks.
//! The tag is matched case-insensitively and accepts an underscore or
//! hyphen separator.

use once_cell::sync::Lazy;
use regex::Regex;

/// Canonical opening marker for a call fence (the exact token named in the
/// system prompt).
pub const CALL_FENCE_OPEN: &str = "```tool_call";

/// Canonical opening marker for a result fence.
pub const RESULT_FENCE_OPEN: &str = "```tool_result";

/// Closing marker shared by both fence kinds.
pub const FENCE_CLOSE: &str = "```";

/// Length of the opening marker; the detector's retained tail is bounded by
/// this minus one when no complete opener is buffered.
pub const OPEN_MARKER_LEN: usize = CALL_FENCE_OPEN.len();

/// Matches a call fence opening marker (case-insensitive, `_` or `-`).
pub static CALL_OPENER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)```tool[_-]call").expect("Valid opener pattern"));

/// Matches one complete call fence, delimiters included, body captured.
pub static CALL_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)```tool[_-]call(.*?)```").expect("Valid fence pattern"));

/// Matches one complete fence of either kind. Used by the extraction helper
/// so formatted result blocks can be re-extracted the same way call blocks
/// are located.
pub static ANY_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)```tool[_-](?:call|result)(.*?)```").expect("Valid fence pattern")
});

/// Find the first complete fence span (either kind) in `text`, delimiters
/// included.
pub fn first_fence(text: &str) -> Option<&str> {
    ANY_FENCE.find(text).map(|m| m.as_str())
}

/// Inner text of a fence span: delimiters stripped, surrounding whitespace
/// trimmed.
pub fn fence_body(span: &str) -> &str {
    ANY_FENCE
        .captures(span)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or("")
}

/// Length of the longest buffer suffix that is a proper prefix of an
/// opening marker (either separator variant, case-insensitive).
///
/// This is what the detector must retain when no complete opener is in the
/// buffer: anything shorter cannot possibly grow into a marker, so it is
/// safe to emit as prose.
pub fn partial_marker_len(buffer: &str) -> usize {
    const VARIANTS: [&str; 2] = ["```tool_call", "```tool-call"];

    let max = OPEN_MARKER_LEN.min(buffer.len() + 1).saturating_sub(1);
    for k in (1..=max).rev() {
        // Marker is pure ASCII, so a byte-slice suffix of that length is
        // only a char boundary when the bytes themselves match.
        let Some(tail) = buffer.as_bytes().get(buffer.len() - k..) else {
            continue;
        };
        for variant in VARIANTS {
            if tail.eq_ignore_ascii_case(&variant.as_bytes()[..k]) {
                return k;
            }
        }
    }
    0
}
