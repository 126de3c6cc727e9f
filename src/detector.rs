//! Incremental fence detection over a streamed model turn.
//!
//! One detector instance is scoped to exactly one in-flight generation
//! turn. It owns a single string buffer and a two-state mode; every
//! operation is synchronous and the ordered concatenation of everything the
//! batch scan emits reconstructs the original stream byte for byte.

use crate::{
    fence::{self, CALL_OPENER, FENCE_CLOSE},
    types::FenceScan,
};

/// Classification mode for the streaming scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectorState {
    /// Outside any fence, watching for an opening marker
    #[default]
    Scanning,
    /// Collecting fence payload until the closing marker arrives
    InFence,
}

/// Separates ordinary prose from fenced payloads in a chunked text stream,
/// tolerant of fence markers split across chunk boundaries.
#[derive(Debug, Default)]
pub struct StreamingFenceDetector {
    buffer: String,
    state: DetectorState,
}

impl StreamingFenceDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk to the buffer. Empty chunks are no-ops; nothing is
    /// classified until a scan is requested.
    pub fn add_chunk(&mut self, chunk: &str) {
        if !chunk.is_empty() {
            self.buffer.push_str(chunk);
        }
    }

    /// Batch scan: locate the first complete opener..closer span in the
    /// current buffer.
    ///
    /// On a hit, `prefix_text` is everything before the opener, `fence` the
    /// full block including delimiters, and `remaining_text` whatever
    /// followed the closer; the consumed span is removed and the remainder
    /// stays buffered for the next scan. On a miss, the longest prefix that
    /// cannot possibly start an opening marker is released as `prefix_text`
    /// and the unresolved tail is retained, so every scan makes forward
    /// progress once enough input arrives.
    pub fn detect_fence(&mut self) -> FenceScan {
        if let Some(open) = CALL_OPENER.find(&self.buffer) {
            let (open_start, open_end) = (open.start(), open.end());
            if let Some(rel) = self.buffer[open_end..].find(FENCE_CLOSE) {
                let close_end = open_end + rel + FENCE_CLOSE.len();
                let prefix_text = self.buffer[..open_start].to_string();
                let fence = self.buffer[open_start..close_end].to_string();
                let remaining_text = self.buffer[close_end..].to_string();
                self.buffer = remaining_text.clone();
                return FenceScan {
                    prefix_text,
                    fence: Some(fence),
                    remaining_text,
                };
            }
            // Complete opener, closer still in flight: release the prose
            // before it and hold the fence-in-progress.
            let prefix_text: String = self.buffer.drain(..open_start).collect();
            return FenceScan {
                prefix_text,
                ..Default::default()
            };
        }

        // No opener. Retain only a tail that could still grow into one;
        // the retained length is bounded by the marker length minus one.
        let keep = fence::partial_marker_len(&self.buffer);
        let cut = self.buffer.len() - keep;
        let prefix_text: String = self.buffer.drain(..cut).collect();
        FenceScan {
            prefix_text,
            ..Default::default()
        }
    }

    /// Incremental scan: drive the two-state machine over the buffer.
    ///
    /// In `Scanning`, a complete opening marker transitions to `InFence`
    /// and the buffer is trimmed to the marker onward (the streaming
    /// consumer has already rendered the preceding raw chunks). In
    /// `InFence`, a closing marker yields the complete fence, delimiters
    /// included, and reverts to `Scanning`. Otherwise `None`: keep feeding.
    pub fn detect_streaming_fence(&mut self) -> Option<String> {
        if self.state == DetectorState::Scanning {
            let open_start = CALL_OPENER.find(&self.buffer)?.start();
            if open_start > 0 {
                self.buffer.drain(..open_start);
            }
            self.state = DetectorState::InFence;
        }

        // Buffer begins with the opening marker while in-fence.
        let open_end = CALL_OPENER.find(&self.buffer)?.end();
        let rel = self.buffer[open_end..].find(FENCE_CLOSE)?;
        let close_end = open_end + rel + FENCE_CLOSE.len();
        let fence: String = self.buffer.drain(..close_end).collect();
        self.state = DetectorState::Scanning;
        Some(fence)
    }

    /// Current classification mode.
    pub fn state(&self) -> DetectorState {
        self.state
    }

    pub fn has_content(&self) -> bool {
        !self.buffer.is_empty()
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer.len()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Drop all buffered text, e.g. when a turn aborts.
    pub fn clear_buffer(&mut self) {
        self.buffer.clear();
    }

    /// Return to `Scanning` without touching the buffer, e.g. when a turn
    /// restarts.
    pub fn reset_streaming_state(&mut self) {
        self.state = DetectorState::Scanning;
    }

    /// Drain whatever is buffered as trailing prose and revert to
    /// `Scanning`. A stream that ends mid-fence is not an error; its
    /// partial payload is ordinary text.
    pub fn flush(&mut self) -> String {
        self.state = DetectorState::Scanning;
        std::mem::take(&mut self.buffer)
    }
}
