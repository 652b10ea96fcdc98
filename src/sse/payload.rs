//! Payload extraction from frames.
//!
//! Only `data:` lines carry payload. `event:`, `id:`, `retry:` and comment
//! lines are ignored.

use super::splitter::Frame;

/// Literal payload marking the logical end of the stream.
pub const DONE_SENTINEL: &str = "[DONE]";

const DATA_PREFIX: &str = "data:";

/// A payload taken from one `data:` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawPayload {
    /// Line value with the `data:` prefix stripped, never empty
    Data(String),
    /// The termination sentinel
    Done,
}

/// Parse a single frame line, returning the payload of a `data:` line.
pub fn parse_data_line(line: &str) -> Option<RawPayload> {
    let value = line.strip_prefix(DATA_PREFIX)?;
    if value.is_empty() {
        return None;
    }
    if value.trim() == DONE_SENTINEL {
        return Some(RawPayload::Done);
    }
    Some(RawPayload::Data(value.to_string()))
}

/// Extract payloads from a frame in line order.
///
/// Lines end in `\n` or `\r\n`. Nothing after the sentinel is returned,
/// since the stream is finished at that point.
pub fn extract_payloads(frame: &Frame) -> Vec<RawPayload> {
    let mut payloads = Vec::new();
    for line in frame.text().split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        match parse_data_line(line) {
            Some(RawPayload::Done) => {
                payloads.push(RawPayload::Done);
                break;
            }
            Some(payload) => payloads.push(payload),
            None => {}
        }
    }
    payloads
}
