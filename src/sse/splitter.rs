//! Frame splitting over a raw byte stream.
//!
//! A frame is the text between two blank-line separators, written either
//! as `\n\n` or `\r\n\r\n`. Input arrives in arbitrary chunks, so the
//! splitter keeps a buffer of not-yet-framed text and hands out frames as
//! soon as their terminating separator has arrived.
//!
//! Bytes are decoded as UTF-8 incrementally: a multi-byte character split
//! across two reads is held back until its remaining bytes arrive.

use tracing::warn;

const LF_SEPARATOR: &[u8] = b"\n\n";
const CRLF_SEPARATOR: &[u8] = b"\r\n\r\n";

/// Bytes at the end of the buffer that may hold the start of an incomplete
/// separator.
const SEPARATOR_OVERLAP: usize = CRLF_SEPARATOR.len() - 1;

/// One event block, without its terminating separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame(String);

impl Frame {
    /// Wrap already-delimited text as a frame.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The frame text.
    pub fn text(&self) -> &str {
        &self.0
    }
}

/// Stateful splitter owning the raw input buffer.
///
/// Consumed frames are not removed from `buffer` one by one; `start` marks
/// where unconsumed text begins and the prefix is dropped once it outgrows
/// the rest. No separator starts in `buffer[start..scan_from]`, so each
/// byte is searched a bounded number of times.
#[derive(Debug, Default)]
pub struct FrameSplitter {
    /// Decoded text; `buffer[start..]` is not yet split into frames
    buffer: String,
    start: usize,
    /// Where the next separator search resumes
    scan_from: usize,
    /// Leading bytes of a UTF-8 sequence whose tail has not arrived yet
    pending_bytes: Vec<u8>,
    /// Set once the end-of-stream flush has happened
    flushed: bool,
    #[cfg(test)]
    scanned: usize,
}

impl FrameSplitter {
    /// Create an empty splitter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block of raw bytes to the buffer.
    pub fn push_bytes(&mut self, chunk: &[u8]) {
        if self.pending_bytes.is_empty() {
            self.decode_into_buffer(chunk);
        } else {
            let mut joined = std::mem::take(&mut self.pending_bytes);
            joined.extend_from_slice(chunk);
            self.decode_into_buffer(&joined);
        }
    }

    /// Append already-decoded text to the buffer.
    pub fn push_str(&mut self, text: &str) {
        self.push_bytes(text.as_bytes());
    }

    /// Extract the earliest complete frame, if the buffer holds one.
    pub fn next_frame(&mut self) -> Option<Frame> {
        let bytes = self.buffer.as_bytes();
        let found = find_separator(bytes, self.scan_from);

        #[cfg(test)]
        {
            let end = found.map_or(bytes.len(), |(index, len)| index + len);
            self.scanned += end.saturating_sub(self.scan_from);
        }

        let Some((index, separator_len)) = found else {
            self.scan_from = bytes
                .len()
                .saturating_sub(SEPARATOR_OVERLAP)
                .max(self.start);
            return None;
        };

        let frame = self.buffer[self.start..index].to_string();
        self.start = index + separator_len;
        self.scan_from = self.start;
        self.compact();
        Some(Frame(frame))
    }

    /// Flush the separator-less residue once the source has ended.
    ///
    /// Callers drain [`next_frame`](Self::next_frame) first. Only the first
    /// call can return a frame; a whitespace-only residue yields nothing.
    pub fn finish(&mut self) -> Option<Frame> {
        if self.flushed {
            return None;
        }
        self.flushed = true;

        if !self.pending_bytes.is_empty() {
            warn!(
                bytes = self.pending_bytes.len(),
                "Stream ended inside a UTF-8 sequence"
            );
            self.pending_bytes.clear();
            self.buffer.push(char::REPLACEMENT_CHARACTER);
        }

        let mut residue = std::mem::take(&mut self.buffer);
        residue.drain(..self.start);
        self.start = 0;
        self.scan_from = 0;
        if residue.trim().is_empty() {
            None
        } else {
            Some(Frame(residue))
        }
    }

    /// Number of decoded bytes waiting for a separator.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len() - self.start
    }

    /// Whether the end-of-stream flush already happened.
    pub fn is_flushed(&self) -> bool {
        self.flushed
    }

    /// Drop the consumed prefix once it is at least as long as the rest.
    fn compact(&mut self) {
        if self.start < self.buffer.len() - self.start {
            return;
        }
        self.buffer.drain(..self.start);
        self.scan_from -= self.start;
        self.start = 0;
    }

    fn decode_into_buffer(&mut self, bytes: &[u8]) {
        let mut rest = bytes;
        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    self.buffer.push_str(text);
                    return;
                }
                Err(err) => {
                    let (valid, tail) = rest.split_at(err.valid_up_to());
                    self.buffer.push_str(&String::from_utf8_lossy(valid));
                    match err.error_len() {
                        Some(invalid_len) => {
                            warn!(invalid_len, "Replacing invalid UTF-8 in stream");
                            self.buffer.push(char::REPLACEMENT_CHARACTER);
                            rest = &tail[invalid_len..];
                        }
                        None => {
                            // Incomplete sequence at the end of this chunk
                            self.pending_bytes = tail.to_vec();
                            return;
                        }
                    }
                }
            }
        }
    }
}

/// Locate the earliest separator at or after `from` as `(index, length)`.
///
/// Both separators are matched in one pass. They begin with different
/// bytes, so the first match is the earliest one.
fn find_separator(bytes: &[u8], from: usize) -> Option<(usize, usize)> {
    let tail = bytes.get(from..)?;
    tail.iter().enumerate().find_map(|(offset, &byte)| {
        let rest = &tail[offset..];
        let separator = match byte {
            b'\n' if rest.starts_with(LF_SEPARATOR) => LF_SEPARATOR,
            b'\r' if rest.starts_with(CRLF_SEPARATOR) => CRLF_SEPARATOR,
            _ => return None,
        };
        Some((from + offset, separator.len()))
    })
}
