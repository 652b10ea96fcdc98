//! Common test utilities for integration tests.
//!
//! Builders for raw event streams and helpers that run them through the
//! reassembler.

#![allow(dead_code)]

use bytes::Bytes;
use chatstream::error::TransportError;
use chatstream::{Deltas, IterSource};

/// The stream used throughout the docs: a snapshot backend answering "Hi there".
pub const HI_THERE_STREAM: &str =
    "data: {\"content\":\"Hi\"}\n\ndata: {\"content\":\"Hi there\"}\n\ndata: [DONE]\n\n";

/// One frame carrying `payload` on a single `data:` line.
pub fn data_frame(payload: &str) -> String {
    format!("data: {}\n\n", payload)
}

/// `{"content": text}` frames, one per item.
pub fn content_frames(texts: &[&str]) -> String {
    texts
        .iter()
        .map(|t| data_frame(&serde_json::json!({ "content": t }).to_string()))
        .collect()
}

/// OpenAI-style `choices[0].delta.content` frames, one per item.
pub fn choice_frames(texts: &[&str]) -> String {
    texts
        .iter()
        .map(|t| {
            data_frame(
                &serde_json::json!({ "choices": [{ "delta": { "content": t } }] }).to_string(),
            )
        })
        .collect()
}

/// Cut `input` into chunks at the given byte offsets.
pub fn split_at(input: &[u8], cuts: &[usize]) -> Vec<Bytes> {
    let mut chunks = Vec::new();
    let mut start = 0;
    for &cut in cuts {
        chunks.push(Bytes::copy_from_slice(&input[start..cut]));
        start = cut;
    }
    chunks.push(Bytes::copy_from_slice(&input[start..]));
    chunks
}

/// Run chunks through the blocking front end, returning the deltas and the
/// final accumulated text.
pub fn run_chunks(chunks: Vec<Bytes>) -> (Vec<String>, String) {
    let source = IterSource::new(chunks.into_iter().map(Ok::<_, TransportError>));
    let mut deltas = Deltas::new(source);
    let mut out = Vec::new();
    for item in deltas.by_ref() {
        out.push(item.expect("no transport error expected"));
    }
    (out, deltas.accumulated().to_string())
}

/// Run a whole input as one chunk.
pub fn run_str(input: &str) -> (Vec<String>, String) {
    run_chunks(vec![Bytes::copy_from_slice(input.as_bytes())])
}
