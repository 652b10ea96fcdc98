//! Pull-driven reassembly engine.
//!
//! Combines the splitter, payload extraction, content decoding and delta
//! reconciliation into one state machine. The engine never performs IO:
//! callers push raw chunks in and pull [`Step`]s out, feeding more input
//! only when asked for it with [`Step::NeedInput`].

use std::collections::VecDeque;

use tracing::{debug, trace};

use super::content::PayloadShape;
use super::payload::{extract_payloads, RawPayload};
use super::reconcile::{DeltaReconciler, Reconciliation};
use super::splitter::{Frame, FrameSplitter};

/// Result of one pull on the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Non-empty text to append to the message
    Delta(String),
    /// No complete frame is buffered; push more input or finish it
    NeedInput,
    /// Sentinel seen or input exhausted; no more deltas will follow
    Finished,
}

/// State of one streaming call.
#[derive(Debug, Default)]
pub struct Reassembler {
    splitter: FrameSplitter,
    /// Payloads of the current frame not yet reconciled
    pending: VecDeque<RawPayload>,
    reconciler: DeltaReconciler,
    input_closed: bool,
    finished: bool,
    frames_seen: usize,
}

impl Reassembler {
    /// Create an engine for a new call.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw input. Ignored once the engine has finished.
    pub fn push_chunk(&mut self, chunk: &[u8]) {
        if self.finished || self.input_closed {
            return;
        }
        self.splitter.push_bytes(chunk);
    }

    /// Signal that the source has ended; the buffered residue gets flushed.
    pub fn finish_input(&mut self) {
        self.input_closed = true;
    }

    /// Stop immediately, dropping any buffered input.
    pub fn abort(&mut self) {
        self.input_closed = true;
        self.finish();
    }

    /// Whether the sequence has terminated.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Text accumulated so far in this call.
    pub fn accumulated(&self) -> &str {
        self.reconciler.accumulated()
    }

    /// Number of frames extracted so far, including the final flush.
    pub fn frames_seen(&self) -> usize {
        self.frames_seen
    }

    /// Advance until a delta is ready, more input is needed, or the
    /// sequence ends.
    pub fn next_step(&mut self) -> Step {
        loop {
            if self.finished {
                return Step::Finished;
            }

            if let Some(payload) = self.pending.pop_front() {
                match payload {
                    RawPayload::Done => {
                        debug!(
                            frames = self.frames_seen,
                            buffered = self.splitter.buffered_len(),
                            "Stream sentinel received"
                        );
                        self.finish();
                        return Step::Finished;
                    }
                    RawPayload::Data(raw) => {
                        if let Some(delta) = self.apply(&raw) {
                            return Step::Delta(delta);
                        }
                    }
                }
                continue;
            }

            if let Some(frame) = self.splitter.next_frame() {
                self.enqueue(frame);
                continue;
            }

            if !self.input_closed {
                return Step::NeedInput;
            }

            match self.splitter.finish() {
                Some(frame) => {
                    trace!(len = frame.text().len(), "Flushing unterminated final frame");
                    self.enqueue(frame);
                }
                None => {
                    debug!(frames = self.frames_seen, "Stream input exhausted");
                    self.finish();
                    return Step::Finished;
                }
            }
        }
    }

    fn enqueue(&mut self, frame: Frame) {
        self.frames_seen += 1;
        let payloads = extract_payloads(&frame);
        trace!(
            frame = self.frames_seen,
            payloads = payloads.len(),
            "Frame extracted"
        );
        self.pending.extend(payloads);
    }

    fn apply(&mut self, raw: &str) -> Option<String> {
        if self.reconciler.is_duplicate(raw) {
            debug!("Dropping retransmitted payload");
            return None;
        }

        let shape = PayloadShape::decode(raw);
        if shape == PayloadShape::Unrecognized {
            debug!(payload = raw, "No content in payload");
        }

        let outcome = self.reconciler.reconcile(raw, shape.text());
        let label = match &outcome {
            Reconciliation::Snapshot { .. } => "snapshot",
            Reconciliation::Incremental { .. } => "incremental",
            Reconciliation::Duplicate => "duplicate",
        };
        trace!(kind = shape.kind(), reconciled = label, "Fragment reconciled");
        outcome.into_delta()
    }

    fn finish(&mut self) {
        self.finished = true;
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(engine: &mut Reassembler) -> Vec<String> {
        let mut deltas = Vec::new();
        while let Step::Delta(d) = engine.next_step() {
            deltas.push(d);
        }
        deltas
    }

    #[test]
    fn test_needs_input_when_empty() {
        let mut engine = Reassembler::new();
        assert_eq!(engine.next_step(), Step::NeedInput);
    }

    #[test]
    fn test_end_to_end_snapshot_stream() {
        let mut engine = Reassembler::new();
        engine.push_chunk(
            b"data: {\"content\":\"Hi\"}\n\ndata: {\"content\":\"Hi there\"}\n\ndata: [DONE]\n\n",
        );
        assert_eq!(engine.next_step(), Step::Delta("Hi".to_string()));
        assert_eq!(engine.next_step(), Step::Delta(" there".to_string()));
        assert_eq!(engine.next_step(), Step::Finished);
        assert_eq!(engine.accumulated(), "Hi there");
    }

    #[test]
    fn test_sentinel_ignores_trailing_input() {
        let mut engine = Reassembler::new();
        engine.push_chunk(b"data: a\n\ndata: [DONE]\n\ndata: b\n\ndata: c");
        assert_eq!(drain(&mut engine), vec![" a"]);
        assert!(engine.is_finished());

        engine.push_chunk(b"\n\ndata: d\n\n");
        assert_eq!(engine.next_step(), Step::Finished);
    }

    #[test]
    fn test_waits_for_more_input_between_frames() {
        let mut engine = Reassembler::new();
        engine.push_chunk(b"data: {\"content\":\"He");
        assert_eq!(engine.next_step(), Step::NeedInput);
        engine.push_chunk(b"llo\"}\n");
        assert_eq!(engine.next_step(), Step::NeedInput);
        engine.push_chunk(b"\n");
        assert_eq!(engine.next_step(), Step::Delta("Hello".to_string()));
        assert_eq!(engine.next_step(), Step::NeedInput);
    }

    #[test]
    fn test_unterminated_last_frame_is_flushed() {
        let mut engine = Reassembler::new();
        engine.push_chunk(b"data: {\"content\":\"x\"}\n\ndata: {\"content\":\"y\"}");
        assert_eq!(engine.next_step(), Step::Delta("x".to_string()));
        assert_eq!(engine.next_step(), Step::NeedInput);

        engine.finish_input();
        assert_eq!(engine.next_step(), Step::Delta("y".to_string()));
        assert_eq!(engine.next_step(), Step::Finished);
        assert_eq!(engine.frames_seen(), 2);
    }

    #[test]
    fn test_duplicate_payload_dropped() {
        let mut engine = Reassembler::new();
        engine.push_chunk(b"data: tick\n\ndata: tick\n\ndata: tock\n\n");
        engine.finish_input();
        assert_eq!(drain(&mut engine), vec![" tick", " tock"]);
    }

    #[test]
    fn test_repeated_snapshot_yields_no_empty_delta() {
        let mut engine = Reassembler::new();
        engine.push_chunk(b"data: {\"content\":\"ab\"}\n\ndata: \"ab\"\n\ndata: {\"content\":\"abc\"}\n\n");
        engine.finish_input();
        assert_eq!(drain(&mut engine), vec!["ab", "c"]);
        assert_eq!(engine.accumulated(), "abc");
    }

    #[test]
    fn test_unrecognized_payload_is_skipped() {
        let mut engine = Reassembler::new();
        engine.push_chunk(b"data: {\"foo\": 1}\n\ndata: {\"content\":\"ok\"}\n\n");
        engine.finish_input();
        assert_eq!(drain(&mut engine), vec!["ok"]);
        assert!(engine.is_finished());
    }

    #[test]
    fn test_multiple_payloads_in_one_frame() {
        let mut engine = Reassembler::new();
        engine.push_chunk(b"data: {\"delta\":{\"content\":\"a\"}}\ndata: {\"delta\":{\"content\":\"b\"}}\n\n");
        engine.finish_input();
        assert_eq!(drain(&mut engine), vec!["a", "b"]);
    }

    #[test]
    fn test_abort_stops_immediately() {
        let mut engine = Reassembler::new();
        engine.push_chunk(b"data: a\n\n");
        engine.abort();
        assert_eq!(engine.next_step(), Step::Finished);
        assert_eq!(engine.accumulated(), "");
    }
}
