//! End-to-end reassembly tests.
//!
//! These run raw event streams through the full pipeline (splitting,
//! extraction, decoding, reconciliation) and check the deltas that come out.

mod common;

use bytes::Bytes;
use chatstream::conversation::DEFAULT_ERROR_MARKER;
use chatstream::sse::FrameSplitter;
use chatstream::{pump, Conversation, Reassembler, Step, TransportError, TurnOutcome};
use common::*;

#[test]
fn test_hi_there_snapshot_stream() {
    let (deltas, accumulated) = run_str(HI_THERE_STREAM);
    assert_eq!(deltas, vec!["Hi", " there"]);
    assert_eq!(accumulated, "Hi there");
}

#[test]
fn test_message_content_matches_accumulated_text() {
    let mut conversation = Conversation::new(1);
    conversation.begin_turn("hello");

    let chunk: Result<Bytes, TransportError> = Ok(Bytes::from_static(HI_THERE_STREAM.as_bytes()));
    let source = chatstream::IterSource::new(vec![chunk]);
    let mut deltas = chatstream::Deltas::new(source);
    let outcome = pump(deltas.by_ref(), &mut conversation, DEFAULT_ERROR_MARKER);

    assert_eq!(outcome, TurnOutcome::Completed { appended_bytes: 8 });
    let reply = conversation.trailing_assistant().unwrap();
    assert_eq!(reply.content, "Hi there");
    assert_eq!(reply.content, deltas.accumulated());
    assert!(!reply.is_streaming);
}

#[test]
fn test_every_chunk_boundary_gives_same_result() {
    let input = HI_THERE_STREAM.as_bytes();
    for cut in 0..=input.len() {
        let (deltas, accumulated) = run_chunks(split_at(input, &[cut]));
        assert_eq!(deltas.concat(), "Hi there", "cut at byte {}", cut);
        assert_eq!(accumulated, "Hi there", "cut at byte {}", cut);
    }
}

#[test]
fn test_byte_at_a_time_with_multibyte_text() {
    let input = content_frames(&["héllo ", "wörld ", "日本"]);
    let bytes = input.as_bytes();
    let cuts: Vec<usize> = (1..bytes.len()).collect();
    let (deltas, accumulated) = run_chunks(split_at(bytes, &cuts));
    assert_eq!(deltas, vec!["héllo ", "wörld ", "日本"]);
    assert_eq!(accumulated, "héllo wörld 日本");
}

#[test]
fn test_no_separator_flushes_whole_buffer_once() {
    let mut splitter = FrameSplitter::new();
    splitter.push_str("data: one\ndata: two");
    assert!(splitter.next_frame().is_none());

    let frame = splitter.finish().unwrap();
    assert_eq!(frame.text(), "data: one\ndata: two");
    assert!(splitter.finish().is_none());
    assert!(splitter.next_frame().is_none());
}

#[test]
fn test_unterminated_stream_still_delivers_last_payload() {
    let (deltas, _) = run_str("data: {\"content\":\"tail\"}");
    assert_eq!(deltas, vec!["tail"]);
}

#[test]
fn test_identical_payloads_yield_one_delta() {
    let frame = data_frame("{\"content\":\"ping\"}");
    let (deltas, accumulated) = run_str(&frame.repeat(2));
    assert_eq!(deltas, vec!["ping"]);
    assert_eq!(accumulated, "ping");
}

#[test]
fn test_non_consecutive_repeats_are_kept() {
    let (deltas, accumulated) = run_str(&content_frames(&["x", "y", "x"]));
    assert_eq!(deltas, vec!["x", "y", "x"]);
    assert_eq!(accumulated, "xyx");
}

#[test]
fn test_snapshots_collapse_to_suffixes() {
    let (deltas, accumulated) = run_str(&content_frames(&["A", "AB", "ABC"]));
    assert_eq!(deltas, vec!["A", "B", "C"]);
    assert_eq!(accumulated, "ABC");
}

#[test]
fn test_incremental_deltas_pass_through() {
    let (deltas, accumulated) = run_str(&choice_frames(&["Hel", "lo ", "world"]));
    assert_eq!(deltas, vec!["Hel", "lo ", "world"]);
    assert_eq!(accumulated, "Hello world");
}

#[test]
fn test_sentinel_stops_with_bytes_buffered() {
    let input = format!(
        "{}data: [DONE]\n\n{}",
        content_frames(&["before"]),
        content_frames(&["after", "more"])
    );
    let mut engine = Reassembler::new();
    engine.push_chunk(input.as_bytes());

    assert_eq!(engine.next_step(), Step::Delta("before".to_string()));
    assert_eq!(engine.next_step(), Step::Finished);
    assert_eq!(engine.next_step(), Step::Finished);
    assert_eq!(engine.accumulated(), "before");
}

#[test]
fn test_sentinel_without_space() {
    let input = format!("{}data:[DONE]\n\n{}", content_frames(&["x"]), content_frames(&["y"]));
    let (deltas, _) = run_str(&input);
    assert_eq!(deltas, vec!["x"]);
}

#[test]
fn test_unrecognized_shape_is_silent() {
    let input = data_frame("{\"foo\": 1}") + &content_frames(&["ok"]);
    let (deltas, accumulated) = run_str(&input);
    assert_eq!(deltas, vec!["ok"]);
    assert_eq!(accumulated, "ok");
}

#[test]
fn test_plain_text_payload_keeps_leading_space() {
    let (deltas, _) = run_str("data: hello\n\ndata:world\n\n");
    assert_eq!(deltas, vec![" hello", "world"]);
}

#[test]
fn test_crlf_frames_and_metadata_lines() {
    let input = "event: message\r\nid: 1\r\ndata: {\"delta\":{\"content\":\"one\"}}\r\n\r\n\
                 : keep-alive\r\n\r\n\
                 data: {\"delta\":{\"content\":\"two\"}}\r\n\r\n";
    let (deltas, _) = run_str(input);
    assert_eq!(deltas, vec!["one", "two"]);
}

#[test]
fn test_need_input_until_frame_complete() {
    let mut engine = Reassembler::new();
    assert_eq!(engine.next_step(), Step::NeedInput);

    engine.push_chunk(b"data: {\"content\":\"a\"}\n");
    assert_eq!(engine.next_step(), Step::NeedInput);

    engine.push_chunk(b"\n");
    assert_eq!(engine.next_step(), Step::Delta("a".to_string()));
    assert_eq!(engine.next_step(), Step::NeedInput);

    engine.finish_input();
    assert_eq!(engine.next_step(), Step::Finished);
    assert!(engine.is_finished());
}
