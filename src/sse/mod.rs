//! Streaming chat reassembly over Server-Sent Events.
//!
//! Raw bytes flow through four stages:
//! - `splitter` - cuts the byte stream into frames at blank lines
//! - `payload` - pulls `data:` values out of a frame, spotting `[DONE]`
//! - `content` - decodes a payload into text across known backend shapes
//! - `reconcile` - turns snapshots, deltas and retransmissions into
//!   append-only deltas
//!
//! `reassembler` drives all four as a single pull-based state machine.

mod content;
mod payload;
mod reassembler;
mod reconcile;
mod splitter;

pub use content::PayloadShape;
pub use payload::{extract_payloads, parse_data_line, RawPayload, DONE_SENTINEL};
pub use reassembler::{Reassembler, Step};
pub use reconcile::{DeltaReconciler, Reconciliation};
pub use splitter::{Frame, FrameSplitter};
