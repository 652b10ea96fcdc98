//! Replay command: reassemble a recorded event stream.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use tracing::info;

use super::sink::PrintSink;
use crate::config::ChatConfig;
use crate::conversation::{pump, MessageSink, TurnOutcome};
use crate::stream::{Deltas, ReaderSource};

/// Feed everything `reader` yields through the reassembler into `sink`.
pub fn replay<R, K>(reader: R, config: &ChatConfig, sink: &mut K) -> TurnOutcome
where
    R: Read,
    K: MessageSink + ?Sized,
{
    let source = ReaderSource::with_chunk_size(reader, config.read_chunk_size);
    pump(Deltas::new(source), sink, &config.error_marker)
}

/// Replay `path` (or stdin) and write the reassembled text to `out`.
pub fn replay_to<W: Write>(path: Option<&Path>, config: &ChatConfig, out: W) -> Result<W> {
    let mut sink = PrintSink::new(out);
    let outcome = match path {
        Some(path) => {
            let file = File::open(path)
                .wrap_err_with(|| format!("Failed to open {}", path.display()))?;
            replay(file, config, &mut sink)
        }
        None => replay(io::stdin().lock(), config, &mut sink),
    };
    let out = sink.finish().wrap_err("Failed to write output")?;

    info!(bytes = outcome.appended_bytes(), "Replay finished");
    match outcome {
        TurnOutcome::Completed { .. } => Ok(out),
        TurnOutcome::Failed { error, .. } => Err(error).wrap_err("Replay failed"),
    }
}

/// Handle the `replay` command, printing to stdout.
pub fn handle_replay_command(path: Option<&Path>, config: &ChatConfig) -> Result<()> {
    replay_to(path, config, io::stdout()).map(|_| ())
}
