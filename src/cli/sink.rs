//! Terminal sink that prints deltas as they arrive.

use std::io::{self, Write};

use tracing::warn;

use crate::conversation::MessageSink;

/// Writes every delta straight to `out`, flushing after each one.
///
/// The first write error is kept and returned by [`PrintSink::finish`];
/// later output is discarded.
#[derive(Debug)]
pub struct PrintSink<W: Write> {
    out: W,
    error: Option<io::Error>,
    wrote_any: bool,
}

impl<W: Write> PrintSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            error: None,
            wrote_any: false,
        }
    }

    fn write(&mut self, text: &str) {
        if self.error.is_some() {
            return;
        }
        let result = self
            .out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush());
        if let Err(e) = result {
            warn!(error = %e, "Failed to write output");
            self.error = Some(e);
        } else {
            self.wrote_any = true;
        }
    }

    /// Return the writer, or the first write error.
    pub fn finish(self) -> io::Result<W> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.out),
        }
    }
}

impl<W: Write> MessageSink for PrintSink<W> {
    fn append_delta(&mut self, delta: &str) {
        self.write(delta);
    }

    fn fail_turn(&mut self, marker: &str) {
        self.write(marker);
    }

    fn finish_turn(&mut self) {
        if self.wrote_any {
            self.write("\n");
        }
    }
}
