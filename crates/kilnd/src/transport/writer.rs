//! Response framing for the output stream.

use std::io::Write;

use kiln_protocol::Envelope;
use thiserror::Error;

/// Failures while emitting a response line.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The envelope could not be serialised.
    #[error("failed to encode response: {0}")]
    Encode(#[source] serde_json::Error),
    /// Writing or flushing the output stream failed.
    #[error("failed to write response: {0}")]
    Io(#[source] std::io::Error),
}

/// Writes envelopes as newline-terminated JSON lines.
///
/// Every line is flushed as soon as it is written so the front-end sees the
/// response before the kernel blocks on the next read.
pub struct ResponseWriter<W> {
    writer: W,
}

impl<W: Write> ResponseWriter<W> {
    /// Creates a writer wrapping the given output stream.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Encodes, writes and flushes one envelope.
    ///
    /// Nothing is written when encoding fails, so a partial line never
    /// reaches the stream.
    pub fn write_envelope(&mut self, envelope: &Envelope) -> Result<(), WriteError> {
        let mut line = envelope.encode().map_err(WriteError::Encode)?;
        line.push('\n');
        self.writer
            .write_all(line.as_bytes())
            .map_err(WriteError::Io)?;
        self.writer.flush().map_err(WriteError::Io)
    }
}
