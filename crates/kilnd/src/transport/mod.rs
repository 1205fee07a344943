//! Line transport between the front-end and the dispatcher.
//!
//! The kernel reads one request per line from its input stream and answers
//! each non-blank line with exactly one response line, flushed before the next
//! read. Handling is strictly sequential: a long-running `execute` holds up
//! every request behind it.
//!
//! The loop only ends when the input reaches end-of-file. Malformed lines and
//! read errors are answered with uncorrelated `parse_error` and `io_error`
//! responses, and a response that cannot be written is logged and dropped.

mod writer;

use std::io::{self, BufRead, Write};

use kiln_protocol::{Envelope, ErrorCode, Request, build_error};
use kiln_runner::SnippetRunner;
use tracing::{debug, error, info, warn};

use crate::dispatch::Dispatcher;

pub use self::writer::WriteError;
use self::writer::ResponseWriter;

/// Tracing target for transport operations.
const TRANSPORT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::transport");

/// Counters describing a finished session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    /// Response lines emitted, including error responses.
    pub responses: usize,
    /// Blank lines discarded without a response.
    pub blank_lines: usize,
    /// Responses that could not be encoded or written.
    pub dropped: usize,
}

/// The kernel's request loop.
#[derive(Debug)]
pub struct Kernel<R> {
    dispatcher: Dispatcher<R>,
}

impl<R> Kernel<R> {
    /// Creates a kernel routing requests through `dispatcher`.
    #[must_use]
    pub const fn new(dispatcher: Dispatcher<R>) -> Self {
        Self { dispatcher }
    }

    /// Returns the dispatcher.
    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher<R> {
        &self.dispatcher
    }
}

impl<R: SnippetRunner> Kernel<R> {
    /// Serves requests from `input` until it reaches end-of-file.
    ///
    /// The streams are owned by the caller for the whole session; tests pass
    /// in-memory buffers, the binary passes locked stdin and stdout.
    pub fn serve(&self, mut input: impl BufRead, output: impl Write) -> SessionSummary {
        let mut writer = ResponseWriter::new(output);
        let mut summary = SessionSummary::default();
        let mut line = String::new();

        loop {
            line.clear();
            let response = match read_line_with_retry(&mut input, &mut line) {
                Ok(0) => break,
                Ok(_) if line.trim().is_empty() => {
                    summary.blank_lines += 1;
                    continue;
                }
                Ok(_) => self.handle_line(&line),
                Err(read_error) => {
                    warn!(target: TRANSPORT_TARGET, error = %read_error, "failed to read request line");
                    build_error(None, ErrorCode::IoError, read_error.to_string())
                }
            };

            match writer.write_envelope(&response) {
                Ok(()) => summary.responses += 1,
                Err(write_error) => {
                    summary.dropped += 1;
                    report_dropped(&write_error);
                }
            }
        }

        info!(
            target: TRANSPORT_TARGET,
            responses = summary.responses,
            blank_lines = summary.blank_lines,
            dropped = summary.dropped,
            "input closed, shutting down"
        );
        summary
    }

    fn handle_line(&self, line: &str) -> Envelope {
        match Request::decode(line) {
            Ok(request) => self.dispatcher.dispatch(&request),
            Err(parse_error) => {
                warn!(target: TRANSPORT_TARGET, error = %parse_error, "malformed request line");
                build_error(None, ErrorCode::ParseError, parse_error.to_string())
            }
        }
    }
}

/// Reads one line, retrying reads interrupted by signals.
fn read_line_with_retry(input: &mut impl BufRead, line: &mut String) -> io::Result<usize> {
    loop {
        match input.read_line(line) {
            Err(read_error) if read_error.kind() == io::ErrorKind::Interrupted => {
                debug!(target: TRANSPORT_TARGET, "read interrupted, retrying");
            }
            result => return result,
        }
    }
}

fn report_dropped(write_error: &WriteError) {
    match write_error {
        WriteError::Encode(_) => {
            error!(target: TRANSPORT_TARGET, error = %write_error, "dropping unencodable response");
        }
        WriteError::Io(_) => {
            warn!(target: TRANSPORT_TARGET, error = %write_error, "dropping unwritten response");
        }
    }
}
