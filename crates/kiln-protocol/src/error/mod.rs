//! Errors raised while decoding protocol lines.

use thiserror::Error;

/// A line that is not well-formed JSON or does not match the expected shape.
///
/// The display text is the decoder's diagnostic, which the kernel relays
/// verbatim as the message of a `parse_error` response.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct ParseError {
    #[source]
    source: serde_json::Error,
}

impl ParseError {
    /// Returns the underlying JSON decoder error.
    #[must_use]
    pub const fn json_error(&self) -> &serde_json::Error {
        &self.source
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(source: serde_json::Error) -> Self {
        Self { source }
    }
}

/// Structural violations detected while decoding a response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// The envelope carried both a `result` and an `error`.
    #[error("envelope carries both result and error")]
    Ambiguous,
    /// The envelope carried neither a `result`, an `error`, nor an `event`.
    #[error("envelope carries neither result, error nor event")]
    Empty,
}
