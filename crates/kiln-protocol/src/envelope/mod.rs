//! Response envelopes written by the kernel on stdout.
//!
//! An [`Envelope`] is either a success carrying a `result`, a failure
//! carrying an `error`, or an unsolicited notification carrying an `event`.
//! The constructors are the only way to build one, so a result and an error
//! can never appear together. Decoding enforces the same rule for envelopes
//! read back from the wire.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{EnvelopeError, ParseError};

/// A single response or notification line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "WireEnvelope")]
pub struct Envelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorPayload>,
}

impl Envelope {
    /// Creates a success envelope.
    ///
    /// An absent or empty `id` is omitted from the wire form.
    #[must_use]
    pub fn success(id: Option<&str>, result: serde_json::Value) -> Self {
        Self {
            id: correlation(id),
            event: None,
            result: Some(result),
            error: None,
        }
    }

    /// Creates a failure envelope.
    ///
    /// An absent or empty `id` is omitted from the wire form.
    #[must_use]
    pub fn failure(id: Option<&str>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            id: correlation(id),
            event: None,
            result: None,
            error: Some(ErrorPayload::new(code, message)),
        }
    }

    /// Creates an unsolicited notification.
    ///
    /// No kernel behaviour emits notifications yet; the shape is kept so
    /// front-ends can rely on it.
    #[must_use]
    pub fn notification(event: impl Into<String>) -> Self {
        Self {
            id: None,
            event: Some(event.into()),
            result: None,
            error: None,
        }
    }

    /// Attaches structured details to a failure envelope.
    ///
    /// Success envelopes and notifications are returned unchanged.
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        if let Some(error) = self.error.take() {
            self.error = Some(error.with_details(details));
        }
        self
    }

    /// Decodes one envelope line.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the line is not valid JSON, does not match the
    /// envelope shape, or carries both a result and an error.
    pub fn decode(line: &str) -> Result<Self, ParseError> {
        serde_json::from_str(line.trim()).map_err(ParseError::from)
    }

    /// Encodes the envelope as a single JSON line without the trailing newline.
    ///
    /// # Errors
    ///
    /// Returns the serialiser error if the result value cannot be represented
    /// as JSON.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Returns the correlation id.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Returns the notification name, if this is a notification.
    #[must_use]
    pub fn event(&self) -> Option<&str> {
        self.event.as_deref()
    }

    /// Returns the success payload.
    #[must_use]
    pub const fn result(&self) -> Option<&serde_json::Value> {
        self.result.as_ref()
    }

    /// Returns the failure payload.
    #[must_use]
    pub const fn error(&self) -> Option<&ErrorPayload> {
        self.error.as_ref()
    }

    /// Returns whether the envelope reports success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.result.is_some()
    }
}

fn correlation(id: Option<&str>) -> Option<String> {
    id.filter(|value| !value.is_empty()).map(str::to_owned)
}

/// The `error` object of a failure envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorPayload {
    code: ErrorCode,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl ErrorPayload {
    /// Creates an error payload without details.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attaches structured details.
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Returns the machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Returns the human-readable message.
    #[must_use]
    pub const fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Returns the structured details, if any.
    #[must_use]
    pub const fn details(&self) -> Option<&serde_json::Value> {
        self.details.as_ref()
    }
}

/// Error codes surfaced on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The input line was not a well-formed request.
    ParseError,
    /// Reading the input stream failed.
    IoError,
    /// The request params did not match the method's shape.
    BadRequest,
    /// The snippet failed to build, run, or be materialised.
    ExecutionError,
    /// The method name is not recognised.
    UnknownMethod,
}

impl ErrorCode {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ParseError => "parse_error",
            Self::IoError => "io_error",
            Self::BadRequest => "bad_request",
            Self::ExecutionError => "execution_error",
            Self::UnknownMethod => "unknown_method",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unvalidated wire form used while decoding.
#[derive(Deserialize)]
struct WireEnvelope {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    event: Option<String>,
    #[serde(default, deserialize_with = "present")]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<ErrorPayload>,
}

/// Maps a present `result` key to `Some`, even when its value is `null`.
fn present<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

impl TryFrom<WireEnvelope> for Envelope {
    type Error = EnvelopeError;

    fn try_from(wire: WireEnvelope) -> Result<Self, Self::Error> {
        match (&wire.result, &wire.error, &wire.event) {
            (Some(_), Some(_), _) => Err(EnvelopeError::Ambiguous),
            (None, None, None) => Err(EnvelopeError::Empty),
            _ => Ok(Self {
                id: wire.id,
                event: wire.event,
                result: wire.result,
                error: wire.error,
            }),
        }
    }
}
