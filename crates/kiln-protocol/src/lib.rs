//! Line protocol spoken between a notebook front-end and the `kilnd` kernel.
//!
//! Every message is a single JSON object on its own line. The front-end
//! writes [`Request`] lines to the kernel's stdin; the kernel answers each
//! non-blank line with exactly one [`Envelope`] line on stdout. An envelope
//! carries either a `result` or an `error`, never both, and echoes the
//! request's correlation `id` when the request supplied a non-empty one.
//!
//! # Example
//!
//! ```
//! use kiln_protocol::{ErrorCode, Request, build_error};
//!
//! let request = Request::decode(r#"{"id":"7","method":"launch"}"#).expect("valid request");
//! let response = build_error(request.id(), ErrorCode::UnknownMethod, request.method());
//! assert_eq!(
//!     response.encode().expect("encodable"),
//!     r#"{"id":"7","error":{"code":"unknown_method","message":"launch"}}"#,
//! );
//! ```

pub mod envelope;
pub mod error;
pub mod request;

pub use self::envelope::{Envelope, ErrorCode, ErrorPayload};
pub use self::error::{EnvelopeError, ParseError};
pub use self::request::{ExecuteParams, Request};

/// Builds a failure envelope correlated with `id`.
///
/// An absent or empty `id` produces an envelope without an `id` key.
#[must_use]
pub fn build_error(id: Option<&str>, code: ErrorCode, message: impl Into<String>) -> Envelope {
    Envelope::failure(id, code, message)
}

/// Builds a success envelope correlated with `id`.
///
/// An absent or empty `id` produces an envelope without an `id` key.
#[must_use]
pub fn build_result(id: Option<&str>, result: serde_json::Value) -> Envelope {
    Envelope::success(id, result)
}
