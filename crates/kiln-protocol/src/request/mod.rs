//! Requests sent by the front-end on the kernel's stdin.
//!
//! The transport decodes only the envelope: the correlation id, the method
//! name, and an opaque `params` value. Each behaviour decodes `params` into
//! its own shape once the method has been routed, so an unknown method never
//! fails on a params schema it does not use.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ParseError;

/// A single request line.
///
/// # Example
///
/// ```
/// use kiln_protocol::{ExecuteParams, Request};
///
/// let request = Request::decode(
///     r#"{"id":"cell-1","method":"execute","params":{"code":"fmt.Println(1)"}}"#,
/// )
/// .expect("valid request");
/// assert_eq!(request.id(), Some("cell-1"));
/// assert_eq!(request.method(), "execute");
///
/// let params: ExecuteParams = request.params_as().expect("execute params");
/// assert_eq!(params.code(), "fmt.Println(1)");
/// ```
///
/// A missing or `null` method decodes as the empty name, which no behaviour
/// accepts, so the request is still answered under its id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Request {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    method: String,
    #[serde(default)]
    params: serde_json::Value,
}

impl Request {
    /// Creates an uncorrelated request with `null` params.
    #[must_use]
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            id: None,
            method: method.into(),
            params: serde_json::Value::Null,
        }
    }

    /// Attaches a correlation id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Attaches method-specific params.
    #[must_use]
    pub fn with_params(mut self, params: serde_json::Value) -> Self {
        self.params = params;
        self
    }

    /// Decodes one request line.
    ///
    /// Surrounding whitespace, including the newline delimiter, is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the line is not valid JSON or does not match
    /// the request shape. A bare `null` decodes as an empty request.
    pub fn decode(line: &str) -> Result<Self, ParseError> {
        let request: Option<Self> = serde_json::from_str(line.trim())?;
        Ok(request.unwrap_or_default())
    }

    /// Returns the correlation id, treating an empty id as absent.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Returns the method name.
    #[must_use]
    pub const fn method(&self) -> &str {
        self.method.as_str()
    }

    /// Returns the raw params value.
    #[must_use]
    pub const fn params(&self) -> &serde_json::Value {
        &self.params
    }

    /// Decodes the params into a behaviour-specific shape.
    ///
    /// # Errors
    ///
    /// Returns the decoder error when the params do not match `T`.
    pub fn params_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.params)
    }
}

/// Params accepted by the `execute` method.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExecuteParams {
    code: String,
}

impl ExecuteParams {
    /// Creates params carrying a source snippet.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    /// Returns the snippet to execute.
    #[must_use]
    pub const fn code(&self) -> &str {
        self.code.as_str()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests;
