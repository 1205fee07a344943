//! Method routing for decoded requests.
//!
//! The dispatcher is a pure routing table: it looks at the method name,
//! decodes the params the selected behaviour needs, and turns the behaviour's
//! outcome into exactly one [`Envelope`]. It holds no state between requests.
//!
//! | method | params | result |
//! |---|---|---|
//! | `execute` | `{"code": "<string>"}` | `{"text/plain": "<captured output>"}` |
//! | `interrupt`, `restart`, `ping` | ignored | `{"ok": true}` |
//!
//! The lifecycle methods are acknowledged without effect: every execution is
//! already a fresh process, so there is nothing to interrupt or restart.

use kiln_protocol::{Envelope, ErrorCode, ExecuteParams, Request, build_error, build_result};
use kiln_runner::SnippetRunner;
use serde_json::json;
use tracing::debug;

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// Key of the captured output inside an `execute` result.
pub const TEXT_PLAIN: &str = "text/plain";

/// Methods understood by the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Build and run a snippet.
    Execute,
    /// Acknowledge an interrupt signal.
    Interrupt,
    /// Acknowledge a restart signal.
    Restart,
    /// Liveness probe.
    Ping,
}

impl Method {
    /// Parses a method name. Names are case-sensitive.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "execute" => Some(Self::Execute),
            "interrupt" => Some(Self::Interrupt),
            "restart" => Some(Self::Restart),
            "ping" => Some(Self::Ping),
            _ => None,
        }
    }

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Execute => "execute",
            Self::Interrupt => "interrupt",
            Self::Restart => "restart",
            Self::Ping => "ping",
        }
    }
}

/// Routes requests to behaviours.
#[derive(Debug)]
pub struct Dispatcher<R> {
    runner: R,
}

impl<R> Dispatcher<R> {
    /// Creates a dispatcher executing snippets with `runner`.
    #[must_use]
    pub const fn new(runner: R) -> Self {
        Self { runner }
    }

    /// Returns the snippet runner.
    #[must_use]
    pub const fn runner(&self) -> &R {
        &self.runner
    }
}

impl<R: SnippetRunner> Dispatcher<R> {
    /// Handles one request and returns its response.
    ///
    /// The response echoes the request's correlation id when it has one.
    #[must_use]
    pub fn dispatch(&self, request: &Request) -> Envelope {
        let id = request.id();
        let Some(method) = Method::parse(request.method()) else {
            debug!(
                target: DISPATCH_TARGET,
                method = request.method(),
                "rejecting unknown method"
            );
            return build_error(id, ErrorCode::UnknownMethod, request.method());
        };

        debug!(
            target: DISPATCH_TARGET,
            method = method.as_str(),
            id = id.unwrap_or_default(),
            "dispatching request"
        );

        match method {
            Method::Execute => self.execute(request),
            Method::Interrupt | Method::Restart | Method::Ping => {
                build_result(id, json!({ "ok": true }))
            }
        }
    }

    fn execute(&self, request: &Request) -> Envelope {
        let id = request.id();
        let params = match request.params_as::<ExecuteParams>() {
            Ok(params) => params,
            Err(error) => return build_error(id, ErrorCode::BadRequest, error.to_string()),
        };

        let outcome = self.runner.run(params.code());
        debug!(
            target: DISPATCH_TARGET,
            succeeded = outcome.succeeded(),
            exit_code = outcome.exit_code(),
            output_bytes = outcome.output().len(),
            "execution finished"
        );

        if outcome.succeeded() {
            return build_result(id, json!({ TEXT_PLAIN: outcome.into_output() }));
        }

        let exit_code = outcome.exit_code();
        let envelope = build_error(id, ErrorCode::ExecutionError, outcome.into_output());
        match exit_code {
            Some(code) => envelope.with_details(json!({ "exit_code": code })),
            None => envelope,
        }
    }
}
