//! Stdio kernel that builds and runs Go snippets for a notebook front-end.
//!
//! The front-end launches `kilnd` as a child process and talks to it over a
//! pair of byte streams. Every line on stdin is one JSON request; every
//! non-blank request gets exactly one JSON response line on stdout, in
//! arrival order. Diagnostics go to stderr through [`tracing`] so they never
//! interleave with the protocol.
//!
//! The crate is split into:
//!
//! - [`config`]: flags and `KILN_*` environment variables.
//! - [`telemetry`]: the stderr tracing subscriber.
//! - [`dispatch`]: routing a decoded request to its behaviour.
//! - [`transport`]: the read-dispatch-write loop over the two streams.
//!
//! Wire types live in [`kiln_protocol`] and snippet execution in
//! [`kiln_runner`].

pub mod config;
pub mod dispatch;
pub mod telemetry;
pub mod transport;

use std::ffi::OsString;
use std::io::{BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use kiln_runner::GoRunner;
use thiserror::Error;
use tracing::info;

pub use config::{KernelConfig, LogFormat};
pub use dispatch::{Dispatcher, Method};
pub use telemetry::{TelemetryError, TelemetryHandle};
pub use transport::{Kernel, SessionSummary, WriteError};

/// Tracing target for process lifecycle events.
const LIFECYCLE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::lifecycle");

/// Errors that prevent the kernel from serving.
#[derive(Debug, Error)]
pub enum KernelError {
    /// Diagnostics could not be configured.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

/// Serves one session with the Go toolchain described by `config`.
///
/// Returns once `input` reaches end-of-file.
///
/// # Errors
///
/// Returns [`KernelError`] if telemetry cannot be initialised. Request-level
/// failures never end the session.
pub fn serve(
    config: &KernelConfig,
    input: impl BufRead,
    output: impl Write,
) -> Result<SessionSummary, KernelError> {
    let telemetry = telemetry::initialise(config)?;
    let toolchain = config.toolchain();
    info!(
        target: LIFECYCLE_TARGET,
        go_binary = %toolchain.binary().display(),
        log_format = %telemetry.format(),
        "kernel ready"
    );
    let kernel = Kernel::new(Dispatcher::new(GoRunner::new(toolchain)));
    Ok(kernel.serve(input, output))
}

/// Runs the kernel using the provided arguments and streams.
///
/// Help and version output is written to `output` before any request is
/// read. Argument and startup errors are written to `stderr`.
#[must_use]
pub fn run<I, T>(
    args: I,
    input: impl BufRead,
    mut output: impl Write,
    stderr: &mut impl Write,
) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let config = match KernelConfig::try_parse_from(args) {
        Ok(config) => config,
        Err(error) if error.use_stderr() => {
            write!(stderr, "{}", error.render()).ok();
            return ExitCode::FAILURE;
        }
        Err(error) => {
            write!(output, "{}", error.render()).ok();
            return ExitCode::SUCCESS;
        }
    };

    match serve(&config, input, output) {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            writeln!(stderr, "{error}").ok();
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests;
