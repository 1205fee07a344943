//! Entrypoint for the `kilnd` kernel.
//!
//! The binary delegates to [`kilnd::run`] with the process arguments and the
//! locked standard streams.

use std::io::{self, StderrLock, StdinLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let stdin: StdinLock<'static> = io::stdin().lock();
    let mut stdout: StdoutLock<'static> = io::stdout().lock();
    let mut stderr: StderrLock<'static> = io::stderr().lock();
    kilnd::run(std::env::args_os(), stdin, &mut stdout, &mut stderr)
}
