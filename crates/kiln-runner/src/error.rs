//! Errors raised while materialising or launching a snippet program.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by [`GoRunner`](crate::GoRunner) before the snippet program
/// produces an exit status.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The scratch directory could not be allocated.
    #[error("failed to create scratch directory: {source}")]
    WorkspaceCreate {
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The wrapped program could not be written into the scratch directory.
    #[error("failed to write program '{}': {source}", path.display())]
    WorkspaceWrite {
        /// File path being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The output pipe shared by stdout and stderr could not be set up or read.
    #[error("failed to capture toolchain output: {source}")]
    Capture {
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The toolchain executable could not be started.
    #[error("failed to launch toolchain '{}': {source}", binary.display())]
    Spawn {
        /// Executable that was invoked.
        binary: PathBuf,
        /// Underlying process spawn error.
        #[source]
        source: std::io::Error,
    },
}
