//! Process-based snippet execution.

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::Instant;

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::SnippetRunner;
use crate::error::RunnerError;
use crate::outcome::ExecutionOutcome;
use crate::program::write_program;
use crate::toolchain::{SCRATCH_PREFIX, Toolchain};

/// Tracing target for runner operations.
const RUNNER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::runner");

/// Runs snippets through the Go toolchain.
///
/// Each call allocates its own scratch directory, so two runs never observe
/// each other's files.
#[derive(Debug, Clone, Default)]
pub struct GoRunner {
    toolchain: Toolchain,
}

impl GoRunner {
    /// Creates a runner for the given toolchain.
    #[must_use]
    pub const fn new(toolchain: Toolchain) -> Self {
        Self { toolchain }
    }

    /// Returns the toolchain this runner invokes.
    #[must_use]
    pub const fn toolchain(&self) -> &Toolchain {
        &self.toolchain
    }

    /// Runs one snippet, reporting materialisation and launch failures as
    /// errors rather than failed outcomes.
    ///
    /// The scratch directory is removed before this returns, on every path.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the scratch directory cannot be created or
    /// written, or the toolchain cannot be launched or its output read.
    pub fn try_run(&self, snippet: &str) -> Result<ExecutionOutcome, RunnerError> {
        let workspace = self.create_workspace()?;
        let program = write_program(workspace.path(), snippet)?;
        let result = self.invoke(workspace.path(), &program);
        release_workspace(workspace);
        result
    }

    fn create_workspace(&self) -> Result<TempDir, RunnerError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX);
        let created = match self.toolchain.scratch_root() {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        };
        let workspace = created.map_err(|source| RunnerError::WorkspaceCreate { source })?;
        debug!(
            target: RUNNER_TARGET,
            workspace = %workspace.path().display(),
            "created scratch directory"
        );
        Ok(workspace)
    }

    fn invoke(&self, workspace: &Path, program: &Path) -> Result<ExecutionOutcome, RunnerError> {
        let binary = self.toolchain.binary();
        let (mut reader, writer) =
            std::io::pipe().map_err(|source| RunnerError::Capture { source })?;
        let stderr_writer = writer
            .try_clone()
            .map_err(|source| RunnerError::Capture { source })?;

        debug!(
            target: RUNNER_TARGET,
            binary = %binary.display(),
            program = %program.display(),
            "launching toolchain"
        );
        let start = Instant::now();

        // The command owns the parent's copies of the pipe writer; it must be
        // dropped before reading so the reader sees end-of-file.
        let mut child = Command::new(binary)
            .args(self.toolchain.args())
            .arg(program)
            .current_dir(workspace)
            .stdin(Stdio::null())
            .stdout(writer)
            .stderr(stderr_writer)
            .spawn()
            .map_err(|source| RunnerError::Spawn {
                binary: binary.to_path_buf(),
                source,
            })?;

        let mut captured = Vec::new();
        if let Err(source) = reader.read_to_end(&mut captured) {
            reap(&mut child);
            return Err(RunnerError::Capture { source });
        }
        let status = child
            .wait()
            .map_err(|source| RunnerError::Capture { source })?;

        debug!(
            target: RUNNER_TARGET,
            ?status,
            output_bytes = captured.len(),
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "toolchain exited"
        );

        let output = String::from_utf8_lossy(&captured).into_owned();
        Ok(outcome_for(status, output))
    }
}

impl SnippetRunner for GoRunner {
    fn run(&self, snippet: &str) -> ExecutionOutcome {
        self.try_run(snippet).unwrap_or_else(|error| {
            warn!(target: RUNNER_TARGET, %error, "snippet execution failed before exit");
            ExecutionOutcome::from(error)
        })
    }
}

fn outcome_for(status: ExitStatus, output: String) -> ExecutionOutcome {
    if status.success() {
        ExecutionOutcome::success(output)
    } else {
        ExecutionOutcome::failure(output, status.code())
    }
}

/// Kills and waits for a child whose output could not be read.
fn reap(child: &mut Child) {
    drop(child.kill());
    drop(child.wait());
}

/// Removes the scratch directory, logging rather than failing on error.
fn release_workspace(workspace: TempDir) {
    let path = workspace.path().to_path_buf();
    if let Err(error) = workspace.close() {
        warn!(
            target: RUNNER_TARGET,
            workspace = %path.display(),
            %error,
            "failed to remove scratch directory"
        );
    }
}
