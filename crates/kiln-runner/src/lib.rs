//! Snippet execution for the `kilnd` kernel.
//!
//! A snippet is the body of a Go `main` function. The runner wraps it into a
//! complete program, writes the program into a freshly created scratch
//! directory, and hands it to the Go toolchain's `run` command. Standard
//! output and standard error share a single pipe, so the captured text keeps
//! the order in which the program wrote it. The scratch directory is removed
//! before the runner returns, whatever the outcome.
//!
//! Executions are independent: nothing survives from one run to the next and
//! no timeout is applied. A snippet that never exits blocks its caller.
//!
//! # Example
//!
//! ```rust,no_run
//! use kiln_runner::{GoRunner, SnippetRunner, Toolchain};
//!
//! let runner = GoRunner::new(Toolchain::go());
//! let outcome = runner.run(r#"fmt.Println("hello")"#);
//! assert!(outcome.succeeded());
//! assert_eq!(outcome.output(), "hello\n");
//! ```

mod error;
mod outcome;
mod program;
mod runner;
mod toolchain;

pub use self::error::RunnerError;
pub use self::outcome::ExecutionOutcome;
pub use self::program::{PROGRAM_FILE_NAME, wrap_snippet};
pub use self::runner::GoRunner;
pub use self::toolchain::{DEFAULT_GO_BINARY, SCRATCH_PREFIX, Toolchain};

/// Executes source snippets and captures their output.
///
/// The kernel's dispatcher depends on this seam rather than on [`GoRunner`]
/// directly, so dispatch can be exercised without spawning processes.
pub trait SnippetRunner {
    /// Runs one snippet to completion.
    ///
    /// Failures to materialise or launch the program are reported as a failed
    /// [`ExecutionOutcome`] whose output is the error text.
    fn run(&self, snippet: &str) -> ExecutionOutcome;
}
