//! Wrapping snippets into complete Go programs.

use std::path::{Path, PathBuf};

use crate::error::RunnerError;

/// File name of the wrapped program inside the scratch directory.
pub const PROGRAM_FILE_NAME: &str = "main.go";

const PREAMBLE: &str = "package main\n\nimport \"fmt\"\n\nfunc main(){\n";
const EPILOGUE: &str = "\n}\n";

/// Wraps a snippet as the body of `func main()`.
///
/// The snippet is inserted verbatim. It is trusted input from the front-end
/// and is neither validated nor escaped.
///
/// ```
/// let program = kiln_runner::wrap_snippet("fmt.Println(1)");
/// assert_eq!(
///     program,
///     "package main\n\nimport \"fmt\"\n\nfunc main(){\nfmt.Println(1)\n}\n",
/// );
/// ```
#[must_use]
pub fn wrap_snippet(snippet: &str) -> String {
    let mut program = String::with_capacity(PREAMBLE.len() + snippet.len() + EPILOGUE.len());
    program.push_str(PREAMBLE);
    program.push_str(snippet);
    program.push_str(EPILOGUE);
    program
}

/// Writes the wrapped snippet into `workspace` and returns the file path.
pub(crate) fn write_program(workspace: &Path, snippet: &str) -> Result<PathBuf, RunnerError> {
    let path = workspace.join(PROGRAM_FILE_NAME);
    std::fs::write(&path, wrap_snippet(snippet)).map_err(|source| RunnerError::WorkspaceWrite {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
