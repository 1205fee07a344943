use crate::error::RunnerError;

/// Captured result of one snippet execution.
///
/// The output is returned for failures too: a build failure's output is the
/// toolchain's diagnostics, which the kernel relays as the error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    output: String,
    succeeded: bool,
    exit_code: Option<i32>,
}

impl ExecutionOutcome {
    /// Creates a successful outcome.
    #[must_use]
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            succeeded: true,
            exit_code: Some(0),
        }
    }

    /// Creates a failed outcome.
    ///
    /// `exit_code` is `None` when the program never exited normally, for
    /// example because it could not be launched or was killed by a signal.
    #[must_use]
    pub fn failure(output: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self {
            output: output.into(),
            succeeded: false,
            exit_code,
        }
    }

    /// Returns whether the program exited with status zero.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.succeeded
    }

    /// Returns the combined stdout and stderr text.
    #[must_use]
    pub const fn output(&self) -> &str {
        self.output.as_str()
    }

    /// Consumes the outcome and returns the captured text.
    #[must_use]
    pub fn into_output(self) -> String {
        self.output
    }

    /// Returns the exit code, if the program exited normally.
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }
}

impl From<RunnerError> for ExecutionOutcome {
    fn from(error: RunnerError) -> Self {
        Self::failure(error.to_string(), None)
    }
}
