//! Description of the external toolchain invocation.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Executable used when no toolchain binary is configured.
pub const DEFAULT_GO_BINARY: &str = "go";

/// Name prefix of every scratch directory.
pub const SCRATCH_PREFIX: &str = "kiln-go-";

/// How to build and run a wrapped program.
///
/// The runner invokes `binary args... <program path>`. For Go that is
/// `go run /tmp/kiln-go-XXXX/main.go`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    binary: PathBuf,
    args: Vec<OsString>,
    scratch_root: Option<PathBuf>,
}

impl Toolchain {
    /// The Go toolchain found on the command search path.
    #[must_use]
    pub fn go() -> Self {
        Self::new(DEFAULT_GO_BINARY).with_args(["run"])
    }

    /// A toolchain invoking `binary` with no leading arguments.
    #[must_use]
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            args: Vec::new(),
            scratch_root: None,
        }
    }

    /// Replaces the binary while keeping the arguments.
    #[must_use]
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Sets the arguments passed before the program path.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Places scratch directories under `root` instead of the system temp dir.
    #[must_use]
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    /// Returns the toolchain executable.
    #[must_use]
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Returns the arguments passed before the program path.
    #[must_use]
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Returns the configured scratch root, if any.
    #[must_use]
    pub fn scratch_root(&self) -> Option<&Path> {
        self.scratch_root.as_deref()
    }
}

impl Default for Toolchain {
    fn default() -> Self {
        Self::go()
    }
}
