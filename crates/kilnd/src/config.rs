//! Runtime configuration for the kernel process.
//!
//! The protocol itself carries no configuration. These settings only control
//! diagnostics and where the toolchain and scratch directories live. Each
//! flag falls back to a `KILN_*` environment variable so a front-end can
//! configure the kernel without changing its launch arguments.

use std::path::PathBuf;

use clap::Parser;
use kiln_runner::{DEFAULT_GO_BINARY, Toolchain};
use strum::{Display, EnumString};

/// Default log filter expression.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Supported logging output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// Structured JSON suitable for ingestion by logging stacks.
    #[default]
    Json,
    /// Human-readable single line output.
    Compact,
}

/// Kernel configuration assembled from flags and environment.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    name = "kilnd",
    version,
    about = "Line-protocol kernel that builds and runs Go snippets"
)]
pub struct KernelConfig {
    /// Tracing filter expression for diagnostics written to stderr.
    #[arg(long, env = "KILN_LOG_FILTER", default_value = DEFAULT_LOG_FILTER)]
    log_filter: String,

    /// Diagnostic output format (`json` or `compact`).
    #[arg(long, env = "KILN_LOG_FORMAT", default_value_t = LogFormat::Json)]
    log_format: LogFormat,

    /// Go toolchain executable used to build and run snippets.
    #[arg(long, env = "KILN_GO_BINARY", default_value = DEFAULT_GO_BINARY)]
    go_binary: PathBuf,

    /// Directory under which per-execution scratch directories are created.
    #[arg(long, env = "KILN_SCRATCH_ROOT")]
    scratch_root: Option<PathBuf>,
}

impl KernelConfig {
    /// Returns the tracing filter expression.
    #[must_use]
    pub const fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Returns the diagnostic output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Builds the toolchain description used by the runner.
    #[must_use]
    pub fn toolchain(&self) -> Toolchain {
        let toolchain = Toolchain::go().with_binary(&self.go_binary);
        match &self.scratch_root {
            Some(root) => toolchain.with_scratch_root(root),
            None => toolchain,
        }
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
            log_format: LogFormat::default(),
            go_binary: PathBuf::from(DEFAULT_GO_BINARY),
            scratch_root: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use rstest::rstest;

    use super::*;

    fn parse(args: &[&str]) -> KernelConfig {
        KernelConfig::try_parse_from(std::iter::once("kilnd").chain(args.iter().copied()))
            .expect("parse configuration")
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse(&[
            "--log-filter",
            "kilnd=debug",
            "--log-format",
            "compact",
            "--go-binary",
            "/opt/go/bin/go",
            "--scratch-root",
            "/var/tmp/kiln",
        ]);

        assert_eq!(config.log_filter(), "kilnd=debug");
        assert_eq!(config.log_format(), LogFormat::Compact);
        let toolchain = config.toolchain();
        assert_eq!(toolchain.binary(), Path::new("/opt/go/bin/go"));
        assert_eq!(toolchain.scratch_root(), Some(Path::new("/var/tmp/kiln")));
    }

    #[test]
    fn default_toolchain_runs_go() {
        let toolchain = KernelConfig::default().toolchain();
        assert_eq!(toolchain, Toolchain::go());
    }

    #[rstest]
    #[case("json", LogFormat::Json)]
    #[case("COMPACT", LogFormat::Compact)]
    fn log_format_parses_case_insensitively(#[case] text: &str, #[case] expected: LogFormat) {
        assert_eq!(text.parse::<LogFormat>().expect("parse format"), expected);
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        let result = KernelConfig::try_parse_from(["kilnd", "--log-format", "xml"]);
        assert!(result.is_err());
    }
}
