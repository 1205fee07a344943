//! Structured diagnostics for the kernel process.
//!
//! Stdout is the protocol channel, so the subscriber only ever writes to
//! stderr. JSON output never carries ANSI escapes, even on a terminal, so a
//! front-end can relay the kernel's stderr line by line as JSON.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::{Subscriber, debug, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

use crate::config::{DEFAULT_LOG_FILTER, KernelConfig, LogFormat};

/// Tracing target for telemetry setup.
const TELEMETRY_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::telemetry");

static TELEMETRY: OnceCell<TelemetryHandle> = OnceCell::new();

/// Describes the subscriber installed for this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryHandle {
    format: LogFormat,
}

impl TelemetryHandle {
    /// Returns the output format of the installed subscriber.
    #[must_use]
    pub const fn format(self) -> LogFormat {
        self.format
    }
}

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Failed to parse the configured log filter expression.
    #[error("invalid log filter '{expression}': {message}")]
    Filter {
        /// The rejected expression.
        expression: String,
        /// The parser's diagnostic.
        message: String,
    },
    /// Failed to install the tracing subscriber.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Configures the global tracing subscriber when invoked for the first time.
///
/// Later calls return the handle of the first installation and ignore their
/// configuration.
///
/// # Errors
///
/// Returns [`TelemetryError`] if the filter expression is invalid or another
/// subscriber has already been installed.
pub fn initialise(config: &KernelConfig) -> Result<TelemetryHandle, TelemetryError> {
    TELEMETRY
        .get_or_try_init(|| install_subscriber(config))
        .copied()
}

fn install_subscriber(config: &KernelConfig) -> Result<TelemetryHandle, TelemetryError> {
    let filter = kernel_filter(config.log_filter())?;
    let format = config.log_format();
    let ansi = format == LogFormat::Compact && io::stderr().is_terminal();

    let builder = |env_filter: EnvFilter| {
        fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_level(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_writer(io::stderr)
            .with_ansi(ansi)
            .with_timer(fmt::time::UtcTime::rfc_3339())
    };

    let subscriber: Box<dyn Subscriber + Send + Sync> = match format {
        LogFormat::Json => Box::new(builder(filter).json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(builder(filter).compact().finish()),
    };

    tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)?;
    debug!(
        target: TELEMETRY_TARGET,
        %format,
        protocol = "stdout",
        diagnostics = "stderr",
        "telemetry installed"
    );
    Ok(TelemetryHandle { format })
}

/// Parses the filter expression, treating a blank one as the default.
fn kernel_filter(expression: &str) -> Result<EnvFilter, TelemetryError> {
    let effective = if expression.trim().is_empty() {
        DEFAULT_LOG_FILTER
    } else {
        expression
    };
    EnvFilter::try_new(effective).map_err(|error| TelemetryError::Filter {
        expression: effective.to_owned(),
        message: error.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use rstest::rstest;

    use super::*;

    #[test]
    fn invalid_filter_is_rejected_before_installation() {
        let config = KernelConfig::try_parse_from(["kilnd", "--log-filter", "kilnd=loud"])
            .expect("parse configuration");

        let error = install_subscriber(&config).expect_err("filter should be rejected");
        assert!(matches!(
            &error,
            TelemetryError::Filter { expression, .. } if expression == "kilnd=loud"
        ));
        assert!(error.to_string().starts_with("invalid log filter 'kilnd=loud'"));
    }

    #[rstest]
    #[case::empty("")]
    #[case::whitespace("  ")]
    fn blank_filter_falls_back_to_default(#[case] expression: &str) {
        let filter = kernel_filter(expression).expect("default filter parses");
        assert_eq!(
            filter.to_string(),
            EnvFilter::new(DEFAULT_LOG_FILTER).to_string()
        );
    }

    #[rstest]
    #[case::level("debug")]
    #[case::per_target("kilnd::transport=trace,kiln_runner=debug")]
    fn valid_filters_parse(#[case] expression: &str) {
        assert!(kernel_filter(expression).is_ok());
    }
}
