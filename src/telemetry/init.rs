//! Telemetry initialization.
//!
//! Provides configuration and initialization for the tracing subscriber.

use tracing::Level;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Crate target every directive is scoped to
const CRATE_TARGET: &str = "git_cleanup";

/// Configuration for telemetry initialization.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Level for this crate's own events
    pub default_level: Level,
    /// Whether to include file and line numbers
    pub include_file_line: bool,
    /// Whether to include the target (module path)
    pub include_target: bool,
    /// Whether to use ANSI colors
    pub ansi_colors: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            default_level: Level::WARN,
            include_file_line: false,
            include_target: true,
            ansi_colors: true,
        }
    }
}

impl TelemetryConfig {
    /// Configuration for `--verbose` / `VERBOSE=true`.
    pub fn verbose() -> Self {
        Self {
            default_level: Level::DEBUG,
            ..Self::default()
        }
    }

    /// Turn ANSI escapes off (`NO_COLOR`).
    pub fn without_colors(mut self) -> Self {
        self.ansi_colors = false;
        self
    }

    /// Directive applied when `RUST_LOG` is unset or invalid
    fn default_directive(&self) -> String {
        format!("{}={}", CRATE_TARGET, self.default_level)
    }

    fn env_filter(&self) -> anyhow::Result<EnvFilter> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => Ok(EnvFilter::try_new(self.default_directive())?),
        }
    }
}

/// Guard that keeps the telemetry subscriber active.
pub struct TelemetryGuard {
    #[allow(dead_code)]
    _private: (),
}

/// Initialize telemetry with the given configuration.
///
/// Events go to stderr. A valid `RUST_LOG` replaces the configured level, so
/// `RUST_LOG=git_cleanup::cmd=debug` shows every git and gh invocation
/// without the rest of the debug output.
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<TelemetryGuard> {
    let filter = config.env_filter()?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(config.ansi_colors)
        .with_target(config.include_target)
        .with_file(config.include_file_line)
        .with_line_number(config.include_file_line)
        .compact();

    let subscriber = tracing_subscriber::registry().with(filter).with(fmt_layer);

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(TelemetryGuard { _private: () })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = TelemetryConfig::default();
        assert_eq!(config.default_level, Level::WARN);
        assert_eq!(config.default_directive(), "git_cleanup=WARN");
    }

    #[test]
    fn test_config_verbose() {
        let config = TelemetryConfig::verbose().without_colors();
        assert_eq!(config.default_level, Level::DEBUG);
        assert!(!config.ansi_colors);
        assert_eq!(config.default_directive(), "git_cleanup=DEBUG");
    }

    #[test]
    fn test_default_directive_parses() {
        for config in [TelemetryConfig::default(), TelemetryConfig::verbose()] {
            assert!(EnvFilter::try_new(config.default_directive()).is_ok());
        }
    }
}
