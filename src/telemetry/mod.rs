//! Diagnostic logging for git-cleanup.
//!
//! Structured logs go through the `tracing` crate and are written to stderr,
//! separate from the user-facing report printed by `cli::output`.
//!
//! # Feature Flags
//!
//! - `release-logs`: Strip debug/trace at compile time
//! - `max-perf`: Disable all tracing for maximum performance

mod init;

pub use init::{init_telemetry, TelemetryConfig, TelemetryGuard};
