//! Tracing and logging setup shared by Crewdesk binaries and test harnesses.

pub mod config;
pub mod tracing;

pub use config::{ConfigError, LogFormat, ObservabilityConfig};

/// Initialize process-wide tracing from the environment.
///
/// This is safe to call multiple times; subsequent calls become no-ops. An
/// unparseable `CREWDESK_LOG_FORMAT` falls back to the default format.
pub fn init() {
    let config = ObservabilityConfig::from_env().unwrap_or_default();
    tracing::init(&config);
}
