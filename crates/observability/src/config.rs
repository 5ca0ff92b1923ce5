//! Observability configuration read from the environment.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable holding the `EnvFilter` directive.
pub const FILTER_VAR: &str = "RUST_LOG";

/// Environment variable selecting the output format.
pub const FORMAT_VAR: &str = "CREWDESK_LOG_FORMAT";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown log format '{0}' (expected json, pretty or compact)")]
    UnknownFormat(String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// One JSON object per line (production default).
    #[default]
    Json,
    Pretty,
    Compact,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            other => Err(ConfigError::UnknownFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// `EnvFilter` directive, e.g. `info,crewdesk_access=trace`.
    pub filter: String,
    pub format: LogFormat,
    pub with_target: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Json,
            with_target: false,
        }
    }
}

impl ObservabilityConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Missing keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(filter) = lookup(FILTER_VAR).filter(|f| !f.trim().is_empty()) {
            config.filter = filter;
        }
        if let Some(format) = lookup(FORMAT_VAR) {
            config.format = format.parse()?;
            // Human-oriented formats are easier to follow with module targets.
            config.with_target = config.format != LogFormat::Json;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ObservabilityConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ObservabilityConfig::default());
    }

    #[test]
    fn reads_filter_and_format() {
        let config = ObservabilityConfig::from_lookup(lookup(&[
            (FILTER_VAR, "crewdesk_access=trace"),
            (FORMAT_VAR, "Pretty"),
        ]))
        .unwrap();

        assert_eq!(config.filter, "crewdesk_access=trace");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.with_target);
    }

    #[test]
    fn blank_filter_keeps_default() {
        let config = ObservabilityConfig::from_lookup(lookup(&[(FILTER_VAR, "  ")])).unwrap();
        assert_eq!(config.filter, "info");
    }

    #[test]
    fn unknown_format_is_an_error() {
        let err = ObservabilityConfig::from_lookup(lookup(&[(FORMAT_VAR, "xml")])).unwrap_err();
        assert_eq!(err, ConfigError::UnknownFormat("xml".to_string()));
    }
}
