use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable selecting the output format (`json` or `pretty`).
pub const LOG_FORMAT_ENV: &str = "MERCHANTDESK_LOG_FORMAT";

/// Standard filter directive variable.
pub const FILTER_ENV: &str = "RUST_LOG";

pub const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON lines with timestamps.
    #[default]
    Json,
    /// Multi-line human readable output for local development.
    Pretty,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown log format '{0}' (expected 'json' or 'pretty')")]
pub struct UnknownLogFormat(pub String);

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(UnknownLogFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// `EnvFilter` directives.
    pub filter: String,
    pub format: LogFormat,
    pub with_target: bool,
    /// Format value that failed to parse; reported once logging is up.
    pub rejected_format: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::default(),
            with_target: false,
            rejected_format: None,
        }
    }
}

impl TracingConfig {
    /// Read `RUST_LOG` and `MERCHANTDESK_LOG_FORMAT` from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Missing or blank values keep
    /// their defaults; an unknown format keeps `json` and is remembered in
    /// `rejected_format`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(filter) = lookup(FILTER_ENV).filter(|v| !v.trim().is_empty()) {
            config.filter = filter;
        }

        if let Some(raw) = lookup(LOG_FORMAT_ENV).filter(|v| !v.trim().is_empty()) {
            match raw.parse::<LogFormat>() {
                Ok(format) => config.format = format,
                Err(_) => config.rejected_format = Some(raw),
            }
        }

        // Pretty output is for humans reading module paths.
        config.with_target = config.format == LogFormat::Pretty;
        config
    }
}
