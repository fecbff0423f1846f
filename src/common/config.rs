//! Runtime configuration loaded from the process environment.

use std::env;

const DEFAULT_LOG_FILTER: &str = "warn";

/// Output format of the log subscriber.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Snapshot of configuration values consumed by the core.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CoreCfg {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `rtta=debug`.
    pub log_filter: String,
    pub log_format: LogFormat,
}

impl Default for CoreCfg {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_format: LogFormat::Text,
        }
    }
}

impl CoreCfg {
    /// Create a configuration snapshot from the process environment.
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a snapshot from an arbitrary key lookup. Unknown or empty values
    /// fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_filter = lookup("RTTA_LOG")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let log_format = lookup("RTTA_LOG_FORMAT")
            .and_then(|v| LogFormat::parse(&v))
            .unwrap_or_default();

        Self {
            log_filter,
            log_format,
        }
    }
}
