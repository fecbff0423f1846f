//! Logging bootstrap for the embedded core.
//!
//! The host interpreter owns stdout, so events go to stderr. Nothing is
//! emitted unless the filter from [`CoreCfg`] enables it.

use tracing_subscriber::EnvFilter;

use crate::common::config::{CoreCfg, LogFormat};

/// Install the global subscriber. Returns `false` when a subscriber was
/// already installed (by an earlier load of the module or by the embedding
/// application).
pub fn init(cfg: &CoreCfg) -> bool {
    let filter = EnvFilter::try_new(&cfg.log_filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    let installed = match cfg.log_format {
        LogFormat::Json => builder.json().try_init().is_ok(),
        LogFormat::Text => builder.try_init().is_ok(),
    };

    if installed {
        tracing::debug!(filter = %cfg.log_filter, format = ?cfg.log_format, "logging initialised");
    }
    installed
}
