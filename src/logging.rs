//! tracing subscriber setup for the binary.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::ports::config_port::ConfigPort;

pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub log_level: String,
}

impl LoggingConfig {
    /// `RUST_LOG` wins, then `[logging] level`, then `info`. `verbose`
    /// overrides all of them with `debug`.
    pub fn resolve(env_level: Option<String>, config: &dyn ConfigPort, verbose: bool) -> Self {
        let log_level = if verbose {
            "debug".to_string()
        } else {
            env_level
                .filter(|l| !l.trim().is_empty())
                .or_else(|| config.get_string("logging", "level"))
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
        };
        LoggingConfig { log_level }
    }

    pub fn from_env(config: &dyn ConfigPort, verbose: bool) -> Self {
        Self::resolve(std::env::var("RUST_LOG").ok(), config, verbose)
    }
}

/// Install the global subscriber. Events go to stderr so stdout carries
/// only report data. A second call is a no-op.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_new(&config.log_level)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();

    if installed.is_ok() {
        tracing::debug!(level = %config.log_level, "logging initialised");
    }
}
