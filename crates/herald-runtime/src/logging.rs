//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::{LogOutput, LoggingConfig};

/// Installs the global subscriber. `RUST_LOG` overrides the configured
/// level. Safe to call more than once; later calls are no-ops.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let result = match &config.output {
        LogOutput::Stdout => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init(),
        LogOutput::File { directory, prefix } => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(tracing_appender::rolling::daily(directory, prefix))
            .with_ansi(false)
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber was already installed");
    }
}
