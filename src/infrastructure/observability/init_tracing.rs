use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use super::TracingConfig;

/// Installs the global subscriber. `RUST_LOG` overrides the configured filter.
/// Returns an error if a subscriber is already installed.
pub fn init_tracing(config: &TracingConfig) -> Result<(), TracingInitError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .map_err(|e| TracingInitError::InvalidFilter(e.to_string()))?;

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if config.json_format {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()
    };
    result.map_err(|e| TracingInitError::AlreadyInitialized(e.to_string()))?;

    tracing::info!(
        environment = %config.environment,
        json_format = config.json_format,
        "Tracing initialized"
    );
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum TracingInitError {
    #[error("invalid log filter: {0}")]
    InvalidFilter(String),
    #[error("tracing subscriber already set: {0}")]
    AlreadyInitialized(String),
}
