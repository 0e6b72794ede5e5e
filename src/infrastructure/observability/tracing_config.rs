use crate::config::{Environment, LoggingSettings};

/// Configuration for tracing initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    pub environment: String,
    pub filter: String,
    pub json_format: bool,
}

impl TracingConfig {
    pub fn from_settings(environment: Environment, logging: &LoggingSettings) -> Self {
        Self {
            environment: environment.to_string(),
            filter: logging.level.clone(),
            // Production logs are always shipped as JSON.
            json_format: logging.enable_json || environment == Environment::Prod,
        }
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::from_settings(Environment::Local, &LoggingSettings::default())
    }
}
