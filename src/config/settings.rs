use std::time::Duration;

use ::config::{Config, ConfigError, File};
use serde::Deserialize;

use crate::domain::{ConfigurationError, ModelConfig, ModelProvider, ProviderKind};

use super::Environment;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub model: ModelSettings,
    pub gateway: GatewaySettings,
    pub analysis: AnalysisSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Layers `appsettings.<environment>` (optional) under `PACTUM_*` environment
    /// variables, e.g. `PACTUM_MODEL__PROVIDER=online`.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str())).required(false),
            )
            .add_source(
                ::config::Environment::with_prefix("PACTUM")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}

/// Raw model configuration as supplied by the caller. Validated into a
/// [`ModelConfig`] before any analysis starts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub provider: String,
    pub local_url: String,
    pub api_url: String,
    pub api_key: String,
    pub model_name: String,
    pub max_tokens: i64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Local.as_str().to_string(),
            local_url: "http://localhost:1234/v1/chat/completions".to_string(),
            api_url: String::new(),
            api_key: String::new(),
            model_name: String::new(),
            max_tokens: 800,
        }
    }
}

impl TryFrom<ModelSettings> for ModelConfig {
    type Error = ConfigurationError;

    fn try_from(settings: ModelSettings) -> Result<Self, Self::Error> {
        let kind: ProviderKind = settings
            .provider
            .parse()
            .map_err(|_| ConfigurationError::UnknownProvider(settings.provider.clone()))?;

        let max_tokens = usize::try_from(settings.max_tokens)
            .ok()
            .filter(|&n| n > 0)
            .ok_or(ConfigurationError::NonPositiveMaxTokens)?;

        let provider = match kind {
            ProviderKind::Local => ModelProvider::Local {
                endpoint_url: settings.local_url,
            },
            ProviderKind::Online => ModelProvider::Online {
                endpoint_url: settings.api_url,
                api_key: settings.api_key,
            },
        };

        ModelConfig::new(provider, settings.model_name, max_tokens)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    pub max_attempts: u32,
    pub retry_delay_secs: u64,
    pub local_base_timeout_secs: u64,
    pub online_base_timeout_secs: u64,
    pub connection_test_timeout_secs: u64,
    pub streaming: bool,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay_secs: 2,
            local_base_timeout_secs: 120,
            online_base_timeout_secs: 300,
            connection_test_timeout_secs: 10,
            streaming: false,
        }
    }
}

impl GatewaySettings {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    pub fn connection_test_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_test_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub local_deadline_secs: u64,
    pub online_deadline_secs: u64,
    /// Return the stored result when a completed record exists for the same file hash.
    pub reuse_completed_analyses: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            local_deadline_secs: 45 * 60,
            online_deadline_secs: 30 * 60,
            reuse_completed_analyses: false,
        }
    }
}

impl AnalysisSettings {
    pub fn deadline_for(&self, kind: ProviderKind) -> Duration {
        match kind {
            ProviderKind::Local => Duration::from_secs(self.local_deadline_secs),
            ProviderKind::Online => Duration::from_secs(self.online_deadline_secs),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info,pactum=debug".to_string(),
            enable_json: false,
        }
    }
}
