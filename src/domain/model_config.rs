use std::fmt;

use super::ProviderKind;

/// Provider-specific connection details.
#[derive(Clone, PartialEq, Eq)]
pub enum ModelProvider {
    Local { endpoint_url: String },
    Online { endpoint_url: String, api_key: String },
}

impl ModelProvider {
    pub fn kind(&self) -> ProviderKind {
        match self {
            ModelProvider::Local { .. } => ProviderKind::Local,
            ModelProvider::Online { .. } => ProviderKind::Online,
        }
    }

    pub fn endpoint_url(&self) -> &str {
        match self {
            ModelProvider::Local { endpoint_url } | ModelProvider::Online { endpoint_url, .. } => {
                endpoint_url
            }
        }
    }
}

impl fmt::Debug for ModelProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelProvider::Local { endpoint_url } => f
                .debug_struct("Local")
                .field("endpoint_url", endpoint_url)
                .finish(),
            ModelProvider::Online { endpoint_url, .. } => f
                .debug_struct("Online")
                .field("endpoint_url", endpoint_url)
                .field("api_key", &"[REDACTED]")
                .finish(),
        }
    }
}

/// Validated model configuration. Only constructible through [`ModelConfig::new`],
/// so holding one means the invariants below hold:
///
/// - the endpoint URL is non-empty,
/// - online providers carry a non-empty API key and model name,
/// - the requested output budget is positive.
///
/// A local provider may omit the model name; the gateway rejects such a
/// config at request time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    provider: ModelProvider,
    model_name: String,
    requested_max_output_tokens: usize,
}

impl ModelConfig {
    pub fn new(
        provider: ModelProvider,
        model_name: impl Into<String>,
        requested_max_output_tokens: usize,
    ) -> Result<Self, ConfigurationError> {
        let model_name = model_name.into().trim().to_string();

        match &provider {
            ModelProvider::Local { endpoint_url } => {
                if endpoint_url.trim().is_empty() {
                    return Err(ConfigurationError::MissingEndpoint(ProviderKind::Local));
                }
            }
            ModelProvider::Online {
                endpoint_url,
                api_key,
            } => {
                if endpoint_url.trim().is_empty() {
                    return Err(ConfigurationError::MissingEndpoint(ProviderKind::Online));
                }
                if api_key.trim().is_empty() {
                    return Err(ConfigurationError::MissingApiKey);
                }
                if model_name.is_empty() {
                    return Err(ConfigurationError::MissingModelName);
                }
            }
        }

        if requested_max_output_tokens == 0 {
            return Err(ConfigurationError::NonPositiveMaxTokens);
        }

        Ok(Self {
            provider,
            model_name,
            requested_max_output_tokens,
        })
    }

    pub fn local(
        endpoint_url: impl Into<String>,
        model_name: impl Into<String>,
        requested_max_output_tokens: usize,
    ) -> Result<Self, ConfigurationError> {
        Self::new(
            ModelProvider::Local {
                endpoint_url: endpoint_url.into(),
            },
            model_name,
            requested_max_output_tokens,
        )
    }

    pub fn online(
        endpoint_url: impl Into<String>,
        api_key: impl Into<String>,
        model_name: impl Into<String>,
        requested_max_output_tokens: usize,
    ) -> Result<Self, ConfigurationError> {
        Self::new(
            ModelProvider::Online {
                endpoint_url: endpoint_url.into(),
                api_key: api_key.into(),
            },
            model_name,
            requested_max_output_tokens,
        )
    }

    pub fn provider(&self) -> &ModelProvider {
        &self.provider
    }

    pub fn kind(&self) -> ProviderKind {
        self.provider.kind()
    }

    pub fn is_online(&self) -> bool {
        self.kind().is_online()
    }

    pub fn endpoint_url(&self) -> &str {
        self.provider.endpoint_url()
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn requested_max_output_tokens(&self) -> usize {
        self.requested_max_output_tokens
    }

    /// `Bearer <key>` for online providers, `None` for local ones.
    pub fn authorization_header(&self) -> Option<String> {
        match &self.provider {
            ModelProvider::Online { api_key, .. } => Some(format!("Bearer {}", api_key)),
            ModelProvider::Local { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("unknown provider type: {0} (expected 'local' or 'online')")]
    UnknownProvider(String),
    #[error("endpoint url is required for {0} models")]
    MissingEndpoint(ProviderKind),
    #[error("api key is required for online models")]
    MissingApiKey,
    #[error("model name is not configured")]
    MissingModelName,
    #[error("max tokens must be positive")]
    NonPositiveMaxTokens,
}
