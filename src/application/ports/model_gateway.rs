use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::{ChatMessage, ConfigurationError, ModelConfig};

/// Chat-completion access to a local or online model.
///
/// Implementations hide request and response shape differences between
/// providers and return the model's answer as plain text. Cancelling the
/// token aborts the in-flight request and any pending retry.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn send_chat(
        &self,
        config: &ModelConfig,
        messages: &[ChatMessage],
        max_tokens: usize,
        cancel: &CancellationToken,
    ) -> Result<String, ModelGatewayError>;

    /// Cheap reachability check. Any HTTP exchange below status 500 counts as reachable.
    async fn test_connection(
        &self,
        config: &ModelConfig,
        cancel: &CancellationToken,
    ) -> Result<(), ModelGatewayError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ModelGatewayError {
    #[error("configuration: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("timeout: {0}")]
    Timeout(String),
    #[error("timeout: run deadline exceeded before the model responded")]
    Cancelled,
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("server error (status {status}): {body}")]
    Server { status: u16, body: String },
    #[error("client error (status {status}): {body}")]
    Client { status: u16, body: String },
    #[error("model service unavailable (status {0})")]
    Unavailable(u16),
    #[error("unrecognized response ({reason}); body: {body}")]
    Parse { reason: String, body: String },
    #[error("model returned an empty response")]
    EmptyResponse,
}

impl ModelGatewayError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Cancelled)
    }
}
