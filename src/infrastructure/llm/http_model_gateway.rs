use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{ModelGateway, ModelGatewayError};
use crate::config::GatewaySettings;
use crate::domain::{ChatMessage, ConfigurationError, ModelConfig};
use crate::infrastructure::observability::log_preview;

use super::http_transport::{HttpTransport, JsonRequest, ReqwestTransport, TransportError};
use super::response_decoder::DecoderCascade;
use super::response_postprocessor::postprocess_response;
use super::sse_stream::SseAccumulator;
use super::timeout_policy::TimeoutPolicy;
use super::wire::ChatRequest;

const CONNECTION_TEST_PROMPT: &str = "test";
const CONNECTION_TEST_MAX_TOKENS: usize = 10;

/// [`ModelGateway`] over an OpenAI- or Ollama-compatible chat endpoint.
pub struct HttpModelGateway {
    transport: Arc<dyn HttpTransport>,
    settings: GatewaySettings,
    decoders: DecoderCascade,
}

impl HttpModelGateway {
    pub fn new(transport: Arc<dyn HttpTransport>, settings: GatewaySettings) -> Self {
        Self {
            transport,
            settings,
            decoders: DecoderCascade::default(),
        }
    }

    pub fn with_reqwest(settings: GatewaySettings) -> Self {
        Self::new(Arc::new(ReqwestTransport::new()), settings)
    }

    fn build_request(
        &self,
        config: &ModelConfig,
        messages: &[ChatMessage],
        max_tokens: usize,
        stream: bool,
        timeout: Duration,
    ) -> Result<JsonRequest, ModelGatewayError> {
        let body = ChatRequest::new(
            config.model_name(),
            messages,
            config.kind().output_token_field(),
            max_tokens,
            stream,
        );
        let body = serde_json::to_value(&body).map_err(|e| ModelGatewayError::Parse {
            reason: format!("failed to serialize request: {}", e),
            body: String::new(),
        })?;

        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if let Some(authorization) = config.authorization_header() {
            headers.push(("Authorization".to_string(), authorization));
        }

        Ok(JsonRequest {
            url: config.endpoint_url().to_string(),
            headers,
            body,
            timeout,
        })
    }

    async fn attempt(&self, request: &JsonRequest, stream: bool) -> Result<String, ModelGatewayError> {
        if stream {
            return self.attempt_streaming(request).await;
        }

        let response = self
            .transport
            .post_json(request)
            .await
            .map_err(transport_failure)?;

        check_status(response.status, &response.body)?;
        self.decoders.decode(&response.body)
    }

    async fn attempt_streaming(&self, request: &JsonRequest) -> Result<String, ModelGatewayError> {
        let mut response = self
            .transport
            .post_json_stream(request)
            .await
            .map_err(transport_failure)?;

        if response.status != 200 {
            let mut body = Vec::new();
            while let Some(chunk) = response.body.next().await {
                match chunk {
                    Ok(bytes) => body.extend_from_slice(&bytes),
                    Err(_) => break,
                }
            }
            check_status(response.status, &String::from_utf8_lossy(&body))?;
        }

        let mut accumulator = SseAccumulator::new();
        while let Some(chunk) = response.body.next().await {
            let bytes = chunk.map_err(transport_failure)?;
            accumulator.push(&bytes);
            if accumulator.is_finished() {
                break;
            }
        }
        accumulator.finish()
    }

    /// Sends with retry: 5xx, transport errors and timeouts retry after
    /// `retry_delay × attempt`; every other failure returns at once.
    async fn send_with_retry(
        &self,
        request: &JsonRequest,
        stream: bool,
        max_attempts: u32,
        cancel: &CancellationToken,
    ) -> Result<String, ModelGatewayError> {
        let max_attempts = max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            if attempt > 1 {
                let delay = self.settings.retry_delay() * (attempt - 1);
                tracing::info!(attempt, max_attempts, delay_secs = delay.as_secs(), "Retrying model request");
                tokio::select! {
                    _ = cancel.cancelled() => return Err(ModelGatewayError::Cancelled),
                    _ = tokio::time::sleep(delay) => {}
                }
            }

            let result = tokio::select! {
                _ = cancel.cancelled() => return Err(ModelGatewayError::Cancelled),
                result = self.attempt(request, stream) => result,
            };

            match result {
                Ok(content) => return Ok(content),
                Err(e) if is_retryable(&e) => {
                    tracing::warn!(attempt, max_attempts, error = %e, "Model request failed");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(exhausted(last_error, max_attempts))
    }
}

#[async_trait]
impl ModelGateway for HttpModelGateway {
    #[tracing::instrument(skip_all, fields(provider = %config.kind(), model = %config.model_name(), max_tokens = max_tokens))]
    async fn send_chat(
        &self,
        config: &ModelConfig,
        messages: &[ChatMessage],
        max_tokens: usize,
        cancel: &CancellationToken,
    ) -> Result<String, ModelGatewayError> {
        if config.model_name().is_empty() {
            return Err(ConfigurationError::MissingModelName.into());
        }
        if cancel.is_cancelled() {
            return Err(ModelGatewayError::Cancelled);
        }

        let timeout = TimeoutPolicy::for_kind(config.kind(), &self.settings).timeout_for(max_tokens);
        let stream = self.settings.streaming;
        let request = self.build_request(config, messages, max_tokens, stream, timeout)?;

        tracing::info!(
            endpoint = %config.endpoint_url(),
            token_field = config.kind().output_token_field().as_str(),
            timeout_secs = timeout.as_secs(),
            stream,
            "Sending chat request"
        );

        let content = self
            .send_with_retry(&request, stream, self.settings.max_attempts, cancel)
            .await?;

        tracing::debug!(
            characters = content.len(),
            preview = %log_preview(&content),
            "Raw model response"
        );
        Ok(postprocess_response(&content))
    }

    #[tracing::instrument(skip_all, fields(provider = %config.kind()))]
    async fn test_connection(
        &self,
        config: &ModelConfig,
        cancel: &CancellationToken,
    ) -> Result<(), ModelGatewayError> {
        let messages = [ChatMessage::user(CONNECTION_TEST_PROMPT)];
        let request = self.build_request(
            config,
            &messages,
            CONNECTION_TEST_MAX_TOKENS,
            false,
            self.settings.connection_test_timeout(),
        )?;

        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(ModelGatewayError::Cancelled),
            response = self.transport.post_json(&request) => response.map_err(transport_failure)?,
        };

        if response.status >= 500 {
            return Err(ModelGatewayError::Unavailable(response.status));
        }

        tracing::info!(
            endpoint = %config.endpoint_url(),
            status = response.status,
            "Model endpoint reachable"
        );
        Ok(())
    }
}

fn check_status(status: u16, body: &str) -> Result<(), ModelGatewayError> {
    match status {
        200 => Ok(()),
        500.. => Err(ModelGatewayError::Server {
            status,
            body: body.to_string(),
        }),
        _ => Err(ModelGatewayError::Client {
            status,
            body: body.to_string(),
        }),
    }
}

fn transport_failure(e: TransportError) -> ModelGatewayError {
    match e {
        TransportError::Timeout => {
            ModelGatewayError::Timeout("the server did not respond in time".to_string())
        }
        other => ModelGatewayError::Transport(other.to_string()),
    }
}

fn is_retryable(e: &ModelGatewayError) -> bool {
    matches!(
        e,
        ModelGatewayError::Server { .. }
            | ModelGatewayError::Transport(_)
            | ModelGatewayError::Timeout(_)
    )
}

fn exhausted(last_error: Option<ModelGatewayError>, attempts: u32) -> ModelGatewayError {
    match last_error {
        Some(ModelGatewayError::Timeout(_)) => ModelGatewayError::Timeout(format!(
            "no response after {} attempts, check the model endpoint configuration",
            attempts
        )),
        Some(ModelGatewayError::Server { status, body }) => ModelGatewayError::Server {
            status,
            body: format!("failed after {} attempts: {}", attempts, body),
        },
        Some(other) => {
            ModelGatewayError::Transport(format!("failed after {} attempts: {}", attempts, other))
        }
        None => ModelGatewayError::Transport(format!("failed after {} attempts", attempts)),
    }
}
