use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{Stream, StreamExt};
use reqwest::Client;

/// A JSON POST with a per-request timeout.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: serde_json::Value,
    pub timeout: Duration,
}

impl JsonRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

pub struct StreamingResponse {
    pub status: u16,
    pub body: ByteStream,
}

/// The HTTP boundary of the model gateway.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn post_json(&self, request: &JsonRequest) -> Result<HttpResponse, TransportError>;

    async fn post_json_stream(
        &self,
        request: &JsonRequest,
    ) -> Result<StreamingResponse, TransportError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request failed: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else {
            TransportError::Other(e.to_string())
        }
    }
}

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    fn build(&self, request: &JsonRequest) -> reqwest::RequestBuilder {
        request.headers.iter().fold(
            self.client
                .post(&request.url)
                .timeout(request.timeout)
                .json(&request.body),
            |builder, (name, value)| builder.header(name.as_str(), value.as_str()),
        )
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(&self, request: &JsonRequest) -> Result<HttpResponse, TransportError> {
        let response = self.build(request).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }

    async fn post_json_stream(
        &self,
        request: &JsonRequest,
    ) -> Result<StreamingResponse, TransportError> {
        let response = self.build(request).send().await?;
        let status = response.status().as_u16();
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(TransportError::from));
        Ok(StreamingResponse {
            status,
            body: Box::pin(body),
        })
    }
}
