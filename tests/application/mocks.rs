use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::path::Path;
use std::time::Duration;

use pactum::application::ports::{
    AnalysisRecordRepository, ModelGateway, ModelGatewayError, RepositoryError, TextExtractor,
    TextExtractorError,
};
use pactum::domain::{AnalysisRecord, ChatMessage, ModelConfig, RecordId};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub messages: Vec<ChatMessage>,
    pub max_tokens: usize,
}

impl RecordedCall {
    pub fn user_content(&self) -> &str {
        self.messages
            .last()
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }
}

type Responder = Box<dyn Fn(&[ChatMessage]) -> Result<String, ModelGatewayError> + Send + Sync>;

pub struct MockGateway {
    responder: Responder,
    connection_fails: bool,
    delay: Option<Duration>,
    calls: Mutex<Vec<RecordedCall>>,
    connection_tests: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockGateway {
    pub fn new(
        responder: impl Fn(&[ChatMessage]) -> Result<String, ModelGatewayError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            connection_fails: false,
            delay: None,
            calls: Mutex::new(Vec::new()),
            connection_tests: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Answers map-phase prompts with `fragment` and everything else with `report`.
    pub fn contract_analyst(fragment: &'static str, report: &'static str) -> Self {
        Self::new(move |messages| {
            let user = messages.last().map(|m| m.content.as_str()).unwrap_or_default();
            if user.starts_with("Part ") {
                Ok(fragment.to_string())
            } else {
                Ok(report.to_string())
            }
        })
    }

    pub fn with_failing_connection(mut self) -> Self {
        self.connection_fails = true;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn connection_tests(&self) -> usize {
        self.connection_tests.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ModelGateway for MockGateway {
    async fn send_chat(
        &self,
        _config: &ModelConfig,
        messages: &[ChatMessage],
        max_tokens: usize,
        cancel: &CancellationToken,
    ) -> Result<String, ModelGatewayError> {
        self.calls.lock().unwrap().push(RecordedCall {
            messages: messages.to_vec(),
            max_tokens,
        });

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let result = match self.delay {
            Some(delay) => tokio::select! {
                _ = cancel.cancelled() => Err(ModelGatewayError::Cancelled),
                _ = tokio::time::sleep(delay) => (self.responder)(messages),
            },
            None => (self.responder)(messages),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn test_connection(
        &self,
        _config: &ModelConfig,
        _cancel: &CancellationToken,
    ) -> Result<(), ModelGatewayError> {
        self.connection_tests.fetch_add(1, Ordering::SeqCst);
        if self.connection_fails {
            return Err(ModelGatewayError::Unavailable(503));
        }
        Ok(())
    }
}

pub struct MockExtractor {
    text: Result<String, String>,
    calls: AtomicUsize,
}

impl MockExtractor {
    pub fn returning(text: impl Into<String>) -> Self {
        Self {
            text: Ok(text.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            text: Err(message.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TextExtractor for MockExtractor {
    async fn extract_text(&self, _path: &Path) -> Result<String, TextExtractorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.text
            .clone()
            .map_err(TextExtractorError::ExtractionFailed)
    }
}

pub struct FailingRepository;

#[async_trait::async_trait]
impl AnalysisRecordRepository for FailingRepository {
    async fn create(&self, _record: &AnalysisRecord) -> Result<RecordId, RepositoryError> {
        Err(RepositoryError::ConnectionFailed("database offline".to_string()))
    }

    async fn update(&self, _record: &AnalysisRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::ConnectionFailed("database offline".to_string()))
    }

    async fn get_by_hash(
        &self,
        _file_hash: &str,
    ) -> Result<Option<AnalysisRecord>, RepositoryError> {
        Err(RepositoryError::ConnectionFailed("database offline".to_string()))
    }

    async fn get_by_id(&self, _id: RecordId) -> Result<Option<AnalysisRecord>, RepositoryError> {
        Err(RepositoryError::ConnectionFailed("database offline".to_string()))
    }

    async fn list_recent(&self, _limit: usize) -> Result<Vec<AnalysisRecord>, RepositoryError> {
        Err(RepositoryError::ConnectionFailed("database offline".to_string()))
    }
}

/// Three 2998-byte paragraphs separated by blank lines: 8998 bytes in total.
pub fn three_paragraph_contract() -> String {
    let paragraph = format!("{}.", "a".repeat(2997));
    [paragraph.as_str(), paragraph.as_str(), paragraph.as_str()].join("\n\n")
}
