use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::application::ports::{
    AnalysisRecordRepository, ModelGateway, ModelGatewayError, TextExtractor, TextExtractorError,
    TextSplitter,
};
use crate::config::AnalysisSettings;
use crate::domain::model_envelope::{CHARS_PER_TOKEN, PHASE1_MAX_TOKENS};
use crate::domain::{
    AnalysisFragmentResult, AnalysisOutcome, AnalysisRecord, ChatMessage, ConfigurationError,
    ModelConfig,
};

use super::analysis_prompts::AnalysisPrompts;
use super::budget_calculator::{
    consolidation_output_budget, estimate_tokens, fits_single_online_request, max_chunk_chars,
    single_request_output_budget,
};
use super::consolidation::{build_consolidation_prompt, prepare_fragments};
use super::fragment_cleaner::clean_fragment;

/// A file to analyse, identified by the SHA-256 of its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub path: PathBuf,
    pub filename: String,
    pub file_hash: String,
    pub file_size: u64,
}

impl AnalysisRequest {
    /// Reads the file once to fingerprint it.
    pub async fn for_file(path: impl AsRef<Path>) -> Result<Self, std::io::Error> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            path: path.to_path_buf(),
            filename,
            file_hash: hex::encode(Sha256::digest(&bytes)),
            file_size: bytes.len() as u64,
        })
    }
}

/// Extracts a document, analyses it with one request or a map/reduce over
/// fragments, and keeps the analysis record in step.
pub struct AnalysisService {
    extractor: Arc<dyn TextExtractor>,
    gateway: Arc<dyn ModelGateway>,
    repository: Arc<dyn AnalysisRecordRepository>,
    splitter: Arc<dyn TextSplitter>,
    prompts: AnalysisPrompts,
    reuse_completed_analyses: bool,
}

struct PipelineOutput {
    content: String,
    character_count: usize,
    fragment_count: usize,
}

impl AnalysisService {
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        gateway: Arc<dyn ModelGateway>,
        repository: Arc<dyn AnalysisRecordRepository>,
        splitter: Arc<dyn TextSplitter>,
    ) -> Self {
        Self {
            extractor,
            gateway,
            repository,
            splitter,
            prompts: AnalysisPrompts::default(),
            reuse_completed_analyses: false,
        }
    }

    pub fn with_prompts(mut self, prompts: AnalysisPrompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Applies the configured cache policy for completed records.
    pub fn with_settings(mut self, settings: &AnalysisSettings) -> Self {
        self.reuse_completed_analyses = settings.reuse_completed_analyses;
        self
    }

    pub async fn analyze(
        &self,
        request: &AnalysisRequest,
        config: &ModelConfig,
        cancel: &CancellationToken,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let span = tracing::info_span!(
            "analysis",
            filename = %request.filename,
            file_hash = %request.file_hash,
            provider = %config.kind(),
            model = %config.model_name(),
        );
        self.analyze_inner(request, config, cancel)
            .instrument(span)
            .await
    }

    async fn analyze_inner(
        &self,
        request: &AnalysisRequest,
        config: &ModelConfig,
        cancel: &CancellationToken,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let started = Instant::now();
        let mut record = self.open_record(request, config).await;

        if self.reuse_completed_analyses {
            if let Some(stored) = record.as_ref().and_then(reusable_result) {
                tracing::info!("Returning stored analysis for unchanged file");
                return Ok(stored);
            }
        }

        match self.run_pipeline(request, config, cancel, &mut record).await {
            Ok(output) => {
                let elapsed = started.elapsed();
                let content = if output.content.trim().is_empty() {
                    tracing::warn!("Analysis result is empty, using fallback message");
                    self.prompts.empty_result_fallback.clone()
                } else {
                    output.content
                };

                if let Some(record) = record.as_mut() {
                    record.mark_completed(
                        content.clone(),
                        output.character_count,
                        output.character_count / CHARS_PER_TOKEN,
                        output.fragment_count,
                        elapsed.as_secs_f64(),
                    );
                    self.persist(record).await;
                }

                tracing::info!(
                    fragments = output.fragment_count,
                    elapsed_secs = elapsed.as_secs(),
                    "Analysis completed"
                );
                Ok(AnalysisOutcome::succeeded(
                    content,
                    elapsed,
                    output.fragment_count,
                ))
            }
            Err(e) => {
                tracing::error!(error = %e, "Analysis failed");
                if let Some(record) = record.as_mut() {
                    record.mark_failed(e.to_string());
                    self.persist(record).await;
                }
                Err(e)
            }
        }
    }

    async fn run_pipeline(
        &self,
        request: &AnalysisRequest,
        config: &ModelConfig,
        cancel: &CancellationToken,
        record: &mut Option<AnalysisRecord>,
    ) -> Result<PipelineOutput, AnalysisError> {
        self.gateway
            .test_connection(config, cancel)
            .await
            .map_err(AnalysisError::Connection)?;

        if let Some(record) = record.as_mut() {
            record.mark_analyzing();
            self.persist(record).await;
        }

        let text = self
            .extractor
            .extract_text(&request.path)
            .await
            .map_err(AnalysisError::Extraction)?;
        if text.trim().is_empty() {
            return Err(AnalysisError::Extraction(TextExtractorError::NoTextFound(
                request.filename.clone(),
            )));
        }

        tracing::info!(characters = text.len(), "Starting document analysis");
        let (content, fragment_count) = self.generate(&text, config, cancel).await?;

        Ok(PipelineOutput {
            content,
            character_count: text.len(),
            fragment_count,
        })
    }

    /// Returns the analysis text and the number of fragments it was built from.
    async fn generate(
        &self,
        text: &str,
        config: &ModelConfig,
        cancel: &CancellationToken,
    ) -> Result<(String, usize), AnalysisError> {
        let document_tokens = estimate_tokens(text);

        if config.is_online() && fits_single_online_request(document_tokens) {
            tracing::info!(tokens = document_tokens, "Analysing document in a single request");
            let content = self.analyze_single(text, config, cancel).await?;
            return Ok((content, 1));
        }

        tracing::info!(tokens = document_tokens, "Analysing document in fragments");
        let results = self.analyze_fragments(text, config, cancel).await?;
        let fragment_count = results.len();
        let content = self.consolidate(&results, config, cancel).await?;
        Ok((content, fragment_count))
    }

    async fn analyze_single(
        &self,
        text: &str,
        config: &ModelConfig,
        cancel: &CancellationToken,
    ) -> Result<String, AnalysisError> {
        let input_tokens = estimate_tokens(&self.prompts.system)
            + estimate_tokens(&self.prompts.single_query)
            + estimate_tokens(text);
        let max_tokens = single_request_output_budget(input_tokens);

        let messages = [
            ChatMessage::system(self.prompts.system.as_str()),
            ChatMessage::user(format!("{}\n\n{}", self.prompts.single_query, text)),
        ];

        let response = self
            .gateway
            .send_chat(config, &messages, max_tokens, cancel)
            .await
            .map_err(AnalysisError::SingleRequest)?;
        tracing::info!(characters = response.len(), "Single request answered");
        Ok(response)
    }

    async fn analyze_fragments(
        &self,
        text: &str,
        config: &ModelConfig,
        cancel: &CancellationToken,
    ) -> Result<Vec<AnalysisFragmentResult>, AnalysisError> {
        let chunk_chars = max_chunk_chars(&self.prompts.system);
        let fragments = self.splitter.split(text, chunk_chars);
        let total = fragments.len();
        tracing::debug!(chunk_chars, fragments = total, "Document split");

        let mut results = Vec::with_capacity(total);
        for fragment in &fragments {
            let position = fragment.index + 1;
            tracing::info!(
                fragment = position,
                total,
                characters = fragment.len(),
                "Analysing fragment"
            );

            let messages = [
                ChatMessage::system(self.prompts.system.as_str()),
                ChatMessage::user(format!(
                    "Part {}/{} of the contract:\n{}\n\nInstruction: {}",
                    position, total, fragment.text, self.prompts.fragment_query
                )),
            ];

            let response = self
                .gateway
                .send_chat(config, &messages, PHASE1_MAX_TOKENS, cancel)
                .await
                .map_err(|source| AnalysisError::Fragment {
                    position,
                    total,
                    source,
                })?;

            results.push(AnalysisFragmentResult::new(
                position,
                total,
                clean_fragment(&response),
            ));
        }

        Ok(results)
    }

    async fn consolidate(
        &self,
        results: &[AnalysisFragmentResult],
        config: &ModelConfig,
        cancel: &CancellationToken,
    ) -> Result<String, AnalysisError> {
        let fragments = prepare_fragments(results);
        let prompt = build_consolidation_prompt(&self.prompts.consolidation, &fragments);
        let input_tokens = estimate_tokens(&prompt);
        let max_tokens = consolidation_output_budget(config.kind(), input_tokens);
        tracing::info!(input_tokens, max_tokens, "Consolidating fragments");

        let messages = [
            ChatMessage::system(self.prompts.system.as_str()),
            ChatMessage::user(prompt),
        ];

        let response = self
            .gateway
            .send_chat(config, &messages, max_tokens, cancel)
            .await
            .map_err(AnalysisError::Consolidation)?;
        Ok(clean_fragment(&response))
    }

    /// Adopts the record for this file hash or creates one. Store failures
    /// leave the run without a record.
    async fn open_record(
        &self,
        request: &AnalysisRequest,
        config: &ModelConfig,
    ) -> Option<AnalysisRecord> {
        match self.repository.get_by_hash(&request.file_hash).await {
            Ok(Some(existing)) => {
                tracing::info!(
                    record_id = %existing.id,
                    status = %existing.status,
                    "Using existing analysis record"
                );
                return Some(existing);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Failed to look up existing analysis record"),
        }

        let record = AnalysisRecord::new(
            request.filename.clone(),
            request.file_hash.clone(),
            request.file_size,
            config,
        );
        match self.repository.create(&record).await {
            Ok(id) => {
                tracing::debug!(record_id = %id, "Analysis record created");
                Some(record)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to create analysis record, continuing without one");
                None
            }
        }
    }

    async fn persist(&self, record: &AnalysisRecord) {
        tracing::debug!(status = %record.status, "Record status transition");
        if let Err(e) = self.repository.update(record).await {
            tracing::warn!(error = %e, record_id = %record.id, "Failed to update analysis record");
        }
    }
}

fn reusable_result(record: &AnalysisRecord) -> Option<AnalysisOutcome> {
    record.completed_result().map(|text| {
        AnalysisOutcome::succeeded(
            text.to_string(),
            Duration::from_secs_f64(record.processing_seconds.max(0.0)),
            record.fragment_count,
        )
    })
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("invalid model configuration: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("model connection test failed: {0}")]
    Connection(ModelGatewayError),
    #[error("failed to extract text: {0}")]
    Extraction(TextExtractorError),
    #[error("error processing single request: {0}")]
    SingleRequest(ModelGatewayError),
    #[error("error processing part {position}/{total}: {source}")]
    Fragment {
        position: usize,
        total: usize,
        source: ModelGatewayError,
    },
    #[error("error in consolidation: {0}")]
    Consolidation(ModelGatewayError),
    #[error("timeout: analysis exceeded its {}s deadline", .0.as_secs())]
    DeadlineExceeded(Duration),
}

impl AnalysisError {
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::DeadlineExceeded(_) => true,
            Self::Connection(e)
            | Self::SingleRequest(e)
            | Self::Consolidation(e)
            | Self::Fragment { source: e, .. } => e.is_timeout(),
            Self::Configuration(_) | Self::Extraction(_) => false,
        }
    }
}
