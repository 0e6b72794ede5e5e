use chrono::{DateTime, Utc};

use super::{ModelConfig, ProviderKind, RecordId, RecordStatus};

/// Bookkeeping entry for one analysed file, keyed by content hash.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRecord {
    pub id: RecordId,
    pub filename: String,
    pub file_hash: String,
    pub file_size: u64,
    pub status: RecordStatus,
    pub provider: ProviderKind,
    pub model_name: String,
    pub max_tokens: usize,
    pub analysis_result: Option<String>,
    pub character_count: usize,
    pub estimated_tokens: usize,
    pub fragment_count: usize,
    pub processing_seconds: f64,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub analyzed_at: Option<DateTime<Utc>>,
}

impl AnalysisRecord {
    pub fn new(filename: String, file_hash: String, file_size: u64, config: &ModelConfig) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::new(),
            filename,
            file_hash,
            file_size,
            status: RecordStatus::Pending,
            provider: config.kind(),
            model_name: config.model_name().to_string(),
            max_tokens: config.requested_max_output_tokens(),
            analysis_result: None,
            character_count: 0,
            estimated_tokens: 0,
            fragment_count: 0,
            processing_seconds: 0.0,
            error_message: None,
            created_at: now,
            updated_at: now,
            analyzed_at: None,
        }
    }

    pub fn mark_analyzing(&mut self) {
        self.status = RecordStatus::Analyzing;
        self.error_message = None;
        self.updated_at = Utc::now();
    }

    pub fn mark_completed(
        &mut self,
        result: String,
        character_count: usize,
        estimated_tokens: usize,
        fragment_count: usize,
        processing_seconds: f64,
    ) {
        let now = Utc::now();
        self.status = RecordStatus::Completed;
        self.analysis_result = Some(result);
        self.character_count = character_count;
        self.estimated_tokens = estimated_tokens;
        self.fragment_count = fragment_count;
        self.processing_seconds = processing_seconds;
        self.analyzed_at = Some(now);
        self.updated_at = now;
    }

    pub fn mark_failed(&mut self, error_message: impl Into<String>) {
        self.status = RecordStatus::Failed;
        self.error_message = Some(error_message.into());
        self.updated_at = Utc::now();
    }

    /// Stored analysis text, if this record completed with a non-empty result.
    pub fn completed_result(&self) -> Option<&str> {
        match (self.status, self.analysis_result.as_deref()) {
            (RecordStatus::Completed, Some(text)) if !text.trim().is_empty() => Some(text),
            _ => None,
        }
    }
}
