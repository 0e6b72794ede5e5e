use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{TextExtractor, TextExtractorError, TextSplitter};
use crate::domain::TokenForecast;
use crate::domain::model_envelope::{CHARS_PER_TOKEN, PHASE1_MAX_TOKENS};

use super::analysis_prompts::AnalysisPrompts;
use super::budget_calculator::{
    estimate_tokens, fits_single_online_request, forecast_chunk_chars, forecast_output_tokens,
    forecast_warning, recommended_max_tokens,
};

/// Dry-run forecast of the tokens an analysis will consume. Never calls the model.
pub struct TokenEstimator {
    extractor: Arc<dyn TextExtractor>,
    splitter: Arc<dyn TextSplitter>,
    prompts: AnalysisPrompts,
}

impl TokenEstimator {
    pub fn new(extractor: Arc<dyn TextExtractor>, splitter: Arc<dyn TextSplitter>) -> Self {
        Self {
            extractor,
            splitter,
            prompts: AnalysisPrompts::default(),
        }
    }

    pub fn with_prompts(mut self, prompts: AnalysisPrompts) -> Self {
        self.prompts = prompts;
        self
    }

    pub async fn estimate_file(
        &self,
        path: &Path,
        requested_max_output_tokens: usize,
    ) -> Result<TokenForecast, EstimationError> {
        let text = self
            .extractor
            .extract_text(path)
            .await
            .map_err(EstimationError::Extraction)?;

        if text.trim().is_empty() {
            return Err(EstimationError::Extraction(TextExtractorError::NoTextFound(
                path.display().to_string(),
            )));
        }

        Ok(self.estimate(&text, requested_max_output_tokens))
    }

    pub fn estimate(&self, full_text: &str, requested_max_output_tokens: usize) -> TokenForecast {
        let character_count = full_text.len();
        let document_tokens = estimate_tokens(full_text);
        let system_prompt_tokens = estimate_tokens(&self.prompts.system);
        let output_tokens = forecast_output_tokens(requested_max_output_tokens);

        let forecast = if fits_single_online_request(document_tokens) {
            let input = system_prompt_tokens
                + estimate_tokens(&self.prompts.single_query)
                + document_tokens;
            let total_tokens = input + output_tokens;
            TokenForecast {
                character_count,
                estimated_tokens: document_tokens,
                chunks: 1,
                system_prompt_tokens,
                phase1_tokens: 0,
                phase2_input_tokens: input,
                phase2_output_tokens: output_tokens,
                total_tokens,
                recommended_max_tokens: output_tokens,
                warning: None,
            }
        } else {
            let chunk_chars = forecast_chunk_chars();
            let chunks = self.splitter.split(full_text, chunk_chars).len();
            let phase1_tokens =
                chunks * (system_prompt_tokens + chunk_chars / CHARS_PER_TOKEN + PHASE1_MAX_TOKENS);
            let phase2_input_tokens = system_prompt_tokens + chunks * PHASE1_MAX_TOKENS;
            let total_tokens = phase1_tokens + phase2_input_tokens + output_tokens;
            TokenForecast {
                character_count,
                estimated_tokens: document_tokens,
                chunks,
                system_prompt_tokens,
                phase1_tokens,
                phase2_input_tokens,
                phase2_output_tokens: output_tokens,
                total_tokens,
                recommended_max_tokens: recommended_max_tokens(chunks, character_count),
                warning: forecast_warning(chunks, total_tokens),
            }
        };

        tracing::debug!(
            chunks = forecast.chunks,
            total_tokens = forecast.total_tokens,
            warning = ?forecast.warning,
            "Token forecast computed"
        );
        forecast
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EstimationError {
    #[error("failed to extract text: {0}")]
    Extraction(TextExtractorError),
}
