//! Conversions from character counts to token budgets. The model endpoints
//! never report token usage, so every figure here is a deterministic
//! estimate derived from the envelope in [`crate::domain::model_envelope`].

use crate::domain::ProviderKind;
use crate::domain::model_envelope::{
    CHARS_PER_TOKEN, DEFAULT_CHUNK_SIZE, FORECAST_MAX_PHASE2_OUTPUT_TOKENS, LOCAL_CONTEXT_WINDOW,
    LOCAL_MAX_INPUT_TOKENS, MAX_OUTPUT_TOKENS, MIN_CHUNK_SIZE, MIN_CONSOLIDATION_TOKENS,
    MIN_OUTPUT_TOKENS, ONLINE_CONTEXT_WINDOW, SAFETY_MARGIN, USER_INSTRUCTION_TOKENS,
};
use crate::domain::ForecastWarning;

/// Byte length divided by three, rounded down.
pub fn estimate_tokens(text: &str) -> usize {
    text.len() / CHARS_PER_TOKEN
}

/// Largest fragment, in characters, that fits a local model alongside the
/// system prompt and the per-fragment instruction.
pub fn max_chunk_chars(system_prompt: &str) -> usize {
    let available = LOCAL_MAX_INPUT_TOKENS
        .saturating_sub(estimate_tokens(system_prompt))
        .saturating_sub(USER_INSTRUCTION_TOKENS);
    (available * CHARS_PER_TOKEN).clamp(MIN_CHUNK_SIZE, DEFAULT_CHUNK_SIZE)
}

pub fn recommended_max_tokens(chunks: usize, character_count: usize) -> usize {
    let mut recommended = 800;
    if chunks > 10 {
        recommended = 1_000;
    }
    if chunks > 20 {
        recommended = 1_500;
    }
    if character_count > 50_000 {
        recommended = 2_000;
    }
    recommended
}

pub fn fits_single_online_request(input_tokens: usize) -> bool {
    input_tokens < ONLINE_CONTEXT_WINDOW - SAFETY_MARGIN - MAX_OUTPUT_TOKENS
}

pub fn single_request_output_budget(input_tokens: usize) -> usize {
    ONLINE_CONTEXT_WINDOW
        .saturating_sub(input_tokens)
        .saturating_sub(SAFETY_MARGIN)
        .max(MIN_OUTPUT_TOKENS)
        .min(MAX_OUTPUT_TOKENS)
}

pub fn consolidation_output_budget(kind: ProviderKind, input_tokens: usize) -> usize {
    context_window(kind)
        .saturating_sub(input_tokens)
        .saturating_sub(SAFETY_MARGIN)
        .clamp(MIN_CONSOLIDATION_TOKENS, MAX_OUTPUT_TOKENS)
}

pub fn context_window(kind: ProviderKind) -> usize {
    match kind {
        ProviderKind::Local => LOCAL_CONTEXT_WINDOW,
        ProviderKind::Online => ONLINE_CONTEXT_WINDOW,
    }
}

/// Chunk size assumed by the dry-run forecast: half the local input budget.
pub fn forecast_chunk_chars() -> usize {
    DEFAULT_CHUNK_SIZE.min((LOCAL_MAX_INPUT_TOKENS / 2) * CHARS_PER_TOKEN)
}

/// Requested output budget clamped to what a forecast will assume.
pub fn forecast_output_tokens(requested: usize) -> usize {
    requested.clamp(MIN_OUTPUT_TOKENS, FORECAST_MAX_PHASE2_OUTPUT_TOKENS)
}

pub fn forecast_warning(chunks: usize, total_tokens: usize) -> Option<ForecastWarning> {
    if chunks > 30 {
        Some(ForecastWarning::VeryLargeDocument)
    } else if chunks > 15 {
        Some(ForecastWarning::LargeDocument)
    } else if total_tokens > 100_000 {
        Some(ForecastWarning::HighTokenUsage)
    } else {
        None
    }
}
