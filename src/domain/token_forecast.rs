use std::fmt;

use serde::Serialize;

/// Dry-run token and time forecast for analysing one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenForecast {
    pub character_count: usize,
    pub estimated_tokens: usize,
    pub chunks: usize,
    pub system_prompt_tokens: usize,
    pub phase1_tokens: usize,
    pub phase2_input_tokens: usize,
    pub phase2_output_tokens: usize,
    pub total_tokens: usize,
    pub recommended_max_tokens: usize,
    pub warning: Option<ForecastWarning>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastWarning {
    VeryLargeDocument,
    LargeDocument,
    HighTokenUsage,
}

impl ForecastWarning {
    pub fn message(&self) -> &'static str {
        match self {
            ForecastWarning::VeryLargeDocument => {
                "Very large document. The analysis may take more than 20 minutes. Consider splitting the document."
            }
            ForecastWarning::LargeDocument => {
                "Large document. The analysis may take 10-20 minutes."
            }
            ForecastWarning::HighTokenUsage => {
                "High token usage. Consider a model with a larger context window or a lower max tokens setting."
            }
        }
    }
}

impl fmt::Display for ForecastWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
