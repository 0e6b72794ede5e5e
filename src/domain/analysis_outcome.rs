use std::time::Duration;

/// Result of one orchestration run, as reported to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub success: bool,
    pub content: Option<String>,
    pub error: Option<String>,
    pub duration: Duration,
    pub fragment_count: usize,
}

impl AnalysisOutcome {
    pub fn succeeded(content: String, duration: Duration, fragment_count: usize) -> Self {
        Self {
            success: true,
            content: Some(content),
            error: None,
            duration,
            fragment_count,
        }
    }

    pub fn failed(error: impl ToString, duration: Duration) -> Self {
        Self {
            success: false,
            content: None,
            error: Some(error.to_string()),
            duration,
            fragment_count: 0,
        }
    }
}
