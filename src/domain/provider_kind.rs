use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Model provider family. Local endpoints are self-hosted (Ollama, LM Studio);
/// online endpoints are hosted OpenAI-compatible APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Local,
    Online,
}

/// Name of the request field carrying the output-token budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputTokenField {
    MaxTokens,
    MaxCompletionTokens,
}

impl OutputTokenField {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputTokenField::MaxTokens => "max_tokens",
            OutputTokenField::MaxCompletionTokens => "max_completion_tokens",
        }
    }
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Local => "local",
            ProviderKind::Online => "online",
        }
    }

    pub fn output_token_field(&self) -> OutputTokenField {
        match self {
            ProviderKind::Local => OutputTokenField::MaxTokens,
            ProviderKind::Online => OutputTokenField::MaxCompletionTokens,
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, ProviderKind::Online)
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(ProviderKind::Local),
            "online" => Ok(ProviderKind::Online),
            _ => Err(format!("Invalid provider kind: {}. Expected: local or online", s)),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
