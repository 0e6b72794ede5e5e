//! Request and response bodies exchanged with chat-completion endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::{ChatMessage, OutputTokenField};

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<usize>,
}

impl<'a> ChatRequest<'a> {
    pub fn new(
        model: &'a str,
        messages: &'a [ChatMessage],
        field: OutputTokenField,
        max_output_tokens: usize,
        stream: bool,
    ) -> Self {
        let (max_tokens, max_completion_tokens) = match field {
            OutputTokenField::MaxTokens => (Some(max_output_tokens), None),
            OutputTokenField::MaxCompletionTokens => (None, Some(max_output_tokens)),
        };
        Self {
            model,
            messages,
            stream,
            max_tokens,
            max_completion_tokens,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct WireMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Ollama-style body: `{"message": {"content": ...}}`.
#[derive(Debug, Deserialize)]
pub struct OllamaChatResponse {
    pub message: WireMessage,
}

/// OpenAI-style body: `{"choices": [{"message": {"content": ...}}]}`.
#[derive(Debug, Deserialize)]
pub struct OpenAiChatResponse {
    pub choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAiChoice {
    #[serde(default)]
    pub message: Option<WireMessage>,
}

/// One streamed event in either framing.
#[derive(Debug, Deserialize)]
pub struct StreamEvent {
    #[serde(default)]
    pub message: Option<WireMessage>,
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
    #[serde(default)]
    pub done: bool,
}

#[derive(Debug, Deserialize)]
pub struct StreamChoice {
    #[serde(default)]
    pub delta: Option<WireMessage>,
}

impl StreamEvent {
    pub fn content(&self) -> Option<&str> {
        self.message
            .as_ref()
            .and_then(|m| m.content.as_deref())
            .or_else(|| {
                self.choices
                    .first()
                    .and_then(|c| c.delta.as_ref())
                    .and_then(|d| d.content.as_deref())
            })
    }
}
