use crate::application::ports::ModelGatewayError;

use super::wire::{OllamaChatResponse, OpenAiChatResponse};

/// Extracts the answer text from one provider's non-streaming body shape.
pub trait ResponseDecoder: Send + Sync {
    fn name(&self) -> &'static str;

    fn decode(&self, body: &str) -> Result<String, String>;
}

/// `{"message": {"content": "..."}}`. Empty content is rejected so that a
/// body carrying both shapes falls through to the next decoder.
pub struct OllamaDecoder;

impl ResponseDecoder for OllamaDecoder {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn decode(&self, body: &str) -> Result<String, String> {
        let parsed: OllamaChatResponse = serde_json::from_str(body).map_err(|e| e.to_string())?;
        match parsed.message.content {
            Some(content) if !content.is_empty() => Ok(content),
            _ => Err("message has no content".to_string()),
        }
    }
}

/// `{"choices": [{"message": {"content": "..."}}]}`.
pub struct OpenAiDecoder;

impl ResponseDecoder for OpenAiDecoder {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn decode(&self, body: &str) -> Result<String, String> {
        let parsed: OpenAiChatResponse = serde_json::from_str(body).map_err(|e| e.to_string())?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| "no choices with message content".to_string())
    }
}

/// Ordered list of decoders; the first success wins.
pub struct DecoderCascade {
    decoders: Vec<Box<dyn ResponseDecoder>>,
}

impl DecoderCascade {
    pub fn new(decoders: Vec<Box<dyn ResponseDecoder>>) -> Self {
        Self { decoders }
    }

    pub fn decode(&self, body: &str) -> Result<String, ModelGatewayError> {
        let mut failures = Vec::with_capacity(self.decoders.len());

        for decoder in &self.decoders {
            match decoder.decode(body) {
                Ok(content) if content.trim().is_empty() => {
                    return Err(ModelGatewayError::EmptyResponse);
                }
                Ok(content) => {
                    tracing::debug!(decoder = decoder.name(), "Response decoded");
                    return Ok(content);
                }
                Err(reason) => failures.push(format!("{}: {}", decoder.name(), reason)),
            }
        }

        Err(ModelGatewayError::Parse {
            reason: failures.join("; "),
            body: body.to_string(),
        })
    }
}

impl Default for DecoderCascade {
    fn default() -> Self {
        Self::new(vec![Box::new(OllamaDecoder), Box::new(OpenAiDecoder)])
    }
}
