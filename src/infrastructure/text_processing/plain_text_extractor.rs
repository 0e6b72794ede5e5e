use std::path::Path;

use async_trait::async_trait;

use crate::application::ports::{TextExtractor, TextExtractorError};

use super::text_sanitizer::sanitize_extracted_text;

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    #[tracing::instrument(skip(self), fields(path = %path.display()))]
    async fn extract_text(&self, path: &Path) -> Result<String, TextExtractorError> {
        let data = tokio::fs::read(path).await?;
        let raw = String::from_utf8(data)
            .map_err(|e| TextExtractorError::ExtractionFailed(format!("not valid UTF-8: {e}")))?;

        let text = sanitize_extracted_text(&raw);
        if text.is_empty() {
            return Err(TextExtractorError::NoTextFound(path.display().to_string()));
        }
        Ok(text)
    }
}
