use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{TextExtractor, TextExtractorError};

use super::text_sanitizer::sanitize_extracted_text;

const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Extracts the text layer of a PDF. Scanned documents without one yield
/// [`TextExtractorError::NoTextFound`].
#[derive(Debug, Clone)]
pub struct PdfExtractor {
    timeout: Duration,
}

impl PdfExtractor {
    pub fn new() -> Self {
        Self {
            timeout: EXTRACTION_TIMEOUT,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Page texts, split on the form feeds pdf-extract emits between pages.
    fn extract_pages(path: &Path) -> Result<Vec<String>, TextExtractorError> {
        let text = pdf_extract::extract_text(path)
            .map_err(|e| TextExtractorError::ExtractionFailed(format!("failed to parse PDF: {e}")))?;

        Ok(text
            .split('\u{c}')
            .map(sanitize_extracted_text)
            .filter(|page| !page.is_empty())
            .collect())
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextExtractor for PdfExtractor {
    #[tracing::instrument(skip(self), fields(path = %path.display()))]
    async fn extract_text(&self, path: &Path) -> Result<String, TextExtractorError> {
        let owned: PathBuf = path.to_path_buf();

        let pages = tokio::time::timeout(
            self.timeout,
            tokio::task::spawn_blocking(move || Self::extract_pages(&owned)),
        )
        .await
        .map_err(|_| TextExtractorError::ExtractionFailed("PDF extraction timed out".to_string()))?
        .map_err(|e| TextExtractorError::ExtractionFailed(format!("task join error: {e}")))??;

        tracing::info!(page_count = pages.len(), "PDF text extraction complete");

        if pages.is_empty() {
            return Err(TextExtractorError::NoTextFound(path.display().to_string()));
        }
        Ok(pages.join("\n\n"))
    }
}
