use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{TextExtractor, TextExtractorError};

use super::{PdfExtractor, PlainTextExtractor};

/// Dispatches on the lowercase file extension.
pub struct CompositeExtractor {
    extractors: HashMap<String, Arc<dyn TextExtractor>>,
}

impl CompositeExtractor {
    pub fn new(extractors: Vec<(&str, Arc<dyn TextExtractor>)>) -> Self {
        Self {
            extractors: extractors
                .into_iter()
                .map(|(ext, extractor)| (ext.to_lowercase(), extractor))
                .collect(),
        }
    }

    /// PDF plus `.txt` and `.md` plain text.
    pub fn with_defaults() -> Self {
        let pdf: Arc<dyn TextExtractor> = Arc::new(PdfExtractor::new());
        let plain: Arc<dyn TextExtractor> = Arc::new(PlainTextExtractor);
        Self::new(vec![
            ("pdf", pdf),
            ("txt", Arc::clone(&plain)),
            ("md", plain),
        ])
    }
}

#[async_trait]
impl TextExtractor for CompositeExtractor {
    async fn extract_text(&self, path: &Path) -> Result<String, TextExtractorError> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let extractor = self
            .extractors
            .get(&extension)
            .ok_or_else(|| TextExtractorError::UnsupportedFileType(path.display().to_string()))?;

        extractor.extract_text(path).await
    }
}
