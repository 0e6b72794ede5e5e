use crate::domain::TextFragment;

/// Splits a document into ordered fragments no longer than `max_size` bytes.
pub trait TextSplitter: Send + Sync {
    fn split(&self, text: &str, max_size: usize) -> Vec<TextFragment>;
}
