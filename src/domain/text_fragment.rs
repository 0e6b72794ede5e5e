/// A contiguous, trimmed slice of the source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFragment {
    /// Zero-based position in document order.
    pub index: usize,
    pub text: String,
    /// Byte offset of `text` within the trimmed source.
    pub offset: usize,
}

impl TextFragment {
    pub fn new(index: usize, text: String, offset: usize) -> Self {
        Self {
            index,
            text,
            offset,
        }
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Largest char boundary in `text` that is `<= index`.
pub fn floor_char_boundary(text: &str, index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    let mut boundary = index;
    while !text.is_char_boundary(boundary) {
        boundary -= 1;
    }
    boundary
}

/// Prefix of `text` no longer than `max_bytes`, cut on a char boundary.
pub fn truncate_on_char_boundary(text: &str, max_bytes: usize) -> &str {
    &text[..floor_char_boundary(text, max_bytes)]
}
