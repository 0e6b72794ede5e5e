use crate::application::ports::TextSplitter;
use crate::domain::model_envelope::MIN_CHUNK_SIZE;
use crate::domain::{TextFragment, floor_char_boundary};

/// Fraction of the window, in tenths, before which no split point is searched.
const SEARCH_START_TENTHS: usize = 7;

/// Splits text into fragments of at most `max_size` bytes, preferring to cut
/// after a blank line, then after sentence punctuation, then after whitespace.
///
/// The input is trimmed first. `max_size` is raised to the minimum chunk size.
/// Fragments are trimmed and never empty; offsets refer to the trimmed input.
pub fn split_text(text: &str, max_size: usize) -> Vec<TextFragment> {
    let source = text.trim();
    if source.is_empty() {
        return Vec::new();
    }

    let max_size = max_size.max(MIN_CHUNK_SIZE);
    if source.len() <= max_size {
        return vec![TextFragment::new(0, source.to_string(), 0)];
    }

    let mut fragments = Vec::new();
    let mut position = 0;

    while position < source.len() {
        let rest = &source[position..];
        let split_at = if rest.len() > max_size {
            natural_split_point(rest, max_size)
        } else {
            rest.len()
        };

        let piece = &rest[..split_at];
        let leading = piece.len() - piece.trim_start().len();
        let fragment = piece.trim();
        if !fragment.is_empty() {
            fragments.push(TextFragment::new(
                fragments.len(),
                fragment.to_string(),
                position + leading,
            ));
        }

        position += split_at;
        let remainder = &source[position..];
        position += remainder.len() - remainder.trim_start().len();
    }

    fragments
}

fn natural_split_point(rest: &str, max_size: usize) -> usize {
    let window_end = floor_char_boundary(rest, max_size);
    let search_start = floor_char_boundary(rest, window_end * SEARCH_START_TENTHS / 10);
    let region = &rest[search_start..window_end];

    if let Some(i) = region.rfind("\n\n") {
        return search_start + i + 2;
    }
    if let Some(i) = region.rfind(['.', '!', '?']) {
        return search_start + i + 1;
    }
    if let Some((i, c)) = region.char_indices().rev().find(|(_, c)| c.is_whitespace()) {
        return search_start + i + c.len_utf8();
    }
    window_end
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalBoundarySplitter;

impl TextSplitter for NaturalBoundarySplitter {
    fn split(&self, text: &str, max_size: usize) -> Vec<TextFragment> {
        split_text(text, max_size)
    }
}
