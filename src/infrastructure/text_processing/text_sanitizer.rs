use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static HYPHENATED_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<head>\w)-[ \t]*\r?\n[ \t]*(?P<tail>\w)").unwrap());

/// NFKC-normalizes extracted text, re-joins words hyphenated across line
/// breaks, collapses runs of whitespace inside lines and keeps at most one
/// blank line between paragraphs.
pub fn sanitize_extracted_text(raw: &str) -> String {
    let normalized: String = raw.replace('\u{c}', "\n\n").nfkc().collect();
    let de_hyphenated = HYPHENATED_BREAK.replace_all(&normalized, "$head$tail");

    let mut result = String::with_capacity(de_hyphenated.len());
    let mut pending_break: Option<&str> = None;

    for line in de_hyphenated.lines().map(str::trim) {
        if line.is_empty() {
            if !result.is_empty() {
                pending_break = Some("\n\n");
            }
            continue;
        }
        if !result.is_empty() {
            result.push_str(pending_break.unwrap_or("\n"));
        }
        collapse_whitespace_into(line, &mut result);
        pending_break = None;
    }

    result
}

fn collapse_whitespace_into(line: &str, out: &mut String) {
    let mut words = line.split_whitespace();
    if let Some(first) = words.next() {
        out.push_str(first);
    }
    for word in words {
        out.push(' ');
        out.push_str(word);
    }
}
