use crate::domain::truncate_on_char_boundary;

const MAX_VISIBLE_LENGTH: usize = 200;

/// Shortened, credential-free rendering of prompts and model output for logs.
pub fn log_preview(text: &str) -> String {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let preview = if trimmed.len() > MAX_VISIBLE_LENGTH {
        format!(
            "{}... ({} chars total)",
            truncate_on_char_boundary(trimmed, MAX_VISIBLE_LENGTH),
            trimmed.len()
        )
    } else {
        trimmed.to_string()
    };

    redact_sensitive_patterns(&preview)
}

fn redact_sensitive_patterns(text: &str) -> String {
    let patterns = [
        ("Bearer ", "Bearer [REDACTED]"),
        ("api_key=", "api_key=[REDACTED]"),
        ("key=", "key=[REDACTED]"),
        ("token=", "token=[REDACTED]"),
    ];

    let mut result = text.to_string();
    for (pattern, replacement) in patterns {
        let mut search_from = 0;
        while let Some(found) = result[search_from..].find(pattern) {
            let start = search_from + found;
            let value_start = start + pattern.len();
            if result[value_start..].starts_with("[REDACTED]") {
                search_from = value_start;
                continue;
            }
            let end = result[value_start..]
                .find(|c: char| c.is_whitespace() || c == '&' || c == '"' || c == '\'')
                .map(|i| value_start + i)
                .unwrap_or(result.len());
            result = format!("{}{}{}", &result[..start], replacement, &result[end..]);
            search_from = start + replacement.len();
        }
    }

    result
}
