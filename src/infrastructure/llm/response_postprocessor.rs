//! Normalizes accepted model output: reasoning traces, JSON-wrapped answers
//! and markdown decoration.

const THINK_OPEN: &str = "<think>";
const THINK_CLOSE: &str = "</think>";
const MIN_THINKING_ANSWER_LEN: usize = 100;
const JSON_ANSWER_FIELDS: [&str; 3] = ["text", "response", "content"];

/// Never turns a non-empty answer into an empty one.
pub fn postprocess_response(content: &str) -> String {
    let answer = strip_thinking(content);
    let answer = unwrap_json_answer(&answer);
    let answer = strip_markdown(&answer);

    if answer.trim().is_empty() && !content.trim().is_empty() {
        tracing::debug!("Post-processing emptied the response, keeping raw content");
        return content.to_string();
    }
    answer
}

/// Text after the last `</think>`. When nothing follows it, a long enough
/// thinking block is taken as the answer.
fn strip_thinking(content: &str) -> String {
    let Some(close) = content.rfind(THINK_CLOSE) else {
        return content.to_string();
    };

    let after = content[close + THINK_CLOSE.len()..].trim();
    if !after.is_empty() {
        return after.to_string();
    }

    match content.find(THINK_OPEN) {
        Some(open) if open + THINK_OPEN.len() <= close => {
            let interior = &content[open + THINK_OPEN.len()..close];
            if interior.len() > MIN_THINKING_ANSWER_LEN {
                interior.trim().to_string()
            } else {
                String::new()
            }
        }
        _ => String::new(),
    }
}

fn unwrap_json_answer(content: &str) -> String {
    let trimmed = content.trim();
    if !(trimmed.starts_with('{') && trimmed.ends_with('}')) {
        return content.to_string();
    }

    let Ok(object) = serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(trimmed)
    else {
        return content.to_string();
    };

    JSON_ANSWER_FIELDS
        .iter()
        .find_map(|field| match object.get(*field) {
            Some(serde_json::Value::String(text)) if !text.is_empty() => Some(text.clone()),
            _ => None,
        })
        .unwrap_or_else(|| content.to_string())
}

fn strip_markdown(content: &str) -> String {
    let mut text = content
        .replace("### ", "")
        .replace("## ", "")
        .replace("# ", "");

    let asterisks = text.matches('*').count();
    if asterisks > text.len() / 10 {
        text = text.replace('*', "");
    }

    text.trim().to_string()
}
