//! Reduce-phase prompt assembly: bounds each partial analysis, groups them
//! when there are many, and packs them into one consolidation prompt that
//! fits a local model's input budget.

use crate::domain::model_envelope::{
    CHARS_PER_TOKEN, FRAGMENT_GROUP_SIZE, LOCAL_MAX_INPUT_TOKENS, MAX_CHARS_PER_FRAGMENT,
    MAX_FRAGMENTS,
};
use crate::domain::{AnalysisFragmentResult, truncate_on_char_boundary};

use super::budget_calculator::estimate_tokens;
use super::fragment_cleaner::clean_fragment;

const CONTINUATION_OMITTED: &str = "\n[Continuation omitted]";
const FRAGMENTS_OMITTED: &str = "\n\n[Additional fragments omitted due to token limit]";
const CONTENT_TRUNCATED: &str = "\n\n[Content truncated due to token limit]";

/// Consecutive fragments merged for the reduce phase. `first` and `last` are
/// one-based and inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentGroup {
    pub first: usize,
    pub last: usize,
    pub text: String,
}

impl FragmentGroup {
    pub fn render(&self) -> String {
        format!("GROUP {}-{}:\n{}", self.first, self.last, self.text)
    }
}

pub fn max_consolidation_prompt_chars() -> usize {
    LOCAL_MAX_INPUT_TOKENS * CHARS_PER_TOKEN
}

/// Cuts `text` to `max_chars` bytes and marks the omission.
pub fn truncate_fragment(text: &str, max_chars: usize) -> String {
    if text.len() <= max_chars {
        return text.to_string();
    }
    format!(
        "{}{}",
        truncate_on_char_boundary(text, max_chars),
        CONTINUATION_OMITTED
    )
}

/// Merges fragments into groups of three, in order. Single pass.
pub fn group_fragments(fragments: &[String]) -> Vec<FragmentGroup> {
    fragments
        .chunks(FRAGMENT_GROUP_SIZE)
        .enumerate()
        .map(|(n, group)| {
            let first = n * FRAGMENT_GROUP_SIZE + 1;
            let joined = clean_fragment(&group.join("\n\n"));
            FragmentGroup {
                first,
                last: first + group.len() - 1,
                text: truncate_fragment(&joined, MAX_CHARS_PER_FRAGMENT * 2),
            }
        })
        .collect()
}

/// Rendered, cleaned and bounded fragment texts, grouped when there are more
/// than four.
pub fn prepare_fragments(results: &[AnalysisFragmentResult]) -> Vec<String> {
    let bounded: Vec<String> = results
        .iter()
        .map(|r| truncate_fragment(&clean_fragment(&r.render()), MAX_CHARS_PER_FRAGMENT))
        .collect();

    if bounded.len() <= MAX_FRAGMENTS {
        return bounded;
    }

    tracing::debug!(
        fragments = bounded.len(),
        "Grouping fragments before consolidation"
    );
    group_fragments(&bounded)
        .iter()
        .map(FragmentGroup::render)
        .collect()
}

/// Packs fragments after the instruction until the local prompt budget is
/// reached. Fragments that do not fit are dropped with a marker.
pub fn build_consolidation_prompt(instruction: &str, fragments: &[String]) -> String {
    let max_total = max_consolidation_prompt_chars();
    let mut total = instruction.len();
    let mut combined = String::new();

    for (i, fragment) in fragments.iter().enumerate() {
        if total + fragment.len() + 4 > max_total {
            tracing::warn!(
                first_omitted = i + 1,
                total = fragments.len(),
                "Omitting fragments over the consolidation budget"
            );
            combined.push_str(FRAGMENTS_OMITTED);
            break;
        }
        combined.push_str(fragment);
        combined.push_str("\n\n");
        total += fragment.len() + 2;
    }

    let prompt = format!("{}\n\n{}", instruction, combined);
    if estimate_tokens(&prompt) > LOCAL_MAX_INPUT_TOKENS {
        tracing::warn!(
            estimated_tokens = estimate_tokens(&prompt),
            "Consolidation prompt over budget, truncating"
        );
        return format!(
            "{}{}",
            truncate_on_char_boundary(&prompt, max_total),
            CONTENT_TRUNCATED
        );
    }
    prompt
}
