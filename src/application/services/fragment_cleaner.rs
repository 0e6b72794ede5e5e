use regex::Regex;
use std::sync::LazyLock;

static FORMATTING_NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#|📄|✅|❌|⚠️|🔍|📊|💡|🎯|🚀|⚡|🔧|---|\*\*\*|===").unwrap()
});
static SPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());
static BLANK_LINE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Strips heading markers, decorative emoji and horizontal rules from model
/// output, then collapses repeated spaces and blank lines.
///
/// Idempotent: the passes repeat until the text stops changing, since removing
/// one marker can join two others into a new one (`-#--` becomes `---`).
pub fn clean_fragment(text: &str) -> String {
    let mut current = clean_once(text);
    loop {
        let next = clean_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn clean_once(text: &str) -> String {
    let stripped = FORMATTING_NOISE.replace_all(text, "");
    let spaced = SPACE_RUN.replace_all(&stripped, " ");
    let collapsed = BLANK_LINE_RUN.replace_all(&spaced, "\n\n");
    collapsed.trim().to_string()
}
