/// Cleaned model output for one fragment of the map phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisFragmentResult {
    /// One-based position of the fragment.
    pub position: usize,
    pub total: usize,
    pub text: String,
}

impl AnalysisFragmentResult {
    pub fn new(position: usize, total: usize, text: String) -> Self {
        Self {
            position,
            total,
            text,
        }
    }

    /// Labelled form used in consolidation prompts.
    pub fn render(&self) -> String {
        format!("PART {}/{}:\n{}", self.position, self.total, self.text)
    }
}
