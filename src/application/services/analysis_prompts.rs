/// Prompt texts used by the analysis pipeline and the token forecast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisPrompts {
    pub system: String,
    /// Instruction prepended to the whole document in single-request mode.
    pub single_query: String,
    /// Instruction appended to every fragment in the map phase.
    pub fragment_query: String,
    pub consolidation: String,
    /// Returned when the model produced nothing usable.
    pub empty_result_fallback: String,
}

impl Default for AnalysisPrompts {
    fn default() -> Self {
        Self {
            system: "Analyze legal contracts. Identify: unilateral termination, penalties, \
                     jurisdiction, risks. Give a complete answer without emojis or markdown \
                     formatting."
                .to_string(),
            single_query: "Analyze this complete contract. Identify unilateral termination, \
                           penalties (with amounts), jurisdiction/arbitration and main risks. \
                           Give a complete answer without emojis or markdown formatting."
                .to_string(),
            fragment_query: "Analyze this contract fragment. Identify unilateral termination, \
                             penalties (with amounts), jurisdiction/arbitration and main risks. \
                             Answer without emojis."
                .to_string(),
            consolidation: "Consolidate these fragments into a complete final report on: \
                            unilateral termination, penalties, jurisdiction and risks. Include \
                            every important detail without omitting information. Answer \
                            without emojis or markdown formatting."
                .to_string(),
            empty_result_fallback: "A valid analysis of the contract could not be generated. \
                                    The document may be empty or corrupt, or the language model \
                                    could not process it correctly."
                .to_string(),
        }
    }
}
