//! Operating envelope assumed for the target models. The remote services do
//! not report token counts, so every budget is derived from these constants.

/// Context window assumed for self-hosted models (Qwen 3 4B class).
pub const LOCAL_CONTEXT_WINDOW: usize = 8_000;
/// Context window assumed for hosted models (GPT-4 class).
pub const ONLINE_CONTEXT_WINDOW: usize = 128_000;
pub const SAFETY_MARGIN: usize = 1_000;
pub const MAX_OUTPUT_TOKENS: usize = 2_000;
pub const LOCAL_MAX_INPUT_TOKENS: usize = LOCAL_CONTEXT_WINDOW - MAX_OUTPUT_TOKENS - SAFETY_MARGIN;

pub const DEFAULT_CHUNK_SIZE: usize = 3_000;
pub const MIN_CHUNK_SIZE: usize = 500;
/// Output budget for each map-phase request.
pub const PHASE1_MAX_TOKENS: usize = 1_200;
pub const CHARS_PER_TOKEN: usize = 3;
/// Above this many fragments the reduce phase groups them first.
pub const MAX_FRAGMENTS: usize = 4;
pub const FRAGMENT_GROUP_SIZE: usize = 3;
pub const MAX_CHARS_PER_FRAGMENT: usize = 2_500;

pub const MIN_OUTPUT_TOKENS: usize = 800;
pub const MIN_CONSOLIDATION_TOKENS: usize = 1_800;
pub const FORECAST_MAX_PHASE2_OUTPUT_TOKENS: usize = 2_000;
pub const USER_INSTRUCTION_TOKENS: usize = 50;
