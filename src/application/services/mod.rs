mod analysis_prompts;
mod analysis_runner;
mod analysis_service;
pub mod budget_calculator;
pub mod consolidation;
mod fragment_cleaner;
mod local_model_gate;
mod token_estimator;

pub use analysis_prompts::AnalysisPrompts;
pub use analysis_runner::AnalysisRunner;
pub use analysis_service::{AnalysisError, AnalysisRequest, AnalysisService};
pub use consolidation::FragmentGroup;
pub use fragment_cleaner::clean_fragment;
pub use local_model_gate::{LocalModelGate, LocalModelPermit};
pub use token_estimator::{EstimationError, TokenEstimator};
