mod analysis_fragment;
mod analysis_outcome;
mod analysis_record;
mod chat_message;
mod message_role;
mod model_config;
pub mod model_envelope;
mod provider_kind;
mod record_id;
mod record_status;
mod text_fragment;
mod token_forecast;

pub use analysis_fragment::AnalysisFragmentResult;
pub use analysis_outcome::AnalysisOutcome;
pub use analysis_record::AnalysisRecord;
pub use chat_message::ChatMessage;
pub use message_role::MessageRole;
pub use model_config::{ConfigurationError, ModelConfig, ModelProvider};
pub use provider_kind::{OutputTokenField, ProviderKind};
pub use record_id::RecordId;
pub use record_status::RecordStatus;
pub use text_fragment::{TextFragment, floor_char_boundary, truncate_on_char_boundary};
pub use token_forecast::{ForecastWarning, TokenForecast};
