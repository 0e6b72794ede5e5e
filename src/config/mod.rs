mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{AnalysisSettings, GatewaySettings, LoggingSettings, ModelSettings, Settings};
