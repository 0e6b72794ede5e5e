mod init_tracing;
mod log_preview;
mod tracing_config;

pub use init_tracing::{TracingInitError, init_tracing};
pub use log_preview::log_preview;
pub use tracing_config::TracingConfig;
