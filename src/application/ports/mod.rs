mod analysis_record_repository;
mod model_gateway;
mod repository_error;
mod text_extractor;
mod text_splitter;

pub use analysis_record_repository::AnalysisRecordRepository;
pub use model_gateway::{ModelGateway, ModelGatewayError};
pub use repository_error::RepositoryError;
pub use text_extractor::{TextExtractor, TextExtractorError};
pub use text_splitter::TextSplitter;
