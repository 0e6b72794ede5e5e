use async_trait::async_trait;

use crate::domain::{AnalysisRecord, RecordId};

use super::RepositoryError;

#[async_trait]
pub trait AnalysisRecordRepository: Send + Sync {
    async fn create(&self, record: &AnalysisRecord) -> Result<RecordId, RepositoryError>;

    async fn update(&self, record: &AnalysisRecord) -> Result<(), RepositoryError>;

    /// Most recent record for a content hash, in any status.
    async fn get_by_hash(&self, file_hash: &str) -> Result<Option<AnalysisRecord>, RepositoryError>;

    async fn get_by_id(&self, id: RecordId) -> Result<Option<AnalysisRecord>, RepositoryError>;

    async fn list_recent(&self, limit: usize) -> Result<Vec<AnalysisRecord>, RepositoryError>;
}
