use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::application::ports::{AnalysisRecordRepository, RepositoryError};
use crate::domain::{AnalysisRecord, RecordId};

/// Process-local record store. Enforces one record per file hash.
#[derive(Debug, Default)]
pub struct InMemoryRecordRepository {
    records: RwLock<HashMap<RecordId, AnalysisRecord>>,
}

impl InMemoryRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnalysisRecordRepository for InMemoryRecordRepository {
    #[instrument(skip(self, record), fields(record_id = %record.id, file_hash = %record.file_hash))]
    async fn create(&self, record: &AnalysisRecord) -> Result<RecordId, RepositoryError> {
        let mut records = self.records.write().await;

        if records.contains_key(&record.id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "record {} already exists",
                record.id
            )));
        }
        if records.values().any(|r| r.file_hash == record.file_hash) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "a record for file hash {} already exists",
                record.file_hash
            )));
        }

        records.insert(record.id, record.clone());
        Ok(record.id)
    }

    #[instrument(skip(self, record), fields(record_id = %record.id, status = %record.status))]
    async fn update(&self, record: &AnalysisRecord) -> Result<(), RepositoryError> {
        let mut records = self.records.write().await;
        match records.get_mut(&record.id) {
            Some(stored) => {
                *stored = record.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound(format!("record {}", record.id))),
        }
    }

    #[instrument(skip(self))]
    async fn get_by_hash(&self, file_hash: &str) -> Result<Option<AnalysisRecord>, RepositoryError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| r.file_hash == file_hash)
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    #[instrument(skip(self), fields(record_id = %id))]
    async fn get_by_id(&self, id: RecordId) -> Result<Option<AnalysisRecord>, RepositoryError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_recent(&self, limit: usize) -> Result<Vec<AnalysisRecord>, RepositoryError> {
        let records = self.records.read().await;
        let mut recent: Vec<AnalysisRecord> = records.values().cloned().collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(limit);
        Ok(recent)
    }
}
